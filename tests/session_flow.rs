//! Session, interceptor and guard behaviour against a mock backend

mod common;

use common::{an_hour_ago, in_one_hour, issue_token, Harness};
use mux_client::guard::{self, GuardDecision, Route};
use mux_client::views::auth;
use mux_client::{AuthOutcome, LoginForm, ResetPasswordForm, Role, SignupForm, TOKEN_KEY};
use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_login_stores_admin_token() {
    let server = MockServer::start().await;
    let token = issue_token(Role::Admin, in_one_hour());

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .and(body_json(json!({
            "email": "user@example.com",
            "password": "password1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
        .expect(1)
        .mount(&server)
        .await;

    let h = Harness::new(&server);
    assert!(
        h.session
            .login(&h.client, "user@example.com", "password1")
            .await
    );

    assert_eq!(
        h.session.store().get_item(TOKEN_KEY).unwrap().as_deref(),
        Some(token.as_str())
    );
    assert!(h.session.is_authenticated());
    assert_eq!(h.session.extract_role(), Some(Role::Admin));

    // Survives a restart
    let restarted = h.restart();
    assert!(restarted.is_authenticated());
    assert_eq!(restarted.extract_role(), Some(Role::Admin));
}

#[tokio::test]
async fn test_failed_login_keeps_previous_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid credentials"))
        .mount(&server)
        .await;

    let (h, previous) = Harness::signed_in(&server, Role::User);
    assert!(!h.session.login(&h.client, "ada@example.com", "wrong").await);
    assert_eq!(h.session.token().as_deref(), Some(previous.as_str()));
    assert_eq!(h.session.extract_role(), Some(Role::User));
}

#[tokio::test]
async fn test_login_without_token_in_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .mount(&server)
        .await;

    let h = Harness::new(&server);
    assert!(!h.session.login(&h.client, "ada@example.com", "password1").await);
    assert!(h.session.token().is_none());
    assert!(!h.session.is_authenticated());
}

#[tokio::test]
async fn test_signup_sends_full_name() {
    let server = MockServer::start().await;
    let token = issue_token(Role::User, in_one_hour());

    Mock::given(method("POST"))
        .and(path("/user/register"))
        .and(body_json(json!({
            "username": "Ada Lovelace",
            "email": "ada@example.com",
            "password": "analytical"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "token": token })))
        .expect(1)
        .mount(&server)
        .await;

    let h = Harness::new(&server);
    let form = SignupForm {
        name: "Ada".to_string(),
        surname: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        password: "analytical".to_string(),
        confirm_password: "analytical".to_string(),
    };

    let outcome = auth::signup(&h.session, &h.client, &form).await;
    assert!(outcome.is_success());
    assert_eq!(h.session.extract_role(), Some(Role::User));
}

#[tokio::test]
async fn test_credential_calls_never_carry_authorization() {
    let server = MockServer::start().await;
    let token = issue_token(Role::User, in_one_hour());

    // Mounted first so it wins whenever a header is present
    Mock::given(header_exists("Authorization"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(400))
        .expect(0)
        .mount(&server)
        .await;

    for endpoint in ["/user/login", "/user/register"] {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let (h, _) = Harness::signed_in(&server, Role::Admin);
    assert!(h.session.login(&h.client, "ada@example.com", "password1").await);
    assert!(
        h.session
            .signup(&h.client, "Ada", "Lovelace", "ada@example.com", "password1")
            .await
    );

    server.verify().await;
}

#[tokio::test]
async fn test_authenticated_requests_carry_raw_token() {
    let server = MockServer::start().await;
    let (h, token) = Harness::signed_in(&server, Role::User);

    Mock::given(method("GET"))
        .and(path("/url"))
        .and(header("Authorization", token.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let links: Vec<serde_json::Value> = h.client.get("/url").await.unwrap();
    assert!(links.is_empty());
}

#[tokio::test]
async fn test_http_errors_are_returned_unchanged() {
    let server = MockServer::start().await;
    let (h, _) = Harness::signed_in(&server, Role::User);

    Mock::given(method("GET"))
        .and(path("/expense/all"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = h
        .client
        .get::<serde_json::Value>("/expense/all")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(err.to_string().contains("maintenance"));

    // The session is not touched by request failures
    assert!(h.session.is_authenticated());
}

#[tokio::test]
async fn test_expired_token_is_cleared() {
    let server = MockServer::start().await;
    let h = Harness::new(&server);
    h.session
        .set_token(&issue_token(Role::Admin, an_hour_ago()))
        .unwrap();

    assert!(!h.session.is_authenticated());
    assert!(h.session.store().get_item(TOKEN_KEY).unwrap().is_none());
    assert!(h.session.token().is_none());
    assert!(!h.restart().is_authenticated());
}

#[tokio::test]
async fn test_logout_ends_session() {
    let server = MockServer::start().await;
    let (h, _) = Harness::signed_in(&server, Role::Admin);

    h.session.logout();
    h.session.logout();
    assert!(!h.session.is_authenticated());
    assert_eq!(h.session.extract_role(), None);
}

#[tokio::test]
async fn test_guard_scenarios() {
    let server = MockServer::start().await;
    let admin_only = Route::Files.required_role();

    let h = Harness::new(&server);
    assert_eq!(
        guard::evaluate(&h.session, admin_only),
        GuardDecision::RedirectToLogin
    );
    assert_eq!(guard::navigate(&h.session, Route::Files), Route::Login);

    let (h, _) = Harness::signed_in(&server, Role::User);
    assert_eq!(
        guard::evaluate(&h.session, admin_only),
        GuardDecision::RedirectToHome
    );
    assert_eq!(guard::navigate(&h.session, Route::Files), Route::Home);
    assert_eq!(guard::navigate(&h.session, Route::Links), Route::Links);

    let (h, _) = Harness::signed_in(&server, Role::Admin);
    assert_eq!(guard::evaluate(&h.session, admin_only), GuardDecision::Render);
    assert_eq!(guard::navigate(&h.session, Route::Files), Route::Files);
}

#[tokio::test]
async fn test_login_form_outcomes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let h = Harness::new(&server);

    // Invalid input never reaches the backend
    let outcome = auth::login(&h.session, &h.client, &LoginForm::new("not-an-email", "short")).await;
    assert!(matches!(outcome, AuthOutcome::Invalid(_)));

    let outcome = auth::login(
        &h.session,
        &h.client,
        &LoginForm::new("ada@example.com", "password1"),
    )
    .await;
    assert_eq!(
        outcome,
        AuthOutcome::Failed("Login failed. Please check your credentials.".to_string())
    );

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_reset_password() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/reset-password"))
        .and(body_json(json!({ "email": "ada@example.com" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let h = Harness::new(&server);
    let outcome = auth::reset_password(&h.client, &ResetPasswordForm::new("ada@example.com")).await;
    assert_eq!(
        outcome,
        AuthOutcome::Succeeded {
            message: "Password reset link sent!".to_string(),
            redirect: Route::Login,
        }
    );

    let outcome = auth::reset_password(&h.client, &ResetPasswordForm::new("")).await;
    assert!(matches!(outcome, AuthOutcome::Invalid(_)));
}

#[tokio::test]
async fn test_numeric_subject_keeps_session() {
    let server = MockServer::start().await;
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &json!({ "sub": 42, "role": "ADMIN", "exp": in_one_hour() }),
        &jsonwebtoken::EncodingKey::from_secret(b"server-side-secret"),
    )
    .unwrap();

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
        .mount(&server)
        .await;

    let h = Harness::new(&server);
    assert!(h.session.login(&h.client, "user@example.com", "password1").await);
    assert!(h.session.is_authenticated());
    assert_eq!(h.session.extract_role(), Some(Role::Admin));
    assert_eq!(h.session.claims().unwrap().sub.as_deref(), Some("42"));
}

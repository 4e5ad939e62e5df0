//! Authentication screens
//!
//! Authentication failures never escape as errors: they become an
//! [`AuthOutcome::Failed`] carrying the message to show.

use super::forms::{LoginForm, ResetPasswordForm, SignupForm, ValidationError};
use crate::client::{ApiClient, ClientError};
use crate::guard::Route;
use crate::session::Session;
use serde::Serialize;

/// Password reset endpoint
pub const RESET_PASSWORD_PATH: &str = "/user/reset-password";

/// Result of submitting an auth form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The form did not pass validation; nothing was sent
    Invalid(Vec<ValidationError>),
    /// The backend refused or could not be reached
    Failed(String),
    /// Done; show the message, then go to `redirect`
    Succeeded { message: String, redirect: Route },
}

impl AuthOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Succeeded { .. })
    }
}

/// Submit the sign-in form
pub async fn login(session: &Session, client: &ApiClient, form: &LoginForm) -> AuthOutcome {
    if let Err(errors) = form.validate() {
        return AuthOutcome::Invalid(errors);
    }

    if session.login(client, &form.email, &form.password).await {
        AuthOutcome::Succeeded {
            message: "Login successful! Redirecting...".to_string(),
            redirect: Route::Home,
        }
    } else {
        AuthOutcome::Failed("Login failed. Please check your credentials.".to_string())
    }
}

/// Submit the registration form
pub async fn signup(session: &Session, client: &ApiClient, form: &SignupForm) -> AuthOutcome {
    if let Err(errors) = form.validate() {
        return AuthOutcome::Invalid(errors);
    }

    let ok = session
        .signup(client, &form.name, &form.surname, &form.email, &form.password)
        .await;

    if ok {
        AuthOutcome::Succeeded {
            message: "Account created! Redirecting...".to_string(),
            redirect: Route::Home,
        }
    } else {
        AuthOutcome::Failed("Signup failed. Please try again.".to_string())
    }
}

#[derive(Serialize)]
struct ResetPasswordRequest<'a> {
    email: &'a str,
}

/// Ask the backend to send a password reset link
pub async fn reset_password(client: &ApiClient, form: &ResetPasswordForm) -> AuthOutcome {
    if let Err(errors) = form.validate() {
        return AuthOutcome::Invalid(errors);
    }

    let body = ResetPasswordRequest { email: &form.email };
    match client
        .post::<_, serde_json::Value>(RESET_PASSWORD_PATH, &body)
        .await
    {
        Ok(_) => AuthOutcome::Succeeded {
            message: "Password reset link sent!".to_string(),
            redirect: Route::Login,
        },
        Err(e) => {
            log_failure("Password reset", &e);
            AuthOutcome::Failed("Failed to reset password. Please try again.".to_string())
        }
    }
}

fn log_failure(action: &str, error: &ClientError) {
    tracing::warn!(action, status = ?error.status(), "Auth request failed");
}

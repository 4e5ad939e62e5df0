//! Credential exchange
//!
//! Login and registration both answer with `{ "token": "..." }`. A token is
//! only installed when the call succeeds and the response actually carries
//! one; otherwise the previous session is left as it was.

use super::store::Session;
use crate::client::ApiClient;
use serde::{Deserialize, Serialize};

/// Credential-exchange endpoint for existing accounts
pub const LOGIN_PATH: &str = "/user/login";

/// Credential-exchange endpoint for new accounts
pub const REGISTER_PATH: &str = "/user/register";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    username: String,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
}

impl Session {
    /// Exchange credentials for a session token
    pub async fn login(&self, client: &ApiClient, email: &str, password: &str) -> bool {
        let body = LoginRequest { email, password };

        match client.post::<_, TokenResponse>(LOGIN_PATH, &body).await {
            Ok(response) => self.install(response, "Login"),
            Err(e) => {
                tracing::error!(error = %e, "Login failed");
                false
            }
        }
    }

    /// Register a new account and start a session for it
    pub async fn signup(
        &self,
        client: &ApiClient,
        name: &str,
        surname: &str,
        email: &str,
        password: &str,
    ) -> bool {
        let body = RegisterRequest {
            username: format!("{} {}", name, surname),
            email,
            password,
        };

        match client.post::<_, TokenResponse>(REGISTER_PATH, &body).await {
            Ok(response) => self.install(response, "Signup"),
            Err(e) => {
                tracing::error!(error = %e, "Signup failed");
                false
            }
        }
    }

    fn install(&self, response: TokenResponse, action: &str) -> bool {
        let Some(token) = response.token.filter(|t| !t.is_empty()) else {
            tracing::error!(action, "Credential exchange returned no token");
            return false;
        };

        match self.set_token(&token) {
            Ok(()) => {
                tracing::info!(action, "Session started");
                true
            }
            Err(e) => {
                tracing::error!(action, error = %e, "Failed to persist session token");
                false
            }
        }
    }
}

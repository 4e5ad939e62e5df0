//! Shared fixtures for the integration tests

#![allow(dead_code)]

use jsonwebtoken::{encode, EncodingKey, Header};
use mux_client::{ApiClient, ClientConfig, FileStore, Role, Session};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::MockServer;

/// Sign a token the way the backend does
pub fn issue_token(role: Role, exp: i64) -> String {
    let claims = json!({
        "sub": "65f0c0ffee",
        "email": "ada@example.com",
        "role": role.as_str(),
        "exp": exp,
        "iat": chrono::Utc::now().timestamp(),
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"server-side-secret"),
    )
    .unwrap()
}

pub fn in_one_hour() -> i64 {
    chrono::Utc::now().timestamp() + 3600
}

pub fn an_hour_ago() -> i64 {
    chrono::Utc::now().timestamp() - 3600
}

/// A session persisted in a temporary directory, with a client for `server`
pub struct Harness {
    pub dir: TempDir,
    pub session: Arc<Session>,
    pub client: ApiClient,
}

impl Harness {
    pub fn new(server: &MockServer) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let session = Arc::new(Session::new(Arc::new(store)));
        let client = ApiClient::new(ClientConfig::new(server.uri()), session.clone()).unwrap();
        Self {
            dir,
            session,
            client,
        }
    }

    /// Same as `new`, already signed in with `role`
    pub fn signed_in(server: &MockServer, role: Role) -> (Self, String) {
        let harness = Self::new(server);
        let token = issue_token(role, in_one_hour());
        harness.session.set_token(&token).unwrap();
        (harness, token)
    }

    /// A fresh session reading the same state directory, as after a restart
    pub fn restart(&self) -> Arc<Session> {
        let store = FileStore::open(self.dir.path()).unwrap();
        Arc::new(Session::new(Arc::new(store)))
    }
}

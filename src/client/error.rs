//! HTTP client error types

use thiserror::Error;

/// Errors surfaced by [`ApiClient`](super::ApiClient) calls
///
/// Transport errors keep the underlying `reqwest` error; callers decide
/// what a failure means.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Upload aborted: {0}")]
    Aborted(String),
}

impl ClientError {
    /// HTTP status for errors that carry one
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::ApiError { status, .. } => Some(*status),
            ClientError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err.to_string())
    }
}

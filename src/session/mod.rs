//! Session Handling
//!
//! - **claims**: typed token payload and decoding
//! - **store**: the [`Session`] holding the current token
//! - **auth**: login and registration against the backend
//!
//! A token is the only authentication signal: the session is valid while
//! a decodable token with a future expiry sits in the durable store.

mod auth;
pub mod claims;
mod store;

pub use auth::{LOGIN_PATH, REGISTER_PATH};
pub use claims::{Claims, Role, TokenError};
pub use store::Session;

/// Paths that exchange credentials and must go out unauthenticated
pub const CREDENTIAL_PATHS: [&str; 2] = [LOGIN_PATH, REGISTER_PATH];

/// Whether `path` targets a credential-exchange endpoint
pub fn is_credential_path(path: &str) -> bool {
    CREDENTIAL_PATHS.iter().any(|p| path.contains(p))
}

//! Session Store
//!
//! Holds the bearer token for the current user and mirrors it into the
//! durable store. The session is an explicitly constructed value shared by
//! `Arc` with the HTTP client; there is no process-wide singleton.

use super::claims::{Claims, Role};
use crate::storage::{KeyValueStore, StorageResult, TOKEN_KEY};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The authenticated session
pub struct Session {
    store: Arc<dyn KeyValueStore>,
    token: RwLock<Option<String>>,
}

impl Session {
    /// Create a session over `store`, restoring a previously persisted token
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let token = match store.get_item(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted session token");
                None
            }
        };

        if token.is_some() {
            tracing::debug!("Restored persisted session token");
        }

        Self {
            store,
            token: RwLock::new(token),
        }
    }

    /// Durable store backing this session
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Check whether the persisted token is present and not expired
    ///
    /// A token that cannot be decoded, lacks an expiry, or has expired
    /// invalidates the session as a side effect.
    pub fn is_authenticated(&self) -> bool {
        let stored = match self.store.get_item(TOKEN_KEY) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session token");
                None
            }
        };

        if let Some(token) = stored {
            match Claims::decode(&token) {
                Ok(claims) if claims.is_valid_at(chrono::Utc::now().timestamp()) => {
                    *self.write() = Some(token);
                    return true;
                }
                Ok(claims) => {
                    tracing::debug!(exp = ?claims.exp, "Session token expired");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Token decoding failed");
                }
            }
        }

        self.logout();
        false
    }

    /// Role claim of the token currently held in memory
    ///
    /// Expiry is not re-validated here.
    pub fn extract_role(&self) -> Option<Role> {
        self.claims().and_then(|claims| claims.role)
    }

    /// Decoded claims of the token currently held in memory
    pub fn claims(&self) -> Option<Claims> {
        let token = self.token()?;
        match Claims::decode(&token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::error!(error = %e, "Error extracting claims from token");
                None
            }
        }
    }

    /// Clear the token from memory and durable storage
    pub fn logout(&self) {
        *self.write() = None;
        if let Err(e) = self.store.remove_item(TOKEN_KEY) {
            tracing::warn!(error = %e, "Failed to remove persisted session token");
        }
    }

    /// Token currently held in memory
    pub fn token(&self) -> Option<String> {
        self.read().clone()
    }

    /// Replace the token, persisting it first
    pub fn set_token(&self, token: &str) -> StorageResult<()> {
        self.store.set_item(TOKEN_KEY, token)?;
        *self.write() = Some(token.to_string());
        Ok(())
    }

    // The guarded value is a plain Option<String>, so a poisoned lock still
    // holds a consistent token.
    fn read(&self) -> RwLockReadGuard<'_, Option<String>> {
        self.token.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<String>> {
        self.token.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("has_token", &self.read().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::claims::test_tokens::{an_hour_ago, in_one_hour, issue};
    use crate::storage::{FileStore, MemoryStore};
    use tempfile::tempdir;

    fn memory_session() -> (Session, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (Session::new(store.clone()), store)
    }

    #[test]
    fn test_no_token_is_unauthenticated() {
        let (session, _) = memory_session();
        assert!(!session.is_authenticated());
        assert_eq!(session.extract_role(), None);
    }

    #[test]
    fn test_valid_token_is_authenticated() {
        let (session, store) = memory_session();
        let token = issue(Some(Role::User), Some(in_one_hour()));
        session.set_token(&token).unwrap();

        assert!(session.is_authenticated());
        assert_eq!(store.get_item(TOKEN_KEY).unwrap(), Some(token));
    }

    #[test]
    fn test_expired_token_clears_storage() {
        let (session, store) = memory_session();
        session
            .set_token(&issue(Some(Role::Admin), Some(an_hour_ago())))
            .unwrap();

        assert!(!session.is_authenticated());
        assert_eq!(store.get_item(TOKEN_KEY).unwrap(), None);
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_undecodable_token_clears_storage() {
        let (session, store) = memory_session();
        store.set_item(TOKEN_KEY, "definitely.not.jwt").unwrap();

        assert!(!session.is_authenticated());
        assert_eq!(store.get_item(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_token_without_expiry_is_rejected() {
        let (session, store) = memory_session();
        session.set_token(&issue(Some(Role::Admin), None)).unwrap();

        assert!(!session.is_authenticated());
        assert_eq!(store.get_item(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_extract_role() {
        let (session, _) = memory_session();
        session
            .set_token(&issue(Some(Role::Admin), Some(in_one_hour())))
            .unwrap();
        assert_eq!(session.extract_role(), Some(Role::Admin));

        session
            .set_token(&issue(Some(Role::User), Some(in_one_hour())))
            .unwrap();
        assert_eq!(session.extract_role(), Some(Role::User));
    }

    #[test]
    fn test_extract_role_ignores_expiry() {
        let (session, _) = memory_session();
        session
            .set_token(&issue(Some(Role::User), Some(an_hour_ago())))
            .unwrap();
        assert_eq!(session.extract_role(), Some(Role::User));
    }

    #[test]
    fn test_logout_then_unauthenticated() {
        let (session, _) = memory_session();
        session
            .set_token(&issue(Some(Role::User), Some(in_one_hour())))
            .unwrap();

        session.logout();
        assert!(!session.is_authenticated());

        // Idempotent
        session.logout();
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_is_authenticated_reloads_from_storage() {
        let (session, store) = memory_session();
        let token = issue(Some(Role::Admin), Some(in_one_hour()));
        store.set_item(TOKEN_KEY, &token).unwrap();

        assert_eq!(session.token(), None);
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some(token));
    }

    #[test]
    fn test_token_survives_restart() {
        let dir = tempdir().unwrap();
        let token = issue(Some(Role::Admin), Some(in_one_hour()));

        {
            let session = Session::new(Arc::new(FileStore::open(dir.path()).unwrap()));
            session.set_token(&token).unwrap();
        }

        let session = Session::new(Arc::new(FileStore::open(dir.path()).unwrap()));
        assert_eq!(session.token(), Some(token));
        assert!(session.is_authenticated());
        assert_eq!(session.extract_role(), Some(Role::Admin));
    }
}

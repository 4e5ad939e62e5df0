//! Durable Client Storage
//!
//! Named string slots that survive process restarts, the way browser
//! local storage does for a web client.
//!
//! - **file**: JSON file backed store used by the CLI
//! - **memory**: in-process store for tests and embedding
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use mux_client::storage::{FileStore, KeyValueStore, TOKEN_KEY};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FileStore::open("./state")?;
//!     store.set_item(TOKEN_KEY, "eyJhbGciOi...")?;
//!     assert!(store.get_item(TOKEN_KEY)?.is_some());
//!     store.remove_item(TOKEN_KEY)?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod file;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Slot holding the session token
pub const TOKEN_KEY: &str = "token";

/// Slot holding the dark mode preference (JSON boolean)
pub const DARK_MODE_KEY: &str = "darkMode";

/// A durable string key-value store
pub trait KeyValueStore: Send + Sync {
    /// Read a slot, `None` when it was never written or has been removed
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a slot, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a slot. Removing a missing slot is not an error.
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

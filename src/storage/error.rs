//! Storage error types
//!
//! Defines all errors that can occur in the durable store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing durable slots
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a JSON object of strings
    #[error("Corrupt store file {path:?}: {error}")]
    Corruption { path: PathBuf, error: String },

    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Lock acquisition failed
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

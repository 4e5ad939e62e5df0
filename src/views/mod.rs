//! Dashboard Views
//!
//! Each view owns its local state and talks to the backend only through
//! [`ApiClient`](crate::client::ApiClient).
//!
//! - **forms**: client-side validation for the auth screens
//! - **auth**: login, signup and password reset flows
//! - **dashboard**: shell, navigation menu and theme preference
//! - **links**: short-link administration
//! - **expenses**: monthly expense statistics
//! - **files**: file-storage browser with uploads

pub mod auth;
pub mod dashboard;
pub mod expenses;
pub mod files;
pub mod forms;
pub mod links;

pub use auth::AuthOutcome;
pub use dashboard::{Dashboard, MenuItem};
pub use expenses::{Expense, ExpensesView, MonthlySummary, TypeAmount};
pub use files::{FileBrowser, FileEntry, FileKind};
pub use forms::{LoginForm, ResetPasswordForm, SignupForm, ValidationError};
pub use links::{LinksView, ShortLink};

use crate::client::ClientError;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors surfaced by view operations
#[derive(Error, Debug)]
pub enum ViewError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for view operations
pub type ViewResult<T> = Result<T, ViewError>;

//! # MUX Client
//!
//! Client for the MUX backend: session handling, an authenticated HTTP
//! layer, role-based route guarding and the dashboard views (links,
//! expenses, file storage) built on top of them.
//!
//! ## Features
//!
//! - **Durable session**: the bearer token survives restarts in a small
//!   key-value file
//! - **Typed claims**: token payloads decode into [`Claims`] and fail closed
//! - **Interceptor**: every request carries the token except credential
//!   exchanges
//! - **Uploads**: streamed, cancellable, with progress reporting
//!
//! ## Modules
//!
//! - [`storage`]: durable string slots
//! - [`session`]: token, claims, login and registration
//! - [`client`]: authenticated request wrapper and uploads
//! - [`guard`]: navigation decisions
//! - [`views`]: dashboard screens as view models
//! - [`config`]: TOML and environment configuration
//! - [`logging`]: tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mux_client::{ApiClient, ClientConfig, FileStore, LinksView, Session};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Arc::new(Session::new(Arc::new(FileStore::open("./state")?)));
//!     let client = ApiClient::new(ClientConfig::new("http://localhost:8080"), session.clone())?;
//!
//!     if !session.login(&client, "ada@example.com", "correct horse").await {
//!         eprintln!("Login failed");
//!         return Ok(());
//!     }
//!
//!     let mut links = LinksView::new(client);
//!     for link in links.refresh().await? {
//!         println!("{} -> {}", link.name, link.copy_url());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod guard;
pub mod logging;
pub mod session;
pub mod storage;
pub mod views;

// Re-export top-level types for convenience
pub use storage::{
    FileStore, KeyValueStore, MemoryStore, StorageError, StorageResult, DARK_MODE_KEY, TOKEN_KEY,
};

pub use session::{Claims, Role, Session, TokenError};

pub use client::{
    ApiClient, ApiRequest, ClientConfig, ClientError, ResponseBody, ResponseType, UploadRequest,
    UploadTask, UploadedFile,
};

pub use guard::{GuardDecision, Route};

pub use views::{
    AuthOutcome, Dashboard, Expense, ExpensesView, FileBrowser, FileEntry, FileKind, LinksView,
    LoginForm, MonthlySummary, ResetPasswordForm, ShortLink, SignupForm, ValidationError,
    ViewError, ViewResult,
};

pub use config::{generate_default_config, Config, ConfigError, LoggingConfig};

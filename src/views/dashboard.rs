//! Dashboard shell
//!
//! Entry point of the authenticated area: checks the session when opened,
//! builds the navigation menu for the current role, and keeps the dark mode
//! preference in the durable store.

use crate::guard::{self, Route};
use crate::session::{Role, Session};
use crate::storage::{KeyValueStore, StorageResult, DARK_MODE_KEY};
use std::sync::Arc;

/// Entries of the navigation drawer, in display order
pub const MENU_LABELS: [&str; 4] = ["Links", "Expenses", "File-Storage", "Logout"];

/// One entry of the navigation drawer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub route: Route,
}

/// The authenticated dashboard
#[derive(Debug)]
pub struct Dashboard {
    session: Arc<Session>,
    is_admin: bool,
    dark_mode: bool,
}

impl Dashboard {
    /// Open the dashboard, or get the route to redirect to
    pub fn open(session: Arc<Session>) -> Result<Self, Route> {
        if !session.is_authenticated() {
            tracing::info!("Dashboard opened without a session, redirecting to login");
            return Err(Route::Login);
        }

        let is_admin = session.extract_role() == Some(Role::Admin);
        let dark_mode = load_dark_mode(session.store().as_ref());

        Ok(Self {
            session,
            is_admin,
            dark_mode,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Navigation entries visible to the current user
    pub fn menu(&self) -> Vec<MenuItem> {
        MENU_LABELS
            .iter()
            .filter(|label| self.is_admin || !label.eq_ignore_ascii_case("file-storage"))
            .map(|&label| MenuItem {
                label,
                route: label_route(label),
            })
            .collect()
    }

    /// Follow a menu entry by its label
    ///
    /// "Logout" ends the session; every other label goes through the guard.
    pub fn navigate(&mut self, label: &str) -> Route {
        if label.eq_ignore_ascii_case("logout") {
            self.session.logout();
            tracing::info!("Logged out");
            return Route::Login;
        }
        guard::navigate(&self.session, label_route(label))
    }

    /// Flip the dark mode preference and persist it
    pub fn toggle_theme(&mut self) -> StorageResult<bool> {
        let dark_mode = !self.dark_mode;
        save_dark_mode(self.session.store().as_ref(), dark_mode)?;
        self.dark_mode = dark_mode;
        Ok(dark_mode)
    }
}

fn label_route(label: &str) -> Route {
    if label.eq_ignore_ascii_case("logout") {
        return Route::Login;
    }
    Route::parse(&format!("/{}", label.to_ascii_lowercase()))
}

/// Read the dark mode slot; missing or malformed means light mode
pub fn load_dark_mode(store: &dyn KeyValueStore) -> bool {
    match store.get_item(DARK_MODE_KEY) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or(false),
        Ok(None) => false,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read theme preference");
            false
        }
    }
}

/// Persist the dark mode slot as a JSON boolean
pub fn save_dark_mode(store: &dyn KeyValueStore, dark_mode: bool) -> StorageResult<()> {
    store.set_item(DARK_MODE_KEY, &serde_json::to_string(&dark_mode)?)
}

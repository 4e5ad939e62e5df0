//! Route Guard
//!
//! Decides, on every navigation, whether a view may be shown. The guard
//! keeps no state: the session is consulted afresh each time.

use crate::session::{Role, Session};
use std::fmt;

/// Navigable routes of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Links,
    Expenses,
    Files,
    Login,
    Signup,
    ResetPassword,
    NotFound,
}

impl Route {
    /// Resolve a path, case-insensitively and ignoring a trailing slash
    pub fn parse(path: &str) -> Route {
        let path = path.trim();
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };

        match path.to_ascii_lowercase().as_str() {
            "" | "/" => Route::Home,
            "/links" => Route::Links,
            "/expenses" => Route::Expenses,
            "/files" | "/file-storage" => Route::Files,
            "/auth/login" => Route::Login,
            "/auth/signup" => Route::Signup,
            "/auth/reset-password" => Route::ResetPassword,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Links => "/links",
            Route::Expenses => "/expenses",
            Route::Files => "/files",
            Route::Login => "/auth/login",
            Route::Signup => "/auth/signup",
            Route::ResetPassword => "/auth/reset-password",
            Route::NotFound => "*",
        }
    }

    /// Role needed to open the route, if any
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::Files => Some(Role::Admin),
            _ => None,
        }
    }

    /// Routes reachable without a session
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Route::Login | Route::Signup | Route::ResetPassword | Route::NotFound
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of a guard evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    RedirectToLogin,
    RedirectToHome,
}

impl GuardDecision {
    /// Route that ends up on screen when `requested` was asked for
    pub fn target(&self, requested: Route) -> Route {
        match self {
            GuardDecision::Render => requested,
            GuardDecision::RedirectToLogin => Route::Login,
            GuardDecision::RedirectToHome => Route::Home,
        }
    }
}

/// The decision itself, independent of where session state comes from
pub fn decide(authenticated: bool, role: Option<Role>, required: Option<Role>) -> GuardDecision {
    if !authenticated {
        return GuardDecision::RedirectToLogin;
    }
    match required {
        Some(required) if role != Some(required) => GuardDecision::RedirectToHome,
        _ => GuardDecision::Render,
    }
}

/// Evaluate the guard against `session`
///
/// The authentication check runs first: it refreshes the in-memory token
/// the role is then read from.
pub fn evaluate(session: &Session, required: Option<Role>) -> GuardDecision {
    let authenticated = session.is_authenticated();
    let role = session.extract_role();
    let decision = decide(authenticated, role, required);

    tracing::debug!(
        authenticated,
        role = ?role,
        required = ?required,
        decision = ?decision,
        "Route guard evaluated"
    );

    decision
}

/// Resolve the route actually shown when navigating to `requested`
pub fn navigate(session: &Session, requested: Route) -> Route {
    if requested.is_public() {
        return requested;
    }
    evaluate(session, requested.required_role()).target(requested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::claims::test_tokens::{an_hour_ago, in_one_hour, issue};
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    fn session_with(token: Option<String>) -> Session {
        let session = Session::new(Arc::new(MemoryStore::new()));
        if let Some(token) = token {
            session.set_token(&token).unwrap();
        }
        session
    }

    #[test]
    fn test_decide_table() {
        assert_eq!(
            decide(false, Some(Role::Admin), Some(Role::Admin)),
            GuardDecision::RedirectToLogin
        );
        assert_eq!(
            decide(true, Some(Role::User), Some(Role::Admin)),
            GuardDecision::RedirectToHome
        );
        assert_eq!(
            decide(true, None, Some(Role::Admin)),
            GuardDecision::RedirectToHome
        );
        assert_eq!(
            decide(true, Some(Role::Admin), Some(Role::Admin)),
            GuardDecision::Render
        );
        assert_eq!(decide(true, None, None), GuardDecision::Render);
    }

    #[test]
    fn test_no_token_redirects_to_login() {
        let session = session_with(None);
        assert_eq!(
            evaluate(&session, Some(Role::Admin)),
            GuardDecision::RedirectToLogin
        );
        assert_eq!(navigate(&session, Route::Files), Route::Login);
    }

    #[test]
    fn test_user_on_admin_view_redirects_home() {
        let session = session_with(Some(issue(Some(Role::User), Some(in_one_hour()))));
        assert_eq!(
            evaluate(&session, Some(Role::Admin)),
            GuardDecision::RedirectToHome
        );
        assert_eq!(navigate(&session, Route::Files), Route::Home);
        assert_eq!(navigate(&session, Route::Links), Route::Links);
    }

    #[test]
    fn test_admin_on_admin_view_renders() {
        let session = session_with(Some(issue(Some(Role::Admin), Some(in_one_hour()))));
        assert_eq!(evaluate(&session, Some(Role::Admin)), GuardDecision::Render);
        assert_eq!(navigate(&session, Route::Files), Route::Files);
    }

    #[test]
    fn test_expired_admin_redirects_to_login() {
        let session = session_with(Some(issue(Some(Role::Admin), Some(an_hour_ago()))));
        assert_eq!(navigate(&session, Route::Files), Route::Login);
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_public_routes_skip_guard() {
        let session = session_with(None);
        assert_eq!(navigate(&session, Route::Login), Route::Login);
        assert_eq!(navigate(&session, Route::Signup), Route::Signup);
        assert_eq!(navigate(&session, Route::NotFound), Route::NotFound);
    }

    #[test]
    fn test_route_parsing() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/Links"), Route::Links);
        assert_eq!(Route::parse("/expenses/"), Route::Expenses);
        assert_eq!(Route::parse("/auth/reset-password"), Route::ResetPassword);
        assert_eq!(Route::parse("/nope"), Route::NotFound);
        for route in [
            Route::Home,
            Route::Links,
            Route::Expenses,
            Route::Files,
            Route::Login,
            Route::Signup,
            Route::ResetPassword,
        ] {
            assert_eq!(Route::parse(route.path()), route);
        }
    }
}

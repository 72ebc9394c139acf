//! Route table and access decisions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components consult [`evaluate`] before rendering so every page
//! applies identical redirect behavior. Decisions wait for the first session
//! initialization; until then nothing renders and nothing redirects, which
//! keeps the SSR pass and the first hydrated frame in agreement.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::state::session::SessionState;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Who may see a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Only signed-out visitors; signed-in users are sent to the dashboard.
    GuestOnly,
    /// Only signed-in users; everyone else is sent to login.
    Protected,
    /// Pure redirect chosen by session state.
    Redirect,
    /// Anyone.
    Public,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppRoute {
    Root,
    Login,
    Register,
    Dashboard,
    Profile,
    Settings,
    NotFound,
}

impl AppRoute {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Login => LOGIN_PATH,
            Self::Register => "/register",
            Self::Dashboard => DASHBOARD_PATH,
            Self::Profile => "/profile",
            Self::Settings => "/settings",
            Self::NotFound => "*",
        }
    }

    /// Resolve a location path, ignoring a trailing slash. Unknown paths map to `NotFound`.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Root,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/profile" => Self::Profile,
            "/settings" => Self::Settings,
            _ => Self::NotFound,
        }
    }

    #[must_use]
    pub fn access(self) -> Access {
        match self {
            Self::Login | Self::Register => Access::GuestOnly,
            Self::Dashboard | Self::Profile | Self::Settings => Access::Protected,
            Self::Root => Access::Redirect,
            Self::NotFound => Access::Public,
        }
    }
}

/// Outcome of a guard check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session not initialized yet; render nothing.
    Pending,
    Render,
    /// Replace the current location with this path.
    Redirect(&'static str),
}

/// Decide what `route` should do for `session`.
#[must_use]
pub fn evaluate(route: AppRoute, session: &SessionState) -> GuardDecision {
    let access = route.access();
    if access == Access::Public {
        return GuardDecision::Render;
    }
    if !session.ready {
        return GuardDecision::Pending;
    }
    let signed_in = session.is_authenticated();
    match access {
        Access::Protected if !signed_in => GuardDecision::Redirect(LOGIN_PATH),
        Access::GuestOnly if signed_in => GuardDecision::Redirect(DASHBOARD_PATH),
        Access::Redirect => GuardDecision::Redirect(if signed_in { DASHBOARD_PATH } else { LOGIN_PATH }),
        _ => GuardDecision::Render,
    }
}

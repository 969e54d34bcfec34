//! Route guards.
//!
//! A protected route names the role it needs. Guards read a
//! `SessionState` snapshot and never mutate it. Before hydration finishes
//! every route answers `Pending`, so neither protected nor public content
//! is shown until the session is known.

use crate::session::{Role, SessionState};

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
    Movies,
    MovieDetail(i64),
    TopRated,
    Trending,
    Search,
    Dashboard,
    AdminMovies,
}

impl Route {
    /// Match a path (query string ignored). Unknown paths are `None`.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let route = match trimmed {
            "" => Self::Home,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/forgot-password" => Self::ForgotPassword,
            "/reset-password" => Self::ResetPassword,
            "/movies" => Self::Movies,
            "/top-rated" => Self::TopRated,
            "/trending" => Self::Trending,
            "/search" => Self::Search,
            "/dashboard" => Self::Dashboard,
            "/admin/movies" => Self::AdminMovies,
            other => {
                let id = other.strip_prefix("/movies/")?.parse().ok()?;
                Self::MovieDetail(id)
            }
        };
        Some(route)
    }

    #[must_use]
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Self::Dashboard => Some(Role::Reviewer),
            Self::AdminMovies => Some(Role::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session not hydrated yet; render a neutral loading state.
    Pending,
    Allow,
    RedirectTo(&'static str),
}

/// Decide whether a view needing `required` may render.
#[must_use]
pub fn guard(state: &SessionState, required: Option<Role>) -> GuardDecision {
    if !state.is_hydrated() {
        return GuardDecision::Pending;
    }
    let Some(required) = required else {
        return GuardDecision::Allow;
    };
    if !state.is_authenticated() {
        return GuardDecision::RedirectTo(LOGIN_PATH);
    }
    if state.role() != Some(required) {
        return GuardDecision::RedirectTo(HOME_PATH);
    }
    GuardDecision::Allow
}

/// Guard for a path; unknown paths are treated as public.
#[must_use]
pub fn guard_path(state: &SessionState, path: &str) -> GuardDecision {
    let required = Route::parse(path).and_then(|route| route.required_role());
    guard(state, required)
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;

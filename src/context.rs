//! Explicit client context handed to every view.
//!
//! DESIGN
//! ======
//! Views never reach for global state. They receive a `ClientContext`
//! that exposes the session read-only (`session()` snapshot accessors),
//! the two session writers (`login`, `logout`), the typed services, and
//! the navigator to subscribe to hard resets.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use crate::api::{AuthApi, MoviesApi, ReviewsApi};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::gateway::Gateway;
use crate::guard::{self, GuardDecision};
use crate::navigation::{NavigationEvent, Navigator, ViewScope};
use crate::session::{Role, SessionState, SessionStore, User};
use crate::storage::{FileStore, KeyValueStore};

#[derive(Clone)]
pub struct ClientContext {
    session: Arc<SessionStore>,
    gateway: Gateway,
    navigator: Navigator,
}

impl ClientContext {
    /// Wire a context over `storage`. The session stays `Unknown` until
    /// [`ClientContext::hydrate`] runs.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, storage: Arc<dyn KeyValueStore>) -> Result<Self, ApiError> {
        let session = Arc::new(SessionStore::new(storage));
        let navigator = Navigator::new();
        let gateway = Gateway::new(&config.api_base_url, &config.login_path, session.clone(), navigator.clone())?;
        Ok(Self { session, gateway, navigator })
    }

    /// File-backed context, hydrated and ready for guard decisions.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn start(config: &ClientConfig) -> Result<Self, ApiError> {
        let ctx = Self::new(config, Arc::new(FileStore::new(&config.session_file)))?;
        ctx.hydrate();
        Ok(ctx)
    }

    pub fn hydrate(&self) -> SessionState {
        self.session.hydrate()
    }

    // =========================================================================
    // SESSION (read side)
    // =========================================================================

    #[must_use]
    pub fn session(&self) -> SessionState {
        self.session.snapshot()
    }

    #[must_use]
    pub fn subscribe_session(&self) -> watch::Receiver<SessionState> {
        self.session.subscribe()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.session.user()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.session.role()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    #[must_use]
    pub fn guard(&self, path: &str) -> GuardDecision {
        guard::guard_path(&self.session.snapshot(), path)
    }

    // =========================================================================
    // SESSION (write side)
    // =========================================================================

    /// # Errors
    ///
    /// See [`SessionStore::login`].
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        self.session.login(&self.gateway, email, password).await
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    // =========================================================================
    // SERVICES / NAVIGATION
    // =========================================================================

    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    #[must_use]
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(&self.gateway)
    }

    #[must_use]
    pub fn movies(&self) -> MoviesApi<'_> {
        MoviesApi::new(&self.gateway)
    }

    #[must_use]
    pub fn reviews(&self) -> ReviewsApi<'_> {
        ReviewsApi::new(&self.gateway)
    }

    #[must_use]
    pub fn navigation(&self) -> broadcast::Receiver<NavigationEvent> {
        self.navigator.subscribe()
    }

    #[must_use]
    pub fn view_scope(&self) -> ViewScope {
        self.navigator.scope()
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;

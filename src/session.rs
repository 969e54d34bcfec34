//! Session store — who is logged in, and with what role.
//!
//! ARCHITECTURE
//! ============
//! The session is a single `SessionState` value held in a `watch` channel.
//! Every transition replaces the whole value, so readers observe either a
//! fully authenticated session (token + user) or none at all, never a
//! half-written one. Views get read access through accessors and
//! `subscribe()`; the only writers are `login`, `logout`, and `hydrate`.
//!
//! PERSISTENCE
//! ===========
//! The token and the JSON user record are mirrored into a `KeyValueStore`
//! under `jwt_token` / `user`. `hydrate` restores them at startup. Any
//! inconsistency (one key missing, unparseable user) is resolved by
//! clearing both keys.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::watch;

use crate::error::ApiError;
use crate::storage::{KeyValueStore, TOKEN_KEY, USER_KEY};

/// Message shown when the backend gives no usable reason for a failed login.
pub const LOGIN_FAILED_FALLBACK: &str = "Login failed. Please check your credentials.";

// =============================================================================
// ROLE / USER
// =============================================================================

/// Roles with elevated access. Anything else the backend sends maps to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Reviewer,
    Admin,
}

impl Role {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "REVIEWER" => Some(Self::Reviewer),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reviewer => "REVIEWER",
            Self::Admin => "ADMIN",
        }
    }
}

/// Backend user id. Numeric ids and opaque string ids (UUIDs) are both
/// accepted and written back in the form they arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_owned())
    }
}

/// Identity record returned by `/auth/login` and persisted under `user`.
///
/// The role is kept as the raw string and unknown fields are carried in
/// `extra`, so a stored record re-serializes to what the backend sent.
/// Only `id` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::parse)
    }
}

// =============================================================================
// SESSION STATE
// =============================================================================

/// Token and user, always held together.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// Before `hydrate` has finished. Guards must not decide anything yet.
    #[default]
    Unknown,
    Anonymous,
    Authenticated(AuthSession),
}

impl SessionState {
    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub fn auth(&self) -> Option<&AuthSession> {
        match self {
            Self::Authenticated(auth) => Some(auth),
            Self::Unknown | Self::Anonymous => None,
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.auth().map(|a| a.token.as_str())
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.auth().map(|a| &a.user)
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user().and_then(User::role)
    }
}

// =============================================================================
// AUTHENTICATOR
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Successful `/auth/login` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Credential verification backend. The gateway implements this against
/// `POST /auth/login`.
#[async_trait::async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;
}

// =============================================================================
// SESSION STORE
// =============================================================================

pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    /// New store in the `Unknown` state. Call [`SessionStore::hydrate`] next.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage, state: watch::Sender::new(SessionState::Unknown) }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.state.borrow().token().map(ToOwned::to_owned)
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.state.borrow().role()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Restore the persisted session. Never fails: anything short of a
    /// complete, parseable record ends in `Anonymous` with storage cleared.
    pub fn hydrate(&self) -> SessionState {
        let restored = match self.read_persisted() {
            Ok(restored) => restored,
            Err(reason) => {
                tracing::warn!(%reason, "discarding persisted session");
                None
            }
        };

        match restored {
            Some(auth) => {
                tracing::info!(user_id = %auth.user.id, "session restored");
                let state = SessionState::Authenticated(auth);
                self.state.send_replace(state.clone());
                state
            }
            None => {
                self.clear();
                SessionState::Anonymous
            }
        }
    }

    /// `Ok(None)` when nothing (or only half a session) is stored; `Err`
    /// carries the reason a present record was rejected.
    fn read_persisted(&self) -> Result<Option<AuthSession>, String> {
        let token = self.storage.get(TOKEN_KEY).map_err(|e| e.to_string())?;
        let raw_user = self.storage.get(USER_KEY).map_err(|e| e.to_string())?;

        let (Some(token), Some(raw_user)) = (token, raw_user) else {
            return Ok(None);
        };
        if token.is_empty() || raw_user.is_empty() {
            return Ok(None);
        }

        let user = serde_json::from_str::<User>(&raw_user).map_err(|e| format!("user record: {e}"))?;
        Ok(Some(AuthSession { token, user }))
    }

    /// Verify credentials, then persist and publish the new session.
    ///
    /// # Errors
    ///
    /// Returns the authenticator's error (with the backend message intact)
    /// or a storage error. The session is fully cleared in either case.
    pub async fn login<A>(&self, authenticator: &A, email: &str, password: &str) -> Result<User, ApiError>
    where
        A: Authenticator + ?Sized,
    {
        let credentials = Credentials { email: email.to_owned(), password: password.to_owned() };

        let result = match authenticator.authenticate(&credentials).await {
            Ok(resp) if resp.token.is_empty() => Err(ApiError::MissingField("token")),
            Ok(resp) => self.persist(resp.token, resp.user),
            Err(e) => Err(e),
        };

        match result {
            Ok(user) => {
                tracing::info!(user_id = %user.id, role = ?user.role(), "login succeeded");
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "login failed");
                self.logout();
                Err(e)
            }
        }
    }

    fn persist(&self, token: String, user: User) -> Result<User, ApiError> {
        let raw_user = serde_json::to_string(&user)?;
        self.storage.set(TOKEN_KEY, &token)?;
        self.storage.set(USER_KEY, &raw_user)?;
        self.state.send_replace(SessionState::Authenticated(AuthSession { token, user: user.clone() }));
        Ok(user)
    }

    /// Clear storage and memory. Safe to call in any state.
    pub fn logout(&self) {
        let was_authenticated = self.is_authenticated();
        self.clear();
        if was_authenticated {
            tracing::info!("logged out");
        }
    }

    fn clear(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "failed to remove persisted session entry");
            }
        }
        self.state.send_replace(SessionState::Anonymous);
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

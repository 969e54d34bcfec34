//! Error types shared by the storage, session, and gateway layers.
//!
//! ERROR HANDLING
//! ==============
//! Backend failures keep the status code and whatever message the backend
//! sent, so views can show it verbatim. Authorization failures (401/403)
//! are ordinary `Status` errors; the gateway has already torn the session
//! down by the time a caller sees one.

use serde_json::Value;

// =============================================================================
// STORAGE
// =============================================================================

/// Failures of the durable key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encode failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL: {0:?}")]
    InvalidBaseUrl(String),

    #[error("invalid login path: {0:?} (must start with '/')")]
    InvalidLoginPath(String),
}

// =============================================================================
// API
// =============================================================================

/// Errors produced by gateway dispatches and the typed services on top.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("http request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("invalid JSON payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The stored token cannot be carried in an `Authorization` header.
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// The base URL and path do not form a usable request URL.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("missing expected field `{0}`")]
    MissingField(&'static str),
}

impl ApiError {
    /// HTTP status of a backend rejection, if there was one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for 401 (unauthenticated) and 403 (forbidden).
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Message suitable for display: the backend's own text when it sent
    /// one, `fallback` otherwise.
    #[must_use]
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            Self::Status { message, .. } if !message.is_empty() => message.clone(),
            _ => fallback.to_owned(),
        }
    }
}

/// Extract a human-readable message from an error response body.
///
/// Accepts a bare JSON string, an object carrying `message` or `error`,
/// or plain text. Returns an empty string when nothing usable is present.
#[must_use]
pub fn error_message_from_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(s)) => s,
        Ok(Value::Object(map)) => ["message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map_or_else(|| trimmed.to_owned(), ToOwned::to_owned),
        Ok(_) | Err(_) => trimmed.to_owned(),
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

//! Session core of the movie-review client.
//!
//! ARCHITECTURE
//! ============
//! - `session`: who is logged in, durable across restarts via `storage`.
//! - `gateway`: single egress point; attaches the bearer token and turns
//!   401/403 into a session teardown plus a `navigation` hard reset.
//! - `guard`: route access decisions over session snapshots.
//! - `api`: typed backend services on top of the gateway.
//! - `context`: the object views receive, bundling all of the above.

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod navigation;
pub mod session;
pub mod storage;

#[cfg(test)]
mod test_support;

pub use config::ClientConfig;
pub use context::ClientContext;
pub use error::ApiError;
pub use gateway::{ApiRequest, Gateway};
pub use session::{Role, SessionState, SessionStore, User, UserId};

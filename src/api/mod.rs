//! Typed backend services.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each service borrows the `Gateway`, so credential attachment and the
//! 401/403 teardown apply to every call without call sites repeating it.

pub mod auth;
pub mod models;
pub mod movies;
pub mod reviews;

pub use auth::AuthApi;
pub use models::{Comment, CommentInput, Movie, MovieInput, Review, ReviewInput};
pub use movies::MoviesApi;
pub use reviews::ReviewsApi;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

//! `/movies/*` endpoints.

use super::models::{Movie, MovieInput};
use crate::error::ApiError;
use crate::gateway::{ApiRequest, Gateway};

pub struct MoviesApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> MoviesApi<'a> {
    #[must_use]
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// # Errors
    ///
    /// Any gateway error.
    pub async fn list(&self) -> Result<Vec<Movie>, ApiError> {
        self.gateway.dispatch_json(ApiRequest::get("/movies")).await
    }

    /// # Errors
    ///
    /// Any gateway error; 404 when the movie does not exist.
    pub async fn get(&self, id: i64) -> Result<Movie, ApiError> {
        self.gateway.dispatch_json(ApiRequest::get(format!("/movies/{id}"))).await
    }

    /// Admin only; a reviewer token gets 403, which ends the session.
    ///
    /// # Errors
    ///
    /// Any gateway error.
    pub async fn create(&self, movie: &MovieInput) -> Result<Movie, ApiError> {
        self.gateway.dispatch_json(ApiRequest::post("/movies").json(movie)?).await
    }

    /// # Errors
    ///
    /// Any gateway error.
    pub async fn update(&self, id: i64, movie: &MovieInput) -> Result<Movie, ApiError> {
        self.gateway
            .dispatch_json(ApiRequest::put(format!("/movies/{id}")).json(movie)?)
            .await
    }

    /// # Errors
    ///
    /// Any gateway error.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.gateway.dispatch_empty(ApiRequest::delete(format!("/movies/{id}"))).await
    }

    /// # Errors
    ///
    /// Any gateway error.
    pub async fn top_rated(&self) -> Result<Vec<Movie>, ApiError> {
        self.gateway.dispatch_json(ApiRequest::get("/movies/top-rated")).await
    }

    /// # Errors
    ///
    /// Any gateway error.
    pub async fn trending(&self) -> Result<Vec<Movie>, ApiError> {
        self.gateway.dispatch_json(ApiRequest::get("/movies/trending")).await
    }

    /// # Errors
    ///
    /// Any gateway error.
    pub async fn search(&self, query: &str) -> Result<Vec<Movie>, ApiError> {
        self.gateway
            .dispatch_json(ApiRequest::get("/movies/search").query("query", query))
            .await
    }

    /// Recommendations for the caller, or for `user_id` when given.
    ///
    /// # Errors
    ///
    /// Any gateway error.
    pub async fn recommendations(&self, user_id: Option<i64>) -> Result<Vec<Movie>, ApiError> {
        let mut request = ApiRequest::get("/movies/recommendations");
        if let Some(user_id) = user_id {
            request = request.query("userId", user_id);
        }
        self.gateway.dispatch_json(request).await
    }

    /// # Errors
    ///
    /// Any gateway error.
    pub async fn by_genre(&self, genre: &str) -> Result<Vec<Movie>, ApiError> {
        self.gateway
            .dispatch_json(ApiRequest::get("/movies/category").segment(genre))
            .await
    }
}

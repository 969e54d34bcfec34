//! Reviews, their comments, and likes.

use super::models::{Comment, CommentInput, Review, ReviewInput};
use crate::error::ApiError;
use crate::gateway::{ApiRequest, Gateway};

pub struct ReviewsApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> ReviewsApi<'a> {
    #[must_use]
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    // =========================================================================
    // REVIEWS
    // =========================================================================

    /// # Errors
    ///
    /// Any gateway error.
    pub async fn add(&self, movie_id: i64, review: &ReviewInput) -> Result<Review, ApiError> {
        self.gateway
            .dispatch_json(ApiRequest::post(format!("/reviews/movie/{movie_id}")).json(review)?)
            .await
    }

    /// # Errors
    ///
    /// Any gateway error.
    pub async fn for_movie(&self, movie_id: i64) -> Result<Vec<Review>, ApiError> {
        self.gateway
            .dispatch_json(ApiRequest::get(format!("/reviews/movie/{movie_id}")))
            .await
    }

    /// # Errors
    ///
    /// Any gateway error.
    pub async fn update(&self, review_id: i64, review: &ReviewInput) -> Result<Review, ApiError> {
        self.gateway
            .dispatch_json(ApiRequest::put(format!("/reviews/{review_id}")).json(review)?)
            .await
    }

    /// # Errors
    ///
    /// Any gateway error.
    pub async fn delete(&self, review_id: i64) -> Result<(), ApiError> {
        self.gateway
            .dispatch_empty(ApiRequest::delete(format!("/reviews/{review_id}")))
            .await
    }

    /// # Errors
    ///
    /// Any gateway error.
    pub async fn for_user(&self, user_id: i64) -> Result<Vec<Review>, ApiError> {
        self.gateway
            .dispatch_json(ApiRequest::get(format!("/reviews/user/{user_id}")))
            .await
    }

    /// # Errors
    ///
    /// Any gateway error.
    pub async fn count_for_user(&self, user_id: i64) -> Result<u64, ApiError> {
        self.gateway
            .dispatch_json(ApiRequest::get(format!("/reviews/user/{user_id}/count")))
            .await
    }

    // =========================================================================
    // COMMENTS
    // =========================================================================

    /// # Errors
    ///
    /// Any gateway error.
    pub async fn add_comment(&self, review_id: i64, comment: &CommentInput) -> Result<Comment, ApiError> {
        self.gateway
            .dispatch_json(ApiRequest::post(format!("/comments/review/{review_id}")).json(comment)?)
            .await
    }

    /// # Errors
    ///
    /// Any gateway error.
    pub async fn comments(&self, review_id: i64) -> Result<Vec<Comment>, ApiError> {
        self.gateway
            .dispatch_json(ApiRequest::get(format!("/comments/review/{review_id}")))
            .await
    }

    /// # Errors
    ///
    /// Any gateway error.
    pub async fn delete_comment(&self, comment_id: i64) -> Result<(), ApiError> {
        self.gateway
            .dispatch_empty(ApiRequest::delete(format!("/comments/{comment_id}")))
            .await
    }

    // =========================================================================
    // LIKES
    // =========================================================================

    /// # Errors
    ///
    /// Any gateway error.
    pub async fn like(&self, review_id: i64) -> Result<(), ApiError> {
        self.gateway
            .dispatch_empty(ApiRequest::post(format!("/likes/review/{review_id}")))
            .await
    }

    /// # Errors
    ///
    /// Any gateway error.
    pub async fn unlike(&self, review_id: i64) -> Result<(), ApiError> {
        self.gateway
            .dispatch_empty(ApiRequest::delete(format!("/likes/review/{review_id}")))
            .await
    }

    /// # Errors
    ///
    /// Any gateway error.
    pub async fn like_count(&self, review_id: i64) -> Result<u64, ApiError> {
        self.gateway
            .dispatch_json(ApiRequest::get(format!("/likes/review/{review_id}/count")))
            .await
    }

    /// # Errors
    ///
    /// Any gateway error.
    pub async fn has_liked(&self, review_id: i64, user_id: i64) -> Result<bool, ApiError> {
        self.gateway
            .dispatch_json(ApiRequest::get(format!(
                "/likes/review/{review_id}/user/{user_id}/hasLiked"
            )))
            .await
    }
}

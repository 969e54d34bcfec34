//! `/auth/*` endpoints.
//!
//! `login` here is the raw backend call. Views log in through
//! `SessionStore::login`, which calls this via the `Authenticator` impl on
//! the gateway and then persists the result.

use serde::Serialize;

use crate::error::ApiError;
use crate::gateway::{ApiRequest, Gateway};
use crate::session::{Credentials, LoginResponse, User};

pub struct AuthApi<'a> {
    gateway: &'a Gateway,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordBody<'a> {
    token: &'a str,
    new_password: &'a str,
}

impl<'a> AuthApi<'a> {
    #[must_use]
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// `POST /auth/login`. Does not touch the session.
    ///
    /// # Errors
    ///
    /// Any gateway error.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let credentials = Credentials { email: email.to_owned(), password: password.to_owned() };
        self.gateway
            .dispatch_json(ApiRequest::post("/auth/login").json(&credentials)?)
            .await
    }

    /// `POST /auth/register`. Returns the backend's confirmation text.
    ///
    /// # Errors
    ///
    /// Any gateway error; the backend message explains rejections.
    pub async fn register(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let credentials = Credentials { email: email.to_owned(), password: password.to_owned() };
        self.gateway
            .dispatch_text(ApiRequest::post("/auth/register").json(&credentials)?)
            .await
    }

    /// `GET /auth/users/me`.
    ///
    /// # Errors
    ///
    /// Any gateway error.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.gateway.dispatch_json(ApiRequest::get("/auth/users/me")).await
    }

    /// `POST /auth/forgot-password` with the bare email as `text/plain`.
    ///
    /// # Errors
    ///
    /// Any gateway error.
    pub async fn forgot_password(&self, email: &str) -> Result<String, ApiError> {
        self.gateway
            .dispatch_text(ApiRequest::post("/auth/forgot-password").text(email))
            .await
    }

    /// `POST /auth/reset-password`.
    ///
    /// # Errors
    ///
    /// Any gateway error.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<String, ApiError> {
        let body = ResetPasswordBody { token, new_password };
        self.gateway
            .dispatch_text(ApiRequest::post("/auth/reset-password").json(&body)?)
            .await
    }
}

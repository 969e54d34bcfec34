//! Authenticated request gateway — the only way out to the backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every backend call is an `ApiRequest` handed to `Gateway::dispatch`.
//! On the way out the current bearer token (if any) is attached. On the
//! way back a 401 or 403 is treated as a global trust failure: the session
//! is logged out and a hard reset to the login path is fired before the
//! error is returned to the caller.
//!
//! ERROR HANDLING
//! ==============
//! All other statuses pass through untouched. There is no retry, backoff,
//! or timeout policy here; transport defaults apply.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::AuthApi;
use crate::error::{ApiError, error_message_from_body};
use crate::navigation::{Navigator, ResetReason};
use crate::session::{Authenticator, Credentials, LoginResponse, SessionStore};

// =============================================================================
// REQUEST
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum RequestBody {
    Json(Value),
    Text(String),
}

/// Outbound call description, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<RequestBody>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), segments: Vec::new(), query: Vec::new(), body: None }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append one path segment after `path`. The value is percent-encoded,
    /// so `/`, `?` and `#` stay inside the segment.
    #[must_use]
    pub fn segment(mut self, value: impl ToString) -> Self {
        self.segments.push(value.to_string());
        self
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_owned(), value.to_string()));
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if `body` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = Some(RequestBody::Json(serde_json::to_value(body)?));
        Ok(self)
    }

    /// Attach a `text/plain` body.
    #[must_use]
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

// =============================================================================
// GATEWAY
// =============================================================================

#[derive(Clone)]
pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
    login_path: String,
    session: Arc<SessionStore>,
    navigator: Navigator,
}

impl Gateway {
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        login_path: &str,
        session: Arc<SessionStore>,
        navigator: Navigator,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            login_path: login_path.to_owned(),
            session,
            navigator,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turn an `ApiRequest` into the exact request that would go on the wire,
    /// with the bearer credential attached when a token is present.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidUrl`] if base URL and path do not parse.
    /// - [`ApiError::InvalidHeader`] if the stored token is not a legal
    ///   header value.
    /// - [`ApiError::Transport`] if the request cannot be assembled.
    pub fn build(&self, request: ApiRequest) -> Result<reqwest::Request, ApiError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, request.path))
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if !request.segments.is_empty() {
            url.path_segments_mut()
                .map_err(|()| ApiError::InvalidUrl(self.base_url.clone()))?
                .extend(&request.segments);
        }
        let mut builder = self.http.request(request.method, url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match request.body {
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Text(text)) => builder.header(CONTENT_TYPE, "text/plain").body(text),
            None => builder,
        };
        if let Some(token) = self.session.token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
            value.set_sensitive(true);
            builder = builder.header(AUTHORIZATION, value);
        }
        Ok(builder.build()?)
    }

    /// Send a request and hand back the raw response on 2xx.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] when no response arrived.
    /// - [`ApiError::Status`] for any non-2xx status. For 401/403 the
    ///   session has already been cleared and a hard reset fired.
    pub async fn dispatch(&self, request: ApiRequest) -> Result<reqwest::Response, ApiError> {
        let request = self.build(request)?;
        let method = request.method().clone();
        let path = request.url().path().to_owned();
        tracing::debug!(%method, %path, authenticated = request.headers().contains_key(AUTHORIZATION), "dispatch");

        let response = self.http.execute(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message_from_body(&body);
        let status = status.as_u16();

        if let Some(reason) = ResetReason::from_status(status) {
            tracing::warn!(status, %method, %path, "authorization failure; invalidating session");
            self.session.logout();
            self.navigator.hard_reset(&self.login_path, reason);
        } else {
            tracing::debug!(status, %method, %path, %message, "backend error");
        }

        Err(ApiError::Status { status, message })
    }

    /// Dispatch and decode a JSON body.
    ///
    /// # Errors
    ///
    /// As [`Gateway::dispatch`], plus [`ApiError::Decode`] for a body of the
    /// wrong shape.
    pub async fn dispatch_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let bytes = self.dispatch(request).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Dispatch and return the body as text.
    ///
    /// # Errors
    ///
    /// As [`Gateway::dispatch`].
    pub async fn dispatch_text(&self, request: ApiRequest) -> Result<String, ApiError> {
        Ok(self.dispatch(request).await?.text().await?)
    }

    /// Dispatch and discard the body.
    ///
    /// # Errors
    ///
    /// As [`Gateway::dispatch`].
    pub async fn dispatch_empty(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.dispatch(request).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Authenticator for Gateway {
    async fn authenticate(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        AuthApi::new(self).login(&credentials.email, &credentials.password).await
    }
}

#[cfg(test)]
#[path = "gateway_test.rs"]
mod tests;

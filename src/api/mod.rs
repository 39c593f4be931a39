//! HTTP client for the lending backend.
//!
//! [`ApiClient`] wraps a [`Transport`] and turns every failure into a single
//! [`ApiError`] shape. It also implements [`UserService`], the read interface
//! the dashboard queries run against.

pub mod routes;
pub mod transport;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::model::{Stats, UserRecord};
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport, TransportError};

pub const FALLBACK_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Normalized failure of any backend call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status: Option<u16>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status: Option<u16>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            FALLBACK_ERROR_MESSAGE.to_string()
        } else {
            message
        };
        Self { message, status }
    }

    /// Build the error for a non-2xx response. A JSON body carrying a string
    /// `message` wins over the generic status text.
    pub fn from_response(response: &HttpResponse) -> Self {
        let backend_message = serde_json::from_str::<Value>(&response.body)
            .ok()
            .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
            .filter(|m| !m.trim().is_empty());
        match backend_message {
            Some(message) => Self::new(message, Some(response.status)),
            None => Self::new(
                format!("Request failed with status code {}", response.status),
                Some(response.status),
            ),
        }
    }

    pub fn from_transport(err: &TransportError) -> Self {
        Self::new(err.message(), None)
    }
}

/// A single call description. `auth` defaults to `true`.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub url: String,
    pub body: Option<Value>,
    pub auth: bool,
}

impl Request {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: None,
            auth: true,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Send without the client's bearer token.
    pub fn without_auth(mut self) -> Self {
        self.auth = false;
        self
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            transport,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, request: Request) -> Result<T, ApiError> {
        self.call(Method::Get, request).await
    }

    pub async fn post<T: DeserializeOwned>(&self, request: Request) -> Result<T, ApiError> {
        self.call(Method::Post, request).await
    }

    pub async fn put<T: DeserializeOwned>(&self, request: Request) -> Result<T, ApiError> {
        self.call(Method::Put, request).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, request: Request) -> Result<T, ApiError> {
        self.call(Method::Delete, request).await
    }

    async fn call<T: DeserializeOwned>(&self, method: Method, request: Request) -> Result<T, ApiError> {
        let url = join_url(&self.base_url, &request.url);
        let bearer_token = if request.auth { self.token.clone() } else { None };
        debug!(method = method.as_str(), %url, auth = request.auth, "sending request");

        let response = self
            .transport
            .send(HttpRequest {
                method,
                url: url.clone(),
                body: request.body,
                bearer_token,
            })
            .await
            .map_err(|e| {
                warn!(method = method.as_str(), %url, error = %e, "transport failure");
                ApiError::from_transport(&e)
            })?;

        if !response.is_success() {
            let err = ApiError::from_response(&response);
            warn!(method = method.as_str(), %url, status = response.status, message = %err.message, "request rejected");
            return Err(err);
        }

        serde_json::from_str(&response.body).map_err(|e| {
            warn!(method = method.as_str(), %url, error = %e, "undecodable response body");
            ApiError::new(format!("Invalid response body: {e}"), Some(response.status))
        })
    }
}

/// Join a base URL and a relative route; absolute routes pass through.
pub fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if base.is_empty() {
        path.to_string()
    } else {
        format!("{base}/{path}")
    }
}

/// Read operations backing the dashboard.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserRecord>, ApiError>;
    async fn stats(&self) -> Result<Stats, ApiError>;
}

#[async_trait]
impl UserService for ApiClient {
    async fn list_users(&self) -> Result<Vec<UserRecord>, ApiError> {
        self.get(Request::new(routes::users())).await
    }

    async fn stats(&self) -> Result<Stats, ApiError> {
        self.get(Request::new(routes::stats())).await
    }
}

//! REST transport used by every store.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR) and native builds: `HttpApiClient` answers
//! `ApiError::Unavailable` since these endpoints are only meaningful in the
//! browser.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures, error statuses, and undecodable bodies all surface as
//! `ApiError`. Stores collapse them into one user-facing string with
//! `ApiError::user_message`, preferring the server's `detail` field.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::util::storage::KeyValueStorage;
#[cfg(any(test, feature = "hydrate"))]
use crate::util::storage::stored_credential;

pub const REGISTER_PATH: &str = "/api/auth/register";
pub const LOGIN_PATH: &str = "/api/auth/login";
pub const CURRENT_USER_PATH: &str = "/api/auth/me";
pub const CHARACTERS_PATH: &str = "/api/characters/";
pub const PUBLIC_CHARACTERS_PATH: &str = "/api/characters/public";

/// Path of a single character resource.
pub fn character_path(id: i64) -> String {
    format!("/api/characters/{id}")
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out after {0} ms")]
    Timeout(u32),

    /// The server answered with a non-success status.
    #[error("http status {status}")]
    Status { status: u16, detail: Option<String> },

    /// The body did not match the expected schema.
    #[error("response decode failed: {0}")]
    Decode(String),

    #[error("request encode failed: {0}")]
    Encode(String),

    #[error("not available on server")]
    Unavailable,
}

impl ApiError {
    /// Server-provided `detail` message, if the error carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// HTTP status, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message shown to the user: the server detail, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_owned()
    }
}

/// Request payload encodings understood by the API.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    /// `application/x-www-form-urlencoded` fields, in order.
    Form(Vec<(String, String)>),
}

impl RequestBody {
    pub fn form(fields: &[(&str, &str)]) -> Self {
        Self::Form(
            fields
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        )
    }
}

/// HTTP capability consumed by the stores.
///
/// Implementations attach credentials and apply timeouts; every rejection is
/// reported as an `ApiError`. Responses are raw JSON, decoded by the caller.
#[allow(async_fn_in_trait)]
pub trait ApiClient {
    async fn get(&self, path: &str) -> Result<Value, ApiError>;
    async fn post(&self, path: &str, body: RequestBody) -> Result<Value, ApiError>;
    async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError>;
    async fn delete(&self, path: &str) -> Result<Value, ApiError>;
}

/// Decode a JSON response into a typed payload.
///
/// # Errors
///
/// Returns `ApiError::Decode` when the value does not match `T`.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Encode a typed payload as a JSON request body.
///
/// # Errors
///
/// Returns `ApiError::Encode` when `body` cannot be represented as JSON.
pub fn encode<T: Serialize + ?Sized>(body: &T) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))
}

/// Pull a non-blank string `detail` out of an error body, verbatim.
///
/// Validation errors that carry a structured `detail` array are treated as
/// having no user-facing message.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let detail = value.get("detail")?.as_str()?;
    (!detail.trim().is_empty()).then(|| detail.to_owned())
}

#[cfg(any(test, feature = "hydrate"))]
fn parse_response(status: u16, ok: bool, body: &str) -> Result<Value, ApiError> {
    if !ok {
        return Err(ApiError::Status { status, detail: extract_detail(body) });
    }
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(any(test, feature = "hydrate"))]
fn bearer_header(token: &str) -> String {
    format!("Bearer {token}")
}

/// Browser HTTP client bound to the configured API origin.
///
/// Reads the stored credential on every request, so login and logout take
/// effect without rebuilding the client.
#[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
pub struct HttpApiClient<S> {
    base_url: String,
    timeout_ms: u32,
    storage: Arc<S>,
}

impl<S: KeyValueStorage> HttpApiClient<S> {
    pub fn new(config: &ClientConfig, storage: Arc<S>) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            timeout_ms: config.request_timeout_ms,
            storage,
        }
    }

    #[cfg(any(test, feature = "hydrate"))]
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    #[cfg(any(test, feature = "hydrate"))]
    fn authorization(&self) -> Option<String> {
        stored_credential(&*self.storage).map(|token| bearer_header(&token))
    }

    #[cfg(feature = "hydrate")]
    async fn send(
        &self,
        builder: gloo_net::http::RequestBuilder,
        body: Option<RequestBody>,
    ) -> Result<Value, ApiError> {
        use futures::future::Either;

        let builder = match self.authorization() {
            Some(value) => builder.header("Authorization", &value),
            None => builder,
        };
        let request = match body {
            None => builder.build(),
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Form(fields)) => {
                let params = web_sys::UrlSearchParams::new()
                    .map_err(|_| ApiError::Transport("form encoding unavailable".to_owned()))?;
                for (key, value) in &fields {
                    params.append(key, value);
                }
                builder
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .body(params)
            }
        }
        .map_err(|e| ApiError::Transport(e.to_string()))?;

        let send = request.send();
        let timeout = gloo_timers::future::TimeoutFuture::new(self.timeout_ms);
        futures::pin_mut!(send);
        futures::pin_mut!(timeout);
        let resp = match futures::future::select(send, timeout).await {
            Either::Left((result, _)) => result.map_err(|e| ApiError::Transport(e.to_string()))?,
            Either::Right(_) => return Err(ApiError::Timeout(self.timeout_ms)),
        };

        let status = resp.status();
        let ok = resp.ok();
        let text = resp.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        parse_response(status, ok, &text)
    }
}

impl<S: KeyValueStorage> ApiClient for HttpApiClient<S> {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            self.send(gloo_net::http::Request::get(&self.url(path)), None).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = path;
            Err(ApiError::Unavailable)
        }
    }

    async fn post(&self, path: &str, body: RequestBody) -> Result<Value, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            self.send(gloo_net::http::Request::post(&self.url(path)), Some(body)).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (path, body);
            Err(ApiError::Unavailable)
        }
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            self.send(gloo_net::http::Request::put(&self.url(path)), Some(RequestBody::Json(body)))
                .await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (path, body);
            Err(ApiError::Unavailable)
        }
    }

    async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            self.send(gloo_net::http::Request::delete(&self.url(path)), None).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = path;
            Err(ApiError::Unavailable)
        }
    }
}

//! HTTP client for the task service.
//!
//! Auth endpoints live under `{base}/auth`, task endpoints under
//! `{base}/tasks`. Every call is a single request/response round trip with no
//! retries.

pub mod auth;
pub mod tasks;

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;

/// Shown for failures that carry no server message.
pub const GENERIC_FAILURE: &str = "Something went wrong!";

/// Categories of API failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The service answered with an error status.
    Rejected,
    /// No usable response: connection refused, DNS, timeout.
    Transport,
    /// A success response whose body could not be read.
    Decode,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Rejected => write!(f, "rejected"),
            ApiErrorKind::Transport => write!(f, "transport"),
            ApiErrorKind::Decode => write!(f, "decode"),
        }
    }
}

/// Error from a call to the task service.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status for rejections.
    pub status: Option<u16>,
    /// Server message for rejections, diagnostic text otherwise.
    pub message: String,
}

impl ApiError {
    /// Builds a rejection from an error response body.
    ///
    /// The body's JSON `message` field is used verbatim. Anything else (empty,
    /// plain text, JSON without a message) becomes [`GENERIC_FAILURE`].
    pub fn rejected(status: u16, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| GENERIC_FAILURE.to_string());
        Self {
            kind: ApiErrorKind::Rejected,
            status: Some(status),
            message,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Transport,
            status: None,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Decode,
            status: None,
            message: message.into(),
        }
    }

    /// Text to show the user: the server's own words for rejections, a
    /// generic line for everything else.
    pub fn user_message(&self) -> &str {
        match self.kind {
            ApiErrorKind::Rejected => &self.message,
            ApiErrorKind::Transport | ApiErrorKind::Decode => GENERIC_FAILURE,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {status}: {}", self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for ApiError {}

fn extract_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body.trim()).ok()?;
    json.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Shared HTTP plumbing for the auth and task clients.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Client for the effective base URL and timeout of `config`.
    pub fn from_config(config: &Config, override_url: Option<&str>) -> Result<Self> {
        let base_url = config.effective_api_base_url(override_url)?;
        Self::new(base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, bearer: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.http.request(method, url);
        match bearer {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let request = builder
            .build()
            .map_err(|e| ApiError::transport(format!("invalid request: {e}")))?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let response = self.http.execute(request).await.map_err(|e| {
            tracing::warn!(%method, %path, error = %e, "request failed");
            ApiError::transport(e.to_string())
        })?;

        let status = response.status();
        tracing::debug!(%method, %path, status = status.as_u16(), "response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::rejected(status.as_u16(), &body);
        tracing::info!(%method, %path, status = status.as_u16(), message = %err.message, "request rejected");
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;
        // A bodiless success still has to decode into something.
        let slice: &[u8] = if bytes.is_empty() || status == StatusCode::NO_CONTENT {
            &b"{}"[..]
        } else {
            &bytes[..]
        };
        serde_json::from_slice(slice)
            .map_err(|e| ApiError::decode(format!("unexpected response body: {e}")))
    }
}

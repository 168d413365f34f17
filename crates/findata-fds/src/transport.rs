//! HTTP transport seam.
//!
//! [`HttpTransport`] sends exactly one request and reports whatever the server
//! answered. Retry policy lives a layer above, in
//! [`RequestExecutor`](crate::RequestExecutor).

use async_trait::async_trait;
use findata_core::{DataError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// A single API request: GET, or POST with a JSON body.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Fully built URL including the query string.
    pub url: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// JSON body for POST requests.
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// Creates a GET request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Creates a POST request with a JSON body.
    #[must_use]
    pub fn post_json(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: HeaderMap::new(),
            body: Some(body),
        }
    }

    /// Replaces the request headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// Builds the authentication header map for an optional API key.
///
/// The key is marked sensitive so it never shows up in `Debug` output.
pub(crate) fn auth_headers(api_key: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Some(key) = api_key {
        let mut value = HeaderValue::from_str(key)
            .map_err(|e| DataError::InvalidParameter(format!("API key is not a valid header: {e}")))?;
        value.set_sensitive(true);
        headers.insert(HeaderName::from_static("x-api-key"), value);
    }
    Ok(headers)
}

/// Status and body of a completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Raw response body.
    pub body: String,
}

impl ApiResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Deserializes the body.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body)
            .map_err(|e| DataError::Parse(format!("{e}: {}", self.body)))
    }
}

/// Sends one HTTP request.
///
/// Connection-level failures are reported as [`DataError::Network`]; any HTTP
/// status, including errors, is a successful exchange.
#[async_trait]
pub trait HttpTransport: Send + Sync + Debug {
    /// Sends the request and reads the full body.
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// [`HttpTransport`] backed by a `reqwest` client.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport with a custom HTTP client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        Ok(ApiResponse { status, body })
    }
}

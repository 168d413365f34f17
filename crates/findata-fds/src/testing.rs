//! Scripted transport for exercising the client without a network.

use async_trait::async_trait;
use findata_core::{DataError, Result};
use reqwest::{StatusCode, Url};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::time::Instant;

use crate::transport::{ApiRequest, ApiResponse, HttpTransport};

/// Replays queued responses in order and records every request it receives.
///
/// Running out of queued responses is reported as a network error.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<ApiResponse>>>,
    requests: Mutex<Vec<(ApiRequest, Instant)>>,
}

impl ScriptedTransport {
    /// Creates an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response with a raw body.
    ///
    /// # Panics
    ///
    /// Panics if `status` is not a valid HTTP status code.
    pub fn push(&self, status: u16, body: impl Into<String>) {
        let status = StatusCode::from_u16(status).expect("valid status code");
        self.lock_responses()
            .push_back(Ok(ApiResponse::new(status, body)));
    }

    /// Queues a 200 response with a JSON body.
    pub fn push_json(&self, body: serde_json::Value) {
        self.push(200, body.to_string());
    }

    /// Queues a connection-level failure.
    pub fn push_network_error(&self, message: &str) {
        self.lock_responses()
            .push_back(Err(DataError::Network(message.to_string())));
    }

    /// Returns the number of requests sent so far.
    pub fn request_count(&self) -> usize {
        self.lock_requests().len()
    }

    /// Returns a copy of every request sent so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock_requests().iter().map(|(r, _)| r.clone()).collect()
    }

    /// Returns the (virtual) time at which each request was sent.
    pub fn request_times(&self) -> Vec<Instant> {
        self.lock_requests().iter().map(|(_, t)| *t).collect()
    }

    /// Returns a query parameter of the `index`-th request.
    pub fn query_param(&self, index: usize, name: &str) -> Option<String> {
        let requests = self.lock_requests();
        let (request, _) = requests.get(index)?;
        let url = Url::parse(&request.url).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<ApiResponse>>> {
        self.responses.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<(ApiRequest, Instant)>> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.lock_requests().push((request.clone(), Instant::now()));
        self.lock_responses()
            .pop_front()
            .unwrap_or_else(|| Err(DataError::Network("script exhausted".to_string())))
    }
}

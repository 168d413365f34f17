//! Request execution with rate-limit backoff.

use findata_core::Result;
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::{Backoff, DEFAULT_MAX_RETRIES};
use crate::transport::{ApiRequest, ApiResponse, HttpTransport};

/// Issues requests and retries them while the API answers HTTP 429.
///
/// Each attempt sends the request once. A 429 with retries remaining waits for
/// the next step of the [`Backoff`] schedule and tries again; every other
/// status, and a 429 once retries run out, is handed back unchanged for the
/// caller to interpret. Transport failures are returned immediately.
#[derive(Clone, Debug)]
pub struct RequestExecutor {
    transport: Arc<dyn HttpTransport>,
    max_retries: u32,
    backoff: Backoff,
}

impl RequestExecutor {
    /// Creates an executor over a transport.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, max_retries: u32, backoff: Backoff) -> Self {
        Self {
            transport,
            max_retries,
            backoff,
        }
    }

    /// Creates an executor with the default retry budget and schedule.
    #[must_use]
    pub fn with_defaults(transport: Arc<dyn HttpTransport>) -> Self {
        Self::new(transport, DEFAULT_MAX_RETRIES, Backoff::default())
    }

    /// Returns the configured number of retries.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Executes a request with the configured retry budget.
    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.execute_with_retries(request, self.max_retries).await
    }

    /// Executes a request, retrying at most `max_retries` times on HTTP 429.
    pub async fn execute_with_retries(
        &self,
        request: &ApiRequest,
        max_retries: u32,
    ) -> Result<ApiResponse> {
        let mut attempt = 0;
        loop {
            debug!(method = %request.method, url = %request.url, attempt, "Sending request");
            let response = self.transport.send(request).await?;

            if response.status != StatusCode::TOO_MANY_REQUESTS || attempt >= max_retries {
                return Ok(response);
            }

            let delay = self.backoff.delay(attempt);
            warn!(
                attempt = attempt + 1,
                attempts = max_retries + 1,
                delay_secs = delay.as_secs(),
                "Rate limited (429), waiting before retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

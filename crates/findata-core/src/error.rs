//! Error types for data operations.
//!
//! This module defines [`DataError`] which covers all error cases that can occur
//! when fetching, parsing, or caching financial data.

use thiserror::Error;

/// Errors that can occur during data operations.
#[derive(Error, Debug)]
pub enum DataError {
    /// Network-related errors (connection failures, timeouts, etc.).
    ///
    /// These are never retried by the request layer.
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a non-success status.
    #[error("Error fetching data: {ticker} - {status} - {body}")]
    Http {
        /// The ticker the request was made for.
        ticker: String,
        /// HTTP status code of the final response.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Error parsing data from a provider.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error interacting with the cache.
    #[error("Cache error: {0}")]
    Cache(String),

    /// The requested provider is not configured.
    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    /// The brokerage terminal could not be reached.
    #[error("Terminal connection failed: {0}")]
    Terminal(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl DataError {
    /// Builds an [`DataError::Http`] from a ticker and a failed response.
    #[must_use]
    pub fn http(ticker: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            ticker: ticker.into(),
            status,
            body: body.into(),
        }
    }
}

/// Result type alias using [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message_carries_ticker_status_and_body() {
        let err = DataError::http("AAPL", 500, "upstream exploded");
        assert_eq!(
            err.to_string(),
            "Error fetching data: AAPL - 500 - upstream exploded"
        );
    }

    #[test]
    fn test_not_configured_message() {
        let err = DataError::ProviderNotConfigured("futu".to_string());
        assert!(err.to_string().contains("futu"));
    }
}

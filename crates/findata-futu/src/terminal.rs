//! Quote terminal session contract.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use findata_core::Result;
use std::fmt;

/// Default OpenD host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default OpenD port.
pub const DEFAULT_PORT: u16 = 11111;

/// Network address of a quote terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalAddress {
    /// Host name or IP address.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl TerminalAddress {
    /// Create an address.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Default for TerminalAddress {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl fmt::Display for TerminalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// One daily candlestick as reported by the terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct KlineBar {
    /// Bar timestamp.
    pub time_key: NaiveDateTime,
    /// Opening price.
    pub open: f64,
    /// Closing price.
    pub close: f64,
    /// Highest price.
    pub high: f64,
    /// Lowest price.
    pub low: f64,
    /// Traded volume.
    pub volume: i64,
}

/// One news article as reported by the terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsItem {
    /// Headline.
    pub title: String,
    /// Author.
    pub author: String,
    /// Publisher.
    pub source: String,
    /// Publication time as reported.
    pub time: String,
    /// Article URL.
    pub url: String,
}

/// An open quote session.
///
/// Dropping the session closes it.
#[async_trait]
pub trait QuoteTerminal: Send + Sync {
    /// Daily forward-adjusted bars for `code` between `start` and `end`, inclusive.
    async fn daily_klines(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<KlineBar>>;

    /// Up to `max_count` news articles for `code` between `start` and `end`.
    async fn news(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
        max_count: usize,
    ) -> Result<Vec<NewsItem>>;
}

/// Opens quote sessions.
#[async_trait]
pub trait TerminalConnector: Send + Sync + fmt::Debug {
    /// Address this connector dials.
    fn address(&self) -> &TerminalAddress;

    /// Open a new session.
    ///
    /// Fails with [`DataError::Terminal`](findata_core::DataError::Terminal)
    /// when the terminal cannot be reached.
    async fn connect(&self) -> Result<Box<dyn QuoteTerminal>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_address() {
        let address = TerminalAddress::default();
        assert_eq!(address.to_string(), "127.0.0.1:11111");
    }

    #[test]
    fn test_custom_address() {
        let address = TerminalAddress::new("10.0.0.5", 22222);
        assert_eq!(address.host, "10.0.0.5");
        assert_eq!(address.to_string(), "10.0.0.5:22222");
    }
}

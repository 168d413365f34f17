//! Alternate-market data source contract.
//!
//! Hong Kong listings are served by a local brokerage terminal rather than the
//! HTTP API. Callers hold an `Arc<dyn AlternateMarketSource>`: either a live
//! implementation or [`NotConfigured`], so call sites never branch on whether
//! the terminal integration is available.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt::Debug;

use crate::{
    error::{DataError, Result},
    period::Period,
    types::{CompanyNews, FinancialMetrics, Price, Ticker},
};

/// Data source for alternate-market (Hong Kong) tickers.
///
/// Implementations return empty results or `None` when data is unavailable and
/// only fail when the underlying connection cannot be established.
#[async_trait]
pub trait AlternateMarketSource: Send + Sync + Debug {
    /// Returns the name of this source.
    fn name(&self) -> &str;

    /// Fetches daily prices between `start` and `end`, inclusive.
    async fn prices(&self, ticker: &Ticker, start: NaiveDate, end: NaiveDate)
    -> Result<Vec<Price>>;

    /// Fetches financial metrics up to `end`.
    async fn financial_metrics(
        &self,
        ticker: &Ticker,
        end: NaiveDate,
        period: Period,
        limit: usize,
    ) -> Result<Vec<FinancialMetrics>>;

    /// Fetches the market capitalization as of `end`.
    async fn market_cap(&self, ticker: &Ticker, end: NaiveDate) -> Result<Option<f64>>;

    /// Fetches company news in the window `(start, end]`.
    async fn company_news(
        &self,
        ticker: &Ticker,
        end: NaiveDate,
        start: Option<NaiveDate>,
        limit: usize,
    ) -> Result<Vec<CompanyNews>>;
}

/// Placeholder source used when no alternate-market integration is wired in.
///
/// Every call fails with [`DataError::ProviderNotConfigured`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NotConfigured;

impl NotConfigured {
    /// Create a new placeholder source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn error(ticker: &Ticker) -> DataError {
        DataError::ProviderNotConfigured(format!(
            "{ticker} is a Hong Kong listing and requires the Futu terminal source"
        ))
    }
}

#[async_trait]
impl AlternateMarketSource for NotConfigured {
    fn name(&self) -> &str {
        "not-configured"
    }

    async fn prices(
        &self,
        ticker: &Ticker,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<Price>> {
        Err(Self::error(ticker))
    }

    async fn financial_metrics(
        &self,
        ticker: &Ticker,
        _end: NaiveDate,
        _period: Period,
        _limit: usize,
    ) -> Result<Vec<FinancialMetrics>> {
        Err(Self::error(ticker))
    }

    async fn market_cap(&self, ticker: &Ticker, _end: NaiveDate) -> Result<Option<f64>> {
        Err(Self::error(ticker))
    }

    async fn company_news(
        &self,
        ticker: &Ticker,
        _end: NaiveDate,
        _start: Option<NaiveDate>,
        _limit: usize,
    ) -> Result<Vec<CompanyNews>> {
        Err(Self::error(ticker))
    }
}

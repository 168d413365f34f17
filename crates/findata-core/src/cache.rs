//! Cache trait for storing fetched financial data.
//!
//! This module defines the [`DataCache`] trait that provides a unified interface
//! for caching prices, financial metrics, insider trades and company news, along
//! with the structured keys entries are stored under.
//!
//! Lookups are exact-match: a key only hits when every query parameter equals
//! the one used when the entry was written. There is no sub-range reuse and no
//! expiry.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt;

use crate::{
    error::Result,
    period::Period,
    types::{CompanyNews, FinancialMetrics, InsiderTrade, Price, Ticker},
};

/// Key for price entries.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PriceKey {
    /// Requested ticker.
    pub ticker: Ticker,
    /// First day of the range.
    pub start: NaiveDate,
    /// Last day of the range.
    pub end: NaiveDate,
}

impl PriceKey {
    /// Creates a price key.
    #[must_use]
    pub const fn new(ticker: Ticker, start: NaiveDate, end: NaiveDate) -> Self {
        Self { ticker, start, end }
    }
}

impl fmt::Display for PriceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.ticker, self.start, self.end)
    }
}

/// Key for financial metrics entries.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MetricsKey {
    /// Requested ticker.
    pub ticker: Ticker,
    /// Reporting period.
    pub period: Period,
    /// Latest report period included.
    pub end: NaiveDate,
    /// Maximum number of periods.
    pub limit: usize,
}

impl MetricsKey {
    /// Creates a financial metrics key.
    #[must_use]
    pub const fn new(ticker: Ticker, period: Period, end: NaiveDate, limit: usize) -> Self {
        Self {
            ticker,
            period,
            end,
            limit,
        }
    }
}

impl fmt::Display for MetricsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}",
            self.ticker, self.period, self.end, self.limit
        )
    }
}

/// Key for date-window paginated entries (insider trades, company news).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WindowKey {
    /// Requested ticker.
    pub ticker: Ticker,
    /// Optional lower bound of the window.
    pub start: Option<NaiveDate>,
    /// Upper bound of the window.
    pub end: NaiveDate,
    /// Page size cap.
    pub limit: usize,
}

impl WindowKey {
    /// Creates a window key.
    #[must_use]
    pub const fn new(
        ticker: Ticker,
        start: Option<NaiveDate>,
        end: NaiveDate,
        limit: usize,
    ) -> Self {
        Self {
            ticker,
            start,
            end,
            limit,
        }
    }
}

impl fmt::Display for WindowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.start {
            Some(start) => write!(f, "{}_{}_{}_{}", self.ticker, start, self.end, self.limit),
            None => write!(f, "{}_none_{}_{}", self.ticker, self.end, self.limit),
        }
    }
}

/// Trait for caching fetched financial data.
///
/// Implementations hand out independent copies: mutating a returned value never
/// affects the stored entry.
#[async_trait]
pub trait DataCache: Send + Sync {
    /// Retrieves cached prices.
    ///
    /// Returns `Ok(Some(prices))` if cached data exists, `Ok(None)` if not cached.
    async fn get_prices(&self, key: &PriceKey) -> Result<Option<Vec<Price>>>;

    /// Stores prices in the cache.
    async fn put_prices(&self, key: &PriceKey, prices: &[Price]) -> Result<()>;

    /// Retrieves cached financial metrics.
    async fn get_financial_metrics(&self, key: &MetricsKey)
    -> Result<Option<Vec<FinancialMetrics>>>;

    /// Stores financial metrics in the cache.
    async fn put_financial_metrics(
        &self,
        key: &MetricsKey,
        metrics: &[FinancialMetrics],
    ) -> Result<()>;

    /// Retrieves cached insider trades.
    async fn get_insider_trades(&self, key: &WindowKey) -> Result<Option<Vec<InsiderTrade>>>;

    /// Stores insider trades in the cache.
    async fn put_insider_trades(&self, key: &WindowKey, trades: &[InsiderTrade]) -> Result<()>;

    /// Retrieves cached company news.
    async fn get_company_news(&self, key: &WindowKey) -> Result<Option<Vec<CompanyNews>>>;

    /// Stores company news in the cache.
    async fn put_company_news(&self, key: &WindowKey, news: &[CompanyNews]) -> Result<()>;

    /// Clears all cached data.
    async fn clear(&self) -> Result<()>;
}

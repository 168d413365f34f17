//! Core record types for financial market data.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Ticker`] - Exchange-listed identifier
//! - [`Price`] - Daily OHLCV bar
//! - [`FinancialMetrics`] - Valuation, profitability and growth ratios
//! - [`LineItem`] - Free-form financial statement line items
//! - [`InsiderTrade`] - Insider transaction filing
//! - [`CompanyNews`] - News article about a company
//! - [`CompanyFacts`] - Company reference information
//!
//! Date-like fields keep the API's string representation; [`date_part`] turns
//! them into calendar dates where a comparison is needed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{DataError, Result};

/// Suffix marking a Hong Kong listing (e.g. `0700.HK`).
const ALTERNATE_MARKET_SUFFIX: &str = ".HK";

/// An exchange-listed security identifier.
///
/// Tickers are uppercased on creation, so `0700.hk` and `0700.HK` are the same
/// ticker: both route to the Hong Kong source, share cache entries, and are sent
/// to the API as `0700.HK`.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ticker(String);

impl Ticker {
    /// Creates a new ticker from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().to_uppercase())
    }

    /// Returns the ticker as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this ticker belongs to the alternate (Hong Kong) market.
    ///
    /// Matches an explicit `.HK` suffix in any case, or a bare numeric code of 4
    /// or 5 digits such as `0700` or `00700`.
    #[must_use]
    pub fn is_alternate_market(&self) -> bool {
        if self.0.ends_with(ALTERNATE_MARKET_SUFFIX) {
            return true;
        }
        matches!(self.0.len(), 4 | 5) && self.0.bytes().all(|b| b.is_ascii_digit())
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Ticker {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Ticker {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Ticker {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Extracts the calendar date from a `YYYY-MM-DD[THH:MM:SS...]` string.
///
/// Anything after a `T` or space separator is dropped before parsing.
pub fn date_part(value: &str) -> Result<NaiveDate> {
    let date = value.split(['T', ' ']).next().unwrap_or(value);
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| DataError::Parse(format!("invalid date {value:?}: {e}")))
}

/// A record that carries a date usable as a pagination cursor.
pub trait CursorRecord {
    /// Returns the raw date-like value the API paginates on.
    fn cursor(&self) -> &str;
}

/// Daily OHLCV price bar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Opening price.
    pub open: f64,
    /// Closing price.
    pub close: f64,
    /// Highest price during the period.
    pub high: f64,
    /// Lowest price during the period.
    pub low: f64,
    /// Trading volume.
    pub volume: i64,
    /// Bar timestamp, `YYYY-MM-DDTHH:MM:SS` with an optional zone suffix.
    pub time: String,
}

/// Financial metrics for one reporting period.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    /// Ticker the metrics belong to.
    pub ticker: String,
    /// End date of the reporting period.
    pub report_period: String,
    /// Reporting period type (`ttm`, `annual`, `quarterly`).
    pub period: String,
    /// Reporting currency.
    pub currency: String,

    // Valuation
    /// Market capitalization.
    pub market_cap: Option<f64>,
    /// Enterprise value.
    pub enterprise_value: Option<f64>,
    /// Price-to-earnings ratio.
    pub price_to_earnings_ratio: Option<f64>,
    /// Price-to-book ratio.
    pub price_to_book_ratio: Option<f64>,
    /// Price-to-sales ratio.
    pub price_to_sales_ratio: Option<f64>,
    /// EV/EBITDA ratio.
    pub enterprise_value_to_ebitda_ratio: Option<f64>,
    /// EV/revenue ratio.
    pub enterprise_value_to_revenue_ratio: Option<f64>,
    /// Free cash flow yield.
    pub free_cash_flow_yield: Option<f64>,
    /// Price/earnings-to-growth ratio.
    pub peg_ratio: Option<f64>,

    // Profitability
    /// Gross profit margin.
    pub gross_margin: Option<f64>,
    /// Operating profit margin.
    pub operating_margin: Option<f64>,
    /// Net profit margin.
    pub net_margin: Option<f64>,
    /// Return on equity.
    pub return_on_equity: Option<f64>,
    /// Return on assets.
    pub return_on_assets: Option<f64>,
    /// Return on invested capital.
    pub return_on_invested_capital: Option<f64>,

    // Efficiency
    /// Asset turnover.
    pub asset_turnover: Option<f64>,
    /// Inventory turnover.
    pub inventory_turnover: Option<f64>,
    /// Receivables turnover.
    pub receivables_turnover: Option<f64>,
    /// Days sales outstanding.
    pub days_sales_outstanding: Option<f64>,
    /// Operating cycle in days.
    pub operating_cycle: Option<f64>,
    /// Working capital turnover.
    pub working_capital_turnover: Option<f64>,

    // Liquidity & Solvency
    /// Current ratio.
    pub current_ratio: Option<f64>,
    /// Quick ratio.
    pub quick_ratio: Option<f64>,
    /// Cash ratio.
    pub cash_ratio: Option<f64>,
    /// Operating cash flow ratio.
    pub operating_cash_flow_ratio: Option<f64>,
    /// Debt-to-equity ratio.
    pub debt_to_equity: Option<f64>,
    /// Debt-to-assets ratio.
    pub debt_to_assets: Option<f64>,
    /// Interest coverage.
    pub interest_coverage: Option<f64>,

    // Growth
    /// Revenue growth.
    pub revenue_growth: Option<f64>,
    /// Earnings growth.
    pub earnings_growth: Option<f64>,
    /// Book value growth.
    pub book_value_growth: Option<f64>,
    /// Earnings-per-share growth.
    pub earnings_per_share_growth: Option<f64>,
    /// Free cash flow growth.
    pub free_cash_flow_growth: Option<f64>,
    /// Operating income growth.
    pub operating_income_growth: Option<f64>,
    /// EBITDA growth.
    pub ebitda_growth: Option<f64>,

    // Per share
    /// Dividend payout ratio.
    pub payout_ratio: Option<f64>,
    /// Earnings per share.
    pub earnings_per_share: Option<f64>,
    /// Book value per share.
    pub book_value_per_share: Option<f64>,
    /// Free cash flow per share.
    pub free_cash_flow_per_share: Option<f64>,
}

impl FinancialMetrics {
    /// Creates metrics with the identifying fields set and every ratio empty.
    #[must_use]
    pub fn new(
        ticker: impl Into<String>,
        report_period: impl Into<String>,
        period: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            report_period: report_period.into(),
            period: period.into(),
            currency: currency.into(),
            ..Default::default()
        }
    }
}

/// Financial statement line items returned by the line-item search.
///
/// The requested items (e.g. `revenue`, `free_cash_flow`) arrive as extra
/// top-level fields and are kept in [`LineItem::values`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Ticker the items belong to.
    pub ticker: String,
    /// End date of the reporting period.
    pub report_period: String,
    /// Reporting period type.
    pub period: String,
    /// Reporting currency.
    pub currency: String,
    /// Requested line items keyed by name.
    #[serde(flatten)]
    pub values: BTreeMap<String, serde_json::Value>,
}

impl LineItem {
    /// Returns a numeric line item by name, if present.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(serde_json::Value::as_f64)
    }
}

/// An insider transaction filing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InsiderTrade {
    /// Ticker of the issuer.
    pub ticker: String,
    /// Issuer name.
    pub issuer: Option<String>,
    /// Insider name.
    pub name: Option<String>,
    /// Insider title.
    pub title: Option<String>,
    /// Whether the insider sits on the board.
    pub is_board_director: Option<bool>,
    /// Date of the transaction.
    pub transaction_date: Option<String>,
    /// Number of shares transacted (negative for sales).
    pub transaction_shares: Option<f64>,
    /// Price per share.
    pub transaction_price_per_share: Option<f64>,
    /// Total transaction value.
    pub transaction_value: Option<f64>,
    /// Shares held before the transaction.
    pub shares_owned_before_transaction: Option<f64>,
    /// Shares held after the transaction.
    pub shares_owned_after_transaction: Option<f64>,
    /// Security title.
    pub security_title: Option<String>,
    /// Filing date, used as the pagination cursor.
    pub filing_date: String,
}

impl CursorRecord for InsiderTrade {
    fn cursor(&self) -> &str {
        &self.filing_date
    }
}

/// A news article about a company.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompanyNews {
    /// Ticker the article is about.
    pub ticker: String,
    /// Headline.
    pub title: String,
    /// Author.
    pub author: String,
    /// Publisher.
    pub source: String,
    /// Publication date, used as the pagination cursor.
    pub date: String,
    /// Article URL.
    pub url: String,
    /// Sentiment label, when the source provides one.
    pub sentiment: Option<String>,
}

impl CursorRecord for CompanyNews {
    fn cursor(&self) -> &str {
        &self.date
    }
}

/// Company reference information.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyFacts {
    /// Ticker.
    pub ticker: String,
    /// Company name.
    pub name: String,
    /// SEC CIK number.
    pub cik: Option<String>,
    /// Industry.
    pub industry: Option<String>,
    /// Business sector.
    pub sector: Option<String>,
    /// Security category.
    pub category: Option<String>,
    /// Primary exchange.
    pub exchange: Option<String>,
    /// Whether the listing is active.
    pub is_active: Option<bool>,
    /// Listing date.
    pub listing_date: Option<String>,
    /// Headquarters location.
    pub location: Option<String>,
    /// Current market capitalization.
    pub market_cap: Option<f64>,
    /// Number of employees.
    pub number_of_employees: Option<f64>,
    /// SEC filings URL.
    pub sec_filings_url: Option<String>,
    /// SIC code.
    pub sic_code: Option<String>,
    /// SIC industry.
    pub sic_industry: Option<String>,
    /// SIC sector.
    pub sic_sector: Option<String>,
    /// Company website.
    pub website_url: Option<String>,
    /// Weighted average shares outstanding.
    pub weighted_average_shares: Option<f64>,
}

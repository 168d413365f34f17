#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/findata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and traits shared by the findata clients.
//!
//! This crate provides the foundational abstractions:
//!
//! - [`Ticker`](types::Ticker) - Exchange-listed identifier with market classification
//! - Record types returned by the data sources ([`Price`](types::Price),
//!   [`FinancialMetrics`](types::FinancialMetrics), [`InsiderTrade`](types::InsiderTrade), ...)
//! - [`DataCache`](cache::DataCache) - Exact-match caching abstraction with structured keys
//! - [`AlternateMarketSource`](source::AlternateMarketSource) - Contract for the secondary
//!   (Hong Kong) data source
//! - [`prices_to_df`](frame::prices_to_df) - Price list to DataFrame conversion

/// Cache trait and structured cache keys.
pub mod cache;
/// Error types for data operations.
pub mod error;
/// Tabular conversion of fetched records.
pub mod frame;
/// Reporting period definitions.
pub mod period;
/// Alternate-market data source contract.
pub mod source;
/// Core record types (Ticker, Price, InsiderTrade, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use cache::{DataCache, MetricsKey, PriceKey, WindowKey};
pub use error::{DataError, Result};
pub use frame::prices_to_df;
pub use period::Period;
pub use source::{AlternateMarketSource, NotConfigured};
pub use types::{
    CompanyFacts, CompanyNews, CursorRecord, FinancialMetrics, InsiderTrade, LineItem, Price,
    Ticker, date_part,
};

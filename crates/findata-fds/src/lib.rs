#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/findata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Financial Datasets data provider.
//!
//! This crate implements a client for the
//! [Financial Datasets](https://financialdatasets.ai/) API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use findata_cache::InMemoryCache;
//! use findata_core::Ticker;
//! use findata_fds::FinancialDatasetsClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FinancialDatasetsClient::from_env(Arc::new(InMemoryCache::new()));
//!
//!     let ticker = Ticker::new("AAPL");
//!     let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
//!     let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!
//!     // Walks back page by page until the window is covered
//!     let trades = client.insider_trades(&ticker, end, Some(start), 1000, None).await?;
//!     let news = client.company_news(&ticker, end, Some(start), 1000, None).await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
/// Client configuration.
pub mod config;
/// Request execution with rate-limit backoff.
pub mod executor;
mod models;
mod paginate;
/// Scripted transport for tests.
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
/// HTTP transport seam.
pub mod transport;

pub use client::FinancialDatasetsClient;
pub use config::{Backoff, FdsConfig};
pub use executor::RequestExecutor;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, ReqwestTransport};

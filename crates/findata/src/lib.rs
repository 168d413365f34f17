#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/findata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use findata::{FinancialData, InMemoryCache, Period, Ticker};
//!
//! #[tokio::main]
//! async fn main() -> findata::Result<()> {
//!     let data = FinancialData::from_env(Arc::new(InMemoryCache::new()));
//!
//!     let ticker = Ticker::new("AAPL");
//!     let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
//!     let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!
//!     let prices = data.price_data(&ticker, start, end, None).await?;
//!     let metrics = data.financial_metrics(&ticker, end, Period::Ttm, 10, None).await?;
//!     println!("{prices:?}\n{metrics:?}");
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use findata_core::*;

// Cache implementations
pub use findata_cache::{InMemoryCache, NoopCache};

// Sources
pub use findata_fds::{FdsConfig, FinancialDatasetsClient};
#[cfg(feature = "futu")]
pub use findata_futu::{FutuSource, TerminalAddress, TerminalConnector};

mod router;
pub use router::FinancialData;

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/findata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use findata_cache::InMemoryCache;
//! use findata_futu::FutuSource;
//!
//! // `connector` implements `TerminalConnector` for a running OpenD instance.
//! let source = FutuSource::new(Arc::new(connector), Arc::new(InMemoryCache::new()));
//! ```

mod source;
/// Quote terminal session contract.
pub mod terminal;

pub use source::{FutuSource, to_terminal_code};
pub use terminal::{
    DEFAULT_HOST, DEFAULT_PORT, KlineBar, NewsItem, QuoteTerminal, TerminalAddress,
    TerminalConnector,
};

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/findata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Caching implementations for the findata clients.
//!
//! This crate provides implementations of the [`DataCache`] trait from `findata-core`:
//!
//! - [`InMemoryCache`] - Exact-match in-process cache, never expires
//! - [`NoopCache`] - No-op cache that doesn't store anything

/// In-memory cache implementation.
pub mod memory;
/// No-op cache implementation.
pub mod noop;

// Re-export the trait for convenience
pub use findata_core::DataCache;

// Re-export implementations
pub use memory::InMemoryCache;
pub use noop::NoopCache;

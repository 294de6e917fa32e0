//! # Tachyon Query
//!
//! [`engine::QueryEngine`]: aggregates `AVG_SPREAD`/`VWAP`/`OHLC` queries
//! over a worker's [`tachyon_store::LocalStore`], producing the
//! [`tachyon_core::model::PartialResult`] the coordinator merges.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;

pub use engine::QueryEngine;

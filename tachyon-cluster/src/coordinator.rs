//! `Coordinator`: rank 0 of the scatter/gather protocol.
//!
//! Drives the ingest phase (scatter batches to workers by
//! `symbol_id % num_workers`), the query phase (broadcast), and the
//! aggregate phase (gather `PART`s and merge), per the protocol in the
//! workspace design doc's ScatterGather section.

use tachyon_core::model::{PartialResult, Query, QueryType};
use tracing::{info, warn};

use crate::error::{ClusterError, Result};
use crate::tick_source::TickSource;
use crate::transport::{Message, Transport};

/// The computed, presentation-ready outcome of one query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryOutcome {
    /// No worker held any matching tick.
    NoData,
    /// Mean `ask - bid` over matching ticks.
    AvgSpread(f64),
    /// Volume-weighted average mid price over matching ticks.
    Vwap(f64),
    /// Open/high/low/close mid prices over matching ticks.
    Ohlc {
        /// Mid price at the earliest matching timestamp.
        open: f64,
        /// Highest mid price observed.
        high: f64,
        /// Lowest mid price observed.
        low: f64,
        /// Mid price at the latest matching timestamp.
        close: f64,
    },
}

/// Rank 0: scatters ingest batches, broadcasts queries, gathers and
/// merges partial results.
pub struct Coordinator<'t> {
    transport: &'t dyn Transport,
}

impl<'t> Coordinator<'t> {
    /// Creates a coordinator driving `transport`.
    pub fn new(transport: &'t dyn Transport) -> Self {
        Self { transport }
    }

    /// Drains `source` in batches of up to `max_ticks_per_batch`, routing
    /// each non-empty batch to worker `(symbol_id % num_workers) + 1`, then
    /// signals every worker with `END`.
    pub fn run_ingest(
        &self,
        source: &mut dyn TickSource,
        max_ticks_per_batch: usize,
    ) -> Result<()> {
        let num_workers = self.transport.num_workers();
        let mut batches_sent = 0u64;

        loop {
            let batch = source.next_batch(max_ticks_per_batch);
            if batch.is_empty() {
                break;
            }
            let symbol_id = batch[0].symbol_id;
            let target = (symbol_id as usize % num_workers) + 1;
            self.transport.send(target, Message::Data(batch))?;
            batches_sent += 1;
        }

        for rank in 1..=num_workers {
            self.transport.send(rank, Message::End)?;
        }
        info!(batches_sent, num_workers, "ingest phase complete");
        Ok(())
    }

    /// Broadcasts `query`, gathers one `PART` per worker, and merges them
    /// into a presentation-ready [`QueryOutcome`].
    pub fn run_query(&self, query: Query) -> Result<QueryOutcome> {
        self.transport.broadcast_query(query)?;

        let num_workers = self.transport.num_workers();
        let mut merged: Option<PartialResult> = None;

        for _ in 0..num_workers {
            let part = self.transport.recv_part()?;
            if part.query_type != query.query_type {
                warn!(
                    expected = ?query.query_type,
                    actual = ?part.query_type,
                    "partial result type mismatch during aggregation"
                );
                return Err(ClusterError::type_mismatch(query.query_type, part.query_type));
            }
            merged = Some(match merged {
                None => part,
                Some(mut acc) => {
                    acc.merge(&part);
                    acc
                }
            });
        }

        Ok(finalize(merged.expect("num_workers > 0 guarantees one PART"), query.query_type))
    }
}

fn finalize(part: PartialResult, query_type: QueryType) -> QueryOutcome {
    match query_type {
        QueryType::AvgSpread => {
            if part.count == 0 {
                QueryOutcome::NoData
            } else {
                QueryOutcome::AvgSpread(part.sum / part.count as f64)
            }
        }
        QueryType::Vwap => {
            if part.count == 0 {
                QueryOutcome::NoData
            } else {
                QueryOutcome::Vwap(part.sum / part.count as f64)
            }
        }
        QueryType::Ohlc => {
            if !part.ohlc.is_set {
                QueryOutcome::NoData
            } else {
                QueryOutcome::Ohlc {
                    open: part.ohlc.open,
                    high: part.ohlc.high,
                    low: part.ohlc.low,
                    close: part.ohlc.close,
                }
            }
        }
    }
}

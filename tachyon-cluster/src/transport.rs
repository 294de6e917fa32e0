//! The abstract message bus [`Coordinator`](crate::coordinator::Coordinator)
//! and [`Worker`](crate::worker::Worker) depend on.
//!
//! Ranks are 1-indexed for workers; rank 0 is always the coordinator and
//! never addressed through this trait (it drives ingest/query/aggregate
//! directly). See [`crate::local`] for the one shipped binding.

use tachyon_core::model::{PartialResult, Query, RawTick};

use crate::error::Result;

/// One message exchanged between the coordinator and a worker.
#[derive(Debug, Clone)]
pub enum Message {
    /// Tag 0: a batch of ticks to ingest, coordinator → worker.
    Data(Vec<RawTick>),
    /// Tag 1: no more `Data` will follow, coordinator → worker.
    End,
}

/// A reliable, in-order typed message bus between one coordinator (rank 0)
/// and `num_workers()` workers (ranks `1..=num_workers()`).
///
/// Implementations must preserve per-link ordering: messages sent to a
/// given worker arrive in send order, and a worker's `Part` replies are
/// delivered to the coordinator without corruption (though the
/// coordinator may observe them in any arrival order across workers).
pub trait Transport: Send + Sync {
    /// Number of workers participating in this run.
    fn num_workers(&self) -> usize;

    /// Sends a `DATA`/`END` message to `rank` (coordinator side).
    fn send(&self, rank: usize, msg: Message) -> Result<()>;

    /// Blocks until the next `DATA`/`END` message addressed to `rank`
    /// arrives (worker side).
    fn recv_from_coordinator(&self, rank: usize) -> Result<Message>;

    /// Broadcasts `QUERY(query)` to every worker (coordinator side).
    fn broadcast_query(&self, query: Query) -> Result<()>;

    /// Blocks until the broadcast query addressed to `rank` arrives
    /// (worker side). Each worker observes each broadcast exactly once.
    fn recv_query(&self, rank: usize) -> Result<Query>;

    /// Sends this worker's `PART` reply to the coordinator (worker side).
    fn send_part(&self, rank: usize, part: PartialResult) -> Result<()>;

    /// Blocks until one `PART` arrives from any worker (coordinator side).
    /// Called once per worker during the gather phase.
    fn recv_part(&self) -> Result<PartialResult>;
}

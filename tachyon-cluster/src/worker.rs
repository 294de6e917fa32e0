//! `Worker`: rank ≥1 of the scatter/gather protocol.
//!
//! Owns one exclusive [`LocalStore`] and [`QueryEngine`]; never shares
//! mutable state with the coordinator or other workers (see the workspace
//! design doc's concurrency model).

use tachyon_query::QueryEngine;
use tachyon_store::LocalStore;
use tracing::{debug, info};

use crate::error::Result;
use crate::transport::{Message, Transport};

/// One worker rank. Ingests batches into its own [`LocalStore`], then
/// serves query rounds against it.
pub struct Worker<'t> {
    rank: usize,
    transport: &'t dyn Transport,
    store: LocalStore,
    engine: QueryEngine,
}

impl<'t> Worker<'t> {
    /// Creates a worker for `rank` (must be in `1..=transport.num_workers()`).
    pub fn new(rank: usize, transport: &'t dyn Transport) -> Self {
        Self {
            rank,
            transport,
            store: LocalStore::new(),
            engine: QueryEngine::new(),
        }
    }

    /// Ingests `DATA` messages until `END`. Does not send anything during
    /// this phase.
    pub fn run_ingest_loop(&mut self) -> Result<()> {
        loop {
            match self.transport.recv_from_coordinator(self.rank)? {
                Message::Data(batch) => self.store.ingest(&batch),
                Message::End => break,
            }
        }
        info!(
            rank = self.rank,
            total_blocks = self.store.total_block_count(),
            "worker finished ingest"
        );
        Ok(())
    }

    /// Waits for the next broadcast query, runs it against this worker's
    /// store, and replies with exactly one `PART`.
    pub fn serve_one_query(&self) -> Result<()> {
        let query = self.transport.recv_query(self.rank)?;
        let part = self.engine.run(&self.store, &query);
        debug!(
            rank = self.rank,
            query_type = ?query.query_type,
            count = part.count,
            "served query"
        );
        self.transport.send_part(self.rank, part)
    }

    /// Runs the full worker lifecycle for a cluster that issues exactly
    /// `num_queries` query rounds after ingest completes.
    pub fn run(&mut self, num_queries: usize) -> Result<()> {
        self.run_ingest_loop()?;
        for _ in 0..num_queries {
            self.serve_one_query()?;
        }
        Ok(())
    }
}

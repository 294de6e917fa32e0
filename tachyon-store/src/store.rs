//! `LocalStore`: a per-worker, per-symbol append-only block index.

use std::collections::HashMap;

use tachyon_codec::block::CompressedBlock;
use tachyon_core::model::RawTick;
use tracing::{debug, trace};

/// Maps `symbol_id -> CompressedBlock`s, in insertion (ingest) order.
///
/// Owned exclusively by one rank (coordinator or worker) in the scatter/
/// gather protocol; never shared across threads. See the workspace design
/// doc's concurrency model.
#[derive(Debug, Default)]
pub struct LocalStore {
    blocks: HashMap<u32, Vec<CompressedBlock>>,
}

impl LocalStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compresses `batch` into a block and appends it under
    /// `batch[0].symbol_id`. A no-op for an empty batch.
    ///
    /// All ticks in `batch` must share one `symbol_id` — checked with
    /// `debug_assert!` only; a release build that violates this produces
    /// wrong query results for the minority symbol, not a crash.
    pub fn ingest(&mut self, batch: &[RawTick]) {
        let Some(block) = CompressedBlock::compress(batch) else {
            trace!("ingest called with empty batch, ignoring");
            return;
        };
        let symbol_id = block.symbol_id;
        let list = self.blocks.entry(symbol_id).or_default();
        list.push(block);
        debug!(
            symbol_id,
            num_ticks = batch.len(),
            block_count = list.len(),
            "ingested block"
        );
    }

    /// Returns the blocks for `symbol` whose `[start_timestamp,
    /// end_timestamp]` overlaps `[t_lo, t_hi]`, in insertion order.
    ///
    /// A returned block may still contain no matching ticks within the
    /// window; callers filter per tick while scanning.
    pub fn blocks_for(&self, symbol: u32, t_lo: u64, t_hi: u64) -> Vec<&CompressedBlock> {
        self.blocks
            .get(&symbol)
            .into_iter()
            .flatten()
            .filter(|b| b.overlaps(t_lo, t_hi))
            .collect()
    }

    /// The set of symbol ids currently held. Used by diagnostics, not the
    /// query path.
    pub fn symbols(&self) -> impl Iterator<Item = u32> + '_ {
        self.blocks.keys().copied()
    }

    /// Number of blocks stored for `symbol`.
    pub fn block_count(&self, symbol: u32) -> usize {
        self.blocks.get(&symbol).map_or(0, Vec::len)
    }

    /// Total number of blocks stored across all symbols.
    pub fn total_block_count(&self) -> usize {
        self.blocks.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(ts: u64, sym: u32) -> RawTick {
        RawTick::new(ts, sym, 1.0, 1.01, 1, 1)
    }

    #[test]
    fn test_ingest_empty_batch_is_noop() {
        let mut store = LocalStore::new();
        store.ingest(&[]);
        assert_eq!(store.total_block_count(), 0);
    }

    #[test]
    fn test_ingest_and_lookup() {
        let mut store = LocalStore::new();
        store.ingest(&[tick(0, 1), tick(100, 1)]);
        store.ingest(&[tick(200, 1), tick(300, 1)]);
        store.ingest(&[tick(50, 2)]);

        assert_eq!(store.block_count(1), 2);
        assert_eq!(store.block_count(2), 1);
        assert_eq!(store.total_block_count(), 3);

        let symbols: Vec<u32> = {
            let mut s: Vec<u32> = store.symbols().collect();
            s.sort();
            s
        };
        assert_eq!(symbols, vec![1, 2]);
    }

    #[test]
    fn test_overlap_pruning() {
        let mut store = LocalStore::new();
        store.ingest(&[tick(0, 1), tick(100, 1)]);
        store.ingest(&[tick(200, 1), tick(300, 1)]);
        store.ingest(&[tick(1000, 1), tick(1100, 1)]);

        let hits = store.blocks_for(1, 150, 250);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].start_timestamp, 200);

        let hits = store.blocks_for(1, 0, 10_000);
        assert_eq!(hits.len(), 3);

        let hits = store.blocks_for(1, 400, 900);
        assert!(hits.is_empty());

        assert!(store.blocks_for(999, 0, 10).is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut store = LocalStore::new();
        store.ingest(&[tick(500, 1)]);
        store.ingest(&[tick(0, 1)]);
        let hits = store.blocks_for(1, 0, 1000);
        assert_eq!(hits[0].start_timestamp, 500);
        assert_eq!(hits[1].start_timestamp, 0);
    }
}

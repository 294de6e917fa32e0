//! The pluggable inbound collaborator the coordinator drains during ingest.

use tachyon_core::model::RawTick;

/// Produces batches of ticks for the coordinator to scatter to workers.
///
/// Implementations must return batches where every tick shares one
/// `symbol_id` and timestamps are non-decreasing; the core never re-sorts.
/// An empty `Vec` signals "no more data".
pub trait TickSource {
    /// Returns up to `max_ticks` ticks for a single symbol, or an empty
    /// `Vec` if the source is exhausted.
    fn next_batch(&mut self, max_ticks: usize) -> Vec<RawTick>;
}

/// A deterministic, round-robin synthetic tick generator.
///
/// Grounded in the original system's tick generator: each symbol's price
/// takes a small random walk and the inter-tick gap is drawn from a
/// microsecond-scale uniform range, but unlike the original (which picks a
/// random symbol per tick) this source round-robins whole batches across
/// symbols, since every batch handed to the coordinator must share one
/// `symbol_id`. Uses a plain xorshift64 generator rather than an external
/// RNG crate, since reproducibility (same seed, same stream) matters more
/// here than statistical quality.
pub struct SyntheticTickSource {
    symbols: Vec<u32>,
    cursor: usize,
    ticks_per_batch: usize,
    batches_per_symbol: usize,
    emitted: Vec<usize>,
    timestamp: u64,
    last_bid: Vec<f64>,
    rng_state: u64,
}

impl SyntheticTickSource {
    /// Creates a source that round-robins `symbols`, emitting
    /// `batches_per_symbol` batches of up to `ticks_per_batch` ticks each
    /// per symbol before signaling exhaustion. `seed` must be non-zero.
    pub fn new(symbols: Vec<u32>, ticks_per_batch: usize, batches_per_symbol: usize, seed: u64) -> Self {
        assert!(!symbols.is_empty(), "synthetic source needs at least one symbol");
        assert!(seed != 0, "xorshift64 requires a non-zero seed");

        let emitted = vec![0; symbols.len()];
        let last_bid = symbols
            .iter()
            .map(|&s| 100.0 + (s as f64) * 10.0)
            .collect();

        Self {
            symbols,
            cursor: 0,
            ticks_per_batch,
            batches_per_symbol,
            emitted,
            timestamp: 1_000_000_000, // 1s past an arbitrary epoch, matching the original generator
            last_bid,
            rng_state: seed,
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng_state = x;
        x
    }

    /// A uniform integer in `[lo, hi)`.
    fn next_range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next_u64() % (hi - lo)
    }

    /// A small, roughly zero-centered price step: the average of two
    /// independent uniform draws biases the distribution toward its
    /// center, a cheap stand-in for a Gaussian walk.
    fn next_price_step(&mut self) -> f64 {
        let a = self.next_range(0, 2001) as f64 / 100_000.0 - 0.01;
        let b = self.next_range(0, 2001) as f64 / 100_000.0 - 0.01;
        (a + b) / 2.0
    }

}

impl TickSource for SyntheticTickSource {
    fn next_batch(&mut self, max_ticks: usize) -> Vec<RawTick> {
        if self.emitted.iter().all(|&n| n >= self.batches_per_symbol) {
            return Vec::new();
        }

        // Find the next symbol (round-robin) that hasn't hit its quota yet.
        let n = self.symbols.len();
        let mut idx = self.cursor;
        loop {
            if self.emitted[idx] < self.batches_per_symbol {
                break;
            }
            idx = (idx + 1) % n;
        }
        self.cursor = (idx + 1) % n;
        self.emitted[idx] += 1;

        let symbol_id = self.symbols[idx];
        let batch_size = max_ticks.min(self.ticks_per_batch).max(1);
        let mut batch = Vec::with_capacity(batch_size);

        for _ in 0..batch_size {
            let step = self.next_price_step();
            self.last_bid[idx] += step;
            let bid = self.last_bid[idx];
            let ask = bid + 0.02;
            let bid_size = 100;
            let ask_size = 100;

            batch.push(RawTick::new(self.timestamp, symbol_id, bid, ask, bid_size, ask_size));
            self.timestamp += self.next_range(1_000, 50_000);
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batches_are_single_symbol() {
        let mut src = SyntheticTickSource::new(vec![0, 1], 10, 3, 42);
        let mut seen_symbols = Vec::new();
        loop {
            let batch = src.next_batch(10);
            if batch.is_empty() {
                break;
            }
            let sym = batch[0].symbol_id;
            assert!(batch.iter().all(|t| t.symbol_id == sym));
            seen_symbols.push(sym);
        }
        assert_eq!(seen_symbols.len(), 6); // 2 symbols * 3 batches
    }

    #[test]
    fn test_timestamps_non_decreasing_within_batch() {
        let mut src = SyntheticTickSource::new(vec![5], 20, 1, 7);
        let batch = src.next_batch(20);
        assert!(batch.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_exhaustion_returns_empty() {
        let mut src = SyntheticTickSource::new(vec![0], 5, 1, 99);
        assert!(!src.next_batch(5).is_empty());
        assert!(src.next_batch(5).is_empty());
        assert!(src.next_batch(5).is_empty());
    }

    #[test]
    fn test_deterministic_given_same_seed() {
        let mut a = SyntheticTickSource::new(vec![0, 1], 5, 2, 123);
        let mut b = SyntheticTickSource::new(vec![0, 1], 5, 2, 123);
        loop {
            let ba = a.next_batch(5);
            let bb = b.next_batch(5);
            assert_eq!(ba, bb);
            if ba.is_empty() {
                break;
            }
        }
    }
}

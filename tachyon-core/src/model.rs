//! Shared data model: raw ticks, queries, and partial results.
//!
//! These types cross every boundary in the workspace — they are what a
//! `TickSource` produces, what `BlockCodec` compresses, what `QueryEngine`
//! scans, and what `ScatterGather` ships over the wire — so they live in
//! `tachyon-core` rather than in any one component crate.

/// A single uncompressed market data observation.
///
/// Batches of `RawTick` are expected (not enforced by this type) to share a
/// `symbol_id` and carry non-decreasing `timestamp`s; see `tachyon-cluster`'s
/// `TickSource` contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawTick {
    /// Monotone-non-decreasing (within one batch) tick timestamp.
    pub timestamp: u64,
    /// Instrument identifier.
    pub symbol_id: u32,
    /// Best bid price.
    pub bid_price: f64,
    /// Best ask price.
    pub ask_price: f64,
    /// Size available at the best bid.
    pub bid_size: u32,
    /// Size available at the best ask.
    pub ask_size: u32,
}

impl RawTick {
    /// Convenience constructor matching field order in the design doc.
    pub fn new(
        timestamp: u64,
        symbol_id: u32,
        bid_price: f64,
        ask_price: f64,
        bid_size: u32,
        ask_size: u32,
    ) -> Self {
        Self {
            timestamp,
            symbol_id,
            bid_price,
            ask_price,
            bid_size,
            ask_size,
        }
    }

    /// Mid price, `(bid + ask) / 2`.
    #[inline]
    pub fn mid_price(&self) -> f64 {
        (self.bid_price + self.ask_price) / 2.0
    }

    /// Combined bid + ask size, used as VWAP volume.
    #[inline]
    pub fn volume(&self) -> u32 {
        self.bid_size + self.ask_size
    }
}

/// The three aggregate query kinds the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    /// Mean of `ask - bid` over matching ticks.
    AvgSpread,
    /// Volume-weighted average of mid price over matching ticks.
    Vwap,
    /// Open/high/low/close of mid price over matching ticks.
    Ohlc,
}

/// A query against one symbol's tick history over a closed timestamp window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    /// Which aggregate to compute.
    pub query_type: QueryType,
    /// Inclusive lower bound of the timestamp window.
    pub start_time: u64,
    /// Inclusive upper bound of the timestamp window.
    pub end_time: u64,
    /// Instrument to query.
    pub symbol_id: u32,
}

impl Query {
    /// Creates a new `Query`.
    pub fn new(query_type: QueryType, start_time: u64, end_time: u64, symbol_id: u32) -> Self {
        Self {
            query_type,
            start_time,
            end_time,
            symbol_id,
        }
    }
}

/// Open/high/low/close state, tracked with the timestamps at which open and
/// close were observed so that partials from out-of-order blocks can be
/// merged correctly (see the design's §4.4 rationale).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OhlcState {
    /// Mid price at the minimum matching timestamp seen so far.
    pub open: f64,
    /// Maximum mid price seen so far.
    pub high: f64,
    /// Minimum mid price seen so far.
    pub low: f64,
    /// Mid price at the maximum matching timestamp seen so far.
    pub close: f64,
    /// Timestamp `open` was observed at.
    pub open_ts: u64,
    /// Timestamp `close` was observed at.
    pub close_ts: u64,
    /// Whether at least one matching tick has been folded in.
    pub is_set: bool,
}

impl OhlcState {
    /// An empty OHLC accumulator. High/low seed at the infinities rather
    /// than `f64::MIN_POSITIVE`/`f64::MAX` — see REDESIGN FLAGS in
    /// `SPEC_FULL.md` — because `is_set` is what actually gates visibility,
    /// and seeding with finite-but-wrong sentinels is a latent bug waiting
    /// for a caller that forgets to check the guard.
    pub fn empty() -> Self {
        Self {
            open: 0.0,
            high: f64::NEG_INFINITY,
            low: f64::INFINITY,
            close: 0.0,
            open_ts: 0,
            close_ts: 0,
            is_set: false,
        }
    }

    /// Folds one matching tick's mid price/timestamp into the accumulator.
    pub fn observe(&mut self, mid: f64, ts: u64) {
        if !self.is_set {
            self.open = mid;
            self.high = mid;
            self.low = mid;
            self.close = mid;
            self.open_ts = ts;
            self.close_ts = ts;
            self.is_set = true;
            return;
        }
        self.high = self.high.max(mid);
        self.low = self.low.min(mid);
        if ts < self.open_ts {
            self.open_ts = ts;
            self.open = mid;
        }
        if ts > self.close_ts {
            self.close_ts = ts;
            self.close = mid;
        }
    }

    /// Folds another worker's partial OHLC state into this one, per the
    /// coordinator merge rule in §4.5: smallest `open_ts` wins for open,
    /// largest `close_ts` wins for close, high/low take extremes.
    pub fn merge(&mut self, other: &OhlcState) {
        if !other.is_set {
            return;
        }
        if !self.is_set {
            *self = *other;
            return;
        }
        self.high = self.high.max(other.high);
        self.low = self.low.min(other.low);
        if other.open_ts < self.open_ts {
            self.open_ts = other.open_ts;
            self.open = other.open;
        }
        if other.close_ts > self.close_ts {
            self.close_ts = other.close_ts;
            self.close = other.close;
        }
    }
}

impl Default for OhlcState {
    fn default() -> Self {
        Self::empty()
    }
}

/// One worker's (or the coordinator's merged) contribution to a query.
///
/// `sum`/`count` are overloaded by `query_type`: ticks for `AvgSpread`,
/// price*volume/volume for `Vwap`. See design §4.4 and §9.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartialResult {
    /// The query kind this partial answers.
    pub query_type: QueryType,
    /// Accumulated numerator (AvgSpread: sum of spreads; Vwap: sum of
    /// mid*volume). Unused for `Ohlc`.
    pub sum: f64,
    /// Accumulated denominator (AvgSpread: tick count; Vwap: total volume).
    /// Unused for `Ohlc`.
    pub count: u64,
    /// OHLC accumulator. Unused for `AvgSpread`/`Vwap`.
    pub ohlc: OhlcState,
}

impl PartialResult {
    /// An empty partial result for `query_type`, as returned when no ticks
    /// in a worker's store match the query window.
    pub fn empty(query_type: QueryType) -> Self {
        Self {
            query_type,
            sum: 0.0,
            count: 0,
            ohlc: OhlcState::empty(),
        }
    }

    /// Merges `other` into `self` in place, per the coordinator aggregation
    /// rules in design §4.5. Panics if `other.query_type != self.query_type`
    /// — callers (the coordinator) are expected to have already checked
    /// this and raised `ClusterError::TypeMismatch` instead of calling
    /// merge on mismatched types.
    pub fn merge(&mut self, other: &PartialResult) {
        assert_eq!(
            self.query_type, other.query_type,
            "merging partials of different query types"
        );
        match self.query_type {
            QueryType::AvgSpread | QueryType::Vwap => {
                self.sum += other.sum;
                self.count += other.count;
            }
            QueryType::Ohlc => self.ohlc.merge(&other.ohlc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mid_and_volume() {
        let t = RawTick::new(100, 0, 10.0, 10.02, 1, 1);
        assert_eq!(t.mid_price(), 10.01);
        assert_eq!(t.volume(), 2);
    }

    #[test]
    fn test_ohlc_single_tick() {
        let mut s = OhlcState::empty();
        assert!(!s.is_set);
        s.observe(5.0, 100);
        assert!(s.is_set);
        assert_eq!((s.open, s.high, s.low, s.close), (5.0, 5.0, 5.0, 5.0));
    }

    #[test]
    fn test_ohlc_out_of_order_within_worker() {
        let mut s = OhlcState::empty();
        s.observe(5.0, 300);
        s.observe(7.0, 400);
        s.observe(6.0, 100);
        s.observe(4.0, 200);
        assert_eq!(s.open, 6.0);
        assert_eq!(s.close, 7.0);
        assert_eq!(s.high, 7.0);
        assert_eq!(s.low, 4.0);
    }

    #[test]
    fn test_ohlc_merge_across_workers() {
        let mut a = OhlcState::empty();
        a.observe(5.0, 300);
        a.observe(7.0, 400);
        let mut b = OhlcState::empty();
        b.observe(6.0, 100);
        b.observe(4.0, 200);

        a.merge(&b);
        assert_eq!(a.open, 6.0);
        assert_eq!(a.close, 7.0);
        assert_eq!(a.high, 7.0);
        assert_eq!(a.low, 4.0);
    }

    #[test]
    fn test_partial_result_merge_avg_spread() {
        let mut a = PartialResult {
            query_type: QueryType::AvgSpread,
            sum: 1.0,
            count: 2,
            ohlc: OhlcState::empty(),
        };
        let b = PartialResult {
            query_type: QueryType::AvgSpread,
            sum: 3.0,
            count: 4,
            ohlc: OhlcState::empty(),
        };
        a.merge(&b);
        assert_eq!(a.sum, 4.0);
        assert_eq!(a.count, 6);
    }
}

//! `QueryEngine`: runs one [`Query`] against a [`LocalStore`], producing a
//! [`PartialResult`] for the coordinator to merge.

use tachyon_codec::scanner::BlockScanner;
use tachyon_core::model::{OhlcState, PartialResult, Query, QueryType, RawTick};
use tachyon_store::LocalStore;
use tracing::error;

/// Stateless aggregator over a worker's [`LocalStore`].
#[derive(Debug, Default)]
pub struct QueryEngine;

impl QueryEngine {
    /// Creates a new engine. `QueryEngine` holds no state of its own; one
    /// instance can serve any number of queries against any number of
    /// stores.
    pub fn new() -> Self {
        Self
    }

    /// Runs `query` against `store`, scanning every candidate block's ticks
    /// in `[query.start_time, query.end_time]`.
    ///
    /// A block that fails to decode is treated as fatal for this query on
    /// this worker: the engine logs the failure via `tracing::error!` and
    /// returns an empty partial rather than a partially-aggregated one,
    /// since a corrupt block means the remaining ticks for this symbol on
    /// this worker cannot be trusted either.
    pub fn run(&self, store: &LocalStore, query: &Query) -> PartialResult {
        let blocks = store.blocks_for(query.symbol_id, query.start_time, query.end_time);

        let mut sum = 0.0f64;
        let mut count = 0u64;
        let mut ohlc = OhlcState::empty();

        for block in blocks {
            let scanner = BlockScanner::new(block);
            for result in scanner {
                let tick = match result {
                    Ok(tick) => tick,
                    Err(err) => {
                        error!(
                            symbol_id = query.symbol_id,
                            %err,
                            "block decode failed while running query; returning empty partial"
                        );
                        return PartialResult::empty(query.query_type);
                    }
                };
                if tick.timestamp < query.start_time || tick.timestamp > query.end_time {
                    continue;
                }
                fold_tick(query.query_type, &tick, &mut sum, &mut count, &mut ohlc);
            }
        }

        PartialResult {
            query_type: query.query_type,
            sum,
            count,
            ohlc,
        }
    }
}

fn fold_tick(
    query_type: QueryType,
    tick: &RawTick,
    sum: &mut f64,
    count: &mut u64,
    ohlc: &mut OhlcState,
) {
    match query_type {
        QueryType::AvgSpread => {
            *sum += tick.ask_price - tick.bid_price;
            *count += 1;
        }
        QueryType::Vwap => {
            let vol = tick.volume();
            if vol > 0 {
                *sum += tick.mid_price() * vol as f64;
                *count += vol as u64;
            }
        }
        QueryType::Ohlc => {
            ohlc.observe(tick.mid_price(), tick.timestamp);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(ts: u64, sym: u32, bid: f64, ask: f64, bs: u32, asz: u32) -> RawTick {
        RawTick::new(ts, sym, bid, ask, bs, asz)
    }

    #[test]
    fn test_avg_spread() {
        let mut store = LocalStore::new();
        store.ingest(&[
            tick(0, 1, 10.0, 10.10, 1, 1),
            tick(10, 1, 10.0, 10.20, 1, 1),
            tick(20, 1, 10.0, 10.30, 1, 1),
        ]);

        let engine = QueryEngine::new();
        let q = Query::new(QueryType::AvgSpread, 0, 20, 1);
        let part = engine.run(&store, &q);
        assert_eq!(part.count, 3);
        assert!((part.sum / part.count as f64 - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_vwap_ignores_zero_volume_ticks() {
        let mut store = LocalStore::new();
        store.ingest(&[
            tick(0, 1, 10.0, 10.0, 0, 0),
            tick(10, 1, 20.0, 20.0, 1, 1),
        ]);

        let engine = QueryEngine::new();
        let q = Query::new(QueryType::Vwap, 0, 10, 1);
        let part = engine.run(&store, &q);
        assert_eq!(part.count, 2);
        assert!((part.sum / part.count as f64 - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_ohlc_window_filtering() {
        let mut store = LocalStore::new();
        store.ingest(&[
            tick(0, 1, 9.0, 9.0, 1, 1),
            tick(10, 1, 10.0, 10.0, 1, 1),
            tick(20, 1, 11.0, 11.0, 1, 1),
            tick(30, 1, 8.0, 8.0, 1, 1),
        ]);

        let engine = QueryEngine::new();
        let q = Query::new(QueryType::Ohlc, 10, 20, 1);
        let part = engine.run(&store, &q);
        assert!(part.ohlc.is_set);
        assert_eq!(part.ohlc.open, 10.0);
        assert_eq!(part.ohlc.close, 11.0);
        assert_eq!(part.ohlc.high, 11.0);
        assert_eq!(part.ohlc.low, 10.0);
    }

    #[test]
    fn test_empty_result_has_count_zero_and_ohlc_unset() {
        let store = LocalStore::new();
        let engine = QueryEngine::new();

        let q = Query::new(QueryType::AvgSpread, 0, 100, 42);
        let part = engine.run(&store, &q);
        assert_eq!(part.count, 0);

        let q = Query::new(QueryType::Ohlc, 0, 100, 42);
        let part = engine.run(&store, &q);
        assert!(!part.ohlc.is_set);
    }

    #[test]
    fn test_ohlc_seeds_with_infinities_not_observed_when_unset() {
        let part = PartialResult::empty(QueryType::Ohlc);
        assert_eq!(part.ohlc.high, f64::NEG_INFINITY);
        assert_eq!(part.ohlc.low, f64::INFINITY);
        assert!(!part.ohlc.is_set);
    }
}

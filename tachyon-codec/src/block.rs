//! `CompressedBlock`: the storage atom of the tick store.
//!
//! A block owns an uncompressed header (the first tick's full values) and a
//! bit-packed payload covering ticks `1..N-1`, encoded with delta-of-delta
//! timestamps, XOR-coded prices, and varint sizes. See [`crate::scanner`]
//! for the inverse (decoding) side.

use tachyon_core::bitstream::BitWriter;
use tachyon_core::model::RawTick;

/// An immutable, compressed container of up to `num_ticks` ticks for one
/// symbol.
///
/// Built once by [`CompressedBlock::compress`] from a non-empty batch and
/// read-only thereafter; see [`crate::scanner::BlockScanner`] for decoding.
#[derive(Debug, Clone)]
pub struct CompressedBlock {
    /// Instrument all ticks in this block share.
    pub symbol_id: u32,
    /// Number of ticks encoded (including the header tick).
    pub num_ticks: u32,
    /// First tick's timestamp.
    pub start_timestamp: u64,
    /// Last tick's timestamp.
    pub end_timestamp: u64,
    /// First tick's timestamp, stored verbatim (equal to `start_timestamp`).
    pub first_timestamp: u64,
    /// First tick's bid price, stored verbatim.
    pub first_bid_price: f64,
    /// First tick's ask price, stored verbatim.
    pub first_ask_price: f64,
    /// First tick's bid size, stored verbatim.
    pub first_bid_size: u32,
    /// First tick's ask size, stored verbatim.
    pub first_ask_size: u32,
    payload: Vec<u8>,
}

impl CompressedBlock {
    /// Compresses `batch` into a block.
    ///
    /// Returns `None` for an empty batch (there is nothing to store); this
    /// is deliberately not an error — see the codec's empty-batch note in
    /// the workspace design doc.
    ///
    /// All ticks in `batch` must share `symbol_id` and be timestamp-ordered
    /// non-decreasing; this is a precondition checked with `debug_assert!`
    /// only, matching the store's documented "undefined results, not
    /// undefined behavior" contract for release builds.
    pub fn compress(batch: &[RawTick]) -> Option<Self> {
        let first = batch.first()?;
        let symbol_id = first.symbol_id;

        debug_assert!(
            batch.iter().all(|t| t.symbol_id == symbol_id),
            "all ticks in a batch must share symbol_id"
        );
        debug_assert!(
            batch.windows(2).all(|w| w[0].timestamp <= w[1].timestamp),
            "ticks in a batch must be timestamp-ordered"
        );

        let mut writer = BitWriter::with_capacity(batch.len() * 12);

        let mut prev_ts = first.timestamp;
        let mut prev_delta: i64 = 0;
        let mut prev_bid_bits = first.bid_price.to_bits();
        let mut prev_ask_bits = first.ask_price.to_bits();

        for (i, tick) in batch.iter().enumerate().skip(1) {
            let delta = tick.timestamp - prev_ts;
            if i == 1 {
                encode_first_delta(&mut writer, delta);
            } else {
                let dd = delta as i64 - prev_delta;
                encode_delta_of_delta(&mut writer, dd, delta);
            }
            prev_delta = delta as i64;
            prev_ts = tick.timestamp;

            let bid_bits = tick.bid_price.to_bits();
            encode_price_xor(&mut writer, prev_bid_bits ^ bid_bits);
            prev_bid_bits = bid_bits;

            let ask_bits = tick.ask_price.to_bits();
            encode_price_xor(&mut writer, prev_ask_bits ^ ask_bits);
            prev_ask_bits = ask_bits;

            write_varint(&mut writer, tick.bid_size);
            write_varint(&mut writer, tick.ask_size);
        }

        Some(Self {
            symbol_id,
            num_ticks: batch.len() as u32,
            start_timestamp: first.timestamp,
            end_timestamp: batch.last().map(|t| t.timestamp).unwrap_or(first.timestamp),
            first_timestamp: first.timestamp,
            first_bid_price: first.bid_price,
            first_ask_price: first.ask_price,
            first_bid_size: first.bid_size,
            first_ask_size: first.ask_size,
            payload: writer.into_buffer(),
        })
    }

    /// Whether `[self.start_timestamp, self.end_timestamp]` overlaps
    /// `[t_lo, t_hi]`.
    pub fn overlaps(&self, t_lo: u64, t_hi: u64) -> bool {
        self.start_timestamp <= t_hi && self.end_timestamp >= t_lo
    }

    /// The block's bit-packed payload, covering ticks `1..num_ticks`.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// Writes `δ₁`, the first inter-tick delta, with its 3-case prefix.
fn encode_first_delta(w: &mut BitWriter, delta: u64) {
    const INFALLIBLE: &str = "bit width is a fixed in-range constant";
    if delta < (1 << 7) {
        w.write_bit(false);
        w.write_bits(delta, 7).expect(INFALLIBLE);
    } else if delta < (1 << 14) {
        w.write_bits(0b10, 2).expect(INFALLIBLE);
        w.write_bits(delta, 14).expect(INFALLIBLE);
    } else {
        w.write_bits(0b11, 2).expect(INFALLIBLE);
        w.write_bits(delta, 32).expect(INFALLIBLE);
    }
}

/// Writes `ddᵢ = δᵢ − δᵢ₋₁` with its 5-case prefix; the `1111` case stores
/// `delta` itself (not `dd`), per the wire format.
fn encode_delta_of_delta(w: &mut BitWriter, dd: i64, delta: u64) {
    const INFALLIBLE: &str = "bit width is a fixed in-range constant";
    if dd == 0 {
        w.write_bit(false);
    } else if (-63..=64).contains(&dd) {
        w.write_bits(0b10, 2).expect(INFALLIBLE);
        w.write_bits((dd as u64) & mask(7), 7).expect(INFALLIBLE);
    } else if (-255..=256).contains(&dd) {
        w.write_bits(0b110, 3).expect(INFALLIBLE);
        w.write_bits((dd as u64) & mask(9), 9).expect(INFALLIBLE);
    } else if (-2047..=2048).contains(&dd) {
        w.write_bits(0b1110, 4).expect(INFALLIBLE);
        w.write_bits((dd as u64) & mask(12), 12).expect(INFALLIBLE);
    } else {
        w.write_bits(0b1111, 4).expect(INFALLIBLE);
        w.write_bits(delta, 32).expect(INFALLIBLE);
    }
}

/// Writes one price column's XOR control bit and, if changed, the 64-bit
/// XOR literal.
fn encode_price_xor(w: &mut BitWriter, xor: u64) {
    if xor == 0 {
        w.write_bit(false);
    } else {
        w.write_bit(true);
        w.write_bits(xor, 64)
            .expect("bit width is a fixed in-range constant");
    }
}

/// Writes `value` as a LEB128-style varint: 7 payload bits per byte, high
/// bit set on every byte but the last, least-significant group first.
fn write_varint(w: &mut BitWriter, mut value: u32) {
    loop {
        let byte = (value & 0x7F) as u64;
        value >>= 7;
        if value == 0 {
            w.write_bits(byte, 8).expect("byte width is always 8");
            break;
        }
        w.write_bits(byte | 0x80, 8).expect("byte width is always 8");
    }
}

#[inline]
fn mask(n: u32) -> u64 {
    (1u64 << n) - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(ts: u64, sym: u32, bid: f64, ask: f64, bs: u32, asz: u32) -> RawTick {
        RawTick::new(ts, sym, bid, ask, bs, asz)
    }

    #[test]
    fn test_empty_batch_returns_none() {
        assert!(CompressedBlock::compress(&[]).is_none());
    }

    #[test]
    fn test_single_tick_block_has_empty_payload() {
        let batch = vec![tick(1000, 7, 10.0, 10.02, 1, 2)];
        let block = CompressedBlock::compress(&batch).unwrap();
        assert_eq!(block.num_ticks, 1);
        assert!(block.payload().is_empty());
        assert_eq!(block.start_timestamp, block.end_timestamp);
    }

    #[test]
    fn test_header_matches_first_tick() {
        let batch = vec![
            tick(1000, 3, 10.0, 10.02, 1, 2),
            tick(1100, 3, 10.0, 10.02, 1, 2),
        ];
        let block = CompressedBlock::compress(&batch).unwrap();
        assert_eq!(block.symbol_id, 3);
        assert_eq!(block.first_timestamp, 1000);
        assert_eq!(block.first_bid_price, 10.0);
        assert_eq!(block.first_ask_price, 10.02);
        assert_eq!(block.first_bid_size, 1);
        assert_eq!(block.first_ask_size, 2);
        assert_eq!(block.end_timestamp, 1100);
    }

    #[test]
    fn test_overlaps() {
        let batch = vec![tick(100, 0, 1.0, 1.0, 0, 0), tick(200, 0, 1.0, 1.0, 0, 0)];
        let block = CompressedBlock::compress(&batch).unwrap();
        assert!(block.overlaps(150, 250));
        assert!(block.overlaps(0, 100));
        assert!(block.overlaps(200, 300));
        assert!(!block.overlaps(201, 300));
        assert!(!block.overlaps(0, 99));
    }
}

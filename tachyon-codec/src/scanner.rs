//! `BlockScanner`: the forward-only inverse of [`crate::block::CompressedBlock::compress`].

use tachyon_core::bitstream::BitReader;
use tachyon_core::model::RawTick;

use crate::block::CompressedBlock;
use crate::error::{CodecError, Result};

/// Outcome of decoding one delta-of-delta field: either a signed `dd` to
/// fold onto the running delta, or (the `1111` bucket) the full inter-tick
/// delta stored verbatim.
enum DeltaStep {
    Dod(i64),
    Delta(u64),
}

/// A forward-only cursor over a block's payload.
///
/// Yields tick 0 (the header's first values) verbatim, then decodes
/// ticks `1..num_ticks` by inverting the delta-of-delta/XOR/varint
/// schemes `compress` wrote. Also usable as an
/// `Iterator<Item = Result<RawTick>>` for ergonomic consumption by the
/// query engine.
pub struct BlockScanner<'a> {
    block: &'a CompressedBlock,
    reader: BitReader<'a>,
    index: u32,
    prev_ts: u64,
    prev_delta: i64,
    prev_bid_bits: u64,
    prev_ask_bits: u64,
}

impl<'a> BlockScanner<'a> {
    /// Creates a scanner positioned before tick 0 of `block`.
    pub fn new(block: &'a CompressedBlock) -> Self {
        Self {
            block,
            reader: BitReader::new(block.payload()),
            index: 0,
            prev_ts: block.first_timestamp,
            prev_delta: 0,
            prev_bid_bits: block.first_bid_price.to_bits(),
            prev_ask_bits: block.first_ask_price.to_bits(),
        }
    }

    /// Whether a further call to [`Self::next_tick`] would yield a tick
    /// rather than fail with [`CodecError::Overrun`].
    pub fn has_next(&self) -> bool {
        self.index < self.block.num_ticks
    }

    /// Decodes and returns the next tick.
    ///
    /// Fails with [`CodecError::Overrun`] if called after [`Self::has_next`]
    /// has returned `false`, with [`CodecError::UnexpectedEnd`] if the
    /// payload runs out mid-field.
    pub fn next_tick(&mut self) -> Result<RawTick> {
        if !self.has_next() {
            return Err(CodecError::Overrun {
                num_ticks: self.block.num_ticks,
            });
        }

        if self.index == 0 {
            self.index = 1;
            return Ok(RawTick::new(
                self.block.first_timestamp,
                self.block.symbol_id,
                self.block.first_bid_price,
                self.block.first_ask_price,
                self.block.first_bid_size,
                self.block.first_ask_size,
            ));
        }

        let delta = if self.index == 1 {
            decode_first_delta(&mut self.reader)?
        } else {
            match decode_delta_of_delta(&mut self.reader)? {
                DeltaStep::Dod(dd) => (self.prev_delta + dd) as u64,
                DeltaStep::Delta(d) => d,
            }
        };
        self.prev_delta = delta as i64;
        self.prev_ts += delta;

        let bid_xor = decode_price_xor(&mut self.reader)?;
        self.prev_bid_bits ^= bid_xor;

        let ask_xor = decode_price_xor(&mut self.reader)?;
        self.prev_ask_bits ^= ask_xor;

        let bid_size = read_varint(&mut self.reader)?;
        let ask_size = read_varint(&mut self.reader)?;

        self.index += 1;

        Ok(RawTick::new(
            self.prev_ts,
            self.block.symbol_id,
            f64::from_bits(self.prev_bid_bits),
            f64::from_bits(self.prev_ask_bits),
            bid_size,
            ask_size,
        ))
    }
}

impl<'a> Iterator for BlockScanner<'a> {
    type Item = Result<RawTick>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        Some(self.next_tick())
    }
}

fn decode_first_delta(r: &mut BitReader<'_>) -> Result<u64> {
    if !r.read_bit()? {
        Ok(r.read_bits(7)?)
    } else if !r.read_bit()? {
        Ok(r.read_bits(14)?)
    } else {
        Ok(r.read_bits(32)?)
    }
}

fn decode_delta_of_delta(r: &mut BitReader<'_>) -> Result<DeltaStep> {
    if !r.read_bit()? {
        return Ok(DeltaStep::Dod(0));
    }
    if !r.read_bit()? {
        let raw = r.read_bits(7)?;
        return Ok(DeltaStep::Dod(sign_extend(raw, 7)));
    }
    if !r.read_bit()? {
        let raw = r.read_bits(9)?;
        return Ok(DeltaStep::Dod(sign_extend(raw, 9)));
    }
    if !r.read_bit()? {
        let raw = r.read_bits(12)?;
        return Ok(DeltaStep::Dod(sign_extend(raw, 12)));
    }
    let raw = r.read_bits(32)?;
    Ok(DeltaStep::Delta(raw))
}

fn decode_price_xor(r: &mut BitReader<'_>) -> Result<u64> {
    if !r.read_bit()? {
        Ok(0)
    } else {
        Ok(r.read_bits(64)?)
    }
}

fn read_varint(r: &mut BitReader<'_>) -> Result<u32> {
    let mut value: u32 = 0;
    let mut shift = 0u32;
    loop {
        let byte = r.read_bits(8)? as u8;
        value |= ((byte & 0x7F) as u32) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
    }
    Ok(value)
}

/// Sign-extends an `n`-bit two's-complement value stored in a `u64`.
#[inline]
fn sign_extend(value: u64, bits: u32) -> i64 {
    let shift = 64 - bits;
    ((value << shift) as i64) >> shift
}

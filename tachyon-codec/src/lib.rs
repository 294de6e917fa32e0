//! # Tachyon Codec
//!
//! The Gorilla-style block codec: [`block::CompressedBlock::compress`]
//! packs a batch of ticks into delta-of-delta timestamps, XOR-coded prices,
//! and varint sizes; [`scanner::BlockScanner`] is its forward-only inverse.
//!
//! ```rust
//! use tachyon_codec::block::CompressedBlock;
//! use tachyon_codec::scanner::BlockScanner;
//! use tachyon_core::model::RawTick;
//!
//! let batch = vec![
//!     RawTick::new(1_000, 7, 10.0, 10.02, 5, 6),
//!     RawTick::new(1_060, 7, 10.01, 10.03, 4, 7),
//! ];
//! let block = CompressedBlock::compress(&batch).unwrap();
//! let decoded: Result<Vec<_>, _> = BlockScanner::new(&block).collect();
//! assert_eq!(decoded.unwrap(), batch);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod block;
pub mod error;
pub mod scanner;

pub use block::CompressedBlock;
pub use error::{CodecError, Result};
pub use scanner::BlockScanner;

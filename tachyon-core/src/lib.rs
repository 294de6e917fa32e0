//! # Tachyon Core
//!
//! Foundational types shared by every crate in the Tachyon workspace.
//!
//! - [`bitstream`]: MSB-first bit-level I/O used by the block codec's
//!   variable-length encodings
//! - [`model`]: the shared data model — `RawTick`, `Query`, `PartialResult`
//! - [`error`]: error types for this crate
//!
//! ## Architecture
//!
//! Tachyon is organized as a pipeline of crates, each owning one layer:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L5: tachyon-cli                                         │
//! │     Command-line driver, synthetic tick generation      │
//! ├─────────────────────────────────────────────────────────┤
//! │ L4: tachyon-cluster                                     │
//! │     Coordinator/worker scatter/gather, Transport trait  │
//! ├─────────────────────────────────────────────────────────┤
//! │ L3: tachyon-query                                        │
//! │     AVG_SPREAD / VWAP / OHLC aggregation                 │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: tachyon-store                                        │
//! │     LocalStore: per-symbol block index, range pruning    │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: tachyon-codec                                        │
//! │     CompressedBlock: delta-of-delta + XOR codec          │
//! ├─────────────────────────────────────────────────────────┤
//! │ L0: tachyon-core (this crate)                            │
//! │     BitReader/BitWriter, RawTick, Query, PartialResult   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use tachyon_core::bitstream::{BitReader, BitWriter};
//! use tachyon_core::model::RawTick;
//!
//! let mut w = BitWriter::new();
//! w.write_bits(0x2A, 7).unwrap();
//! let bytes = w.into_buffer();
//! let mut r = BitReader::new(&bytes);
//! assert_eq!(r.read_bits(7).unwrap(), 0x2A);
//!
//! let tick = RawTick::new(1_000, 0, 100.0, 100.02, 5, 7);
//! assert_eq!(tick.mid_price(), 100.01);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitstream;
pub mod error;
pub mod model;

// Re-exports for convenience
pub use bitstream::{BitReader, BitWriter};
pub use error::{CoreError, Result};
pub use model::{OhlcState, PartialResult, Query, QueryType, RawTick};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitstream::{BitReader, BitWriter};
    pub use crate::error::{CoreError, Result};
    pub use crate::model::{OhlcState, PartialResult, Query, QueryType, RawTick};
}

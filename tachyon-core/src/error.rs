//! Error types shared by every crate in the Tachyon workspace.
//!
//! Each downstream crate defines its own narrower error enum and converts
//! into or wraps this one where the failure genuinely originates in
//! `tachyon-core` (bit I/O). See each crate's `error` module for the rest of
//! the error kinds listed in the design's error-handling table.

use thiserror::Error;

/// Errors raised by [`crate::bitstream::BitWriter`] and
/// [`crate::bitstream::BitReader`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    /// A bit width outside `1..=64` was requested.
    #[error("invalid bit width: {width} (must be in 1..=64)")]
    InvalidWidth {
        /// The offending width.
        width: u32,
    },

    /// The reader ran out of bits before satisfying a `read_bits` call.
    #[error("end of buffer: needed {needed} more bits, {available} available")]
    EndOfBuffer {
        /// Bits requested.
        needed: u32,
        /// Bits actually remaining.
        available: u64,
    },
}

/// Result type alias for `tachyon-core` operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Build an [`CoreError::InvalidWidth`].
    pub fn invalid_width(width: u32) -> Self {
        Self::InvalidWidth { width }
    }

    /// Build an [`CoreError::EndOfBuffer`].
    pub fn end_of_buffer(needed: u32, available: u64) -> Self {
        Self::EndOfBuffer { needed, available }
    }
}

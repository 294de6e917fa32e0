//! Errors raised while decoding a [`crate::block::CompressedBlock`].

use thiserror::Error;

/// Failure modes of [`crate::scanner::BlockScanner`].
///
/// A well-formed block (one produced by [`crate::block::CompressedBlock::compress`])
/// never triggers any of these; they exist to turn buffer corruption into a
/// diagnosable error instead of a panic.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// The underlying bit buffer ran out before a field could be read.
    #[error("unexpected end of block payload: {0}")]
    UnexpectedEnd(#[from] tachyon_core::error::CoreError),

    /// A prefix code did not match any of the scheme's defined cases. This
    /// cannot happen for a payload produced by this crate's encoder; it
    /// indicates the block's bytes were corrupted or truncated.
    #[error("impossible prefix code while decoding block payload")]
    ImpossiblePrefix,

    /// The scanner was advanced past the block's declared `num_ticks`.
    #[error("scanner advanced past declared tick count {num_ticks}")]
    Overrun {
        /// The block's declared tick count.
        num_ticks: u32,
    },
}

/// Result type alias for `tachyon-codec` operations.
pub type Result<T> = std::result::Result<T, CodecError>;

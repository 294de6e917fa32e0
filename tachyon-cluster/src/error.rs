//! Errors raised by the scatter/gather protocol.

use tachyon_core::model::QueryType;
use thiserror::Error;

/// Failure modes of the coordinator/worker protocol.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClusterError {
    /// A gathered `PART` carried a different query type than the one
    /// broadcast. Fatal for the in-flight query; aggregation is aborted.
    #[error("partial result type {actual:?} does not match query type {expected:?}")]
    TypeMismatch {
        /// The type the coordinator broadcast.
        expected: QueryType,
        /// The type the mismatched partial actually carried.
        actual: QueryType,
    },

    /// The transport could not deliver or receive a message (e.g. a
    /// disconnected channel). Fatal process-wide — this binding's closest
    /// analogue to a lost worker/process.
    #[error("transport failure: {0}")]
    TransportFailure(String),
}

/// Result type alias for `tachyon-cluster` operations.
pub type Result<T> = std::result::Result<T, ClusterError>;

impl ClusterError {
    /// Builds a [`ClusterError::TypeMismatch`].
    pub fn type_mismatch(expected: QueryType, actual: QueryType) -> Self {
        Self::TypeMismatch { expected, actual }
    }

    /// Builds a [`ClusterError::TransportFailure`].
    pub fn transport_failure(detail: impl Into<String>) -> Self {
        Self::TransportFailure(detail.into())
    }
}

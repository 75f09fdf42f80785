//! Unified error types for hypercube operations
//!
//! Every fallible call in the workspace reports one of five kinds of failure:
//!
//! - **Dimensionality**: accessor/roll/index counts or bound dimensions that do
//!   not line up with the cube being addressed
//! - **Index out of range**: an axis index or flat offset outside its bounds
//! - **Invalid argument**: malformed buffer bounds, bad slice ranges, bad
//!   configuration values
//! - **Null argument**: a required buffer was empty
//! - **Unsupported operation**: e.g. writing through a read-only view
//!
//! All failures are raised synchronously at the offending call; nothing is
//! retried or swallowed.
//!
//! # Examples
//!
//! ```
//! use hypercube_core::error::{ErrorKind, HypercubeError};
//!
//! let err = HypercubeError::offset_out_of_range(10, 6);
//! assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
//! assert_eq!(err.to_string(), "Offset 10 out of range for cube of size 6");
//! ```

use thiserror::Error;

/// Top-level error type for all hypercube operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HypercubeError {
    /// Count or identity mismatch between accessors and dimensions
    #[error("Dimensionality mismatch: {reason}")]
    Dimensionality { reason: String },

    /// An index along a specific axis was out of bounds
    #[error("Index {index} out of range for axis {axis} of length {length}")]
    AxisIndexOutOfRange { axis: usize, index: u64, length: u64 },

    /// An index was outside a dimension, independent of any axis position
    #[error("Index {index} out of range for dimension of length {length}")]
    IndexOutOfRange { index: u64, length: u64 },

    /// A flat offset was outside `[0, size)`
    #[error("Offset {offset} out of range for cube of size {size}")]
    OffsetOutOfRange { offset: u64, size: u64 },

    /// Malformed argument (buffer bounds, slice ranges, configuration)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A required buffer or argument was missing
    #[error("Missing argument: {0}")]
    NullArgument(String),

    /// The operation is not supported by this cube
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

/// Coarse classification of a [`HypercubeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Dimensionality,
    IndexOutOfRange,
    InvalidArgument,
    NullArgument,
    UnsupportedOperation,
}

/// Result type alias for hypercube operations
pub type HypercubeResult<T> = Result<T, HypercubeError>;

impl HypercubeError {
    /// Which of the five failure kinds this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            HypercubeError::Dimensionality { .. } => ErrorKind::Dimensionality,
            HypercubeError::AxisIndexOutOfRange { .. }
            | HypercubeError::IndexOutOfRange { .. }
            | HypercubeError::OffsetOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            HypercubeError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            HypercubeError::NullArgument(_) => ErrorKind::NullArgument,
            HypercubeError::UnsupportedOperation(_) => ErrorKind::UnsupportedOperation,
        }
    }

    /// Create a dimensionality error with a message
    pub fn dimensionality(reason: impl Into<String>) -> Self {
        HypercubeError::Dimensionality {
            reason: reason.into(),
        }
    }

    /// Create an axis index out of range error
    pub fn axis_out_of_range(axis: usize, index: u64, length: u64) -> Self {
        HypercubeError::AxisIndexOutOfRange {
            axis,
            index,
            length,
        }
    }

    /// Create a flat offset out of range error
    pub fn offset_out_of_range(offset: u64, size: u64) -> Self {
        HypercubeError::OffsetOutOfRange { offset, size }
    }

    /// Create an invalid argument error with a message
    pub fn invalid(msg: impl Into<String>) -> Self {
        HypercubeError::InvalidArgument(msg.into())
    }

    /// Create a null argument error with a message
    pub fn null(msg: impl Into<String>) -> Self {
        HypercubeError::NullArgument(msg.into())
    }

    /// Create an unsupported operation error with a message
    pub fn unsupported(msg: impl Into<String>) -> Self {
        HypercubeError::UnsupportedOperation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_index_error_message() {
        let err = HypercubeError::axis_out_of_range(1, 7, 3);
        assert_eq!(
            err.to_string(),
            "Index 7 out of range for axis 1 of length 3"
        );
        assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            HypercubeError::dimensionality("x").kind(),
            ErrorKind::Dimensionality
        );
        assert_eq!(HypercubeError::invalid("x").kind(), ErrorKind::InvalidArgument);
        assert_eq!(HypercubeError::null("x").kind(), ErrorKind::NullArgument);
        assert_eq!(
            HypercubeError::unsupported("x").kind(),
            ErrorKind::UnsupportedOperation
        );
    }

    #[test]
    fn test_dimensionality_message() {
        let err = HypercubeError::dimensionality("expected 2 indices, got 3");
        assert_eq!(
            err.to_string(),
            "Dimensionality mismatch: expected 2 indices, got 3"
        );
    }
}

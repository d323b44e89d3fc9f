//! Error types for sparse containers, tensor arithmetic and hierarchy I/O.

use thiserror::Error;

/// Result type alias for sparsetensor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sparsetensor operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Explicit index outside the valid range
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The offending index
        index: usize,
        /// The size of the indexed dimension
        size: usize,
    },

    /// Incompatible structures for an operation
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected structure
        expected: Vec<usize>,
        /// Actual structure
        got: Vec<usize>,
    },

    /// Axis outside the rank of a tensor
    #[error("Invalid dimension {dim} for tensor with {ndim} dimensions")]
    InvalidDimension {
        /// The requested axis
        dim: usize,
        /// The tensor rank
        ndim: usize,
    },

    /// Malformed bracket text
    #[error("Parse error at byte {position}: {reason}")]
    Parse {
        /// Byte offset in the input
        position: usize,
        /// What went wrong
        reason: String,
    },

    /// Division by the zero element of an algebra without an inverse there
    #[error("Division by zero")]
    DivisionByZero,

    /// Exact result not representable in the element type
    #[error("Arithmetic overflow in '{op}'")]
    Overflow {
        /// Operation name
        op: &'static str,
    },

    /// Operation invoked on an algebra that does not implement it
    #[error("Operation '{op}' is not supported by algebra {algebra}")]
    NotSupported {
        /// Operation name
        op: &'static str,
        /// Algebra name
        algebra: &'static str,
    },

    /// Invalid argument to a structural operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// Argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Reading or writing an exchange stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a shape mismatch error from two structures.
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Error::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    pub(crate) fn parse(position: usize, reason: impl Into<String>) -> Self {
        Error::Parse {
            position,
            reason: reason.into(),
        }
    }
}

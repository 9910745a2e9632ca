//! Error types for dcast

use crate::dtype::{DType, DTypeSet};
use thiserror::Error;

/// Result type alias using dcast's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable, data-dependent failures
///
/// Contract violations (touching an undefined tensor handle) are not part of
/// this enum; they panic instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No direct or two-hop cast path exists for the pair
    #[error("Can not cast from {src} to {dst}")]
    UnsupportedCast {
        /// Source dtype
        src: DType,
        /// Destination dtype
        dst: DType,
    },

    /// The operator's supported set misses every dtype of the precedence list
    #[error("operator supports none of bool, int8, int16, int32, float16, float32 (supported: {supported:?})")]
    UnsupportedOperatorDTypes {
        /// The operator's declared supported dtypes
        supported: DTypeSet,
    },

    /// None of the operand dtypes falls into a promotion category
    #[error("tensor's dtype error, can't be cast (present: {present:?})")]
    UncastableDTypes {
        /// Distinct dtypes found among the operands
        present: DTypeSet,
    },

    /// Shape mismatch between source and destination
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<i64>,
        /// Actual shape
        got: Vec<i64>,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Scoped pool exhausted
    #[error("Out of memory: failed to allocate {size} bytes")]
    OutOfMemory {
        /// Requested size in bytes
        size: usize,
    },

    /// Runtime or kernel library error
    #[error("Backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[i64], got: &[i64]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create an unsupported cast error
    pub fn unsupported_cast(src: DType, dst: DType) -> Self {
        Self::UnsupportedCast { src, dst }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_cast_names_both_types() {
        let err = Error::unsupported_cast(DType::U16, DType::Bool);
        assert_eq!(err.to_string(), "Can not cast from u16 to bool");
    }

    #[test]
    fn test_shape_mismatch_message() {
        let err = Error::shape_mismatch(&[2, 3], &[3, 2]);
        assert_eq!(err.to_string(), "Shape mismatch: expected [2, 3], got [3, 2]");
    }
}

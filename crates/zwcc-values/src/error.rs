//! Value error types.

use thiserror::Error;

use crate::{ValueId, ValueType};

/// Errors raised when reading or mutating a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The data does not match the value's declared type.
    #[error("type mismatch on {id}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The value being written.
        id: ValueId,
        /// The value's declared type.
        expected: ValueType,
        /// The type of the supplied data.
        actual: ValueType,
    },

    /// The data lies outside the value's bounds.
    #[error("{value} out of range for {id}: allowed {min}..={max}")]
    OutOfRange {
        /// The value being written.
        id: ValueId,
        /// The rejected number.
        value: i64,
        /// Lower bound.
        min: i64,
        /// Upper bound.
        max: i64,
    },

    /// The value is read-only and cannot be set by the application.
    #[error("{0} is read-only")]
    ReadOnly(ValueId),
}

/// Result type alias for value operations.
pub type ValueResult<T> = Result<T, ValueError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let id = ValueId::new(0xC0FFEE, 5, 1, 0x2D, 4);
        let err = ValueError::TypeMismatch {
            id,
            expected: ValueType::Byte,
            actual: ValueType::Bool,
        };
        let text = err.to_string();
        assert!(text.contains("expected byte"));
        assert!(text.contains("got bool"));

        let err = ValueError::OutOfRange {
            id,
            value: 300,
            min: 0,
            max: 255,
        };
        assert!(err.to_string().contains("300 out of range"));
    }
}

//! Command-class error types.

use thiserror::Error;
use zwcc_protocol::ProtocolError;
use zwcc_values::{ValueError, ValueId, ValueType};

use crate::RequestFlags;

/// Errors returned by command-class operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandClassError {
    /// The node does not advertise the command; nothing was sent.
    #[error("node {node_id} does not support command 0x{command:02X} of class 0x{command_class:02X}")]
    Unsupported {
        /// Target node.
        node_id: u8,
        /// Command class id.
        command_class: u8,
        /// Command code.
        command: u8,
    },

    /// A value the operation needs has not been created.
    #[error("unknown value {0}")]
    UnknownValue(ValueId),

    /// The value's type is not one this command class handles.
    #[error("type mismatch on {id}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The value being written.
        id: ValueId,
        /// The type the class expects.
        expected: ValueType,
        /// The value's type.
        actual: ValueType,
    },

    /// An inbound frame failed to decode.
    #[error("malformed frame for class 0x{command_class:02X}: {source}")]
    Malformed {
        /// Command class id.
        command_class: u8,
        /// The decode failure.
        #[source]
        source: ProtocolError,
    },

    /// An outbound frame could not be encoded.
    #[error("failed to encode frame: {0}")]
    Encode(#[source] ProtocolError),

    /// The class has nothing to refresh for these flags.
    #[error("class 0x{command_class:02X} has no state for request flags {flags}")]
    UnsupportedRequestFlags {
        /// Command class id.
        command_class: u8,
        /// The requested flags.
        flags: RequestFlags,
    },

    /// Some of a batch of requests failed; the rest were still sent.
    #[error("{failed} of {attempted} requests failed")]
    Partial {
        /// Requests that failed.
        failed: usize,
        /// Requests attempted.
        attempted: usize,
    },

    /// The application write was refused by the value itself.
    #[error(transparent)]
    Value(#[from] ValueError),

    /// No handler for this command class is registered on the node.
    #[error("node {node_id} has no handler for class 0x{command_class:02X}")]
    UnknownCommandClass {
        /// Target node.
        node_id: u8,
        /// Command class id.
        command_class: u8,
    },
}

impl CommandClassError {
    /// Create a malformed-frame error.
    pub fn malformed(command_class: u8, source: ProtocolError) -> Self {
        Self::Malformed {
            command_class,
            source,
        }
    }

    /// Whether the application tried to write a read-only value.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::Value(ValueError::ReadOnly(_)))
    }

    /// Whether the application supplied data outside the value's bounds.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::Value(ValueError::OutOfRange { .. }))
    }
}

/// Result type alias for command-class operations.
pub type CommandResult<T> = Result<T, CommandClassError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CommandClassError::Unsupported {
            node_id: 5,
            command_class: 0x2D,
            command: 0x02,
        };
        assert_eq!(
            err.to_string(),
            "node 5 does not support command 0x02 of class 0x2D"
        );

        let err = CommandClassError::malformed(0x2D, ProtocolError::too_short(4, 2));
        assert!(err.to_string().starts_with("malformed frame for class 0x2D"));

        let err = CommandClassError::Partial {
            failed: 1,
            attempted: 3,
        };
        assert_eq!(err.to_string(), "1 of 3 requests failed");
    }

    #[test]
    fn test_value_error_classification() {
        let id = ValueId::new(1, 5, 1, 0x2D, 2);
        let err: CommandClassError = ValueError::ReadOnly(id).into();
        assert!(err.is_read_only());
        assert!(!err.is_out_of_range());

        let err: CommandClassError = ValueError::OutOfRange {
            id,
            value: 256,
            min: 0,
            max: 255,
        }
        .into();
        assert!(err.is_out_of_range());
    }
}

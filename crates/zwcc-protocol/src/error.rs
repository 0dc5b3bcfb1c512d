//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when encoding or decoding frames.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame is too short to be valid.
    #[error("frame too short: expected at least {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Expected minimum length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// Payload does not fit in a single frame.
    #[error("payload too long: maximum {max} bytes, got {actual}")]
    PayloadTooLong {
        /// Maximum allowed length.
        max: usize,
        /// Actual payload length.
        actual: usize,
    },

    /// The length byte disagrees with the bytes present.
    #[error("length mismatch: header says {declared} bytes, frame carries {actual}")]
    LengthMismatch {
        /// Length announced in the frame.
        declared: usize,
        /// Bytes actually present.
        actual: usize,
    },

    /// Command code not known for this command class.
    #[error("unknown command 0x{command:02X} for command class 0x{command_class:02X}")]
    UnknownCommand {
        /// Command class id.
        command_class: u8,
        /// Command code.
        command: u8,
    },

    /// Command class this crate has no encoding for.
    #[error("unknown command class 0x{0:02X}")]
    UnknownCommandClass(u8),
}

impl ProtocolError {
    /// Shorthand for a [`ProtocolError::FrameTooShort`].
    pub fn too_short(expected: usize, actual: usize) -> Self {
        ProtocolError::FrameTooShort { expected, actual }
    }

    /// Whether the error only means "not a command this decoder knows".
    ///
    /// Such frames are not malformed; another layer may still understand them.
    pub fn is_unrecognized(&self) -> bool {
        matches!(
            self,
            ProtocolError::UnknownCommand { .. } | ProtocolError::UnknownCommandClass(_)
        )
    }
}

/// Result type alias for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProtocolError::too_short(4, 2);
        assert_eq!(err.to_string(), "frame too short: expected at least 4 bytes, got 2");

        let err = ProtocolError::UnknownCommand {
            command_class: 0x2D,
            command: 0x07,
        };
        assert_eq!(err.to_string(), "unknown command 0x07 for command class 0x2D");
    }

    #[test]
    fn test_is_unrecognized() {
        assert!(ProtocolError::UnknownCommandClass(0x99).is_unrecognized());
        assert!(!ProtocolError::too_short(4, 1).is_unrecognized());
    }
}

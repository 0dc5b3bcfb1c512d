//! Inbound application-command frames.

use bytes::BufMut;

use crate::error::*;

/// Header bytes before the command-class payload (source node, length).
pub const INBOUND_HEADER_SIZE: usize = 2;

/// A command-class payload received from a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundFrame {
    /// Node the frame came from.
    pub source_node: u8,
    /// Command class id.
    pub command_class_id: u8,
    /// Command code followed by its params.
    pub payload: Vec<u8>,
}

impl InboundFrame {
    /// Create an inbound frame.
    pub fn new(source_node: u8, command_class_id: u8, payload: Vec<u8>) -> Self {
        Self {
            source_node,
            command_class_id,
            payload,
        }
    }

    /// Decode `[source][len][class id][command][params...]`.
    ///
    /// The length byte must cover exactly the bytes after it.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        if bytes.len() < INBOUND_HEADER_SIZE + 1 {
            return Err(ProtocolError::too_short(INBOUND_HEADER_SIZE + 1, bytes.len()));
        }
        let declared = bytes[1] as usize;
        let actual = bytes.len() - INBOUND_HEADER_SIZE;
        if declared != actual {
            return Err(ProtocolError::LengthMismatch { declared, actual });
        }
        if declared == 0 {
            return Err(ProtocolError::too_short(INBOUND_HEADER_SIZE + 1, INBOUND_HEADER_SIZE));
        }

        Ok(Self {
            source_node: bytes[0],
            command_class_id: bytes[2],
            payload: bytes[3..].to_vec(),
        })
    }

    /// Encode to wire bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(INBOUND_HEADER_SIZE + 1 + self.payload.len());
        buf.put_u8(self.source_node);
        buf.put_u8((1 + self.payload.len()) as u8);
        buf.put_u8(self.command_class_id);
        buf.put_slice(&self.payload);
        buf
    }

    /// The command code, if the payload carries one.
    pub fn command(&self) -> Option<u8> {
        self.payload.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_report() {
        let frame = InboundFrame::decode(&[5, 5, 0x2D, 0x03, 2, 5, 10]).unwrap();
        assert_eq!(frame.source_node, 5);
        assert_eq!(frame.command_class_id, 0x2D);
        assert_eq!(frame.payload, vec![0x03, 2, 5, 10]);
        assert_eq!(frame.command(), Some(0x03));
    }

    #[test]
    fn test_decode_rejects_bad_length() {
        assert_eq!(
            InboundFrame::decode(&[5, 9, 0x2D, 0x03]),
            Err(ProtocolError::LengthMismatch {
                declared: 9,
                actual: 2
            })
        );
        assert!(matches!(
            InboundFrame::decode(&[5]),
            Err(ProtocolError::FrameTooShort { .. })
        ));
    }

    #[test]
    fn test_encode_matches_decode_layout() {
        let frame = InboundFrame::new(3, 0x20, vec![0x03, 0xFF]);
        assert_eq!(frame.encode(), vec![3, 3, 0x20, 0x03, 0xFF]);
    }

    #[test]
    fn test_class_only_frame_has_no_command() {
        let frame = InboundFrame::decode(&[3, 1, 0x20]).unwrap();
        assert!(frame.payload.is_empty());
        assert_eq!(frame.command(), None);
    }
}

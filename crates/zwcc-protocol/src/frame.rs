//! Outbound frame encoding.
//!
//! Every request a command class sends is wrapped the same way:
//!
//! ```text
//! [destination node][payload length][class id][command][params...][tx options]
//! ```
//!
//! The length byte counts the class id through the last param. The trailing
//! options byte is transport metadata and is not counted.

use bytes::BufMut;

use crate::constants::*;
use crate::error::*;
use crate::queue::TransmitOptions;

/// Smallest outbound frame: node, length, class id, command, options.
pub const MIN_FRAME_SIZE: usize = FRAME_OVERHEAD + 2;

/// A fully encoded outbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    name: &'static str,
    instance: u8,
    expected_reply: Option<u8>,
    bytes: Vec<u8>,
}

impl Frame {
    /// Start building a frame for a command of a command class.
    pub fn builder(name: &'static str, node_id: u8, command_class_id: u8, command: u8) -> FrameBuilder {
        FrameBuilder {
            name,
            node_id,
            instance: 1,
            command_class_id,
            command,
            params: Vec::new(),
            expected_reply: None,
        }
    }

    /// Parse raw outbound bytes, checking the length byte.
    pub fn parse(bytes: &[u8]) -> ProtocolResult<Frame> {
        if bytes.len() < MIN_FRAME_SIZE {
            return Err(ProtocolError::too_short(MIN_FRAME_SIZE, bytes.len()));
        }
        let declared = bytes[1] as usize;
        let actual = bytes.len() - FRAME_OVERHEAD;
        if declared != actual {
            return Err(ProtocolError::LengthMismatch { declared, actual });
        }
        Ok(Frame {
            name: "raw",
            instance: 1,
            expected_reply: None,
            bytes: bytes.to_vec(),
        })
    }

    /// Short name used in logs (e.g. `SceneControllerConfCmd_Get`).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Destination node.
    pub fn node_id(&self) -> u8 {
        self.bytes[0]
    }

    /// Endpoint instance the frame is addressed to.
    pub fn instance(&self) -> u8 {
        self.instance
    }

    /// Value of the payload length byte.
    pub fn payload_len(&self) -> u8 {
        self.bytes[1]
    }

    /// Command class id.
    pub fn command_class_id(&self) -> u8 {
        self.bytes[2]
    }

    /// Command code.
    pub fn command(&self) -> u8 {
        self.bytes[3]
    }

    /// Command payload: the command code followed by its params.
    pub fn command_payload(&self) -> &[u8] {
        &self.bytes[3..self.bytes.len() - 1]
    }

    /// Params following the command code.
    pub fn params(&self) -> &[u8] {
        &self.bytes[4..self.bytes.len() - 1]
    }

    /// Trailing transmit options.
    pub fn transmit_options(&self) -> TransmitOptions {
        TransmitOptions(self.bytes[self.bytes.len() - 1])
    }

    /// Command code of the report this request should provoke, if any.
    pub fn expected_reply(&self) -> Option<u8> {
        self.expected_reply
    }

    /// The encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the frame, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Builder for [`Frame`].
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    name: &'static str,
    node_id: u8,
    instance: u8,
    command_class_id: u8,
    command: u8,
    params: Vec<u8>,
    expected_reply: Option<u8>,
}

impl FrameBuilder {
    /// Address a specific endpoint instance.
    pub fn instance(mut self, instance: u8) -> Self {
        self.instance = instance;
        self
    }

    /// Append one param byte.
    pub fn param(mut self, byte: u8) -> Self {
        self.params.push(byte);
        self
    }

    /// Append several param bytes.
    pub fn params(mut self, bytes: &[u8]) -> Self {
        self.params.extend_from_slice(bytes);
        self
    }

    /// Record the report command this request expects back.
    pub fn expect_reply(mut self, command: u8) -> Self {
        self.expected_reply = Some(command);
        self
    }

    /// Encode the frame with the given transmit options.
    pub fn build(self, options: TransmitOptions) -> ProtocolResult<Frame> {
        let payload_len = 2 + self.params.len();
        if payload_len > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLong {
                max: MAX_PAYLOAD_SIZE,
                actual: payload_len,
            });
        }

        let mut buf = Vec::with_capacity(payload_len + FRAME_OVERHEAD);
        buf.put_u8(self.node_id);
        buf.put_u8(payload_len as u8);
        buf.put_u8(self.command_class_id);
        buf.put_u8(self.command);
        buf.put_slice(&self.params);
        buf.put_u8(options.bits());
        log::trace!("encoded {} for node {}: {:02X?}", self.name, self.node_id, buf);

        Ok(Frame {
            name: self.name,
            instance: self.instance,
            expected_reply: self.expected_reply,
            bytes: buf,
        })
    }
}

//! Collaborators a handler works against.
//!
//! Handlers own no state besides their ids and guards. Everything they touch
//! is borrowed for the duration of one call through a [`CommandContext`].

use tracing::debug;
use zwcc_metrics::{metric_defs, metrics, FrameLabels};
use zwcc_protocol::{Command, Frame, MsgQueue, TransmitOptions};
use zwcc_values::ValueStore;

use crate::{CommandClassError, CommandResult};

/// What the topology layer knows about a node.
///
/// Both answers may be zero/false before the node has been interviewed.
pub trait NodeCapabilities {
    /// Number of association groups (buttons) the node exposes.
    fn group_count(&self, node_id: u8) -> u8;

    /// Whether the node advertises support for a command of a class.
    fn is_command_supported(&self, node_id: u8, command_class_id: u8, command: u8) -> bool;
}

/// The outbound side of the transport session.
///
/// `send` only enqueues; acknowledgement and retries belong to the transport.
pub trait Transport {
    /// Options byte appended to every outbound frame.
    fn transmit_options(&self) -> TransmitOptions;

    /// Queue an encoded frame for transmission.
    fn send(&self, frame: Frame, queue: MsgQueue);
}

/// Borrowed collaborators for one handler call.
#[derive(Clone, Copy)]
pub struct CommandContext<'a> {
    /// Values of the network the node belongs to.
    pub values: &'a ValueStore,
    /// Capability queries for the node.
    pub node: &'a dyn NodeCapabilities,
    /// Outbound frame sink.
    pub transport: &'a dyn Transport,
}

impl<'a> CommandContext<'a> {
    /// Bundle the collaborators.
    pub fn new(values: &'a ValueStore, node: &'a dyn NodeCapabilities, transport: &'a dyn Transport) -> Self {
        Self {
            values,
            node,
            transport,
        }
    }

    /// Encode `command` for a node and hand it to the transport.
    pub fn send(&self, node_id: u8, instance: u8, command: Command, queue: MsgQueue) -> CommandResult<()> {
        let frame = command
            .to_frame(node_id, instance, self.transport.transmit_options())
            .map_err(CommandClassError::Encode)?;

        debug!(
            "Node[{}]: sending {} (instance {}) on {} queue",
            node_id,
            frame.name(),
            instance,
            queue
        );

        let labels = FrameLabels::new(node_id, frame.command_class_id());
        metrics::histogram!(metric_defs::FRAME_SIZE.name, &labels.to_labels()).record(frame.as_bytes().len() as f64);
        metrics::counter!(
            metric_defs::FRAMES_SENT.name,
            &labels.with_queue(queue.as_str()).to_labels()
        )
        .increment(1);

        self.transport.send(frame, queue);
        Ok(())
    }
}

impl std::fmt::Debug for CommandContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("values", &self.values.len())
            .finish_non_exhaustive()
    }
}

//! Basic (0x20).
//!
//! Every device maps one byte onto its primary function: 0 is off, 1..=99 a
//! level, 0xFF on. The value lives at index 0 of each instance.

use std::collections::BTreeSet;

use tracing::{debug, info};
use zwcc_protocol::{Command, MsgQueue, Report, BASIC_GET, COMMAND_CLASS_BASIC};
use zwcc_values::{Value, ValueGenre, ValueData, ValueId, ValueType};

use super::{record_unsupported, refresh_value};
use crate::{CommandClassError, CommandClassHandler, CommandContext, CommandResult, Disposition, RequestFlags};

/// Index of the basic value.
const BASIC_INDEX: u8 = 0;

/// Basic handler for one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Basic {
    home_id: u32,
    node_id: u8,
    instances: BTreeSet<u8>,
}

impl Basic {
    /// Command class id.
    pub const ID: u8 = COMMAND_CLASS_BASIC;

    /// Command class name.
    pub const NAME: &'static str = "COMMAND_CLASS_BASIC";

    /// Create a handler bound to a node.
    pub fn new(home_id: u32, node_id: u8) -> Self {
        Self {
            home_id,
            node_id,
            instances: BTreeSet::new(),
        }
    }

    /// The node this handler talks to.
    pub fn node_id(&self) -> u8 {
        self.node_id
    }

    fn value_id(&self, instance: u8) -> ValueId {
        ValueId::new(self.home_id, self.node_id, instance, Self::ID, BASIC_INDEX)
    }
}

impl CommandClassHandler for Basic {
    fn command_class_id(&self) -> u8 {
        Self::ID
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn request_state(
        &mut self,
        ctx: &CommandContext<'_>,
        flags: RequestFlags,
        instance: u8,
        queue: MsgQueue,
    ) -> CommandResult<()> {
        if !flags.contains(RequestFlags::DYNAMIC) {
            return Err(CommandClassError::UnsupportedRequestFlags {
                command_class: Self::ID,
                flags,
            });
        }
        self.create_vars(ctx, instance);
        self.request_value(ctx, flags, BASIC_INDEX, instance, queue)
    }

    fn request_value(
        &self,
        ctx: &CommandContext<'_>,
        _flags: RequestFlags,
        _index: u8,
        instance: u8,
        queue: MsgQueue,
    ) -> CommandResult<()> {
        if !ctx.node.is_command_supported(self.node_id, Self::ID, BASIC_GET) {
            info!("Node[{}]: BasicCmd_Get Not Supported on this node", self.node_id);
            record_unsupported(self.node_id, Self::ID);
            return Err(CommandClassError::Unsupported {
                node_id: self.node_id,
                command_class: Self::ID,
                command: BASIC_GET,
            });
        }
        ctx.send(self.node_id, instance, Command::BasicGet, queue)
    }

    fn handle_msg(&self, ctx: &CommandContext<'_>, payload: &[u8], instance: u8) -> CommandResult<Disposition> {
        match Report::decode(Self::ID, payload) {
            Ok(Report::Basic { value }) => {
                debug!("Node[{}]: Received Basic report: value={}", self.node_id, value);
                refresh_value(ctx.values, self.value_id(instance), ValueData::Byte(value));
                Ok(Disposition::Handled)
            }
            Ok(_) => Ok(Disposition::Unhandled),
            Err(e) if e.is_unrecognized() => Ok(Disposition::Unhandled),
            Err(e) => Err(CommandClassError::malformed(Self::ID, e)),
        }
    }

    fn set_value(&self, ctx: &CommandContext<'_>, value: &Value) -> CommandResult<()> {
        let id = value.id();
        let Some(datum) = value.data().as_u8().filter(|_| value.value_type() == ValueType::Byte) else {
            return Err(CommandClassError::TypeMismatch {
                id,
                expected: ValueType::Byte,
                actual: value.value_type(),
            });
        };

        info!("Node[{}]: BasicCmd_Set value={}", self.node_id, datum);
        ctx.send(self.node_id, id.instance, Command::BasicSet { value: datum }, MsgQueue::Send)
    }

    fn create_vars(&mut self, ctx: &CommandContext<'_>, instance: u8) {
        if self.instances.insert(instance) {
            ctx.values
                .create(Value::byte(self.value_id(instance), ValueGenre::Basic, "Basic"));
        }
    }
}

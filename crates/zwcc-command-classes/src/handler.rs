//! The contract every command class implements.

use zwcc_protocol::MsgQueue;
use zwcc_values::Value;

use crate::{CommandContext, CommandResult, RequestFlags};

/// Outcome of offering an inbound payload to a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// The payload was recognized and consumed.
    Handled,
    /// The payload was not recognized; another layer may look at it.
    Unhandled,
}

/// Request encoding, report decoding and value reconciliation for one command
/// class on one node.
///
/// None of the operations block on the device. A request only queues frames;
/// the matching report arrives later through [`handle_msg`](Self::handle_msg).
pub trait CommandClassHandler {
    /// The command class id.
    fn command_class_id(&self) -> u8;

    /// The command class name used in logs.
    fn name(&self) -> &'static str;

    /// Query every piece of state covered by `flags`.
    fn request_state(
        &mut self,
        ctx: &CommandContext<'_>,
        flags: RequestFlags,
        instance: u8,
        queue: MsgQueue,
    ) -> CommandResult<()>;

    /// Query the state behind one value index.
    fn request_value(
        &self,
        ctx: &CommandContext<'_>,
        flags: RequestFlags,
        index: u8,
        instance: u8,
        queue: MsgQueue,
    ) -> CommandResult<()>;

    /// Decode an inbound payload (command code first) and update values.
    fn handle_msg(&self, ctx: &CommandContext<'_>, payload: &[u8], instance: u8) -> CommandResult<Disposition>;

    /// Send the device a write carrying `value`'s data.
    ///
    /// The stored value is not touched; it changes when the device reports.
    fn set_value(&self, ctx: &CommandContext<'_>, value: &Value) -> CommandResult<()>;

    /// Create the values this class exposes. Repeated calls are harmless.
    fn create_vars(&mut self, ctx: &CommandContext<'_>, instance: u8);
}

//! The closed set of supported command classes.

use zwcc_protocol::MsgQueue;
use zwcc_values::Value;

use crate::families::{Basic, SceneControllerConf};
use crate::{CommandClassHandler, CommandContext, CommandResult, Disposition, RequestFlags};

/// A command class handler of any supported family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandClass {
    /// Basic (0x20).
    Basic(Basic),
    /// Scene controller configuration (0x2D).
    SceneControllerConf(SceneControllerConf),
}

impl CommandClass {
    /// Ids of every supported command class, ascending.
    pub const SUPPORTED: &'static [u8] = &[Basic::ID, SceneControllerConf::ID];

    /// Create the handler for a command class id, if it is supported.
    pub fn create(command_class_id: u8, home_id: u32, node_id: u8) -> Option<Self> {
        match command_class_id {
            Basic::ID => Some(CommandClass::Basic(Basic::new(home_id, node_id))),
            SceneControllerConf::ID => Some(CommandClass::SceneControllerConf(SceneControllerConf::new(
                home_id, node_id,
            ))),
            _ => None,
        }
    }

    /// Whether a handler exists for this command class id.
    pub fn is_supported(command_class_id: u8) -> bool {
        Self::SUPPORTED.contains(&command_class_id)
    }

    fn handler(&self) -> &dyn CommandClassHandler {
        match self {
            CommandClass::Basic(h) => h,
            CommandClass::SceneControllerConf(h) => h,
        }
    }

    fn handler_mut(&mut self) -> &mut dyn CommandClassHandler {
        match self {
            CommandClass::Basic(h) => h,
            CommandClass::SceneControllerConf(h) => h,
        }
    }
}

impl CommandClassHandler for CommandClass {
    fn command_class_id(&self) -> u8 {
        self.handler().command_class_id()
    }

    fn name(&self) -> &'static str {
        self.handler().name()
    }

    fn request_state(
        &mut self,
        ctx: &CommandContext<'_>,
        flags: RequestFlags,
        instance: u8,
        queue: MsgQueue,
    ) -> CommandResult<()> {
        self.handler_mut().request_state(ctx, flags, instance, queue)
    }

    fn request_value(
        &self,
        ctx: &CommandContext<'_>,
        flags: RequestFlags,
        index: u8,
        instance: u8,
        queue: MsgQueue,
    ) -> CommandResult<()> {
        self.handler().request_value(ctx, flags, index, instance, queue)
    }

    fn handle_msg(&self, ctx: &CommandContext<'_>, payload: &[u8], instance: u8) -> CommandResult<Disposition> {
        self.handler().handle_msg(ctx, payload, instance)
    }

    fn set_value(&self, ctx: &CommandContext<'_>, value: &Value) -> CommandResult<()> {
        self.handler().set_value(ctx, value)
    }

    fn create_vars(&mut self, ctx: &CommandContext<'_>, instance: u8) {
        self.handler_mut().create_vars(ctx, instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_supported() {
        let cc = CommandClass::create(0x2D, 1, 5).unwrap();
        assert_eq!(cc.command_class_id(), 0x2D);
        assert!(matches!(cc, CommandClass::SceneControllerConf(_)));

        let cc = CommandClass::create(0x20, 1, 5).unwrap();
        assert_eq!(cc.name(), "COMMAND_CLASS_BASIC");
    }

    #[test]
    fn test_create_unsupported() {
        assert!(CommandClass::create(0x85, 1, 5).is_none());
        assert!(!CommandClass::is_supported(0x85));
        assert!(CommandClass::is_supported(0x20));
    }

    #[test]
    fn test_supported_ids_ascending() {
        assert!(CommandClass::SUPPORTED.windows(2).all(|w| w[0] < w[1]));
    }
}

//! Scene controller configuration (0x2D).
//!
//! A scene controller has a number of groups (buttons). Each group activates
//! a scene with a dimming duration. Both settings of a group live in the value
//! store under one packed index per field:
//!
//! ```text
//! index = (group << 1) | field      field 0 = scene id, 1 = dimming duration
//! ```
//!
//! A Set always carries both settings, so a write to one field needs the
//! other field's stored datum.

use tracing::{debug, info, warn};
use zwcc_protocol::{
    Command, MsgQueue, Report, COMMAND_CLASS_SCENE_CONTROLLER_CONF, SCENE_CONTROLLER_CONF_GET,
};
use zwcc_values::{GroupIndex, Value, ValueData, ValueGenre, ValueId, ValueType, MAX_GROUP};

use super::{record_unsupported, refresh_value};
use crate::{CommandClassError, CommandClassHandler, CommandContext, CommandResult, Disposition, RequestFlags};

/// Field holding a group's scene id.
pub const FIELD_SCENE_ID: u8 = 0;

/// Field holding a group's dimming duration.
pub const FIELD_DIMMING_DURATION: u8 = 1;

/// Scene controller configuration handler for one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneControllerConf {
    home_id: u32,
    node_id: u8,
    vars_created: bool,
}

impl SceneControllerConf {
    /// Command class id.
    pub const ID: u8 = COMMAND_CLASS_SCENE_CONTROLLER_CONF;

    /// Command class name.
    pub const NAME: &'static str = "COMMAND_CLASS_SCENE_CONTROLLER_CONF";

    /// Create a handler bound to a node.
    pub fn new(home_id: u32, node_id: u8) -> Self {
        Self {
            home_id,
            node_id,
            vars_created: false,
        }
    }

    /// The node this handler talks to.
    pub fn node_id(&self) -> u8 {
        self.node_id
    }

    /// Whether the group values have been created.
    pub fn vars_created(&self) -> bool {
        self.vars_created
    }

    fn value_id(&self, instance: u8, group: u8, field: u8) -> ValueId {
        ValueId::new(
            self.home_id,
            self.node_id,
            instance,
            Self::ID,
            GroupIndex::new(group, field).encode(),
        )
    }

    /// Group count from the node, capped to what the index packing can hold.
    fn group_count(&self, ctx: &CommandContext<'_>) -> u8 {
        let groups = ctx.node.group_count(self.node_id);
        if groups > MAX_GROUP {
            warn!(
                "Node[{}]: {} groups reported, only {} are addressable",
                self.node_id, groups, MAX_GROUP
            );
            return MAX_GROUP;
        }
        groups
    }

    fn stored_byte(ctx: &CommandContext<'_>, id: ValueId) -> CommandResult<u8> {
        let value = ctx.values.get(&id).ok_or(CommandClassError::UnknownValue(id))?;
        let value = value.read();
        value.data().as_u8().ok_or(CommandClassError::TypeMismatch {
            id,
            expected: ValueType::Byte,
            actual: value.value_type(),
        })
    }
}

impl CommandClassHandler for SceneControllerConf {
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
        if !flags.contains(RequestFlags::SESSION) {
            return Err(CommandClassError::UnsupportedRequestFlags {
                command_class: Self::ID,
                flags,
            });
        }

        self.create_vars(ctx, instance);

        let groups = self.group_count(ctx);
        let mut failed = 0;
        for group in 1..=groups {
            let index = GroupIndex::new(group, FIELD_SCENE_ID).encode();
            if let Err(e) = self.request_value(ctx, flags, index, instance, queue) {
                debug!("Node[{}]: group {} not requested: {}", self.node_id, group, e);
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(CommandClassError::Partial {
                failed,
                attempted: usize::from(groups),
            });
        }
        Ok(())
    }

    fn request_value(
        &self,
        ctx: &CommandContext<'_>,
        _flags: RequestFlags,
        index: u8,
        instance: u8,
        queue: MsgQueue,
    ) -> CommandResult<()> {
        if !ctx
            .node
            .is_command_supported(self.node_id, Self::ID, SCENE_CONTROLLER_CONF_GET)
        {
            info!("Node[{}]: SceneControllerConfCmd_Get Not Supported on this node", self.node_id);
            record_unsupported(self.node_id, Self::ID);
            return Err(CommandClassError::Unsupported {
                node_id: self.node_id,
                command_class: Self::ID,
                command: SCENE_CONTROLLER_CONF_GET,
            });
        }

        let group_id = GroupIndex::decode(index).group;
        ctx.send(
            self.node_id,
            instance,
            Command::SceneControllerConfGet { group_id },
            queue,
        )
    }

    fn handle_msg(&self, ctx: &CommandContext<'_>, payload: &[u8], instance: u8) -> CommandResult<Disposition> {
        let (group_id, scene_id, dimming_duration) = match Report::decode(Self::ID, payload) {
            Ok(Report::SceneControllerConf {
                group_id,
                scene_id,
                dimming_duration,
            }) => (group_id, scene_id, dimming_duration),
            Ok(_) => return Ok(Disposition::Unhandled),
            Err(e) if e.is_unrecognized() => return Ok(Disposition::Unhandled),
            Err(e) => return Err(CommandClassError::malformed(Self::ID, e)),
        };

        info!(
            "Node[{}]: Received SceneControllerConfiguration report: group={}, scene={}, duration={}",
            self.node_id, group_id, scene_id, dimming_duration
        );

        if group_id == 0 || group_id > MAX_GROUP {
            warn!("Node[{}]: report for unaddressable group {} ignored", self.node_id, group_id);
            return Ok(Disposition::Handled);
        }

        refresh_value(
            ctx.values,
            self.value_id(instance, group_id, FIELD_SCENE_ID),
            ValueData::Byte(scene_id),
        );
        refresh_value(
            ctx.values,
            self.value_id(instance, group_id, FIELD_DIMMING_DURATION),
            ValueData::Byte(dimming_duration),
        );
        Ok(Disposition::Handled)
    }

    fn set_value(&self, ctx: &CommandContext<'_>, value: &Value) -> CommandResult<()> {
        let id = value.id();
        let mismatch = CommandClassError::TypeMismatch {
            id,
            expected: ValueType::Byte,
            actual: value.value_type(),
        };
        if value.value_type() != ValueType::Byte {
            return Err(mismatch);
        }
        let datum = value.data().as_u8().ok_or(mismatch)?;

        let GroupIndex { group, field } = id.group_index();
        let scene_stored = Self::stored_byte(ctx, self.value_id(id.instance, group, FIELD_SCENE_ID))?;
        let duration_stored = Self::stored_byte(ctx, self.value_id(id.instance, group, FIELD_DIMMING_DURATION))?;

        let (scene_id, dimming_duration) = if field == FIELD_SCENE_ID {
            (datum, duration_stored)
        } else {
            (scene_stored, datum)
        };

        info!(
            "Node[{}]: SceneControllerConfCmd_Set group={}, scene={}, duration={}",
            self.node_id, group, scene_id, dimming_duration
        );
        ctx.send(
            self.node_id,
            id.instance,
            Command::SceneControllerConfSet {
                group_id: group,
                scene_id,
                dimming_duration,
            },
            MsgQueue::Send,
        )
    }

    fn create_vars(&mut self, ctx: &CommandContext<'_>, instance: u8) {
        if self.vars_created {
            return;
        }

        let groups = self.group_count(ctx);
        for group in 1..=groups {
            ctx.values.create(Value::byte(
                self.value_id(instance, group, FIELD_SCENE_ID),
                ValueGenre::System,
                format!("Button {} Scene Id", group),
            ));
            ctx.values.create(Value::byte(
                self.value_id(instance, group, FIELD_DIMMING_DURATION),
                ValueGenre::System,
                format!("Button {} Dimming Duration", group),
            ));
            self.vars_created = true;
        }

        if self.vars_created {
            debug!("Node[{}]: created values for {} groups", self.node_id, groups);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_ids_pack_group_and_field() {
        let handler = SceneControllerConf::new(0xC0FFEE, 5);
        assert_eq!(handler.value_id(1, 2, FIELD_SCENE_ID).index, 4);
        assert_eq!(handler.value_id(1, 2, FIELD_DIMMING_DURATION).index, 5);
        assert_eq!(handler.value_id(1, MAX_GROUP, FIELD_DIMMING_DURATION).index, 255);
    }

    #[test]
    fn test_identity() {
        let handler = SceneControllerConf::new(1, 9);
        assert_eq!(handler.command_class_id(), 0x2D);
        assert_eq!(handler.name(), "COMMAND_CLASS_SCENE_CONTROLLER_CONF");
        assert_eq!(handler.node_id(), 9);
        assert!(!handler.vars_created());
    }
}

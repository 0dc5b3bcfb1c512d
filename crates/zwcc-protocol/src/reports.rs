//! Reports received from devices.

use crate::constants::*;
use crate::error::*;

/// Minimum length of a scene controller configuration report payload.
pub const SCENE_CONTROLLER_CONF_REPORT_LEN: usize = 4;

/// Minimum length of a basic report payload.
pub const BASIC_REPORT_LEN: usize = 2;

/// Reports a device sends back to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    /// Current basic value.
    Basic {
        /// Reported value.
        value: u8,
    },

    /// Configuration of one group.
    SceneControllerConf {
        /// Group (button) number.
        group_id: u8,
        /// Scene activated by the group.
        scene_id: u8,
        /// Dimming duration applied with the scene.
        dimming_duration: u8,
    },
}

impl Report {
    /// The command class this report belongs to.
    pub fn command_class_id(&self) -> u8 {
        match self {
            Report::Basic { .. } => COMMAND_CLASS_BASIC,
            Report::SceneControllerConf { .. } => COMMAND_CLASS_SCENE_CONTROLLER_CONF,
        }
    }

    /// Decode a report payload (command code first).
    ///
    /// A payload whose command code is not a report yields
    /// [`ProtocolError::UnknownCommand`]; a report that is too short yields
    /// [`ProtocolError::FrameTooShort`].
    pub fn decode(command_class_id: u8, payload: &[u8]) -> ProtocolResult<Self> {
        if payload.is_empty() {
            return Err(ProtocolError::too_short(1, 0));
        }
        let code = payload[0];

        match (command_class_id, code) {
            (COMMAND_CLASS_BASIC, BASIC_REPORT) => {
                if payload.len() < BASIC_REPORT_LEN {
                    return Err(ProtocolError::too_short(BASIC_REPORT_LEN, payload.len()));
                }
                Ok(Report::Basic { value: payload[1] })
            }

            (COMMAND_CLASS_SCENE_CONTROLLER_CONF, SCENE_CONTROLLER_CONF_REPORT) => {
                if payload.len() < SCENE_CONTROLLER_CONF_REPORT_LEN {
                    return Err(ProtocolError::too_short(
                        SCENE_CONTROLLER_CONF_REPORT_LEN,
                        payload.len(),
                    ));
                }
                Ok(Report::SceneControllerConf {
                    group_id: payload[1],
                    scene_id: payload[2],
                    dimming_duration: payload[3],
                })
            }

            (COMMAND_CLASS_BASIC, _) | (COMMAND_CLASS_SCENE_CONTROLLER_CONF, _) => {
                Err(ProtocolError::UnknownCommand {
                    command_class: command_class_id,
                    command: code,
                })
            }

            _ => Err(ProtocolError::UnknownCommandClass(command_class_id)),
        }
    }

    /// Encode the report payload (command code first).
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Report::Basic { value } => vec![BASIC_REPORT, *value],
            Report::SceneControllerConf {
                group_id,
                scene_id,
                dimming_duration,
            } => vec![SCENE_CONTROLLER_CONF_REPORT, *group_id, *scene_id, *dimming_duration],
        }
    }
}

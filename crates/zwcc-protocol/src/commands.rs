//! Requests the controller sends to devices.

use crate::constants::*;
use crate::error::*;
use crate::frame::Frame;
use crate::queue::TransmitOptions;

/// Requests that can be sent to a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Ask for the basic value.
    BasicGet,

    /// Write the basic value.
    BasicSet {
        /// New value (0 = off, 1..=99 = level, 0xFF = on).
        value: u8,
    },

    /// Ask for one group's scene configuration.
    SceneControllerConfGet {
        /// Group (button) number.
        group_id: u8,
    },

    /// Configure one group's scene.
    SceneControllerConfSet {
        /// Group (button) number.
        group_id: u8,
        /// Scene activated by the group.
        scene_id: u8,
        /// Dimming duration applied with the scene.
        dimming_duration: u8,
    },
}

impl Command {
    /// The command class this command belongs to.
    pub fn command_class_id(&self) -> u8 {
        match self {
            Command::BasicGet | Command::BasicSet { .. } => COMMAND_CLASS_BASIC,
            Command::SceneControllerConfGet { .. } | Command::SceneControllerConfSet { .. } => {
                COMMAND_CLASS_SCENE_CONTROLLER_CONF
            }
        }
    }

    /// Get the command code for this command.
    pub fn code(&self) -> u8 {
        match self {
            Command::BasicGet => BASIC_GET,
            Command::BasicSet { .. } => BASIC_SET,
            Command::SceneControllerConfGet { .. } => SCENE_CONTROLLER_CONF_GET,
            Command::SceneControllerConfSet { .. } => SCENE_CONTROLLER_CONF_SET,
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::BasicGet => "BasicCmd_Get",
            Command::BasicSet { .. } => "BasicCmd_Set",
            Command::SceneControllerConfGet { .. } => "SceneControllerConfCmd_Get",
            Command::SceneControllerConfSet { .. } => "SceneControllerConfCmd_Set",
        }
    }

    /// Report code this command provokes, if it is a query.
    pub fn expected_reply(&self) -> Option<u8> {
        match self {
            Command::BasicGet => Some(BASIC_REPORT),
            Command::SceneControllerConfGet { .. } => Some(SCENE_CONTROLLER_CONF_REPORT),
            Command::BasicSet { .. } | Command::SceneControllerConfSet { .. } => None,
        }
    }

    /// Params following the command code.
    pub fn params(&self) -> Vec<u8> {
        match self {
            Command::BasicGet => Vec::new(),
            Command::BasicSet { value } => vec![*value],
            Command::SceneControllerConfGet { group_id } => vec![*group_id],
            Command::SceneControllerConfSet {
                group_id,
                scene_id,
                dimming_duration,
            } => vec![*group_id, *scene_id, *dimming_duration],
        }
    }

    /// Encode the command payload: command code followed by params.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![self.code()];
        buf.extend_from_slice(&self.params());
        buf
    }

    /// Wrap the command in an outbound frame.
    pub fn to_frame(&self, node_id: u8, instance: u8, options: TransmitOptions) -> ProtocolResult<Frame> {
        let mut builder = Frame::builder(self.name(), node_id, self.command_class_id(), self.code())
            .instance(instance)
            .params(&self.params());
        if let Some(reply) = self.expected_reply() {
            builder = builder.expect_reply(reply);
        }
        builder.build(options)
    }

    /// Decode a command payload received by a device.
    pub fn decode(command_class_id: u8, payload: &[u8]) -> ProtocolResult<Self> {
        if payload.is_empty() {
            return Err(ProtocolError::too_short(1, 0));
        }
        let code = payload[0];

        match (command_class_id, code) {
            (COMMAND_CLASS_BASIC, BASIC_GET) => Ok(Command::BasicGet),

            (COMMAND_CLASS_BASIC, BASIC_SET) => {
                if payload.len() < 2 {
                    return Err(ProtocolError::too_short(2, payload.len()));
                }
                Ok(Command::BasicSet { value: payload[1] })
            }

            (COMMAND_CLASS_SCENE_CONTROLLER_CONF, SCENE_CONTROLLER_CONF_GET) => {
                if payload.len() < 2 {
                    return Err(ProtocolError::too_short(2, payload.len()));
                }
                Ok(Command::SceneControllerConfGet {
                    group_id: payload[1],
                })
            }

            (COMMAND_CLASS_SCENE_CONTROLLER_CONF, SCENE_CONTROLLER_CONF_SET) => {
                if payload.len() < 4 {
                    return Err(ProtocolError::too_short(4, payload.len()));
                }
                Ok(Command::SceneControllerConfSet {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_get_frame() {
        let frame = Command::SceneControllerConfGet { group_id: 3 }
            .to_frame(5, 1, TransmitOptions::DEFAULT)
            .unwrap();
        assert_eq!(frame.as_bytes(), &[5, 3, 0x2D, 0x02, 3, 0x25]);
        assert_eq!(frame.expected_reply(), Some(SCENE_CONTROLLER_CONF_REPORT));
    }

    #[test]
    fn test_scene_set_frame() {
        let frame = Command::SceneControllerConfSet {
            group_id: 2,
            scene_id: 7,
            dimming_duration: 3,
        }
        .to_frame(5, 1, TransmitOptions::DEFAULT)
        .unwrap();
        assert_eq!(frame.as_bytes(), &[5, 5, 0x2D, 0x01, 2, 7, 3, 0x25]);
        assert_eq!(frame.expected_reply(), None);
    }

    #[test]
    fn test_basic_frames() {
        let get = Command::BasicGet.to_frame(4, 1, TransmitOptions(0x05)).unwrap();
        assert_eq!(get.as_bytes(), &[4, 2, 0x20, 0x02, 0x05]);

        let set = Command::BasicSet { value: 0xFF }
            .to_frame(4, 1, TransmitOptions(0x05))
            .unwrap();
        assert_eq!(set.as_bytes(), &[4, 3, 0x20, 0x01, 0xFF, 0x05]);
    }

    #[test]
    fn test_decode_device_side() {
        let cmd = Command::decode(0x2D, &[0x01, 2, 7, 3]).unwrap();
        assert_eq!(
            cmd,
            Command::SceneControllerConfSet {
                group_id: 2,
                scene_id: 7,
                dimming_duration: 3
            }
        );
        assert_eq!(Command::decode(0x20, &[0x02]).unwrap(), Command::BasicGet);
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(
            Command::decode(0x2D, &[0x01, 2]),
            Err(ProtocolError::too_short(4, 2))
        );
        assert_eq!(
            Command::decode(0x2D, &[0x03, 2, 7, 3]),
            Err(ProtocolError::UnknownCommand {
                command_class: 0x2D,
                command: 0x03
            })
        );
        assert_eq!(
            Command::decode(0x85, &[0x02]),
            Err(ProtocolError::UnknownCommandClass(0x85))
        );
    }
}

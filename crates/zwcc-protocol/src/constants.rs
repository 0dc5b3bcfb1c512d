//! Protocol constants
//!
//! Command class identifiers, command codes and transmit option bits.

// ============================================================================
// Command Class Identifiers
// ============================================================================

/// COMMAND_CLASS_BASIC.
pub const COMMAND_CLASS_BASIC: u8 = 0x20;
/// COMMAND_CLASS_SCENE_CONTROLLER_CONF.
pub const COMMAND_CLASS_SCENE_CONTROLLER_CONF: u8 = 0x2D;

// ============================================================================
// Basic Command Codes
// ============================================================================

/// Set the basic value.
pub const BASIC_SET: u8 = 0x01;
/// Request the basic value.
pub const BASIC_GET: u8 = 0x02;
/// Report of the basic value.
pub const BASIC_REPORT: u8 = 0x03;

// ============================================================================
// Scene Controller Configuration Command Codes
// ============================================================================

/// Configure the scene and dimming duration of a group.
pub const SCENE_CONTROLLER_CONF_SET: u8 = 0x01;
/// Request the configuration of a group.
pub const SCENE_CONTROLLER_CONF_GET: u8 = 0x02;
/// Report of the configuration of a group.
pub const SCENE_CONTROLLER_CONF_REPORT: u8 = 0x03;

// ============================================================================
// Transmit Options
// ============================================================================

/// Request an acknowledgement from the destination.
pub const TRANSMIT_OPTION_ACK: u8 = 0x01;
/// Transmit at low power.
pub const TRANSMIT_OPTION_LOW_POWER: u8 = 0x02;
/// Let the controller route around failed links.
pub const TRANSMIT_OPTION_AUTO_ROUTE: u8 = 0x04;
/// Never route; direct range only.
pub const TRANSMIT_OPTION_NO_ROUTE: u8 = 0x10;
/// Allow explorer frames for route resolution.
pub const TRANSMIT_OPTION_EXPLORE: u8 = 0x20;

// ============================================================================
// Sizes
// ============================================================================

/// Largest command-class payload (class id through last param) in one frame.
pub const MAX_PAYLOAD_SIZE: usize = 46;

/// Bytes an outbound frame adds around its payload (node, length, tx options).
pub const FRAME_OVERHEAD: usize = 3;

/// Human-readable name of a command class.
pub fn command_class_name(command_class_id: u8) -> &'static str {
    match command_class_id {
        COMMAND_CLASS_BASIC => "COMMAND_CLASS_BASIC",
        COMMAND_CLASS_SCENE_CONTROLLER_CONF => "COMMAND_CLASS_SCENE_CONTROLLER_CONF",
        _ => "UNKNOWN",
    }
}

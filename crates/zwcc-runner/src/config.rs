//! Network descriptions.
//!
//! ```yaml
//! home_id: 0xC0FFEE00
//! transmit_options: 0x25
//! seed: 42
//! loss_probability: 0.1
//! nodes:
//!   - id: 5
//!     name: Hallway keypad
//!     instances: [1]
//!     command_classes: [0x20, 0x2D]
//!     groups: 3
//!     device:
//!       basic: 0
//!       scenes:
//!         - { group: 1, scene_id: 10, dimming_duration: 0 }
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use zwcc_command_classes::{CommandClass, NodeCapabilities};
use zwcc_protocol::{TransmitOptions, BASIC_GET, SCENE_CONTROLLER_CONF_GET};
use zwcc_values::MAX_GROUP;

use crate::ConfigError;

/// Highest node id a network can assign.
pub const MAX_NODE_ID: u8 = 232;

fn default_transmit_options() -> u8 {
    TransmitOptions::DEFAULT.bits()
}

fn default_instances() -> Vec<u8> {
    vec![1]
}

/// One network: a controller and the nodes it manages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    /// Network identifier shared by every value.
    pub home_id: u32,
    /// Options byte appended to outbound frames.
    #[serde(default = "default_transmit_options")]
    pub transmit_options: u8,
    /// Seed for frame loss.
    #[serde(default)]
    pub seed: u64,
    /// Probability that any single frame is lost.
    #[serde(default)]
    pub loss_probability: f64,
    /// Nodes in the network.
    pub nodes: Vec<NodeConfig>,
}

impl NetworkConfig {
    /// Options byte as transmit options.
    pub fn transmit_options(&self) -> TransmitOptions {
        TransmitOptions(self.transmit_options)
    }

    /// The node with this id.
    pub fn node(&self, node_id: u8) -> Option<&NodeConfig> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    /// Check ids, ranges and device state.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.loss_probability) {
            return Err(ConfigError::InvalidLossProbability(self.loss_probability));
        }

        let mut seen = BTreeSet::new();
        for node in &self.nodes {
            if node.id == 0 || node.id > MAX_NODE_ID {
                return Err(ConfigError::InvalidNodeId(node.id));
            }
            if !seen.insert(node.id) {
                return Err(ConfigError::DuplicateNode(node.id));
            }
            node.validate()?;
        }
        Ok(())
    }
}

/// One node and what it supports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    /// Node id.
    pub id: u8,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Endpoint instances.
    #[serde(default = "default_instances")]
    pub instances: Vec<u8>,
    /// Command classes the node advertises.
    pub command_classes: Vec<u8>,
    /// Association groups (buttons).
    #[serde(default)]
    pub groups: u8,
    /// Command classes whose Get the node does not answer.
    #[serde(default)]
    pub no_get: Vec<u8>,
    /// State of the simulated device.
    #[serde(default)]
    pub device: DeviceState,
}

impl NodeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidNode {
            node: self.id,
            reason,
        };

        if self.instances.is_empty() || self.instances.contains(&0) {
            return Err(invalid("instances must be non-empty and start at 1".into()));
        }
        if self.groups > MAX_GROUP {
            return Err(invalid(format!("{} groups exceeds {}", self.groups, MAX_GROUP)));
        }
        for scene in &self.device.scenes {
            if scene.group == 0 || scene.group > self.groups {
                return Err(invalid(format!("scene for group {} outside 1..={}", scene.group, self.groups)));
            }
        }
        Ok(())
    }

    /// Whether the node advertises a command class.
    pub fn has_command_class(&self, command_class_id: u8) -> bool {
        self.command_classes.contains(&command_class_id)
    }

    /// Advertised classes that have a handler.
    pub fn supported_command_classes(&self) -> impl Iterator<Item = u8> + '_ {
        self.command_classes
            .iter()
            .copied()
            .filter(|id| CommandClass::is_supported(*id))
    }
}

impl NodeCapabilities for NodeConfig {
    fn group_count(&self, _node_id: u8) -> u8 {
        self.groups
    }

    fn is_command_supported(&self, _node_id: u8, command_class_id: u8, command: u8) -> bool {
        if !self.has_command_class(command_class_id) {
            return false;
        }
        let is_get = matches!(command, BASIC_GET | SCENE_CONTROLLER_CONF_GET);
        !(is_get && self.no_get.contains(&command_class_id))
    }
}

/// Initial state of a simulated device.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceState {
    /// Basic value of every instance.
    #[serde(default)]
    pub basic: u8,
    /// Per-group scene configuration.
    #[serde(default)]
    pub scenes: Vec<SceneState>,
}

/// Scene configuration of one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneState {
    /// Group (button).
    pub group: u8,
    /// Scene activated by the group.
    pub scene_id: u8,
    /// Dimming duration applied with the scene.
    pub dimming_duration: u8,
}

/// Load and validate a network description from a file.
pub fn load_network(path: &Path) -> Result<NetworkConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_network_from_str(&text)
}

/// Load and validate a network description from YAML text.
pub fn load_network_from_str(yaml: &str) -> Result<NetworkConfig, ConfigError> {
    let config: NetworkConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}

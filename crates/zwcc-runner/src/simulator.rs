//! Simulated devices standing in for the radio network.
//!
//! Devices answer Gets with Reports and apply Sets. Each frame in either
//! direction is lost with the configured probability; the loss sequence is
//! fully determined by the seed.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace, warn};
use zwcc_protocol::{Command, Frame, InboundFrame, Report};

use crate::{NetworkConfig, NodeConfig};

/// A report travelling back from a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Endpoint instance that answered.
    pub instance: u8,
    /// The report frame.
    pub frame: InboundFrame,
}

/// One simulated device.
#[derive(Debug, Clone)]
pub struct SimulatedDevice {
    node: NodeConfig,
    basic: BTreeMap<u8, u8>,
    scenes: BTreeMap<(u8, u8), (u8, u8)>,
}

impl SimulatedDevice {
    /// Build a device in the state its description gives.
    pub fn new(node: &NodeConfig) -> Self {
        let mut basic = BTreeMap::new();
        let mut scenes = BTreeMap::new();
        for &instance in &node.instances {
            basic.insert(instance, node.device.basic);
            for scene in &node.device.scenes {
                scenes.insert((instance, scene.group), (scene.scene_id, scene.dimming_duration));
            }
        }
        Self {
            node: node.clone(),
            basic,
            scenes,
        }
    }

    /// Node id.
    pub fn node_id(&self) -> u8 {
        self.node.id
    }

    /// Current scene id and dimming duration of a group.
    pub fn scene(&self, instance: u8, group: u8) -> Option<(u8, u8)> {
        self.scenes.get(&(instance, group)).copied()
    }

    /// Current basic value of an instance.
    pub fn basic(&self, instance: u8) -> Option<u8> {
        self.basic.get(&instance).copied()
    }

    /// Act on a frame addressed to this device, returning its report if any.
    pub fn receive(&mut self, frame: &Frame) -> Option<Reply> {
        let instance = frame.instance();
        if !self.node.instances.contains(&instance) || !self.node.has_command_class(frame.command_class_id()) {
            debug!("Device[{}]: ignoring {} for instance {}", self.node.id, frame.name(), instance);
            return None;
        }

        let command = match Command::decode(frame.command_class_id(), frame.command_payload()) {
            Ok(command) => command,
            Err(e) => {
                warn!("Device[{}]: cannot decode {}: {}", self.node.id, frame.name(), e);
                return None;
            }
        };

        let report = match command {
            Command::BasicGet => Report::Basic {
                value: self.basic(instance).unwrap_or_default(),
            },
            Command::BasicSet { value } => {
                self.basic.insert(instance, value);
                return None;
            }
            Command::SceneControllerConfGet { group_id } => {
                if group_id == 0 || group_id > self.node.groups {
                    debug!("Device[{}]: no group {}", self.node.id, group_id);
                    return None;
                }
                let (scene_id, dimming_duration) = self.scene(instance, group_id).unwrap_or_default();
                Report::SceneControllerConf {
                    group_id,
                    scene_id,
                    dimming_duration,
                }
            }
            Command::SceneControllerConfSet {
                group_id,
                scene_id,
                dimming_duration,
            } => {
                if group_id > 0 && group_id <= self.node.groups {
                    self.scenes.insert((instance, group_id), (scene_id, dimming_duration));
                }
                return None;
            }
        };

        Some(Reply {
            instance,
            frame: InboundFrame::new(self.node.id, report.command_class_id(), report.encode()),
        })
    }
}

/// Delivery counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetworkStats {
    /// Frames that reached a device.
    pub delivered: u64,
    /// Frames lost in either direction.
    pub dropped: u64,
    /// Reports returned to the controller.
    pub replies: u64,
}

/// Every device of a network behind one lossy medium.
#[derive(Debug)]
pub struct SimulatedNetwork {
    devices: BTreeMap<u8, SimulatedDevice>,
    rng: ChaCha8Rng,
    loss_probability: f64,
    stats: NetworkStats,
}

impl SimulatedNetwork {
    /// Build the devices of a network.
    pub fn new(config: &NetworkConfig) -> Self {
        Self {
            devices: config
                .nodes
                .iter()
                .map(|node| (node.id, SimulatedDevice::new(node)))
                .collect(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            loss_probability: config.loss_probability,
            stats: NetworkStats::default(),
        }
    }

    /// Replace the loss probability.
    pub fn with_loss_probability(mut self, loss_probability: f64) -> Self {
        self.loss_probability = loss_probability.clamp(0.0, 1.0);
        self
    }

    /// A device by node id.
    pub fn device(&self, node_id: u8) -> Option<&SimulatedDevice> {
        self.devices.get(&node_id)
    }

    /// Delivery counters so far.
    pub fn stats(&self) -> NetworkStats {
        self.stats
    }

    fn lost(&mut self) -> bool {
        self.loss_probability > 0.0 && self.rng.gen_bool(self.loss_probability)
    }

    /// Carry a frame to its device and carry any report back.
    pub fn deliver(&mut self, frame: &Frame) -> Option<Reply> {
        if self.lost() {
            trace!("lost {} to node {}", frame.name(), frame.node_id());
            self.stats.dropped += 1;
            return None;
        }

        let device = match self.devices.get_mut(&frame.node_id()) {
            Some(device) => device,
            None => {
                debug!("no device at node {}", frame.node_id());
                return None;
            }
        };
        self.stats.delivered += 1;
        let reply = device.receive(frame)?;

        if self.lost() {
            trace!("lost report from node {}", frame.node_id());
            self.stats.dropped += 1;
            return None;
        }
        self.stats.replies += 1;
        Some(reply)
    }
}

//! Per-node registry of command class handlers.

use std::collections::BTreeMap;

use tracing::{debug, trace, warn};
use zwcc_metrics::{metric_defs, metrics, FrameLabels};
use zwcc_protocol::command_class_name;

use crate::{CommandClass, CommandClassHandler, CommandContext, Disposition};

/// The command classes registered on one node.
#[derive(Debug, Clone)]
pub struct CommandClassRegistry {
    home_id: u32,
    node_id: u8,
    classes: BTreeMap<u8, CommandClass>,
}

impl CommandClassRegistry {
    /// Create an empty registry for a node.
    pub fn new(home_id: u32, node_id: u8) -> Self {
        Self {
            home_id,
            node_id,
            classes: BTreeMap::new(),
        }
    }

    /// The network the node belongs to.
    pub fn home_id(&self) -> u32 {
        self.home_id
    }

    /// The node.
    pub fn node_id(&self) -> u8 {
        self.node_id
    }

    /// Register a command class. Returns whether the class is now present.
    ///
    /// Adding an already registered class keeps the existing handler.
    pub fn add(&mut self, command_class_id: u8) -> bool {
        if self.classes.contains_key(&command_class_id) {
            return true;
        }
        match CommandClass::create(command_class_id, self.home_id, self.node_id) {
            Some(cc) => {
                debug!("Node[{}]: added {}", self.node_id, cc.name());
                self.classes.insert(command_class_id, cc);
                true
            }
            None => {
                warn!(
                    "Node[{}]: command class 0x{:02X} ({}) is not supported",
                    self.node_id,
                    command_class_id,
                    command_class_name(command_class_id)
                );
                false
            }
        }
    }

    /// The handler for a command class.
    pub fn get(&self, command_class_id: u8) -> Option<&CommandClass> {
        self.classes.get(&command_class_id)
    }

    /// The handler for a command class, mutably.
    pub fn get_mut(&mut self, command_class_id: u8) -> Option<&mut CommandClass> {
        self.classes.get_mut(&command_class_id)
    }

    /// Whether a command class is registered.
    pub fn contains(&self, command_class_id: u8) -> bool {
        self.classes.contains_key(&command_class_id)
    }

    /// Registered command class ids, ascending.
    pub fn ids(&self) -> impl Iterator<Item = u8> + '_ {
        self.classes.keys().copied()
    }

    /// Registered handlers, by ascending id.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CommandClass> {
        self.classes.values_mut()
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether no class is registered.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Offer an inbound payload to the handler of its command class.
    ///
    /// Never fails: missing handlers and undecodable payloads are logged and
    /// reported as [`Disposition::Unhandled`].
    pub fn dispatch(
        &self,
        ctx: &CommandContext<'_>,
        command_class_id: u8,
        payload: &[u8],
        instance: u8,
    ) -> Disposition {
        let labels = FrameLabels::new(self.node_id, command_class_id).to_labels();

        let Some(cc) = self.classes.get(&command_class_id) else {
            debug!(
                "Node[{}]: no handler for class 0x{:02X}, frame ignored",
                self.node_id, command_class_id
            );
            metrics::counter!(metric_defs::REPORTS_UNHANDLED.name, &labels).increment(1);
            return Disposition::Unhandled;
        };

        match cc.handle_msg(ctx, payload, instance) {
            Ok(Disposition::Handled) => {
                metrics::counter!(metric_defs::REPORTS_HANDLED.name, &labels).increment(1);
                Disposition::Handled
            }
            Ok(Disposition::Unhandled) => {
                trace!(
                    "Node[{}]: {} did not recognize {:02X?}",
                    self.node_id,
                    cc.name(),
                    payload
                );
                metrics::counter!(metric_defs::REPORTS_UNHANDLED.name, &labels).increment(1);
                Disposition::Unhandled
            }
            Err(e) => {
                warn!("Node[{}]: {} rejected {:02X?}: {}", self.node_id, cc.name(), payload, e);
                metrics::counter!(metric_defs::REPORTS_MALFORMED.name, &labels).increment(1);
                Disposition::Unhandled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_supported_and_unsupported() {
        let mut registry = CommandClassRegistry::new(1, 5);
        assert!(registry.add(0x2D));
        assert!(registry.add(0x20));
        assert!(!registry.add(0x85));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec![0x20, 0x2D]);
        assert!(registry.get(0x85).is_none());
    }

    #[test]
    fn test_add_twice_keeps_handler() {
        let mut registry = CommandClassRegistry::new(1, 5);
        registry.add(0x2D);
        assert!(registry.add(0x2D));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(0x2D).map(|cc| cc.command_class_id()), Some(0x2D));
    }
}

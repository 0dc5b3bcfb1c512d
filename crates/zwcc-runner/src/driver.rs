//! The controller side: one registry per node over a shared value store.
//!
//! Each node's registry sits behind its own mutex, so a node is only ever
//! worked on by one thread while different nodes refresh in parallel.
//! Frames leave through a channel and are drained in queue priority order.

use std::collections::BTreeMap;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{debug, info, trace, warn};
use zwcc_command_classes::{
    CommandClassHandler, CommandClassRegistry, CommandContext, Disposition, RefreshSummary, RequestFlags,
    RequestOrchestrator, Transport,
};
use zwcc_protocol::{Frame, InboundFrame, MsgQueue, TransmitOptions};
use zwcc_values::{ValueData, ValueId, ValueStore};

use crate::{DriverError, DriverResult, NetworkConfig, NodeConfig, Reply, SimulatedNetwork};

/// A frame waiting for the radio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    /// The encoded frame.
    pub frame: Frame,
    /// Queue it was submitted to.
    pub queue: MsgQueue,
}

/// Transport that hands frames to a channel.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: Sender<Outbound>,
    options: TransmitOptions,
}

impl ChannelTransport {
    /// Create a transport and the receiving end of its channel.
    pub fn new(options: TransmitOptions) -> (Self, Receiver<Outbound>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx, options }, rx)
    }
}

impl Transport for ChannelTransport {
    fn transmit_options(&self) -> TransmitOptions {
        self.options
    }

    fn send(&self, frame: Frame, queue: MsgQueue) {
        trace!("tx [{}] {}", queue, hex::encode(frame.as_bytes()));
        if self.tx.send(Outbound { frame, queue }).is_err() {
            warn!("outbound channel closed, frame dropped");
        }
    }
}

/// Counters from one [`Driver::pump`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
    /// Frames handed to the network.
    pub sent: usize,
    /// Reports a handler consumed.
    pub handled: usize,
    /// Reports nobody consumed.
    pub unhandled: usize,
}

struct NodeEntry {
    config: NodeConfig,
    registry: Mutex<CommandClassRegistry>,
}

/// Controller state for one network.
pub struct Driver {
    home_id: u32,
    values: ValueStore,
    nodes: BTreeMap<u8, NodeEntry>,
    transport: ChannelTransport,
    outbound: Receiver<Outbound>,
    orchestrator: RequestOrchestrator,
}

impl Driver {
    /// Build registries for every node of a network.
    pub fn new(config: &NetworkConfig) -> Self {
        let (transport, outbound) = ChannelTransport::new(config.transmit_options());
        let nodes = config
            .nodes
            .iter()
            .map(|node| {
                let mut registry = CommandClassRegistry::new(config.home_id, node.id);
                for command_class_id in &node.command_classes {
                    registry.add(*command_class_id);
                }
                debug!("Node[{}]: {} command classes registered", node.id, registry.len());
                (
                    node.id,
                    NodeEntry {
                        config: node.clone(),
                        registry: Mutex::new(registry),
                    },
                )
            })
            .collect();

        Self {
            home_id: config.home_id,
            values: ValueStore::new(),
            nodes,
            transport,
            outbound,
            orchestrator: RequestOrchestrator::new(),
        }
    }

    /// The network id.
    pub fn home_id(&self) -> u32 {
        self.home_id
    }

    /// Values of the network.
    pub fn values(&self) -> &ValueStore {
        &self.values
    }

    /// Node ids, ascending.
    pub fn node_ids(&self) -> impl Iterator<Item = u8> + '_ {
        self.nodes.keys().copied()
    }

    fn entry(&self, node_id: u8) -> DriverResult<&NodeEntry> {
        self.nodes.get(&node_id).ok_or(DriverError::UnknownNode(node_id))
    }

    fn context<'a>(&'a self, entry: &'a NodeEntry) -> CommandContext<'a> {
        CommandContext::new(&self.values, &entry.config, &self.transport)
    }

    /// Create every node's values without sending anything.
    pub fn create_values(&self) {
        for entry in self.nodes.values() {
            let ctx = self.context(entry);
            let mut registry = entry.registry.lock();
            for cc in registry.iter_mut() {
                for &instance in &entry.config.instances {
                    cc.create_vars(&ctx, instance);
                }
            }
        }
    }

    /// Queue a refresh of one node.
    pub fn refresh_node(&self, node_id: u8, flags: RequestFlags) -> DriverResult<RefreshSummary> {
        let entry = self.entry(node_id)?;
        Ok(self.refresh_entry(entry, flags))
    }

    fn refresh_entry(&self, entry: &NodeEntry, flags: RequestFlags) -> RefreshSummary {
        let ctx = self.context(entry);
        let mut registry = entry.registry.lock();
        self.orchestrator
            .refresh_node(&mut registry, &ctx, flags, &entry.config.instances, MsgQueue::Query)
    }

    /// Queue a refresh of every node, nodes in parallel.
    pub fn refresh_all(&self, flags: RequestFlags) -> RefreshSummary {
        let summaries: Vec<RefreshSummary> = self
            .nodes
            .par_iter()
            .map(|(_, entry)| self.refresh_entry(entry, flags))
            .collect();

        let mut total = RefreshSummary::default();
        for summary in summaries {
            total.merge(summary);
        }
        info!("refresh of {} nodes queued ({})", self.nodes.len(), total);
        total
    }

    /// Queue a re-read of one value.
    pub fn request_value(&self, id: &ValueId) -> DriverResult<()> {
        let entry = self.entry(id.node_id)?;
        let ctx = self.context(entry);
        let registry = entry.registry.lock();
        self.orchestrator
            .request_value(&registry, &ctx, id, MsgQueue::Query)?;
        Ok(())
    }

    /// Queue a write of one value.
    pub fn set_value(&self, id: &ValueId, data: ValueData) -> DriverResult<()> {
        let entry = self.entry(id.node_id)?;
        let ctx = self.context(entry);
        let registry = entry.registry.lock();
        self.orchestrator.set_value(&registry, &ctx, id, data)?;
        Ok(())
    }

    /// Route an inbound frame to its node's registry.
    pub fn handle_inbound(&self, instance: u8, frame: &InboundFrame) -> Disposition {
        let Ok(entry) = self.entry(frame.source_node) else {
            warn!("frame from unknown node {} ignored", frame.source_node);
            return Disposition::Unhandled;
        };
        trace!("rx {}", hex::encode(frame.encode()));

        let ctx = self.context(entry);
        let registry = entry.registry.lock();
        registry.dispatch(&ctx, frame.command_class_id, &frame.payload, instance)
    }

    /// Take every queued frame, highest priority queue first.
    pub fn drain_outbound(&self) -> Vec<Outbound> {
        let mut frames: Vec<Outbound> = self.outbound.try_iter().collect();
        frames.sort_by_key(|outbound| outbound.queue);
        frames
    }

    /// Exchange frames with the network until nothing is left to send.
    pub fn pump(&self, network: &mut SimulatedNetwork) -> PumpStats {
        let mut stats = PumpStats::default();
        loop {
            let batch = self.drain_outbound();
            if batch.is_empty() {
                break;
            }
            for Outbound { frame, .. } in batch {
                stats.sent += 1;
                let Some(Reply { instance, frame: report }) = network.deliver(&frame) else {
                    continue;
                };
                match self.handle_inbound(instance, &report) {
                    Disposition::Handled => stats.handled += 1,
                    Disposition::Unhandled => stats.unhandled += 1,
                }
            }
        }
        debug!(
            "pump: {} sent, {} handled, {} unhandled",
            stats.sent, stats.handled, stats.unhandled
        );
        stats
    }
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("home_id", &format_args!("0x{:08X}", self.home_id))
            .field("nodes", &self.nodes.len())
            .field("values", &self.values.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_network_from_str;

    const NETWORK: &str = r#"
home_id: 0xC0FFEE00
nodes:
  - id: 5
    command_classes: [0x2D]
    groups: 3
  - id: 9
    command_classes: [0x20]
"#;

    #[test]
    fn test_channel_transport() {
        let (transport, rx) = ChannelTransport::new(TransmitOptions(0x05));
        let frame = zwcc_protocol::Command::BasicGet.to_frame(3, 1, transport.transmit_options()).unwrap();
        transport.send(frame.clone(), MsgQueue::Poll);
        assert_eq!(rx.try_recv().unwrap(), Outbound { frame, queue: MsgQueue::Poll });
    }

    #[test]
    fn test_drain_orders_by_queue_priority() {
        let config = load_network_from_str(NETWORK).unwrap();
        let driver = Driver::new(&config);
        let basic = ValueId::new(config.home_id, 9, 1, 0x20, 0);

        driver.refresh_node(5, RequestFlags::SESSION).unwrap();
        driver.create_values();
        driver.set_value(&basic, ValueData::Byte(1)).unwrap();

        let queues: Vec<MsgQueue> = driver.drain_outbound().iter().map(|o| o.queue).collect();
        assert_eq!(queues, vec![MsgQueue::Send, MsgQueue::Query, MsgQueue::Query, MsgQueue::Query]);
        assert!(driver.drain_outbound().is_empty());
    }

    #[test]
    fn test_unknown_node() {
        let config = load_network_from_str(NETWORK).unwrap();
        let driver = Driver::new(&config);
        assert!(matches!(
            driver.refresh_node(42, RequestFlags::ALL),
            Err(DriverError::UnknownNode(42))
        ));
        let frame = InboundFrame::new(42, 0x20, vec![0x03, 1]);
        assert_eq!(driver.handle_inbound(1, &frame), Disposition::Unhandled);
    }

    #[test]
    fn test_create_values_sends_nothing() {
        let config = load_network_from_str(NETWORK).unwrap();
        let driver = Driver::new(&config);
        driver.create_values();
        assert_eq!(driver.values().len(), 7);
        assert!(driver.drain_outbound().is_empty());
    }
}

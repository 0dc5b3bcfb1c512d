//! Bulk refresh and application value routing.

use tracing::{debug, info, warn};
use zwcc_metrics::{metric_defs, metrics};
use zwcc_protocol::MsgQueue;
use zwcc_values::{ValueData, ValueId};

use crate::{
    CommandClass, CommandClassError, CommandClassHandler, CommandClassRegistry, CommandContext, CommandResult,
    RequestFlags,
};

/// Outcome of refreshing one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// `request_state` calls made (class x instance).
    pub attempted: usize,
    /// Calls that queued every request.
    pub succeeded: usize,
    /// Calls where at least one request could not be queued.
    pub failed: usize,
    /// Calls for classes with nothing to refresh under the given flags.
    pub skipped: usize,
}

impl RefreshSummary {
    /// Whether every attempted call succeeded or was skipped.
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }

    /// Add another summary's counts to this one.
    pub fn merge(&mut self, other: RefreshSummary) {
        self.attempted += other.attempted;
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }
}

impl std::fmt::Display for RefreshSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} attempted, {} succeeded, {} failed, {} skipped",
            self.attempted, self.succeeded, self.failed, self.skipped
        )
    }
}

/// Drives refreshes and routes application reads and writes to handlers.
///
/// Holds no state: ordering and serialization per node belong to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestOrchestrator;

impl RequestOrchestrator {
    /// Create an orchestrator.
    pub fn new() -> Self {
        Self
    }

    /// Ask every registered class for its state on every instance.
    ///
    /// Classes are visited in ascending id order. A failing class never stops
    /// the refresh of the others.
    pub fn refresh_node(
        &self,
        registry: &mut CommandClassRegistry,
        ctx: &CommandContext<'_>,
        flags: RequestFlags,
        instances: &[u8],
        queue: MsgQueue,
    ) -> RefreshSummary {
        let node_id = registry.node_id();
        let mut summary = RefreshSummary::default();

        for cc in registry.iter_mut() {
            for &instance in instances {
                summary.attempted += 1;
                match cc.request_state(ctx, flags, instance, queue) {
                    Ok(()) => summary.succeeded += 1,
                    Err(CommandClassError::UnsupportedRequestFlags { .. }) => {
                        debug!(
                            "Node[{}]: {} has nothing to refresh for {}",
                            node_id,
                            cc.name(),
                            flags
                        );
                        summary.skipped += 1;
                    }
                    Err(e) => {
                        warn!(
                            "Node[{}]: refresh of {} instance {} incomplete: {}",
                            node_id,
                            cc.name(),
                            instance,
                            e
                        );
                        summary.failed += 1;
                    }
                }
            }
        }

        metrics::gauge!(metric_defs::VALUES_KNOWN.name).set(ctx.values.len() as f64);
        info!("Node[{}]: refresh queued ({})", node_id, summary);
        summary
    }

    /// Ask the owning class to re-read one value.
    pub fn request_value(
        &self,
        registry: &CommandClassRegistry,
        ctx: &CommandContext<'_>,
        id: &ValueId,
        queue: MsgQueue,
    ) -> CommandResult<()> {
        let cc = Self::owner(registry, id)?;
        cc.request_value(ctx, RequestFlags::ALL, id.index, id.instance, queue)
    }

    /// Write `data` to the device behind a value.
    ///
    /// The stored value keeps its old datum until the device reports back.
    pub fn set_value(
        &self,
        registry: &CommandClassRegistry,
        ctx: &CommandContext<'_>,
        id: &ValueId,
        data: ValueData,
    ) -> CommandResult<()> {
        let cc = Self::owner(registry, id)?;
        let value = ctx.values.get(id).ok_or(CommandClassError::UnknownValue(*id))?;
        let candidate = value.read().prepare_set(data)?;
        drop(value);
        cc.set_value(ctx, &candidate)
    }

    fn owner<'r>(registry: &'r CommandClassRegistry, id: &ValueId) -> CommandResult<&'r CommandClass> {
        if id.home_id != registry.home_id() || id.node_id != registry.node_id() {
            return Err(CommandClassError::UnknownValue(*id));
        }
        registry
            .get(id.command_class_id)
            .ok_or(CommandClassError::UnknownCommandClass {
                node_id: id.node_id,
                command_class: id.command_class_id,
            })
    }
}

//! Command class families.

mod basic;
mod scene_controller_conf;

pub use basic::Basic;
pub use scene_controller_conf::{SceneControllerConf, FIELD_DIMMING_DURATION, FIELD_SCENE_ID};

use tracing::{trace, warn};
use zwcc_metrics::{metric_defs, metrics, FrameLabels};
use zwcc_values::{ValueData, ValueId, ValueStore};

/// Write reported data into a value if it exists.
///
/// A missing value means the node's values have not been created yet; the
/// datum is dropped. Returns whether a value was updated.
fn refresh_value(values: &ValueStore, id: ValueId, data: ValueData) -> bool {
    let Some(value) = values.get(&id) else {
        trace!("Node[{}]: no value at {}, report datum dropped", id.node_id, id);
        return false;
    };

    match value.on_value_refreshed(data) {
        Ok(_) => {
            let labels = FrameLabels::new(id.node_id, id.command_class_id).to_labels();
            metrics::counter!(metric_defs::VALUES_REFRESHED.name, &labels).increment(1);
            true
        }
        Err(e) => {
            warn!("Node[{}]: report not applied: {}", id.node_id, e);
            false
        }
    }
}

/// Count a request that was not sent because the node lacks the command.
fn record_unsupported(node_id: u8, command_class_id: u8) {
    let labels = FrameLabels::new(node_id, command_class_id).to_labels();
    metrics::counter!(metric_defs::REQUESTS_UNSUPPORTED.name, &labels).increment(1);
}

//! Metric declarations for the command-class framework.
//!
//! Every metric the framework emits is declared once in [`metric_defs`] so the
//! name, kind, unit and label keys live in one place. The `metrics` crate is
//! re-exported; without an installed recorder every emission is a no-op.
//!
//! # Example
//!
//! ```rust
//! use zwcc_metrics::{metric_defs, metrics, FrameLabels};
//!
//! let labels = FrameLabels::new(5, 0x2D).with_queue("query");
//! metrics::counter!(metric_defs::FRAMES_SENT.name, &labels.to_labels()).increment(1);
//! ```

pub use metrics;

use metrics::{describe_counter, describe_gauge, describe_histogram, Unit};

/// The kind of metric (counter, gauge, or histogram).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// A monotonically increasing counter.
    Counter,
    /// A gauge that can go up and down.
    Gauge,
    /// A histogram for recording distributions.
    Histogram,
}

impl MetricKind {
    /// Returns the kind as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metric declaration with its metadata.
///
/// ```rust
/// use zwcc_metrics::{Metric, MetricKind};
/// use zwcc_metrics::metrics::Unit;
///
/// const RETRIES: Metric = Metric::counter("zwcc.example.retries")
///     .with_description("Example counter")
///     .with_unit(Unit::Count)
///     .with_labels(&["node"]);
///
/// assert_eq!(RETRIES.kind, MetricKind::Counter);
/// ```
#[derive(Debug, Clone)]
pub struct Metric {
    /// The metric name (e.g., "zwcc.frames.sent").
    pub name: &'static str,
    /// The kind of metric.
    pub kind: MetricKind,
    /// Human-readable description.
    pub description: &'static str,
    /// The unit of measurement (optional).
    pub unit: Option<Unit>,
    /// Expected label keys.
    pub labels: &'static [&'static str],
}

impl Metric {
    const fn with_kind(name: &'static str, kind: MetricKind) -> Self {
        Self {
            name,
            kind,
            description: "",
            unit: None,
            labels: &[],
        }
    }

    /// Declare a counter.
    pub const fn counter(name: &'static str) -> Self {
        Self::with_kind(name, MetricKind::Counter)
    }

    /// Declare a gauge.
    pub const fn gauge(name: &'static str) -> Self {
        Self::with_kind(name, MetricKind::Gauge)
    }

    /// Declare a histogram.
    pub const fn histogram(name: &'static str) -> Self {
        Self::with_kind(name, MetricKind::Histogram)
    }

    /// Sets the description.
    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Sets the unit.
    pub const fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Sets the expected label keys.
    pub const fn with_labels(mut self, labels: &'static [&'static str]) -> Self {
        self.labels = labels;
        self
    }

    /// Registers this metric's description with the installed recorder.
    pub fn describe(&self) {
        match (self.kind, self.unit) {
            (MetricKind::Counter, Some(unit)) => {
                describe_counter!(self.name, unit, self.description);
            }
            (MetricKind::Counter, None) => {
                describe_counter!(self.name, self.description);
            }
            (MetricKind::Gauge, Some(unit)) => {
                describe_gauge!(self.name, unit, self.description);
            }
            (MetricKind::Gauge, None) => {
                describe_gauge!(self.name, self.description);
            }
            (MetricKind::Histogram, Some(unit)) => {
                describe_histogram!(self.name, unit, self.description);
            }
            (MetricKind::Histogram, None) => {
                describe_histogram!(self.name, self.description);
            }
        }
    }
}

/// All metric definitions for the framework.
pub mod metric_defs {
    use super::{Metric, Unit};

    /// Labels present on every frame-level metric.
    pub const FRAME_LABELS: &[&str] = &["node", "command_class"];

    // ========================================================================
    // Outbound
    // ========================================================================

    /// Frames handed to the transport.
    ///
    /// Labels: node, command_class, queue
    pub const FRAMES_SENT: Metric = Metric::counter("zwcc.frames.sent")
        .with_description("Frames handed to the transport")
        .with_unit(Unit::Count)
        .with_labels(&["node", "command_class", "queue"]);

    /// Encoded frame size in bytes.
    ///
    /// Labels: node, command_class
    pub const FRAME_SIZE: Metric = Metric::histogram("zwcc.frames.size_bytes")
        .with_description("Encoded outbound frame size in bytes")
        .with_unit(Unit::Bytes)
        .with_labels(FRAME_LABELS);

    /// Requests not sent because the node does not advertise the command.
    ///
    /// Labels: node, command_class
    pub const REQUESTS_UNSUPPORTED: Metric = Metric::counter("zwcc.requests.unsupported")
        .with_description("Requests skipped because the node does not support them")
        .with_unit(Unit::Count)
        .with_labels(FRAME_LABELS);

    // ========================================================================
    // Inbound
    // ========================================================================

    /// Inbound frames a handler recognized.
    ///
    /// Labels: node, command_class
    pub const REPORTS_HANDLED: Metric = Metric::counter("zwcc.reports.handled")
        .with_description("Inbound frames recognized by a command class")
        .with_unit(Unit::Count)
        .with_labels(FRAME_LABELS);

    /// Inbound frames no handler recognized.
    ///
    /// Labels: node, command_class
    pub const REPORTS_UNHANDLED: Metric = Metric::counter("zwcc.reports.unhandled")
        .with_description("Inbound frames no command class recognized")
        .with_unit(Unit::Count)
        .with_labels(FRAME_LABELS);

    /// Inbound frames rejected as malformed.
    ///
    /// Labels: node, command_class
    pub const REPORTS_MALFORMED: Metric = Metric::counter("zwcc.reports.malformed")
        .with_description("Inbound frames rejected as malformed")
        .with_unit(Unit::Count)
        .with_labels(FRAME_LABELS);

    // ========================================================================
    // Values
    // ========================================================================

    /// Values updated from a report.
    ///
    /// Labels: node, command_class
    pub const VALUES_REFRESHED: Metric = Metric::counter("zwcc.values.refreshed")
        .with_description("Values updated from device reports")
        .with_unit(Unit::Count)
        .with_labels(FRAME_LABELS);

    /// Values currently known.
    pub const VALUES_KNOWN: Metric = Metric::gauge("zwcc.values.known")
        .with_description("Values currently held in the store")
        .with_unit(Unit::Count);

    /// All metrics, for [`describe_metrics`](super::describe_metrics).
    pub const ALL: &[&Metric] = &[
        &FRAMES_SENT,
        &FRAME_SIZE,
        &REQUESTS_UNSUPPORTED,
        &REPORTS_HANDLED,
        &REPORTS_UNHANDLED,
        &REPORTS_MALFORMED,
        &VALUES_REFRESHED,
        &VALUES_KNOWN,
    ];
}

/// Labels identifying the node and command class of a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLabels {
    /// Node id.
    pub node: u8,
    /// Command class id.
    pub command_class: u8,
    /// Send queue, for outbound metrics.
    pub queue: Option<&'static str>,
}

impl FrameLabels {
    /// Labels for a node and command class.
    pub fn new(node: u8, command_class: u8) -> Self {
        Self {
            node,
            command_class,
            queue: None,
        }
    }

    /// Add the send queue label.
    pub fn with_queue(mut self, queue: &'static str) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Converts to the `metrics` crate label format.
    pub fn to_labels(&self) -> Vec<(&'static str, String)> {
        let mut labels = vec![
            ("node", self.node.to_string()),
            ("command_class", format!("0x{:02X}", self.command_class)),
        ];
        if let Some(queue) = self.queue {
            labels.push(("queue", queue.to_string()));
        }
        labels
    }
}

/// Describes all metrics. Call once after installing a recorder.
pub fn describe_metrics() {
    for metric in metric_defs::ALL {
        metric.describe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_labels() {
        let labels = FrameLabels::new(5, 0x2D).to_labels();
        assert_eq!(labels.len(), 2);
        assert!(labels.contains(&("node", "5".to_string())));
        assert!(labels.contains(&("command_class", "0x2D".to_string())));
    }

    #[test]
    fn test_frame_labels_with_queue() {
        let labels = FrameLabels::new(5, 0x20).with_queue("send").to_labels();
        assert_eq!(labels.len(), 3);
        assert!(labels.contains(&("queue", "send".to_string())));
    }

    #[test]
    fn test_metric_definitions() {
        assert_eq!(metric_defs::FRAMES_SENT.name, "zwcc.frames.sent");
        assert_eq!(metric_defs::FRAMES_SENT.kind, MetricKind::Counter);
        assert_eq!(metric_defs::FRAME_SIZE.kind, MetricKind::Histogram);
        assert_eq!(metric_defs::FRAME_SIZE.unit, Some(Unit::Bytes));
        assert_eq!(metric_defs::VALUES_KNOWN.kind, MetricKind::Gauge);
        assert_eq!(metric_defs::REPORTS_HANDLED.labels, metric_defs::FRAME_LABELS);
    }

    #[test]
    fn test_all_metrics_have_unique_names() {
        let mut names: Vec<&str> = metric_defs::ALL.iter().map(|m| m.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), metric_defs::ALL.len());
    }

    #[test]
    fn test_describe_without_recorder() {
        // No recorder installed: describing must not panic
        describe_metrics();
    }
}

//! Send queues and transmit options.

use crate::constants::*;

/// The driver queue a frame is submitted to.
///
/// Queues are listed highest priority first; the driver drains a queue
/// completely before looking at the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MsgQueue {
    /// Application-initiated commands that must go out first.
    Command,
    /// No-operation pings.
    NoOp,
    /// Controller housekeeping.
    Controller,
    /// Frames held for a sleeping node until it wakes.
    WakeUp,
    /// Ordinary outbound writes.
    Send,
    /// Node interview and refresh queries.
    Query,
    /// Periodic polling.
    Poll,
}

impl MsgQueue {
    /// Returns the queue as a lowercase label.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MsgQueue::Command => "command",
            MsgQueue::NoOp => "noop",
            MsgQueue::Controller => "controller",
            MsgQueue::WakeUp => "wakeup",
            MsgQueue::Send => "send",
            MsgQueue::Query => "query",
            MsgQueue::Poll => "poll",
        }
    }
}

impl std::fmt::Display for MsgQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The transport-specific options byte appended to every outbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransmitOptions(pub u8);

impl TransmitOptions {
    /// Acknowledged, auto-routed, explorer frames allowed.
    pub const DEFAULT: TransmitOptions =
        TransmitOptions(TRANSMIT_OPTION_ACK | TRANSMIT_OPTION_AUTO_ROUTE | TRANSMIT_OPTION_EXPLORE);

    /// The raw options byte.
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Whether every bit of `option` is set.
    pub const fn contains(&self, option: u8) -> bool {
        self.0 & option == option
    }
}

impl Default for TransmitOptions {
    fn default() -> Self {
        TransmitOptions::DEFAULT
    }
}

impl From<u8> for TransmitOptions {
    fn from(bits: u8) -> Self {
        TransmitOptions(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_priority_order() {
        assert!(MsgQueue::Command < MsgQueue::Send);
        assert!(MsgQueue::Send < MsgQueue::Query);
        assert!(MsgQueue::Query < MsgQueue::Poll);
    }

    #[test]
    fn test_default_transmit_options() {
        let options = TransmitOptions::default();
        assert_eq!(options.bits(), 0x25);
        assert!(options.contains(TRANSMIT_OPTION_ACK));
        assert!(options.contains(TRANSMIT_OPTION_AUTO_ROUTE));
        assert!(!options.contains(TRANSMIT_OPTION_NO_ROUTE));
    }
}

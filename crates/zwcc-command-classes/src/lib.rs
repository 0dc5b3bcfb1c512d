//! Command-class handler framework.
//!
//! A node's command classes are held in a [`CommandClassRegistry`]. Each
//! registered class is a [`CommandClass`], a closed enum over the supported
//! families, and every family implements [`CommandClassHandler`]:
//!
//! - requests are encoded into frames and handed to a [`Transport`]
//! - reports coming back are decoded and written into the [`ValueStore`]
//! - application writes become Set frames; the device's report is the only
//!   acknowledgement
//!
//! The [`RequestOrchestrator`] drives bulk refreshes and routes single-value
//! reads and writes to the owning handler.
//!
//! # Example
//!
//! ```rust
//! use zwcc_command_classes::*;
//! use zwcc_protocol::{Frame, MsgQueue, TransmitOptions};
//! use zwcc_values::ValueStore;
//!
//! struct ThreeButtons;
//! impl NodeCapabilities for ThreeButtons {
//!     fn group_count(&self, _node_id: u8) -> u8 { 3 }
//!     fn is_command_supported(&self, _node_id: u8, _class: u8, _command: u8) -> bool { true }
//! }
//!
//! struct Discard;
//! impl Transport for Discard {
//!     fn transmit_options(&self) -> TransmitOptions { TransmitOptions::DEFAULT }
//!     fn send(&self, _frame: Frame, _queue: MsgQueue) {}
//! }
//!
//! let values = ValueStore::new();
//! let ctx = CommandContext::new(&values, &ThreeButtons, &Discard);
//!
//! let mut registry = CommandClassRegistry::new(0xC0FFEE, 5);
//! registry.add(0x2D);
//!
//! let summary = RequestOrchestrator::new().refresh_node(
//!     &mut registry, &ctx, RequestFlags::SESSION, &[1], MsgQueue::Query);
//! assert_eq!(summary.succeeded, 1);
//!
//! // A report for group 2: scene 5, dimming duration 10
//! let disposition = registry.dispatch(&ctx, 0x2D, &[0x03, 0x02, 0x05, 0x0A], 1);
//! assert_eq!(disposition, Disposition::Handled);
//! ```

mod command_class;
mod context;
mod error;
mod flags;
mod handler;
mod orchestrator;
mod registry;

pub mod families;

pub use command_class::*;
pub use context::*;
pub use error::*;
pub use flags::*;
pub use handler::*;
pub use orchestrator::*;
pub use registry::*;

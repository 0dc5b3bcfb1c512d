//! Command-class wire protocol
//!
//! This crate provides the byte-level encoding shared by every command class:
//! outbound request frames, inbound application-command frames, and the
//! per-class commands and reports carried inside them.
//!
//! # Frame Layout
//!
//! Outbound (controller → device):
//!
//! ```text
//! +------+-----+----------+---------+-----------+-----------+
//! | node | len | class id | command | params... | tx option |
//! +------+-----+----------+---------+-----------+-----------+
//!              |<------------- len ------------>|
//! ```
//!
//! Inbound (device → controller):
//!
//! ```text
//! +--------+-----+----------+---------+-----------+
//! | source | len | class id | command | params... |
//! +--------+-----+----------+---------+-----------+
//! ```
//!
//! # Example
//!
//! ```rust
//! use zwcc_protocol::{Command, Report, TransmitOptions};
//!
//! let cmd = Command::SceneControllerConfGet { group_id: 2 };
//! let frame = cmd.to_frame(5, 1, TransmitOptions::DEFAULT).unwrap();
//! assert_eq!(frame.as_bytes(), &[5, 3, 0x2D, 0x02, 2, 0x25]);
//!
//! let report = Report::decode(0x2D, &[0x03, 2, 5, 10]).unwrap();
//! assert_eq!(
//!     report,
//!     Report::SceneControllerConf { group_id: 2, scene_id: 5, dimming_duration: 10 }
//! );
//! ```

mod commands;
mod constants;
mod error;
mod frame;
mod inbound;
mod queue;
mod reports;

pub use commands::*;
pub use constants::*;
pub use error::*;
pub use frame::*;
pub use inbound::*;
pub use queue::*;
pub use reports::*;

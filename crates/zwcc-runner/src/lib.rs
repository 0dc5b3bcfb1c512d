//! Driver and simulated network for the command-class framework.
//!
//! A [`NetworkConfig`] describes the nodes of one network. The [`Driver`]
//! owns the value store and one command class registry per node; frames it
//! queues are carried by a [`SimulatedNetwork`] that answers like real
//! devices, dropping frames with a seeded probability.
//!
//! ```rust
//! use zwcc_command_classes::RequestFlags;
//! use zwcc_runner::{load_network_from_str, Driver, SimulatedNetwork};
//!
//! let config = load_network_from_str(r#"
//! home_id: 0xC0FFEE00
//! nodes:
//!   - id: 5
//!     command_classes: [0x2D]
//!     groups: 2
//!     device:
//!       scenes:
//!         - { group: 2, scene_id: 7, dimming_duration: 3 }
//! "#).unwrap();
//!
//! let driver = Driver::new(&config);
//! let mut network = SimulatedNetwork::new(&config);
//! driver.refresh_all(RequestFlags::ALL);
//! driver.pump(&mut network);
//!
//! let labelled: Vec<String> = driver.values().values().iter().map(|v| v.to_string()).collect();
//! assert!(labelled.contains(&"Button 2 Scene Id = 7".to_string()));
//! ```

mod config;
mod driver;
mod error;
mod simulator;

pub use config::*;
pub use driver::*;
pub use error::*;
pub use simulator::*;

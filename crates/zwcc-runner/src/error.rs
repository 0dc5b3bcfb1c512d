//! Runner error types.

use std::path::PathBuf;

use thiserror::Error;
use zwcc_command_classes::CommandClassError;

/// Errors loading or validating a network description.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The YAML did not match the expected layout.
    #[error("invalid network description: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A node id outside 1..=232.
    #[error("node id {0} is outside 1..=232")]
    InvalidNodeId(u8),

    /// Two nodes share an id.
    #[error("node {0} is declared twice")]
    DuplicateNode(u8),

    /// Any other semantic problem.
    #[error("node {node}: {reason}")]
    InvalidNode {
        /// Offending node.
        node: u8,
        /// What is wrong with it.
        reason: String,
    },

    /// Loss probability outside 0..=1.
    #[error("loss probability {0} is outside 0..=1")]
    InvalidLossProbability(f64),
}

/// Errors from driver operations.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The node is not part of the network.
    #[error("unknown node {0}")]
    UnknownNode(u8),

    /// A command class operation failed.
    #[error(transparent)]
    Command(#[from] CommandClassError),
}

/// Result type alias for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

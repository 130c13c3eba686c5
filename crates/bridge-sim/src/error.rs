//! Error types for the traffic simulation.

use thiserror::Error;

/// Error type for simulation runs.
#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration value out of range.
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read.
    #[error("Configuration file error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML for [`SimConfig`](crate::SimConfig).
    #[error("Configuration parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Monitor error passthrough.
    #[error("Monitor error: {0}")]
    Monitor(#[from] bridge_monitor::MonitorError),

    /// An entity or generator task panicked or was cancelled.
    #[error("Task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

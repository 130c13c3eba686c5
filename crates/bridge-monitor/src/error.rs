//! Error types for the bridge monitor.

use thiserror::Error;

use crate::class::TrafficClass;

/// Result type alias for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Errors surfaced by the bridge monitor.
///
/// The admission protocol itself cannot fail. These variants cover
/// caller misuse, a poisoned lock, and violations found in a
/// recorded trace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    /// A leave was issued for a class with nobody on the bridge.
    ///
    /// The state is left unchanged.
    #[error("{class} left the bridge without having entered it")]
    NotCrossing {
        /// Class named in the leave call
        class: TrafficClass,
    },

    /// A thread panicked while holding the monitor lock.
    #[error("bridge monitor lock poisoned")]
    Poisoned,

    /// Incompatible classes were on the bridge at the same time.
    #[error("safety violation at operation {operation}: {description}")]
    SafetyViolation {
        /// Operation counter at the offending transition
        operation: u64,
        /// Human-readable description of the occupancy
        description: String,
    },

    /// A turn policy threshold would starve every other class.
    #[error("invalid turn policy: {0}")]
    InvalidPolicy(String),
}

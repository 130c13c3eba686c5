//! # Bridge Traffic Simulation
//!
//! Randomized traffic driving a [`BridgeMonitor`]: cars arrive every
//! 0.5 s on average in a random direction, pedestrians every 5 s. Each
//! entity waits for admission, spends a normally distributed time on
//! the bridge, and leaves.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     Simulation                       │
//! │   ┌────────────────┐          ┌────────────────┐     │
//! │   │ car generator  │          │ ped generator  │     │
//! │   └───────┬────────┘          └───────┬────────┘     │
//! │           │ spawn per entity          │              │
//! │           ▼                           ▼              │
//! │      cross_bridge ─── enter / leave ──► BridgeMonitor│
//! │                                           │          │
//! │                            TraceRecorder ◄┘          │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bridge_sim::{SimConfig, Simulation};
//!
//! # #[tokio::main]
//! # async fn main() -> bridge_sim::Result<()> {
//! let config = SimConfig::load("bridge.toml")?;
//! let report = Simulation::new(config)?.run().await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Notes
//!
//! - Blocking monitor calls run on tokio's blocking pool
//! - Crossing delays are async sleeps taken outside the monitor lock
//! - `time_scale` multiplies every delay, so tests can run in milliseconds
//! - A fixed `seed` reproduces directions and delays, not thread timing

mod config;
mod error;
mod report;
mod simulation;
mod timing;
mod traffic;

pub use config::{CrossingTime, SimConfig};
pub use error::SimError;
pub use report::{Safety, SimReport};
pub use simulation::Simulation;
pub use timing::{Arrivals, Crossings};
pub use traffic::{cross_bridge, Entity, EntityPhase};

// Re-export monitor types for convenience
pub use bridge_monitor::{
    BridgeMonitor, BridgeState, ClassCounts, Direction, MonitorError, TrafficClass, Turn,
    TurnPolicy,
};

/// Core result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests;

//! # Bridge Monitor
//!
//! Mutual exclusion for a one-lane bridge shared by three traffic classes:
//! cars heading north, cars heading south, and pedestrians.
//!
//! ## Rules
//!
//! - Cars heading the same way may cross together
//! - Pedestrians may cross together
//! - Opposing cars never share the bridge, and neither do cars and pedestrians
//!
//! A soft priority token ([`Turn`]) is reassigned every time an entity
//! leaves. A class only takes priority once its backlog reaches a
//! threshold (2 pedestrians, 5 cars of one direction).
//!
//! ## Components
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`BridgeState`] | Waiting/crossing counters and admission predicates |
//! | [`TurnPolicy`] | Threshold rule choosing the next turn |
//! | [`BridgeMonitor`] | Lock + condition variables around the state |
//! | [`CrossingPermit`] | Leaves the bridge when dropped |
//! | [`TraceRecorder`] | Captures every transition for safety checks |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               BridgeMonitor                 │
//! │  ┌──────────────────────────────────────┐   │
//! │  │ Mutex<BridgeState>                   │   │
//! │  │  turn · waiting[N,S,P] · crossing[…] │   │
//! │  └──────────────────────────────────────┘   │
//! │   Condvar north · Condvar south · Condvar P │
//! │   TurnPolicy · Option<BridgeObserver>       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use bridge_monitor::{BridgeMonitor, Direction};
//!
//! let monitor = BridgeMonitor::new();
//!
//! monitor.enter_car(Direction::North)?;
//! // ... on the bridge ...
//! monitor.leave_car(Direction::North)?;
//!
//! assert!(monitor.status()?.is_idle());
//! # Ok::<(), bridge_monitor::MonitorError>(())
//! ```

mod class;
mod error;
mod monitor;
mod permit;
mod policy;
mod state;
mod trace;

pub use class::{Direction, TrafficClass, Turn};
pub use error::{MonitorError, Result};
pub use monitor::BridgeMonitor;
pub use permit::CrossingPermit;
pub use policy::TurnPolicy;
pub use state::{BridgeState, ClassCounts};
pub use trace::{verify_trace, BridgeEvent, BridgeObserver, EventKind, TraceRecorder, TraceSummary};

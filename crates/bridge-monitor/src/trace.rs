//! Transition tracing.
//!
//! A [`BridgeObserver`] attached to the monitor sees every state
//! transition while the lock is held, so the snapshots it receives are
//! exactly the states other entities could observe. [`TraceRecorder`]
//! keeps them for offline safety checks.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::class::{TrafficClass, Turn};
use crate::error::{MonitorError, Result};
use crate::state::{BridgeState, ClassCounts};

/// What happened to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Asked to enter and started waiting.
    Requested,
    /// Got onto the bridge.
    Admitted,
    /// Left the bridge. The snapshot carries the reassigned turn.
    Left,
}

/// A single transition with the state right after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeEvent {
    /// Transition type.
    pub kind: EventKind,
    /// Class of the entity involved.
    pub class: TrafficClass,
    /// State after the transition.
    pub state: BridgeState,
}

/// Receives monitor transitions.
///
/// Called with the monitor lock held: implementations must not call
/// back into the monitor.
pub trait BridgeObserver: Send + Sync {
    /// Handles one transition.
    fn on_event(&self, event: &BridgeEvent);
}

/// Observer that stores every event in order.
#[derive(Debug, Default)]
pub struct TraceRecorder {
    events: Mutex<Vec<BridgeEvent>>,
}

impl TraceRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<BridgeEvent> {
        self.lock().clone()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Checks every recorded snapshot for mutual exclusion.
    ///
    /// # Errors
    ///
    /// Returns the first [`MonitorError::SafetyViolation`] found.
    pub fn verify(&self) -> Result<()> {
        verify_trace(&self.lock())
    }

    /// Summarizes the recorded trace.
    #[must_use]
    pub fn summary(&self) -> TraceSummary {
        TraceSummary::from_events(&self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<BridgeEvent>> {
        // A panic while pushing cannot leave the vector half-written.
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl BridgeObserver for TraceRecorder {
    fn on_event(&self, event: &BridgeEvent) {
        self.lock().push(event.clone());
    }
}

/// Checks a sequence of snapshots for mutual exclusion.
///
/// # Errors
///
/// Returns the first [`MonitorError::SafetyViolation`] found.
pub fn verify_trace(events: &[BridgeEvent]) -> Result<()> {
    events.iter().try_for_each(|event| {
        event.state.check_invariants().map_err(|err| match err {
            MonitorError::SafetyViolation {
                operation,
                description,
            } => MonitorError::SafetyViolation {
                operation,
                description: format!("{description} after {} {:?}", event.class, event.kind),
            },
            other => other,
        })
    })
}

/// Aggregate figures over a trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceSummary {
    /// Total events.
    pub events: usize,
    /// Admissions per class.
    pub admitted: ClassCounts,
    /// Largest simultaneous crossing count seen per class.
    pub max_crossing: ClassCounts,
    /// Largest waiting count seen per class.
    pub max_waiting: ClassCounts,
    /// Number of leaves that changed the turn.
    pub turn_changes: usize,
}

impl TraceSummary {
    /// Builds a summary from events in recording order.
    #[must_use]
    pub fn from_events(events: &[BridgeEvent]) -> Self {
        let mut summary = Self {
            events: events.len(),
            ..Self::default()
        };
        let mut turn = Turn::Any;
        for event in events {
            summary.max_crossing = summary.max_crossing.max(event.state.crossing());
            summary.max_waiting = summary.max_waiting.max(event.state.waiting());
            match event.kind {
                EventKind::Admitted => summary.admitted.increment(event.class),
                EventKind::Left if event.state.turn() != turn => summary.turn_changes += 1,
                _ => {}
            }
            turn = event.state.turn();
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::Direction;
    use crate::monitor::BridgeMonitor;
    use std::sync::Arc;

    fn recorded(run: impl FnOnce(&BridgeMonitor)) -> Vec<BridgeEvent> {
        let recorder = Arc::new(TraceRecorder::new());
        let monitor = BridgeMonitor::new().with_observer(recorder.clone());
        run(&monitor);
        recorder.events()
    }

    #[test]
    fn test_recorder_starts_empty() {
        let recorder = TraceRecorder::new();
        assert!(recorder.is_empty());
        assert_eq!(recorder.len(), 0);
        assert!(recorder.verify().is_ok());
        assert_eq!(recorder.summary(), TraceSummary::default());
    }

    #[test]
    fn test_summary_counts_admissions_and_peaks() {
        let events = recorded(|monitor| {
            monitor.enter_car(Direction::North).unwrap();
            monitor.enter_car(Direction::North).unwrap();
            monitor.leave_car(Direction::North).unwrap();
            monitor.leave_car(Direction::North).unwrap();
            monitor.enter_pedestrian().unwrap();
            monitor.leave_pedestrian().unwrap();
        });

        let summary = TraceSummary::from_events(&events);
        assert_eq!(summary.events, 9);
        assert_eq!(summary.admitted, ClassCounts::new(2, 0, 1));
        assert_eq!(summary.max_crossing, ClassCounts::new(2, 0, 1));
        assert_eq!(summary.max_waiting, ClassCounts::new(1, 0, 1));
        assert_eq!(summary.turn_changes, 0);
        assert!(verify_trace(&events).is_ok());
    }

    #[test]
    fn test_verify_flags_mixed_occupancy() {
        let mut events = recorded(|monitor| {
            monitor.enter_car(Direction::South).unwrap();
        });

        // Forge a snapshot with a pedestrian sharing the bridge.
        let mut forged = events[1].state;
        forged.admit(TrafficClass::Pedestrian);
        events.push(BridgeEvent {
            kind: EventKind::Admitted,
            class: TrafficClass::Pedestrian,
            state: forged,
        });

        match verify_trace(&events) {
            Err(MonitorError::SafetyViolation { description, .. }) => {
                assert!(description.contains("N=0 S=1 P=1"), "{description}");
                assert!(description.contains("pedestrian"), "{description}");
            }
            other => panic!("expected safety violation, got {other:?}"),
        }
    }

    #[test]
    fn test_events_serialize() {
        let events = recorded(|monitor| {
            monitor.enter_pedestrian().unwrap();
        });
        let json = serde_json::to_string(&events[1]).unwrap();
        assert!(json.contains(r#""kind":"admitted""#), "{json}");
        assert!(json.contains(r#""class":"pedestrian""#), "{json}");
    }
}

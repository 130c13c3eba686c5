//! Outcome of a simulation run.

use bridge_monitor::{BridgeState, ClassCounts, TraceSummary, Turn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Safety verdict over the captured trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Safety {
    /// Every snapshot satisfied mutual exclusion.
    Safe,
    /// At least one snapshot had incompatible classes on the bridge.
    Violated {
        /// Description of the first violation.
        description: String,
    },
}

impl Safety {
    /// Returns true for [`Safety::Safe`].
    #[must_use]
    pub const fn is_safe(&self) -> bool {
        matches!(self, Self::Safe)
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimReport {
    /// Seed the generators were started with.
    pub seed: u64,
    /// Entities that reached `Done`, per class.
    pub completed: ClassCounts,
    /// Monitor state once every entity finished.
    pub final_state: BridgeState,
    /// Figures over the recorded trace.
    pub trace: TraceSummary,
    /// Mutual exclusion verdict.
    pub safety: Safety,
    /// Wall-clock duration of the run in milliseconds.
    pub elapsed_ms: u64,
}

impl SimReport {
    /// Returns true when the trace was safe and the bridge ended idle.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.safety.is_safe() && self.final_state.is_idle()
    }

    /// Final turn left on the monitor.
    #[must_use]
    pub const fn final_turn(&self) -> Turn {
        self.final_state.turn()
    }
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "seed:           {}", self.seed)?;
        writeln!(f, "completed:      {}", self.completed)?;
        writeln!(f, "max crossing:   {}", self.trace.max_crossing)?;
        writeln!(f, "max waiting:    {}", self.trace.max_waiting)?;
        writeln!(f, "turn changes:   {}", self.trace.turn_changes)?;
        writeln!(f, "trace events:   {}", self.trace.events)?;
        writeln!(f, "operations:     {}", self.final_state.operations())?;
        writeln!(f, "elapsed:        {} ms", self.elapsed_ms)?;
        match &self.safety {
            Safety::Safe => write!(f, "safety:         ok"),
            Safety::Violated { description } => write!(f, "safety:         VIOLATED ({description})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(safety: Safety) -> SimReport {
        SimReport {
            seed: 1,
            completed: ClassCounts::new(2, 3, 1),
            final_state: BridgeState::new(),
            trace: TraceSummary::default(),
            safety,
            elapsed_ms: 12,
        }
    }

    #[test]
    fn test_clean_report() {
        let report = report(Safety::Safe);
        assert!(report.is_clean());
        assert_eq!(report.final_turn(), Turn::Any);
        assert!(report.to_string().contains("safety:         ok"));
        assert!(report.to_string().contains("N=2 S=3 P=1"));
    }

    #[test]
    fn test_violation_is_not_clean() {
        let report = report(Safety::Violated {
            description: "crossing N=1 S=1 P=0".to_string(),
        });
        assert!(!report.is_clean());
        assert!(report.to_string().contains("VIOLATED"));
    }

    #[test]
    fn test_report_json() {
        let json = serde_json::to_value(report(Safety::Safe)).unwrap();
        assert_eq!(json["safety"], "safe");
        assert_eq!(json["completed"]["south"], 3);
        assert_eq!(json["final_state"]["turn"], "any");
    }
}

//! # Turn-Assignment Policy
//!
//! Decides which class holds priority after an entity leaves.
//!
//! ## Rule
//!
//! Checked in fixed order on the waiting counts:
//!
//! | Order | Condition | Turn |
//! |-------|-----------|------|
//! | 1 | pedestrians waiting ≥ 2 | `Pedestrian` |
//! | 2 | northbound waiting ≥ 5 | `North` |
//! | 3 | southbound waiting ≥ 5 | `South` |
//! | 4 | otherwise | `Any` |
//!
//! Pedestrians cross slowly, so a small backlog justifies a batch. Cars
//! cross fast and need a larger backlog before interrupting traffic.
//! Below both thresholds the bridge stays open to whoever is eligible.
//!
//! ## Example
//!
//! ```rust
//! use bridge_monitor::{ClassCounts, Turn, TurnPolicy};
//!
//! let policy = TurnPolicy::default();
//! assert_eq!(policy.assign(&ClassCounts::new(4, 0, 1)), Turn::Any);
//! assert_eq!(policy.assign(&ClassCounts::new(5, 9, 1)), Turn::North);
//! assert_eq!(policy.assign(&ClassCounts::new(5, 9, 2)), Turn::Pedestrian);
//! ```

use serde::{Deserialize, Serialize};

use crate::class::{Direction, Turn};
use crate::error::{MonitorError, Result};
use crate::state::ClassCounts;

/// Backlog thresholds at which a class seizes priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnPolicy {
    /// Waiting pedestrians needed for a pedestrian turn.
    pub pedestrian_threshold: u32,
    /// Waiting cars of one direction needed for that direction's turn.
    pub car_threshold: u32,
}

impl TurnPolicy {
    /// Creates the policy with the standard thresholds.
    ///
    /// Defaults:
    /// - Pedestrian threshold: 2
    /// - Car threshold: 5 (per direction)
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pedestrian_threshold: 2,
            car_threshold: 5,
        }
    }

    /// Sets the pedestrian threshold.
    #[must_use]
    pub const fn with_pedestrian_threshold(mut self, threshold: u32) -> Self {
        self.pedestrian_threshold = threshold;
        self
    }

    /// Sets the per-direction car threshold.
    #[must_use]
    pub const fn with_car_threshold(mut self, threshold: u32) -> Self {
        self.car_threshold = threshold;
        self
    }

    /// Computes the next turn from the waiting counts.
    ///
    /// Pure: the result depends only on `waiting` and the thresholds.
    #[must_use]
    pub const fn assign(&self, waiting: &ClassCounts) -> Turn {
        if waiting.pedestrian >= self.pedestrian_threshold {
            Turn::Pedestrian
        } else if waiting.cars(Direction::North) >= self.car_threshold {
            Turn::North
        } else if waiting.cars(Direction::South) >= self.car_threshold {
            Turn::South
        } else {
            Turn::Any
        }
    }

    /// Rejects thresholds that would pin the turn permanently.
    ///
    /// A zero threshold is always met, so its class would hold the turn
    /// forever and the others would never be admitted.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidPolicy`] if either threshold is zero.
    pub fn validate(&self) -> Result<()> {
        if self.pedestrian_threshold == 0 {
            return Err(MonitorError::InvalidPolicy(
                "pedestrian_threshold must be at least 1".to_string(),
            ));
        }
        if self.car_threshold == 0 {
            return Err(MonitorError::InvalidPolicy(
                "car_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TurnPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assign(north: u32, south: u32, pedestrian: u32) -> Turn {
        TurnPolicy::default().assign(&ClassCounts::new(north, south, pedestrian))
    }

    #[test]
    fn test_defaults() {
        let policy = TurnPolicy::default();
        assert_eq!(policy.pedestrian_threshold, 2);
        assert_eq!(policy.car_threshold, 5);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_nothing_waiting_is_any() {
        assert_eq!(assign(0, 0, 0), Turn::Any);
    }

    #[test]
    fn test_pedestrian_boundary() {
        assert_eq!(assign(0, 0, 1), Turn::Any);
        assert_eq!(assign(0, 0, 2), Turn::Pedestrian);
        assert_eq!(assign(0, 0, 3), Turn::Pedestrian);
    }

    #[test]
    fn test_car_boundaries() {
        assert_eq!(assign(4, 0, 0), Turn::Any);
        assert_eq!(assign(5, 0, 0), Turn::North);
        assert_eq!(assign(0, 4, 0), Turn::Any);
        assert_eq!(assign(0, 5, 0), Turn::South);
        assert_eq!(assign(4, 4, 1), Turn::Any);
    }

    #[test]
    fn test_priority_order() {
        // Pedestrians beat both car directions.
        assert_eq!(assign(50, 50, 2), Turn::Pedestrian);
        // North is checked before south, whatever the backlog sizes.
        assert_eq!(assign(5, 50, 1), Turn::North);
        assert_eq!(assign(4, 50, 1), Turn::South);
    }

    #[test]
    fn test_full_boundary_grid() {
        for pedestrian in [1, 2] {
            for north in [4, 5] {
                for south in [4, 5] {
                    let expected = if pedestrian >= 2 {
                        Turn::Pedestrian
                    } else if north >= 5 {
                        Turn::North
                    } else if south >= 5 {
                        Turn::South
                    } else {
                        Turn::Any
                    };
                    assert_eq!(
                        assign(north, south, pedestrian),
                        expected,
                        "N={north} S={south} P={pedestrian}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_custom_thresholds() {
        let policy = TurnPolicy::new()
            .with_pedestrian_threshold(1)
            .with_car_threshold(3);
        assert_eq!(policy.assign(&ClassCounts::new(3, 0, 0)), Turn::North);
        assert_eq!(policy.assign(&ClassCounts::new(3, 0, 1)), Turn::Pedestrian);
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let policy = TurnPolicy::new().with_car_threshold(0);
        assert!(matches!(
            policy.validate(),
            Err(MonitorError::InvalidPolicy(_))
        ));
        let policy = TurnPolicy::new().with_pedestrian_threshold(0);
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let policy: TurnPolicy = serde_json::from_str(r#"{"car_threshold": 7}"#).unwrap();
        assert_eq!(policy.car_threshold, 7);
        assert_eq!(policy.pedestrian_threshold, 2);
    }
}

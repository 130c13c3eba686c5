//! Traffic classes and the priority turn.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Travel direction of a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Heading north. Checked first by the turn policy.
    North,
    /// Heading south.
    South,
}

impl Direction {
    /// Returns the opposing direction.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::North => f.write_str("north"),
            Self::South => f.write_str("south"),
        }
    }
}

/// One of the three classes sharing the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficClass {
    /// A car travelling in the given direction.
    Car(Direction),
    /// A pedestrian. Pedestrians have no direction.
    Pedestrian,
}

impl TrafficClass {
    /// All classes in policy priority order.
    pub const ALL: [Self; 3] = [
        Self::Pedestrian,
        Self::Car(Direction::North),
        Self::Car(Direction::South),
    ];

    /// Returns true for cars of either direction.
    #[inline]
    #[must_use]
    pub const fn is_car(self) -> bool {
        matches!(self, Self::Car(_))
    }
}

impl fmt::Display for TrafficClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Car(direction) => write!(f, "car heading {direction}"),
            Self::Pedestrian => f.write_str("pedestrian"),
        }
    }
}

impl From<Direction> for TrafficClass {
    fn from(direction: Direction) -> Self {
        Self::Car(direction)
    }
}

/// The class currently holding soft priority.
///
/// `Any` means no class holds priority: every class whose
/// exclusion condition is met may enter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    /// Northbound cars have priority.
    North,
    /// Southbound cars have priority.
    South,
    /// Pedestrians have priority.
    Pedestrian,
    /// Nobody has priority.
    #[default]
    Any,
}

impl Turn {
    /// Returns true if this turn lets `class` through, ignoring occupancy.
    #[inline]
    #[must_use]
    pub const fn admits(self, class: TrafficClass) -> bool {
        matches!(
            (self, class),
            (Self::Any, _)
                | (Self::North, TrafficClass::Car(Direction::North))
                | (Self::South, TrafficClass::Car(Direction::South))
                | (Self::Pedestrian, TrafficClass::Pedestrian)
        )
    }
}

impl From<TrafficClass> for Turn {
    fn from(class: TrafficClass) -> Self {
        match class {
            TrafficClass::Car(Direction::North) => Self::North,
            TrafficClass::Car(Direction::South) => Self::South,
            TrafficClass::Pedestrian => Self::Pedestrian,
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "NORTH",
            Self::South => "SOUTH",
            Self::Pedestrian => "PEDESTRIAN",
            Self::Any => "ANY",
        };
        f.write_str(name)
    }
}

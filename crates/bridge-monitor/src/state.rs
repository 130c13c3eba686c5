//! # Shared Counters
//!
//! The waiting and crossing counts for each class, the current turn,
//! and the admission predicates evaluated over them.
//!
//! ## Invariants
//!
//! Whenever the monitor lock is released:
//!
//! - pedestrians crossing implies no cars crossing
//! - cars crossing in one direction implies no cars crossing in the other
//!   and no pedestrians crossing
//!
//! Counts are unsigned and every decrement is checked, so no count can
//! drop below zero.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::class::{Direction, TrafficClass, Turn};
use crate::error::{MonitorError, Result};

/// One counter per traffic class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassCounts {
    /// Northbound cars.
    pub north: u32,
    /// Southbound cars.
    pub south: u32,
    /// Pedestrians.
    pub pedestrian: u32,
}

impl ClassCounts {
    /// Creates a set of counts.
    #[must_use]
    pub const fn new(north: u32, south: u32, pedestrian: u32) -> Self {
        Self {
            north,
            south,
            pedestrian,
        }
    }

    /// Returns the count for `class`.
    #[inline]
    #[must_use]
    pub const fn get(&self, class: TrafficClass) -> u32 {
        match class {
            TrafficClass::Car(Direction::North) => self.north,
            TrafficClass::Car(Direction::South) => self.south,
            TrafficClass::Pedestrian => self.pedestrian,
        }
    }

    /// Returns the count for cars heading `direction`.
    #[inline]
    #[must_use]
    pub const fn cars(&self, direction: Direction) -> u32 {
        self.get(TrafficClass::Car(direction))
    }

    /// Adds one to the count for `class`.
    pub fn increment(&mut self, class: TrafficClass) {
        *self.slot(class) += 1;
    }

    fn slot(&mut self, class: TrafficClass) -> &mut u32 {
        match class {
            TrafficClass::Car(Direction::North) => &mut self.north,
            TrafficClass::Car(Direction::South) => &mut self.south,
            TrafficClass::Pedestrian => &mut self.pedestrian,
        }
    }

    /// Sum over all classes.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.north + self.south + self.pedestrian
    }

    /// Per-class maximum of two sets of counts.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self {
            north: self.north.max(other.north),
            south: self.south.max(other.south),
            pedestrian: self.pedestrian.max(other.pedestrian),
        }
    }
}

impl fmt::Display for ClassCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N={} S={} P={}", self.north, self.south, self.pedestrian)
    }
}

/// Snapshot of the bridge: turn, waiting and crossing counts.
///
/// The live instance sits behind the monitor lock. Everything outside
/// the monitor only ever sees copies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeState {
    turn: Turn,
    waiting: ClassCounts,
    crossing: ClassCounts,
    operations: u64,
}

impl BridgeState {
    /// Creates an empty bridge with turn `Any`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            turn: Turn::Any,
            waiting: ClassCounts::new(0, 0, 0),
            crossing: ClassCounts::new(0, 0, 0),
            operations: 0,
        }
    }

    /// Current priority turn.
    #[inline]
    #[must_use]
    pub const fn turn(&self) -> Turn {
        self.turn
    }

    /// Entities blocked waiting to cross.
    #[inline]
    #[must_use]
    pub const fn waiting(&self) -> ClassCounts {
        self.waiting
    }

    /// Entities currently on the bridge.
    #[inline]
    #[must_use]
    pub const fn crossing(&self) -> ClassCounts {
        self.crossing
    }

    /// Number of enter and leave calls accepted so far.
    #[inline]
    #[must_use]
    pub const fn operations(&self) -> u64 {
        self.operations
    }

    /// Returns true if nobody is waiting or crossing.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.waiting.total() == 0 && self.crossing.total() == 0
    }

    /// Northbound admission: turn allows it, no southbound cars and no
    /// pedestrians on the bridge.
    #[inline]
    #[must_use]
    pub const fn can_cross_north(&self) -> bool {
        self.turn.admits(TrafficClass::Car(Direction::North))
            && self.crossing.south == 0
            && self.crossing.pedestrian == 0
    }

    /// Southbound admission, symmetric to [`can_cross_north`](Self::can_cross_north).
    #[inline]
    #[must_use]
    pub const fn can_cross_south(&self) -> bool {
        self.turn.admits(TrafficClass::Car(Direction::South))
            && self.crossing.north == 0
            && self.crossing.pedestrian == 0
    }

    /// Pedestrian admission: turn allows it and no cars on the bridge.
    #[inline]
    #[must_use]
    pub const fn can_cross_pedestrian(&self) -> bool {
        self.turn.admits(TrafficClass::Pedestrian)
            && self.crossing.north == 0
            && self.crossing.south == 0
    }

    /// Dispatches to the predicate for `class`.
    #[inline]
    #[must_use]
    pub const fn can_cross(&self, class: TrafficClass) -> bool {
        match class {
            TrafficClass::Car(Direction::North) => self.can_cross_north(),
            TrafficClass::Car(Direction::South) => self.can_cross_south(),
            TrafficClass::Pedestrian => self.can_cross_pedestrian(),
        }
    }

    /// Checks the mutual exclusion invariants.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::SafetyViolation`] naming the occupancy if
    /// two incompatible classes are counted as crossing.
    pub fn check_invariants(&self) -> Result<()> {
        let c = self.crossing;
        let mixed_cars = c.north > 0 && c.south > 0;
        let cars_with_pedestrians = c.pedestrian > 0 && (c.north > 0 || c.south > 0);
        if mixed_cars || cars_with_pedestrians {
            return Err(MonitorError::SafetyViolation {
                operation: self.operations,
                description: format!("crossing {c}"),
            });
        }
        Ok(())
    }

    pub(crate) fn record_operation(&mut self) {
        self.operations += 1;
    }

    pub(crate) fn add_waiting(&mut self, class: TrafficClass) {
        self.waiting.increment(class);
    }

    /// Moves one waiting entity of `class` onto the bridge.
    pub(crate) fn admit(&mut self, class: TrafficClass) {
        let waiting = self.waiting.slot(class);
        *waiting = waiting.saturating_sub(1);
        self.crossing.increment(class);
    }

    /// Takes one entity of `class` off the bridge.
    pub(crate) fn release(&mut self, class: TrafficClass) -> Result<()> {
        let crossing = self.crossing.slot(class);
        *crossing = crossing
            .checked_sub(1)
            .ok_or(MonitorError::NotCrossing { class })?;
        Ok(())
    }

    pub(crate) fn set_turn(&mut self, turn: Turn) {
        self.turn = turn;
    }
}

impl fmt::Display for BridgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Monitor: turn={} waiting[{}] crossing[{}] ops={}",
            self.turn, self.waiting, self.crossing, self.operations
        )
    }
}

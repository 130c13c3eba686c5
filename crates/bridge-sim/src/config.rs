//! Configuration types for the traffic simulation.

use bridge_monitor::{Direction, TurnPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SimError;
use crate::Result;

/// Configuration for a simulation run.
///
/// Every field has a default, so a TOML file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of cars to generate.
    pub cars: usize,

    /// Number of pedestrians to generate.
    pub pedestrians: usize,

    /// Mean seconds between car arrivals (exponential).
    pub car_interarrival: f64,

    /// Mean seconds between pedestrian arrivals (exponential).
    pub pedestrian_interarrival: f64,

    /// Seconds a northbound car spends on the bridge.
    pub north_crossing: CrossingTime,

    /// Seconds a southbound car spends on the bridge.
    pub south_crossing: CrossingTime,

    /// Seconds a pedestrian spends on the bridge.
    pub pedestrian_crossing: CrossingTime,

    /// Multiplier applied to every duration. Values below 1 compress time.
    pub time_scale: f64,

    /// Seed for reproducible runs. A random seed is drawn when absent.
    pub seed: Option<u64>,

    /// Turn policy thresholds handed to the monitor.
    pub policy: TurnPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            cars: 50,
            pedestrians: 10,
            car_interarrival: 0.5,
            pedestrian_interarrival: 5.0,
            north_crossing: CrossingTime::new(1.0, 0.5),
            south_crossing: CrossingTime::new(1.0, 0.5),
            pedestrian_crossing: CrossingTime::new(30.0, 10.0),
            time_scale: 1.0,
            seed: None,
            policy: TurnPolicy::default(),
        }
    }
}

impl SimConfig {
    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the file cannot be read and
    /// [`SimError::Parse`] if it is not valid TOML for this type.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Parse`] on malformed input.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Crossing time distribution for cars heading `direction`.
    #[must_use]
    pub const fn car_crossing(&self, direction: Direction) -> CrossingTime {
        match direction {
            Direction::North => self.north_crossing,
            Direction::South => self.south_crossing,
        }
    }

    /// Checks that every distribution parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] naming the first bad field,
    /// or [`SimError::Monitor`] for a bad turn policy.
    pub fn validate(&self) -> Result<()> {
        positive("car_interarrival", self.car_interarrival)?;
        positive("pedestrian_interarrival", self.pedestrian_interarrival)?;
        positive("time_scale", self.time_scale)?;
        self.north_crossing.validate("north_crossing")?;
        self.south_crossing.validate("south_crossing")?;
        self.pedestrian_crossing.validate("pedestrian_crossing")?;
        self.policy.validate()?;
        Ok(())
    }
}

/// Normal distribution of time spent on the bridge, in seconds.
///
/// Negative samples are clamped to zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossingTime {
    /// Mean seconds.
    pub mean: f64,
    /// Standard deviation in seconds.
    pub std_dev: f64,
}

impl CrossingTime {
    /// Creates a crossing time distribution.
    #[must_use]
    pub const fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }

    fn validate(&self, field: &str) -> Result<()> {
        positive(&format!("{field}.mean"), self.mean)?;
        if !self.std_dev.is_finite() || self.std_dev < 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "{field}.std_dev must be a non-negative number, got {}",
                self.std_dev
            )));
        }
        Ok(())
    }
}

fn positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfig(format!(
            "{field} must be a positive number, got {value}"
        )))
    }
}

//! Simulated entities and their trip across the bridge.

use bridge_monitor::{BridgeMonitor, TrafficClass};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::Result;

/// Where an entity is in its trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityPhase {
    /// Created, not yet at the monitor.
    Wanting,
    /// Blocked inside the monitor.
    Waiting,
    /// On the bridge.
    Crossing,
    /// Off the bridge.
    Done,
}

/// A car or pedestrian produced by a generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Sequence number within its generator, starting at 1.
    pub id: usize,
    /// Traffic class, including the car's direction.
    pub class: TrafficClass,
    /// Current phase.
    pub phase: EntityPhase,
}

impl Entity {
    /// Creates an entity in the `Wanting` phase.
    #[must_use]
    pub const fn new(id: usize, class: TrafficClass) -> Self {
        Self {
            id,
            class,
            phase: EntityPhase::Wanting,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            TrafficClass::Car(direction) => write!(f, "car {} heading {direction}", self.id),
            TrafficClass::Pedestrian => write!(f, "pedestrian {}", self.id),
        }
    }
}

/// Drives one entity through enter, crossing delay and leave.
///
/// The blocking enter runs on the blocking thread pool; the crossing
/// delay is an async sleep outside the monitor lock.
///
/// # Errors
///
/// Propagates monitor errors and blocking-task failures.
pub async fn cross_bridge(
    monitor: Arc<BridgeMonitor>,
    mut entity: Entity,
    crossing: Duration,
) -> Result<Entity> {
    info!("{entity} wants to enter. {}", monitor.status()?);

    entity.phase = EntityPhase::Waiting;
    let class = entity.class;
    let permit = {
        let monitor = Arc::clone(&monitor);
        tokio::task::spawn_blocking(move || monitor.cross(class)).await??
    };

    entity.phase = EntityPhase::Crossing;
    info!("{entity} enters the bridge. {}", monitor.status()?);
    tokio::time::sleep(crossing).await;

    info!("{entity} leaving the bridge. {}", monitor.status()?);
    permit.leave()?;
    entity.phase = EntityPhase::Done;
    info!("{entity} out of the bridge. {}", monitor.status()?);

    Ok(entity)
}

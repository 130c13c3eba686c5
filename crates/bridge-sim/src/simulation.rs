//! The simulation driver.
//!
//! Two generators run side by side, one for cars and one for
//! pedestrians. Each spawns an entity, then sleeps for an exponential
//! gap before the next one. Every entity runs
//! [`cross_bridge`](crate::traffic::cross_bridge) against the shared
//! monitor; the run ends once both generators have joined all of their
//! entities.

use bridge_monitor::{BridgeMonitor, ClassCounts, Direction, TraceRecorder, TrafficClass};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::SimConfig;
use crate::report::{Safety, SimReport};
use crate::timing::{Arrivals, Crossings};
use crate::traffic::{cross_bridge, Entity, EntityPhase};
use crate::Result;

/// A configured simulation, ready to run.
///
/// # Example
///
/// ```rust,no_run
/// use bridge_sim::{SimConfig, Simulation};
///
/// # async fn demo() -> bridge_sim::Result<()> {
/// let config = SimConfig {
///     time_scale: 0.01,
///     seed: Some(7),
///     ..SimConfig::default()
/// };
/// let report = Simulation::new(config)?.run().await?;
/// assert!(report.is_clean());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
}

impl Simulation {
    /// Validates `config` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns the first validation error from [`SimConfig::validate`].
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Runs every entity to completion and reports on the trace.
    ///
    /// # Errors
    ///
    /// Returns an error if an entity task fails or the monitor lock is
    /// poisoned. Safety violations are reported in [`SimReport::safety`].
    pub async fn run(&self) -> Result<SimReport> {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        let recorder = Arc::new(TraceRecorder::new());
        let monitor = Arc::new(
            BridgeMonitor::with_policy(self.config.policy).with_observer(recorder.clone()),
        );

        info!(
            "Simulation started: {} cars, {} pedestrians, seed {seed}",
            self.config.cars, self.config.pedestrians
        );
        let started = Instant::now();

        let cars = tokio::spawn(generate_cars(
            Arc::clone(&monitor),
            self.config.clone(),
            seed,
        ));
        let pedestrians = tokio::spawn(generate_pedestrians(
            Arc::clone(&monitor),
            self.config.clone(),
            seed.wrapping_add(1),
        ));
        let (cars, pedestrians) = tokio::try_join!(cars, pedestrians)?;
        let entities: Vec<Entity> = cars?.into_iter().chain(pedestrians?).collect();

        let mut completed = ClassCounts::default();
        for entity in &entities {
            if entity.phase == EntityPhase::Done {
                completed.increment(entity.class);
            }
        }

        let safety = match recorder.verify() {
            Ok(()) => Safety::Safe,
            Err(err) => {
                warn!("Safety check failed: {err}");
                Safety::Violated {
                    description: err.to_string(),
                }
            }
        };

        let report = SimReport {
            seed,
            completed,
            final_state: monitor.status()?,
            trace: recorder.summary(),
            safety,
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        info!(
            "Simulation finished in {} ms: {} entities done",
            report.elapsed_ms,
            completed.total()
        );
        Ok(report)
    }
}

async fn generate_cars(
    monitor: Arc<BridgeMonitor>,
    config: SimConfig,
    seed: u64,
) -> Result<Vec<Entity>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let arrivals = Arrivals::new(config.car_interarrival, config.time_scale)?;
    let north = Crossings::new(config.north_crossing, config.time_scale)?;
    let south = Crossings::new(config.south_crossing, config.time_scale)?;

    let mut trips = Vec::with_capacity(config.cars);
    for id in 1..=config.cars {
        let (direction, crossings) = if rng.gen_bool(0.5) {
            (Direction::North, &north)
        } else {
            (Direction::South, &south)
        };
        let entity = Entity::new(id, TrafficClass::Car(direction));
        let crossing = crossings.next_crossing(&mut rng);
        debug!("Spawning {entity} ({crossing:?} on the bridge)");
        trips.push(tokio::spawn(cross_bridge(Arc::clone(&monitor), entity, crossing)));
        tokio::time::sleep(arrivals.next_gap(&mut rng)).await;
    }
    join_trips(trips).await
}

async fn generate_pedestrians(
    monitor: Arc<BridgeMonitor>,
    config: SimConfig,
    seed: u64,
) -> Result<Vec<Entity>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let arrivals = Arrivals::new(config.pedestrian_interarrival, config.time_scale)?;
    let crossings = Crossings::new(config.pedestrian_crossing, config.time_scale)?;

    let mut trips = Vec::with_capacity(config.pedestrians);
    for id in 1..=config.pedestrians {
        let entity = Entity::new(id, TrafficClass::Pedestrian);
        let crossing = crossings.next_crossing(&mut rng);
        debug!("Spawning {entity} ({crossing:?} on the bridge)");
        trips.push(tokio::spawn(cross_bridge(Arc::clone(&monitor), entity, crossing)));
        tokio::time::sleep(arrivals.next_gap(&mut rng)).await;
    }
    join_trips(trips).await
}

async fn join_trips(trips: Vec<JoinHandle<Result<Entity>>>) -> Result<Vec<Entity>> {
    let mut done = Vec::with_capacity(trips.len());
    for trip in trips {
        done.push(trip.await??);
    }
    Ok(done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    fn fast_config() -> SimConfig {
        SimConfig {
            cars: 12,
            pedestrians: 3,
            time_scale: 0.001,
            seed: Some(11),
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimConfig {
            pedestrian_interarrival: -1.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            Simulation::new(config),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_small_run_completes() {
        let report = Simulation::new(fast_config()).unwrap().run().await.unwrap();

        assert!(report.is_clean(), "{report}");
        assert_eq!(report.seed, 11);
        assert_eq!(report.completed.north + report.completed.south, 12);
        assert_eq!(report.completed.pedestrian, 3);
        assert_eq!(report.trace.admitted, report.completed);
        // Every entity requests, is admitted and leaves once.
        assert_eq!(report.trace.events, 15 * 3);
        assert_eq!(report.final_state.operations(), 15 * 2);
    }

    #[tokio::test]
    async fn test_seed_fixes_car_directions() {
        let first = Simulation::new(fast_config()).unwrap().run().await.unwrap();
        let second = Simulation::new(fast_config()).unwrap().run().await.unwrap();
        assert_eq!(first.completed, second.completed);
    }

    #[tokio::test]
    async fn test_empty_run() {
        let config = SimConfig {
            cars: 0,
            pedestrians: 0,
            ..fast_config()
        };
        let report = Simulation::new(config).unwrap().run().await.unwrap();
        assert!(report.is_clean());
        assert_eq!(report.trace.events, 0);
        assert_eq!(report.completed.total(), 0);
    }
}

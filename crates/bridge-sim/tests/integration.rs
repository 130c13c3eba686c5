//! # Bridge Simulation Integration Tests
//!
//! Full runs of the traffic generators against the monitor, with time
//! compressed a thousandfold.
//!
//! | Scenario | Test |
//! |----------|------|
//! | Standard traffic mix terminates safely | `test_standard_mix_terminates_safely` |
//! | Same-direction cars overlap | `test_cars_share_the_bridge` |
//! | Pedestrian-heavy traffic | `test_pedestrian_heavy_traffic` |
//! | Custom thresholds | `test_custom_policy_run` |
//! | Config file round trip | `test_run_from_config_file` |

use std::io::Write;
use std::time::Duration;

use bridge_sim::{CrossingTime, SimConfig, Simulation, Turn, TurnPolicy};

/// A thousand times faster than real time.
const FAST: f64 = 0.001;

fn fast(config: SimConfig) -> SimConfig {
    SimConfig {
        time_scale: FAST,
        ..config
    }
}

async fn run(config: SimConfig) -> bridge_sim::SimReport {
    let simulation = Simulation::new(config).unwrap();
    tokio::time::timeout(Duration::from_secs(60), simulation.run())
        .await
        .expect("simulation did not terminate")
        .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_standard_mix_terminates_safely() {
    let report = run(fast(SimConfig {
        seed: Some(2024),
        ..SimConfig::default()
    }))
    .await;

    assert!(report.safety.is_safe(), "{report}");
    assert!(report.final_state.is_idle(), "{report}");
    assert_eq!(report.final_turn(), Turn::Any);
    assert_eq!(report.completed.north + report.completed.south, 50);
    assert_eq!(report.completed.pedestrian, 10);
    assert_eq!(report.trace.admitted, report.completed);
    assert_eq!(report.trace.events, 60 * 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cars_share_the_bridge() {
    // Slow cars arriving fast: same-direction overlap is unavoidable.
    let report = run(fast(SimConfig {
        cars: 40,
        pedestrians: 0,
        car_interarrival: 0.5,
        north_crossing: CrossingTime::new(20.0, 0.0),
        south_crossing: CrossingTime::new(20.0, 0.0),
        seed: Some(5),
        ..SimConfig::default()
    }))
    .await;

    assert!(report.is_clean(), "{report}");
    let peak = report.trace.max_crossing;
    assert!(peak.north > 1 || peak.south > 1, "{report}");
    assert_eq!(peak.pedestrian, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_pedestrian_heavy_traffic() {
    let report = run(fast(SimConfig {
        cars: 20,
        pedestrians: 20,
        pedestrian_interarrival: 0.5,
        pedestrian_crossing: CrossingTime::new(5.0, 2.0),
        seed: Some(77),
        ..SimConfig::default()
    }))
    .await;

    assert!(report.is_clean(), "{report}");
    assert_eq!(report.completed.pedestrian, 20);
    assert_eq!(report.completed.total(), 40);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_custom_policy_run() {
    let report = run(fast(SimConfig {
        cars: 30,
        pedestrians: 6,
        policy: TurnPolicy::new()
            .with_pedestrian_threshold(1)
            .with_car_threshold(2),
        seed: Some(3),
        ..SimConfig::default()
    }))
    .await;

    assert!(report.is_clean(), "{report}");
    assert_eq!(report.completed.total(), 36);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_run_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
cars = 10
pedestrians = 2
time_scale = {FAST}
seed = 99

[pedestrian_crossing]
mean = 10.0
std_dev = 2.0
"#
    )
    .unwrap();

    let config = SimConfig::load(file.path()).unwrap();
    assert_eq!(config.seed, Some(99));
    let report = run(config).await;

    assert!(report.is_clean(), "{report}");
    assert_eq!(report.seed, 99);
    assert_eq!(report.completed.total(), 12);
}

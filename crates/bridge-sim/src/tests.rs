//! Unit tests for bridge-sim.

#[test]
fn test_crate_structure() {
    // Smoke test - verifies the re-exports line up
    use crate::{Entity, EntityPhase, Safety, SimConfig, TrafficClass, TurnPolicy};

    let config = SimConfig::default();
    assert_eq!(config.policy, TurnPolicy::default());
    let entity = Entity::new(1, TrafficClass::Pedestrian);
    assert_eq!(entity.phase, EntityPhase::Wanting);
    assert!(Safety::Safe.is_safe());
}

#![allow(dead_code)]

use approx::assert_relative_eq;
use syzygy::{
    config::SimulationConfig,
    controller::{SimulationController, SimulationEvent},
    ephemeris::BodyPositions,
    shadow::EclipseEvent,
};

/// Default scene with every body at periapsis at t = 0: a full moon in the Earth shadow.
pub fn syzygy_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.time.start_epoch_ms = Some(0.0);
    config
}

pub fn syzygy_controller() -> SimulationController {
    SimulationController::new(syzygy_config()).unwrap()
}

pub fn eclipses(events: &[SimulationEvent]) -> Vec<EclipseEvent> {
    events
        .iter()
        .filter_map(|e| match e {
            SimulationEvent::Eclipse(ev) => Some(*ev),
            _ => None,
        })
        .collect()
}

pub fn assert_positions_close(actual: &BodyPositions, expected: &BodyPositions, epsilon: f64) {
    for (a, e) in [
        (actual.sun, expected.sun),
        (actual.earth, expected.earth),
        (actual.moon, expected.moon),
    ] {
        assert_relative_eq!(a.x, e.x, epsilon = epsilon);
        assert_relative_eq!(a.y, e.y, epsilon = epsilon);
        assert_relative_eq!(a.z, e.z, epsilon = epsilon);
    }
}

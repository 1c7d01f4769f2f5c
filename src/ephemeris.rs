//! # Three-body ephemeris
//!
//! [`SolarSystem`] bundles the fixed Sun and the two Keplerian orbits (Earth around the Sun,
//! Moon around the Earth) sharing a single reference epoch. It evaluates the whole
//! configuration at any simulated instant and exposes the phase quantities derived from it.
//!
//! Every method is a pure function of its inputs: the phase root-finder probes the model at
//! arbitrary instants without touching the simulation clock.

use nalgebra::Vector3;

use crate::{
    config::FinalizedConfig,
    constants::{Degree, EpochMs, Radian},
    keplerian_element::OrbitalElements,
    phase::{phase_metrics, signed_phase_degrees, PhaseMetrics},
    ref_system::{angle_between, orbital_plane_normal},
    shadow::{EclipseKind, ShadowCone},
};

/// Positions of the three bodies at one instant, in the heliocentric reference frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPositions {
    pub sun: Vector3<f64>,
    pub earth: Vector3<f64>,
    pub moon: Vector3<f64>,
}

impl BodyPositions {
    /// Coarse alignment angle checked before the shadow-cone test of an eclipse.
    ///
    /// * Solar: angle between `moon − sun` and `earth − moon`.
    /// * Lunar: angle between `earth − sun` and `moon − earth`.
    ///
    /// Both vanish when the three bodies are lined up in the eclipse order.
    pub fn alignment_angle(&self, kind: EclipseKind) -> Radian {
        match kind {
            EclipseKind::Solar => angle_between(&(self.moon - self.sun), &(self.earth - self.moon)),
            EclipseKind::Lunar => angle_between(&(self.earth - self.sun), &(self.moon - self.earth)),
        }
    }
}

/// Sun, Earth and Moon with their radii and orbits.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarSystem {
    pub sun_position: Vector3<f64>,
    pub sun_radius: f64,
    /// Heliocentric orbit of the Earth.
    pub earth: OrbitalElements,
    /// Geocentric orbit of the Moon.
    pub moon: OrbitalElements,
    /// Instant at which both mean anomalies equal their `M0` (ms).
    pub reference_epoch: EpochMs,
}

impl SolarSystem {
    pub fn new(
        sun_position: Vector3<f64>,
        sun_radius: f64,
        earth: OrbitalElements,
        moon: OrbitalElements,
        reference_epoch: EpochMs,
    ) -> Self {
        SolarSystem {
            sun_position,
            sun_radius,
            earth,
            moon,
            reference_epoch,
        }
    }

    /// Build the model from a finalized configuration.
    pub fn from_config(config: &FinalizedConfig) -> Self {
        SolarSystem::new(
            config.sun_position,
            config.sun_radius,
            config.earth,
            config.moon,
            config.start_epoch_ms,
        )
    }

    /// Positions of the three bodies at `t` (ms).
    ///
    /// The Earth orbit is heliocentric around the origin of the frame, the Moon is the Earth
    /// position plus its geocentric orbit.
    pub fn positions_at(&self, t: EpochMs) -> BodyPositions {
        let earth = self.earth.position_at(t, self.reference_epoch);
        let moon = earth + self.moon.position_at(t, self.reference_epoch);
        BodyPositions {
            sun: self.sun_position,
            earth,
            moon,
        }
    }

    /// Normal of the Earth orbital plane, used as the reference for signed phases.
    pub fn reference_normal(&self) -> Vector3<f64> {
        orbital_plane_normal(self.earth.inclination, self.earth.ascending_node_longitude)
    }

    /// Phase angle and illuminated fraction of the Moon at `t`.
    pub fn phase_at(&self, t: EpochMs) -> PhaseMetrics {
        let p = self.positions_at(t);
        phase_metrics(&p.sun, &p.earth, &p.moon)
    }

    /// Signed phase of the Moon at `t`, in degrees within `(-180, 180]`.
    pub fn signed_phase_at(&self, t: EpochMs) -> Degree {
        let p = self.positions_at(t);
        signed_phase_degrees(&p.sun, &p.earth, &p.moon, &self.reference_normal())
    }

    /// Shadow cone of an eclipse kind for the given positions.
    ///
    /// The Moon shadows the Earth in a solar eclipse, the Earth shadows the Moon in a lunar one.
    /// The cone uses the default penumbra scale and antumbra depth.
    pub fn shadow_cone(&self, kind: EclipseKind, positions: &BodyPositions) -> ShadowCone {
        let (apex, occluder, target, target_body) = match kind {
            EclipseKind::Solar => (positions.moon, &self.moon, positions.earth, &self.earth),
            EclipseKind::Lunar => (positions.earth, &self.earth, positions.moon, &self.moon),
        };
        ShadowCone::new(
            positions.sun,
            self.sun_radius,
            apex,
            occluder.radius,
            target,
            target_body.radius,
        )
    }
}

#[cfg(test)]
mod ephemeris_test {
    use super::*;
    use crate::{config::SimulationConfig, constants::MS_PER_SECOND};
    use approx::assert_abs_diff_eq;

    fn default_system() -> SolarSystem {
        let mut config = SimulationConfig::default();
        config.time.start_epoch_ms = Some(0.0);
        SolarSystem::from_config(&config.finalize().unwrap())
    }

    #[test]
    fn test_syzygy_at_reference_epoch() {
        let system = default_system();
        let p = system.positions_at(0.0);
        assert_abs_diff_eq!(p.sun, Vector3::zeros());
        assert_abs_diff_eq!(p.earth, Vector3::new(10.0 * (1.0 - 0.0167), 0.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(
            p.moon - p.earth,
            Vector3::new(2.5 * (1.0 - 0.0549), 0.0, 0.0),
            epsilon = 1e-12
        );

        let m = system.phase_at(0.0);
        assert_abs_diff_eq!(m.phase_angle, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.illuminated_fraction, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(system.signed_phase_at(0.0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_signed_phase_decreases_after_full_moon() {
        let system = default_system();
        let one_day = 86_400.0 * MS_PER_SECOND;
        let psi = system.signed_phase_at(one_day);
        // near perigee and perihelion the Moon gains about 13.6° per day on the Sun
        assert!(psi < -12.0 && psi > -15.0, "psi = {psi}");
        assert!(system.signed_phase_at(-one_day) > 12.0);
    }

    #[test]
    fn test_alignment_angles_at_full_moon() {
        let system = default_system();
        let p = system.positions_at(0.0);
        assert_abs_diff_eq!(p.alignment_angle(EclipseKind::Lunar), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            p.alignment_angle(EclipseKind::Solar),
            std::f64::consts::PI,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_shadow_cone_roles() {
        let system = default_system();
        let p = system.positions_at(0.0);

        let lunar = system.shadow_cone(EclipseKind::Lunar, &p);
        assert_eq!(lunar.apex, p.earth);
        assert_eq!(lunar.occluder_radius, 1.0);
        assert_eq!(lunar.target, p.moon);
        assert_eq!(lunar.target_radius, 0.27);
        assert_eq!(lunar.light_radius, 3.0);

        let solar = system.shadow_cone(EclipseKind::Solar, &p);
        assert_eq!(solar.apex, p.moon);
        assert_eq!(solar.occluder_radius, 0.27);
        assert_eq!(solar.target, p.earth);
    }

    #[test]
    fn test_reference_normal_tilted_by_inclination() {
        let system = default_system();
        let n = system.reference_normal();
        assert_abs_diff_eq!(n.norm(), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(n.z, system.earth.inclination.cos(), epsilon = 1e-15);
    }
}

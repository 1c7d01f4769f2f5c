//! # Keplerian orbital elements
//!
//! This module defines [`OrbitalElements`], the classical element set of a body on a closed
//! two-body ellipse, and the **orbit evaluator** that turns elapsed simulated time into a 3D
//! position.
//!
//! ## Elements
//!
//! 1. **a** – Semi-major axis (scene units)
//! 2. **e** – Eccentricity, in `[0, 1)`
//! 3. **i** – Inclination (radians)
//! 4. **Ω** – Longitude of ascending node (radians)
//! 5. **ω** – Argument of periapsis (radians)
//! 6. **M0** – Mean anomaly at the reference epoch (radians)
//!
//! plus the mean motion `n = 2π / period` (radians per second) and the physical radius of the
//! body, used by the shadow-cone detector.
//!
//! ## Evaluation
//!
//! [`OrbitalElements::position_at`] is a pure function of its inputs:
//!
//! ```text
//! dt = (t - t_ref) / 1000                 [s]
//! M  = M0 + n·dt
//! E  = solve_kepler(M, e)
//! r' = (a(cos E - e), a·sqrt(1 - e²)·sin E, 0)
//! r  = Rz(Ω) · Rx(i) · Rz(ω) · r'
//! ```
//!
//! The root-finder probes it at arbitrary instants, so it must stay free of hidden state.
//!
//! ## Example
//!
//! ```rust
//! use syzygy::keplerian_element::OrbitalElements;
//!
//! let earth = OrbitalElements::from_period(10.0, 0.0167, 0.00716, 0.0, 0.0, 0.0, 31_536_000.0, 1.0);
//! let r = earth.position_at(0.0, 0.0);
//! assert!((r.norm() - 10.0 * (1.0 - 0.0167)).abs() < 1e-12);
//! ```

use std::fmt;

use nalgebra::Vector3;

use crate::{
    constants::{EpochMs, Radian, Seconds, DEGRAD, DPI, MS_PER_SECOND, SECONDS_PER_DAY},
    kepler::solve_kepler,
    ref_system::orbital_plane_rotation,
    syzygy_errors::SyzygyError,
};

/// Keplerian elements of a body on a closed orbit.
///
/// Units
/// -----
/// * `semi_major_axis`: scene units.
/// * `eccentricity`: unitless, in `[0, 1)`.
/// * `inclination`, `ascending_node_longitude`, `periapsis_argument`, `mean_anomaly`: radians.
/// * `mean_motion`: radians per second.
/// * `radius`: scene units.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct OrbitalElements {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: Radian,
    pub ascending_node_longitude: Radian,
    pub periapsis_argument: Radian,
    pub mean_anomaly: Radian,
    pub mean_motion: f64,
    pub radius: f64,
}

impl OrbitalElements {
    /// Build the elements from an orbital period instead of a mean motion.
    ///
    /// Arguments
    /// ---------
    /// * `semi_major_axis` – a.
    /// * `eccentricity` – e.
    /// * `inclination` – i (rad).
    /// * `ascending_node_longitude` – Ω (rad).
    /// * `periapsis_argument` – ω (rad).
    /// * `mean_anomaly` – M0 (rad).
    /// * `period_seconds` – orbital period, `n = 2π / period`.
    /// * `radius` – body radius.
    #[allow(clippy::too_many_arguments)]
    pub fn from_period(
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: Radian,
        ascending_node_longitude: Radian,
        periapsis_argument: Radian,
        mean_anomaly: Radian,
        period_seconds: Seconds,
        radius: f64,
    ) -> Self {
        OrbitalElements {
            semi_major_axis,
            eccentricity,
            inclination,
            ascending_node_longitude,
            periapsis_argument,
            mean_anomaly,
            mean_motion: DPI / period_seconds,
            radius,
        }
    }

    /// Orbital period in seconds, `2π / n`.
    pub fn period_seconds(&self) -> Seconds {
        DPI / self.mean_motion
    }

    /// Check the invariants the evaluator relies on.
    ///
    /// Arguments
    /// ---------
    /// * `body` – name used in the error message.
    ///
    /// Return
    /// ------
    /// * `Ok(())` if `e ∈ [0, 1)`, `n` is finite and positive, and the radius is finite and
    ///   positive; the matching [`SyzygyError`] otherwise.
    pub fn validate(&self, body: &'static str) -> Result<(), SyzygyError> {
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(SyzygyError::InvalidEccentricity {
                body,
                value: self.eccentricity,
            });
        }
        if !self.mean_motion.is_finite() || self.mean_motion <= 0.0 {
            return Err(SyzygyError::InvalidMeanMotion {
                body,
                value: self.mean_motion,
            });
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(SyzygyError::InvalidRadius {
                body,
                value: self.radius,
            });
        }
        Ok(())
    }

    /// Mean anomaly after `dt` seconds, unwrapped.
    pub fn mean_anomaly_at(&self, dt: Seconds) -> Radian {
        self.mean_anomaly + self.mean_motion * dt
    }

    /// Position in the orbital (perifocal) plane for a given eccentric anomaly.
    ///
    /// The X axis points to the periapsis; the Z component is always zero.
    pub fn perifocal_position(&self, ecc_anomaly: Radian) -> Vector3<f64> {
        let (sin_e, cos_e) = ecc_anomaly.sin_cos();
        let a = self.semi_major_axis;
        let e = self.eccentricity;
        Vector3::new(a * (cos_e - e), a * (1.0 - e * e).sqrt() * sin_e, 0.0)
    }

    /// Position of the body at a simulated instant, relative to its central body.
    ///
    /// Arguments
    /// ---------
    /// * `t` – simulated instant (ms).
    /// * `reference_epoch` – instant at which the mean anomaly equals `M0` (ms).
    ///
    /// Return
    /// ------
    /// * The position vector in the reference frame.
    pub fn position_at(&self, t: EpochMs, reference_epoch: EpochMs) -> Vector3<f64> {
        let dt = (t - reference_epoch) / MS_PER_SECOND;
        let ecc_anomaly = solve_kepler(self.mean_anomaly_at(dt), self.eccentricity);
        orbital_plane_rotation(
            self.periapsis_argument,
            self.inclination,
            self.ascending_node_longitude,
        ) * self.perifocal_position(ecc_anomaly)
    }
}

impl fmt::Display for OrbitalElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Orbital Elements")?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(
            f,
            "  a   (semi-major axis)       = {:.6}",
            self.semi_major_axis
        )?;
        writeln!(
            f,
            "  e   (eccentricity)          = {:.6}",
            self.eccentricity
        )?;
        writeln!(
            f,
            "  i   (inclination)           = {:.6} rad ({:.6}°)",
            self.inclination,
            self.inclination * DEGRAD
        )?;
        writeln!(
            f,
            "  Ω   (longitude of node)     = {:.6} rad ({:.6}°)",
            self.ascending_node_longitude,
            self.ascending_node_longitude * DEGRAD
        )?;
        writeln!(
            f,
            "  ω   (argument of periapsis) = {:.6} rad ({:.6}°)",
            self.periapsis_argument,
            self.periapsis_argument * DEGRAD
        )?;
        writeln!(
            f,
            "  M0  (mean anomaly)          = {:.6} rad ({:.6}°)",
            self.mean_anomaly,
            self.mean_anomaly * DEGRAD
        )?;
        writeln!(
            f,
            "  n   (mean motion)           = {:.6e} rad/s (period {:.3} d)",
            self.mean_motion,
            self.period_seconds() / SECONDS_PER_DAY
        )?;
        write!(f, "  R   (body radius)           = {:.6}", self.radius)
    }
}

#[cfg(test)]
pub(crate) mod test_keplerian_element {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::{FRAC_PI_2, PI};

    pub(crate) fn moon_like() -> OrbitalElements {
        OrbitalElements::from_period(2.5, 0.0549, 0.0898, 0.4, 1.2, 0.3, 2_360_592.0, 0.27)
    }

    #[test]
    fn test_mean_motion_period_reciprocal() {
        let moon = moon_like();
        assert_relative_eq!(moon.mean_motion, DPI / 2_360_592.0);
        assert_relative_eq!(moon.period_seconds(), 2_360_592.0, max_relative = 1e-14);
    }

    #[test]
    fn test_position_at_epoch_is_periapsis() {
        let elem = OrbitalElements::from_period(4.0, 0.2, 0.0, 0.0, 0.0, 0.0, 1000.0, 1.0);
        let r = elem.position_at(5_000.0, 5_000.0);
        assert_abs_diff_eq!(r, Vector3::new(4.0 * 0.8, 0.0, 0.0), epsilon = 1e-15);
    }

    #[test]
    fn test_position_half_period_is_apoapsis() {
        let elem = OrbitalElements::from_period(4.0, 0.2, 0.0, 0.0, 0.0, 0.0, 1000.0, 1.0);
        let r = elem.position_at(500.0 * 1000.0, 0.0);
        assert_abs_diff_eq!(r, Vector3::new(-4.0 * 1.2, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_position_is_periodic() {
        let moon = moon_like();
        let period_ms = moon.period_seconds() * 1000.0;
        for t in [0.0, 1.3e8, -7.7e8, 2.2e9] {
            let r0 = moon.position_at(t, 0.0);
            let r1 = moon.position_at(t + period_ms, 0.0);
            assert_abs_diff_eq!(r0, r1, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_distance_bounded_by_apsides() {
        let moon = moon_like();
        let a = moon.semi_major_axis;
        let e = moon.eccentricity;
        for k in 0..50 {
            let t = k as f64 * 1.0e8;
            let d = moon.position_at(t, 0.0).norm();
            assert!(d >= a * (1.0 - e) - 1e-12 && d <= a * (1.0 + e) + 1e-12);
        }
    }

    #[test]
    fn test_inclination_lifts_out_of_plane() {
        // quarter orbit after periapsis on a circular orbit with i = 90°, node on X:
        // the body sits on +Z
        let elem = OrbitalElements::from_period(1.0, 0.0, FRAC_PI_2, 0.0, 0.0, FRAC_PI_2, DPI, 1.0);
        let r = elem.position_at(0.0, 0.0);
        assert_abs_diff_eq!(r, Vector3::z(), epsilon = 1e-15);

        let r_half = elem.position_at(PI * 1000.0, 0.0);
        assert_abs_diff_eq!(r_half, -Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_validate() {
        assert!(moon_like().validate("moon").is_ok());

        let mut bad = moon_like();
        bad.eccentricity = 1.0;
        assert_eq!(
            bad.validate("moon"),
            Err(SyzygyError::InvalidEccentricity {
                body: "moon",
                value: 1.0
            })
        );

        let mut bad = moon_like();
        bad.mean_motion = f64::INFINITY;
        assert!(matches!(
            bad.validate("moon"),
            Err(SyzygyError::InvalidMeanMotion { .. })
        ));

        let mut bad = moon_like();
        bad.radius = 0.0;
        assert!(matches!(
            bad.validate("moon"),
            Err(SyzygyError::InvalidRadius { .. })
        ));
    }

    #[test]
    fn test_display() {
        let output = format!("{}", moon_like());
        assert!(output.contains("a   (semi-major axis)       = 2.500000"));
        assert!(output.contains("e   (eccentricity)          = 0.054900"));
        assert!(output.contains("(period 27.322 d)"));
        assert!(output.contains("R   (body radius)           = 0.270000"));
    }
}

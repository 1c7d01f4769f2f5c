//! # Lunar phase analysis
//!
//! Phase angle, illuminated fraction and named-phase classification of the Moon, computed
//! from the three body positions.
//!
//! * The **phase angle** φ is the Sun–Moon–Earth angle measured at the Moon, i.e. the angle
//!   between `moon − sun` and `moon − earth`. It is 180° at new moon and 0° at full moon.
//! * The **illuminated fraction** uses the usual photometric approximation `k = (1 + cos φ) / 2`.
//! * The **named phase** is a coarse quantization of φ with a tolerance band, so that a
//!   listener only hears about transitions between `new`, `quarter` and `full`.
//!
//! The signed variant [`signed_phase_degrees`] exists for the phase root-finder: the unsigned
//! angle only *touches* 0° and 180°, while the signed one crosses them.

use std::fmt;
use std::str::FromStr;

use nalgebra::Vector3;

use crate::{
    constants::{Degree, Radian, DEGRAD, PHASE_EPSILON_DEG},
    kepler::wrap_degrees,
    ref_system::angle_between,
    syzygy_errors::SyzygyError,
};

/// Phase angle and illuminated fraction of the Moon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseMetrics {
    /// Sun–Moon–Earth angle at the Moon, in `[0, π]`.
    pub phase_angle: Radian,
    /// Illuminated fraction of the visible disk, in `[0, 1]` (0 = new, 1 = full).
    pub illuminated_fraction: f64,
}

impl PhaseMetrics {
    pub fn phase_angle_degrees(&self) -> Degree {
        self.phase_angle * DEGRAD
    }
}

/// Named lunar phases tracked by the simulator.
///
/// First and last quarter are not told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseName {
    New,
    Full,
    Quarter,
}

impl PhaseName {
    /// Phase angle of the named phase, in degrees.
    pub fn goal_degrees(&self) -> Degree {
        match self {
            PhaseName::New => 180.0,
            PhaseName::Full => 0.0,
            PhaseName::Quarter => 90.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseName::New => "new",
            PhaseName::Full => "full",
            PhaseName::Quarter => "quarter",
        }
    }
}

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhaseName {
    type Err = SyzygyError;

    /// Parse a phase name.
    ///
    /// `firstQuarter` and `lastQuarter` (and their snake-case spellings) are accepted as
    /// aliases of `quarter`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "new" => Ok(PhaseName::New),
            "full" => Ok(PhaseName::Full),
            "quarter" | "firstQuarter" | "lastQuarter" | "first_quarter" | "last_quarter" => {
                Ok(PhaseName::Quarter)
            }
            other => Err(SyzygyError::UnknownPhase(other.to_string())),
        }
    }
}

/// Compute the phase angle and illuminated fraction of the Moon.
///
/// Arguments
/// ---------
/// * `sun`, `earth`, `moon`: body positions in the same frame.
///
/// Return
/// ------
/// * The [`PhaseMetrics`] of the configuration.
pub fn phase_metrics(sun: &Vector3<f64>, earth: &Vector3<f64>, moon: &Vector3<f64>) -> PhaseMetrics {
    let phase_angle = angle_between(&(moon - sun), &(moon - earth));
    PhaseMetrics {
        phase_angle,
        illuminated_fraction: (1.0 + phase_angle.cos()) / 2.0,
    }
}

/// Classify a phase angle into a named phase.
///
/// Arguments
/// ---------
/// * `phase_angle`: φ in radians.
/// * `epsilon_deg`: half-width of each band in degrees.
///
/// Return
/// ------
/// * `Some(name)` when φ lies strictly within `epsilon_deg` of 180° (new), 0° (full) or
///   90° (quarter), checked in that order; `None` between bands.
pub fn classify_phase(phase_angle: Radian, epsilon_deg: Degree) -> Option<PhaseName> {
    let d = phase_angle * DEGRAD;
    [PhaseName::New, PhaseName::Full, PhaseName::Quarter]
        .into_iter()
        .find(|name| (d - name.goal_degrees()).abs() < epsilon_deg)
}

/// [`classify_phase`] with the default 8° band.
pub fn classify_phase_default(phase_angle: Radian) -> Option<PhaseName> {
    classify_phase(phase_angle, PHASE_EPSILON_DEG)
}

/// Signed phase of the Moon, in degrees within `(-180, 180]`.
///
/// The Sun and Moon directions seen from the Earth are projected on the plane orthogonal to
/// `reference_normal`, and the elongation λ of the Moon is measured counter-clockwise from the
/// Sun about that normal. The result is `wrap(180° − λ)`: +180° at new moon, positive while
/// waxing, 0° at full moon and negative while waning.
///
/// Unlike the unsigned phase angle this quantity changes sign at full moon and goes through
/// ±180° at new moon, so a root of `wrap(ψ − goal)` can be bracketed.
pub fn signed_phase_degrees(
    sun: &Vector3<f64>,
    earth: &Vector3<f64>,
    moon: &Vector3<f64>,
    reference_normal: &Vector3<f64>,
) -> Degree {
    let n = reference_normal
        .try_normalize(0.0)
        .unwrap_or_else(Vector3::z);
    let to_sun = sun - earth;
    let to_moon = moon - earth;
    let sun_p = to_sun - n * to_sun.dot(&n);
    let moon_p = to_moon - n * to_moon.dot(&n);

    let elongation = n.dot(&sun_p.cross(&moon_p)).atan2(sun_p.dot(&moon_p)) * DEGRAD;
    wrap_degrees(180.0 - elongation)
}

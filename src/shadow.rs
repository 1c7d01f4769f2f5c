//! # Shadow cones and eclipse classification
//!
//! The Sun is modelled as a sphere of finite radius `R`. An occluding body of radius `r`
//! casts a shadow along the axis going from the light through the occluder center (the
//! *apex* of the cone):
//!
//! ```text
//!   light (R)          apex (r)            Lu = D·r/(R−r)
//!      ●  ───────────────  ●  ─── umbra ───▷ ·  ─── antumbra ───▷
//!      |<─────── D ──────>|<────── proj ──────>
//! ```
//!
//! * `0 ≤ proj ≤ Lu` – the umbra shrinks linearly from `r` at the apex to 0 at `Lu`.
//! * `proj > Lu` – the umbra has vanished; the antumbra/penumbra radius grows linearly
//!   past `Lu` at the rate `R / (D − Lu)`.
//! * `proj < 0` – the target is on the light side of the occluder; it is only hit if it
//!   touches the axis.
//!
//! If the light is not larger than the occluder (`R ≤ r`), no umbra can converge and a
//! reduced penumbra-only model is used.
//!
//! The same primitive serves both eclipse configurations:
//!
//! | eclipse | apex | occluder radius | target |
//! |---------|------|-----------------|--------|
//! | solar   | Moon | Moon radius     | Earth  |
//! | lunar   | Earth| Earth radius    | Moon   |

use std::fmt;

use nalgebra::Vector3;

use crate::constants::{EpochMs, ANTUMBRA_DEPTH, PENUMBRA_SCALE};

/// Guard against a vanishing light-to-apex distance in the degenerate model.
const DEGENERATE_DISTANCE_EPS: f64 = 1e-9;

/// Lower bound of the distance between the light and the umbra tip.
const MIN_ANTUMBRA_DENOM: f64 = 1e-6;

/// Region of the shadow the target falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShadowSubtype {
    Umbra,
    Penumbra,
    Antumbra,
}

impl fmt::Display for ShadowSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShadowSubtype::Umbra => "umbra",
            ShadowSubtype::Penumbra => "penumbra",
            ShadowSubtype::Antumbra => "antumbra",
        })
    }
}

/// Input of the shadow-cone test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowCone {
    /// Center of the light source.
    pub light: Vector3<f64>,
    /// Center of the occluding body.
    pub apex: Vector3<f64>,
    pub occluder_radius: f64,
    /// Center of the body that may be shadowed.
    pub target: Vector3<f64>,
    pub target_radius: f64,
    pub light_radius: f64,
    /// Factor applied to the target radius in the penumbra test.
    pub penumbra_scale: f64,
    /// Fraction of the target radius it must sit inside the antumbra edge to count as annular.
    pub antumbra_depth: f64,
}

impl ShadowCone {
    /// Cone with the default penumbra scale and antumbra depth.
    pub fn new(
        light: Vector3<f64>,
        light_radius: f64,
        apex: Vector3<f64>,
        occluder_radius: f64,
        target: Vector3<f64>,
        target_radius: f64,
    ) -> Self {
        ShadowCone {
            light,
            apex,
            occluder_radius,
            target,
            target_radius,
            light_radius,
            penumbra_scale: PENUMBRA_SCALE,
            antumbra_depth: ANTUMBRA_DEPTH,
        }
    }

    pub fn with_penumbra_scale(mut self, penumbra_scale: f64) -> Self {
        self.penumbra_scale = penumbra_scale;
        self
    }

    pub fn with_antumbra_depth(mut self, antumbra_depth: f64) -> Self {
        self.antumbra_depth = antumbra_depth;
        self
    }
}

/// Outcome of the shadow-cone test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShadowHit {
    Miss,
    Hit {
        subtype: ShadowSubtype,
        /// Distance from the target center to the cone axis.
        d_perp: f64,
        /// Signed distance from the apex along the axis, positive away from the light.
        proj: f64,
        /// Umbra radius at `proj` (0 when absent).
        umbra_radius: f64,
        /// Penumbra/antumbra radius at `proj`.
        penumbra_radius: f64,
    },
}

impl ShadowHit {
    pub fn is_hit(&self) -> bool {
        matches!(self, ShadowHit::Hit { .. })
    }

    pub fn subtype(&self) -> Option<ShadowSubtype> {
        match self {
            ShadowHit::Hit { subtype, .. } => Some(*subtype),
            ShadowHit::Miss => None,
        }
    }
}

/// Test whether the target of a [`ShadowCone`] falls in the occluder's shadow.
///
/// Arguments
/// ---------
/// * `cone`: light, occluder and target geometry.
///
/// Return
/// ------
/// * [`ShadowHit::Hit`] with the shadow region and the projected geometry, or
///   [`ShadowHit::Miss`].
///
/// Remarks
/// -------
/// * For a fixed along-axis position every hit condition has the form `d_perp ≤ threshold`,
///   so moving the target toward the axis can only turn a miss into a hit.
/// * If the light and the apex coincide the axis is undefined and the result is a miss.
pub fn cone_shadow_hit(cone: &ShadowCone) -> ShadowHit {
    let light_to_apex = cone.apex - cone.light;
    let distance = light_to_apex.norm();
    let Some(axis) = light_to_apex.try_normalize(0.0) else {
        return ShadowHit::Miss;
    };

    let apex_to_target = cone.target - cone.apex;
    let proj = apex_to_target.dot(&axis);
    let d_perp = (apex_to_target - axis * proj).norm();

    let big_r = cone.light_radius;
    let r = cone.occluder_radius;
    let pen_allowance = cone.target_radius * cone.penumbra_scale;

    if big_r <= r {
        let pen_only = if proj >= 0.0 {
            proj * (big_r / (distance + DEGENERATE_DISTANCE_EPS))
        } else {
            0.0
        };
        return if d_perp <= pen_only + pen_allowance {
            ShadowHit::Hit {
                subtype: ShadowSubtype::Penumbra,
                d_perp,
                proj,
                umbra_radius: 0.0,
                penumbra_radius: pen_only,
            }
        } else {
            ShadowHit::Miss
        };
    }

    let umbra_length = distance * r / (big_r - r);

    let (umbra_radius, penumbra_radius) = if (0.0..=umbra_length).contains(&proj) {
        let radius = (umbra_length - proj) * (r / umbra_length);
        (radius, radius)
    } else if proj > umbra_length {
        let denom = (distance - umbra_length).max(MIN_ANTUMBRA_DENOM);
        (0.0, (proj - umbra_length) * (big_r / denom))
    } else {
        (0.0, 0.0)
    };

    if umbra_radius > 0.0 && d_perp <= umbra_radius + cone.target_radius {
        return ShadowHit::Hit {
            subtype: ShadowSubtype::Umbra,
            d_perp,
            proj,
            umbra_radius,
            penumbra_radius,
        };
    }

    if d_perp <= penumbra_radius + pen_allowance {
        let deep = d_perp
            <= (penumbra_radius - cone.target_radius * cone.antumbra_depth).max(MIN_ANTUMBRA_DENOM);
        let subtype = if proj > umbra_length && deep {
            ShadowSubtype::Antumbra
        } else {
            ShadowSubtype::Penumbra
        };
        return ShadowHit::Hit {
            subtype,
            d_perp,
            proj,
            umbra_radius,
            penumbra_radius,
        };
    }

    ShadowHit::Miss
}

/// Which body is eclipsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EclipseKind {
    /// The Moon hides the Sun as seen from the Earth.
    Solar,
    /// The Earth hides the Sun as seen from the Moon.
    Lunar,
}

impl fmt::Display for EclipseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EclipseKind::Solar => "solar",
            EclipseKind::Lunar => "lunar",
        })
    }
}

/// Visual class of an eclipse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EclipseClass {
    Total,
    Partial,
    Annular,
}

impl EclipseClass {
    /// Class of an eclipse from the shadow region hit.
    ///
    /// Lunar eclipses are never annular: an antumbra hit on the Moon counts as partial.
    pub fn for_event(kind: EclipseKind, subtype: ShadowSubtype) -> Self {
        match (kind, subtype) {
            (_, ShadowSubtype::Umbra) => EclipseClass::Total,
            (EclipseKind::Solar, ShadowSubtype::Antumbra) => EclipseClass::Annular,
            _ => EclipseClass::Partial,
        }
    }
}

impl fmt::Display for EclipseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EclipseClass::Total => "total",
            EclipseClass::Partial => "partial",
            EclipseClass::Annular => "annular",
        })
    }
}

/// A detected eclipse, stamped with the simulated instant of detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipseEvent {
    pub kind: EclipseKind,
    pub subtype: ShadowSubtype,
    pub class: EclipseClass,
    pub t: EpochMs,
}

impl EclipseEvent {
    pub fn new(kind: EclipseKind, subtype: ShadowSubtype, t: EpochMs) -> Self {
        EclipseEvent {
            kind,
            subtype,
            class: EclipseClass::for_event(kind, subtype),
            t,
        }
    }

    /// Key identifying the ongoing alignment, e.g. `"solar:umbra"`.
    pub fn latch_key(&self) -> String {
        format!("{}:{}", self.kind, self.subtype)
    }
}

impl fmt::Display for EclipseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} eclipse ({}) at t = {:.0} ms",
            self.class, self.kind, self.subtype, self.t
        )
    }
}

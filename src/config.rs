//! Simulation configuration with the default scene and RON persistence.
//!
//! Every section is `#[serde(default)]`, so a configuration file only needs to mention what
//! it overrides. [`SimulationConfig::finalize`] validates the values and derives the mean
//! motions, producing the [`FinalizedConfig`] the controller runs on.

use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        EpochMs, Seconds, ALIGN_THRESHOLD_DEG, ANTUMBRA_DEPTH, DEFAULT_TIME_SCALE,
        DPI, EARTH_ECCENTRICITY, EARTH_INCLINATION_DEG, EARTH_PERIOD_SECONDS, EARTH_RADIUS,
        EARTH_SEMI_MAJOR_AXIS, ECLIPSE_COOLDOWN_SECONDS, MOON_ECCENTRICITY, MOON_INCLINATION_DEG,
        MOON_PERIOD_SECONDS, MOON_RADIUS, MOON_SEMI_MAJOR_AXIS, NEW_FULL_WINDOW_HOURS,
        PENUMBRA_SCALE, PHASE_EPSILON_DEG, QUARTER_WINDOW_HOURS, RADEG, SUN_RADIUS,
    },
    keplerian_element::OrbitalElements,
    syzygy_errors::SyzygyError,
    time::now_epoch_ms,
};

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Clock settings.
    pub time: TimeConfig,
    /// Light source.
    pub sun: SunConfig,
    /// Heliocentric orbit of the Earth.
    pub earth: BodyConfig,
    /// Geocentric orbit of the Moon.
    pub moon: BodyConfig,
    /// Phase and eclipse detection thresholds.
    pub detection: DetectionConfig,
    /// Phase-jump search windows.
    pub search: SearchConfig,
}

/// Clock configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimeConfig {
    /// Initial simulated instant (ms since the Unix epoch). `None` = wall clock at construction.
    pub start_epoch_ms: Option<EpochMs>,
    /// Simulated seconds per real second.
    pub time_scale: f64,
}

/// Sun configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SunConfig {
    /// Fixed position of the Sun.
    pub position: [f64; 3],
    /// Radius of the light source.
    pub radius: f64,
}

/// Orbit and size of one body.
///
/// Angles are in radians. Exactly one of `mean_motion` and `period_seconds` is needed; when
/// both are present the mean motion wins.
///
/// A section that is absent takes the default orbit of its body. Fields missing from a section
/// that is present fall back to [`BodyConfig::default`], the Earth orbit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub ascending_node_longitude: f64,
    pub periapsis_argument: f64,
    /// Mean anomaly at the start epoch.
    pub mean_anomaly: f64,
    pub period_seconds: Option<Seconds>,
    /// Mean motion in rad/s.
    pub mean_motion: Option<f64>,
    pub radius: f64,
}

/// Detection thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectionConfig {
    /// Alignment pre-filter for solar eclipses (degrees).
    pub align_thresh_deg_solar: f64,
    /// Alignment pre-filter for lunar eclipses (degrees).
    pub align_thresh_deg_lunar: f64,
    /// Widening factor of the penumbra allowance.
    pub penumbra_scale: f64,
    /// Minimum simulated time between two eclipse alerts (seconds).
    pub eclipse_cooldown_sim_sec: Seconds,
    /// Half-width of the named-phase bands (degrees).
    pub phase_epsilon_deg: f64,
    /// Depth, in target radii, required to classify an antumbra hit as annular.
    pub antumbra_depth: f64,
}

/// Phase-jump search windows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Full width of the window scanned for a new or full moon (hours).
    pub new_full_window_hours: f64,
    /// Full width of the window scanned for a quarter (hours).
    pub quarter_window_hours: f64,
}

// --- Default implementations ---

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time: TimeConfig::default(),
            sun: SunConfig::default(),
            earth: BodyConfig::earth(),
            moon: BodyConfig::moon(),
            detection: DetectionConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            start_epoch_ms: None,
            time_scale: DEFAULT_TIME_SCALE,
        }
    }
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            radius: SUN_RADIUS,
        }
    }
}

impl BodyConfig {
    /// Default heliocentric Earth orbit of the scene.
    pub fn earth() -> Self {
        Self {
            semi_major_axis: EARTH_SEMI_MAJOR_AXIS,
            eccentricity: EARTH_ECCENTRICITY,
            inclination: EARTH_INCLINATION_DEG * RADEG,
            ascending_node_longitude: 0.0,
            periapsis_argument: 0.0,
            mean_anomaly: 0.0,
            period_seconds: Some(EARTH_PERIOD_SECONDS),
            mean_motion: None,
            radius: EARTH_RADIUS,
        }
    }

    /// Default geocentric Moon orbit of the scene.
    pub fn moon() -> Self {
        Self {
            semi_major_axis: MOON_SEMI_MAJOR_AXIS,
            eccentricity: MOON_ECCENTRICITY,
            inclination: MOON_INCLINATION_DEG * RADEG,
            ascending_node_longitude: 0.0,
            periapsis_argument: 0.0,
            mean_anomaly: 0.0,
            period_seconds: Some(MOON_PERIOD_SECONDS),
            mean_motion: None,
            radius: MOON_RADIUS,
        }
    }

    /// Validate the body and derive its [`OrbitalElements`].
    ///
    /// Arguments
    /// ---------
    /// * `body` – name used in error messages.
    ///
    /// Return
    /// ------
    /// * The validated elements, or a [`SyzygyError`] describing the first invalid value.
    pub fn to_elements(&self, body: &'static str) -> Result<OrbitalElements, SyzygyError> {
        let mean_motion = match (self.mean_motion, self.period_seconds) {
            (Some(n), _) => n,
            (None, Some(period)) => {
                if !period.is_finite() || period <= 0.0 {
                    return Err(SyzygyError::InvalidPeriod {
                        body,
                        value: period,
                    });
                }
                DPI / period
            }
            (None, None) => return Err(SyzygyError::MissingMeanMotion(body)),
        };

        let elements = OrbitalElements {
            semi_major_axis: self.semi_major_axis,
            eccentricity: self.eccentricity,
            inclination: self.inclination,
            ascending_node_longitude: self.ascending_node_longitude,
            periapsis_argument: self.periapsis_argument,
            mean_anomaly: self.mean_anomaly,
            mean_motion,
            radius: self.radius,
        };
        elements.validate(body)?;
        Ok(elements)
    }
}

impl Default for BodyConfig {
    fn default() -> Self {
        BodyConfig::earth()
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            align_thresh_deg_solar: ALIGN_THRESHOLD_DEG,
            align_thresh_deg_lunar: ALIGN_THRESHOLD_DEG,
            penumbra_scale: PENUMBRA_SCALE,
            eclipse_cooldown_sim_sec: ECLIPSE_COOLDOWN_SECONDS,
            phase_epsilon_deg: PHASE_EPSILON_DEG,
            antumbra_depth: ANTUMBRA_DEPTH,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            new_full_window_hours: NEW_FULL_WINDOW_HOURS,
            quarter_window_hours: QUARTER_WINDOW_HOURS,
        }
    }
}

// --- Finalization ---

/// Validated configuration with derived quantities, as consumed by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedConfig {
    /// Reference epoch of both orbits and initial simulated time (ms).
    pub start_epoch_ms: EpochMs,
    pub time_scale: f64,
    pub sun_position: Vector3<f64>,
    pub sun_radius: f64,
    pub earth: OrbitalElements,
    pub moon: OrbitalElements,
    pub detection: DetectionConfig,
    pub search: SearchConfig,
}

impl SimulationConfig {
    /// Validate the configuration and derive the mean motions.
    ///
    /// The start epoch falls back to the wall clock when not given.
    pub fn finalize(&self) -> Result<FinalizedConfig, SyzygyError> {
        let earth = self.earth.to_elements("earth")?;
        let moon = self.moon.to_elements("moon")?;

        if !self.sun.radius.is_finite() || self.sun.radius <= 0.0 {
            return Err(SyzygyError::InvalidRadius {
                body: "sun",
                value: self.sun.radius,
            });
        }

        let start_epoch_ms = match self.time.start_epoch_ms {
            Some(ms) if ms.is_finite() => ms,
            Some(ms) => return Err(SyzygyError::InvalidDate(format!("{ms} ms"))),
            None => now_epoch_ms()?,
        };

        let [x, y, z] = self.sun.position;
        Ok(FinalizedConfig {
            start_epoch_ms,
            time_scale: self.time.time_scale,
            sun_position: Vector3::new(x, y, z),
            sun_radius: self.sun.radius,
            earth,
            moon,
            detection: self.detection.clone(),
            search: self.search.clone(),
        })
    }

    // --- Load / Save ---

    /// Parse a configuration from RON text.
    pub fn from_ron_str(contents: &str) -> Result<Self, SyzygyError> {
        Ok(ron::from_str(contents)?)
    }

    /// Serialize the configuration to pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String, SyzygyError> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, SyzygyError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&contents)?;
        log::info!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    /// Write the configuration to a file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), SyzygyError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_ron_string()?)?;
        log::debug!("Saved simulation config to {}", path.display());
        Ok(())
    }
}

//! # Constants and type definitions for Syzygy
//!
//! This module centralizes the **unit conversions**, **numerical thresholds**, and **common type
//! aliases** used throughout the `syzygy` crate, together with the default parameters of the
//! simulated Sun–Earth–Moon system.
//!
//! ## Overview
//!
//! - Angle and time conversions (degrees ↔ radians, milliseconds ↔ seconds)
//! - Default body parameters (scaled, not physical: the scene is a visual model)
//! - Default detection thresholds for phases and eclipses
//! - Type aliases used across the crate to make units explicit in signatures
//!
//! Distances are expressed in arbitrary *scene units*; only their ratios matter for the
//! shadow-cone geometry.

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Radians → degrees
pub const DEGRAD: f64 = 180.0 / std::f64::consts::PI;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of seconds in an hour
pub const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Number of milliseconds in a second
pub const MS_PER_SECOND: f64 = 1_000.0;

// -------------------------------------------------------------------------------------------------
// Default scene
// -------------------------------------------------------------------------------------------------

/// Default simulation speed: simulated seconds per real second
pub const DEFAULT_TIME_SCALE: f64 = 24.0;

/// Default Sun radius (scene units)
pub const SUN_RADIUS: f64 = 3.0;

/// Earth: semi-major axis of the heliocentric orbit (scene units)
pub const EARTH_SEMI_MAJOR_AXIS: f64 = 10.0;
/// Earth: orbital eccentricity
pub const EARTH_ECCENTRICITY: f64 = 0.0167;
/// Earth: orbital inclination in degrees
pub const EARTH_INCLINATION_DEG: f64 = 0.41;
/// Earth: orbital period (365 days) in seconds
pub const EARTH_PERIOD_SECONDS: f64 = 365.0 * SECONDS_PER_DAY;
/// Earth radius (scene units)
pub const EARTH_RADIUS: f64 = 1.0;

/// Moon: semi-major axis of the geocentric orbit (scene units)
pub const MOON_SEMI_MAJOR_AXIS: f64 = 2.5;
/// Moon: orbital eccentricity
pub const MOON_ECCENTRICITY: f64 = 0.0549;
/// Moon: orbital inclination in degrees
pub const MOON_INCLINATION_DEG: f64 = 5.145;
/// Moon: sidereal period (27.321661 days) in seconds
pub const MOON_PERIOD_SECONDS: f64 = 27.321661 * SECONDS_PER_DAY;
/// Moon radius (scene units)
pub const MOON_RADIUS: f64 = 0.27;

// -------------------------------------------------------------------------------------------------
// Detection thresholds
// -------------------------------------------------------------------------------------------------

/// Coarse alignment filter before the shadow-cone test, in degrees
pub const ALIGN_THRESHOLD_DEG: f64 = 1.8;

/// Widening factor of the penumbra allowance
pub const PENUMBRA_SCALE: f64 = 1.02;

/// Fraction of the target radius it must sit inside the antumbra to be classified annular
pub const ANTUMBRA_DEPTH: f64 = 0.4;

/// Minimum simulated time between two eclipse alerts (6 hours)
pub const ECLIPSE_COOLDOWN_SECONDS: f64 = 6.0 * SECONDS_PER_HOUR;

/// Half-width of the named-phase bands, in degrees
pub const PHASE_EPSILON_DEG: f64 = 8.0;

/// Search window used when jumping to a new or full moon, in hours
pub const NEW_FULL_WINDOW_HOURS: f64 = 72.0;

/// Search window used when jumping to a quarter, in hours
pub const QUARTER_WINDOW_HOURS: f64 = 96.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Simulated instant, milliseconds since the Unix epoch
pub type EpochMs = f64;
/// Duration in seconds
pub type Seconds = f64;

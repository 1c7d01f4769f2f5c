//! # Phase root-finder
//!
//! Locate the instant at which the Moon reaches a target phase, near a given epoch.
//!
//! The search works on an *error function* `f(t)` in degrees that vanishes at the target and
//! changes sign across it:
//!
//! 1. **Scan** – the window `[center − W/2, center + W/2]` is sampled in [`SCAN_STEPS`] uniform
//!    steps and the first interval with `f(a)·f(b) ≤ 0` is kept. Intervals whose endpoints differ
//!    by 180° or more straddle the ±180° wrap of the error and are skipped.
//! 2. **Bisection** – [`BISECTION_STEPS`] halvings of that interval, stopping as soon as
//!    `|f(mid)| < 0.2°`.
//! 3. **Newton** – up to [`NEWTON_STEPS`] corrections with a forward-difference derivative over
//!    60 s, skipped once `|f| < 0.05°` or when the derivative vanishes.
//!
//! A window without any bracketing interval is a quiet miss (`None`).

use crate::{
    constants::{Degree, EpochMs, Seconds, MS_PER_SECOND},
    ephemeris::SolarSystem,
    kepler::wrap_degrees,
    phase::PhaseName,
};

/// Number of uniform steps of the bracketing scan.
pub const SCAN_STEPS: usize = 96;

/// Maximum number of bisection halvings.
pub const BISECTION_STEPS: usize = 10;

/// Maximum number of Newton corrections.
pub const NEWTON_STEPS: usize = 2;

/// Early exit of the bisection (degrees).
const BISECTION_TOL: Degree = 0.2;

/// Early exit of the Newton refinement (degrees).
const NEWTON_TOL: Degree = 0.05;

/// Forward-difference step of the numerical derivative (seconds).
const DERIVATIVE_STEP: Seconds = 60.0;

/// Derivatives smaller than this (degrees per second) stop the Newton refinement.
const MIN_DERIVATIVE: f64 = 1e-9;

/// Error of the Moon phase at `t` relative to a named target, in degrees.
///
/// * New and full moon: `wrap(ψ − goal)`, with ψ the signed phase, which crosses zero at the
///   target.
/// * Quarter: `|ψ| − 90`, which vanishes at both the first and the last quarter.
pub fn phase_error(system: &SolarSystem, target: PhaseName, t: EpochMs) -> Degree {
    let psi = system.signed_phase_at(t);
    match target {
        PhaseName::New | PhaseName::Full => wrap_degrees(psi - target.goal_degrees()),
        PhaseName::Quarter => psi.abs() - target.goal_degrees(),
    }
}

/// Find a root of `err_fn` in a window centred on `center`.
///
/// Arguments
/// ---------
/// * `err_fn`: error in degrees as a function of the epoch (ms).
/// * `center`: center of the search window (ms).
/// * `window_seconds`: full width of the window (s).
///
/// Return
/// ------
/// * `Some(t)`, the refined epoch in ms, or `None` if no sign change was found in the window.
pub fn find_time_for_phase<F>(mut err_fn: F, center: EpochMs, window_seconds: Seconds) -> Option<EpochMs>
where
    F: FnMut(EpochMs) -> Degree,
{
    let half_window = 0.5 * window_seconds * MS_PER_SECOND;
    let t0 = center - half_window;
    let t1 = center + half_window;
    let step = (t1 - t0) / SCAN_STEPS as f64;

    let (mut a, mut b, mut fa, mut fb) = bracket(&mut err_fn, t0, step)?;

    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (a + b);
        let fm = err_fn(mid);
        if fm.abs() < BISECTION_TOL {
            a = mid;
            b = mid;
            break;
        }
        if fa * fm <= 0.0 {
            b = mid;
            fb = fm;
        } else {
            a = mid;
            fa = fm;
        }
    }
    log::trace!("phase bisection narrowed to [{a}, {b}] (f = {fa:.4}, {fb:.4})");

    let mut t = 0.5 * (a + b);
    for _ in 0..NEWTON_STEPS {
        let f = err_fn(t);
        if f.abs() < NEWTON_TOL {
            break;
        }
        let h = DERIVATIVE_STEP * MS_PER_SECOND;
        let fp = (err_fn(t + h) - f) / DERIVATIVE_STEP;
        if fp.abs() < MIN_DERIVATIVE {
            break;
        }
        t -= f / fp * MS_PER_SECOND;
    }

    Some(t)
}

/// First scan interval bracketing a sign change, as `(a, b, f(a), f(b))`.
fn bracket<F>(err_fn: &mut F, t0: EpochMs, step: f64) -> Option<(f64, f64, f64, f64)>
where
    F: FnMut(EpochMs) -> Degree,
{
    let mut a = t0;
    let mut fa = err_fn(a);
    for i in 1..=SCAN_STEPS {
        let b = t0 + i as f64 * step;
        let fb = err_fn(b);
        if fa * fb <= 0.0 && (fb - fa).abs() < 180.0 {
            return Some((a, b, fa, fb));
        }
        a = b;
        fa = fb;
    }
    None
}

#[cfg(test)]
mod phase_search_test {
    use super::*;
    use crate::config::SimulationConfig;
    use approx::assert_abs_diff_eq;

    const HOUR_MS: f64 = 3_600_000.0;

    fn default_system() -> SolarSystem {
        let mut config = SimulationConfig::default();
        config.time.start_epoch_ms = Some(0.0);
        SolarSystem::from_config(&config.finalize().unwrap())
    }

    #[test]
    fn test_linear_root() {
        // 1° per hour, root at +5 h
        let f = |t: f64| (t - 5.0 * HOUR_MS) / HOUR_MS;
        let t = find_time_for_phase(f, 0.0, 72.0 * 3600.0).unwrap();
        assert_abs_diff_eq!(t, 5.0 * HOUR_MS, epsilon = 1.0);
    }

    #[test]
    fn test_no_sign_change_is_none() {
        assert_eq!(find_time_for_phase(|_| 10.0, 0.0, 3600.0), None);
    }

    #[test]
    fn test_wrap_discontinuity_is_skipped() {
        // sawtooth jumping from +179 to -179 at t = 0, no real root in the window
        let f = |t: f64| if t < 0.0 { 179.0 } else { -179.0 };
        assert_eq!(find_time_for_phase(f, 0.0, 3600.0), None);
    }

    #[test]
    fn test_full_moon_found_around_reference_epoch() {
        let system = default_system();
        let center = -10.0 * HOUR_MS;
        let t = find_time_for_phase(|t| phase_error(&system, PhaseName::Full, t), center, 72.0 * 3600.0)
            .unwrap();
        assert!(t.abs() < HOUR_MS, "t = {t}");
        assert!(system.phase_at(t).phase_angle_degrees() < 1.0);
    }

    #[test]
    fn test_new_moon_half_a_month_later() {
        let system = default_system();
        // mean synodic half-month
        let center = 14.5 * 24.0 * HOUR_MS;
        let t = find_time_for_phase(|t| phase_error(&system, PhaseName::New, t), center, 72.0 * 3600.0)
            .unwrap();
        assert!(phase_error(&system, PhaseName::New, t).abs() < 0.2);
        // the Moon is off the ecliptic there, so the phase angle stays short of 180°
        assert!(system.phase_at(t).phase_angle_degrees() > 175.0);
    }

    #[test]
    fn test_quarter_error_vanishes_at_both_quarters() {
        let system = default_system();
        let week = 7.0 * 24.0 * HOUR_MS;
        let first = find_time_for_phase(|t| phase_error(&system, PhaseName::Quarter, t), -week, 96.0 * 3600.0)
            .unwrap();
        let last = find_time_for_phase(|t| phase_error(&system, PhaseName::Quarter, t), week, 96.0 * 3600.0)
            .unwrap();
        assert!(first < 0.0 && last > 0.0);
        assert!(phase_error(&system, PhaseName::Quarter, first).abs() < 0.2);
        assert!(phase_error(&system, PhaseName::Quarter, last).abs() < 0.2);
    }
}

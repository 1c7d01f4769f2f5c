use std::f64::consts::PI;

use super::constants::{Degree, Radian, DPI};

/// Maximum number of Newton iterations of [`solve_kepler`].
const KEPLER_MAX_ITER: usize = 8;

/// Step size under which the Newton iteration is considered converged.
const KEPLER_STEP_TOL: f64 = 1e-12;

/// Eccentricity from which the Newton iteration is seeded at π instead of at M.
const HIGH_ECCENTRICITY: f64 = 0.8;

/// Principal value of an angle in radians, in [0, 2π).
pub fn principal_angle(a: Radian) -> Radian {
    a.rem_euclid(DPI)
}

/// Wrap an angle in radians into `(-π, π]`.
pub fn wrap_angle(a: Radian) -> Radian {
    let w = principal_angle(a);
    if w > PI {
        w - DPI
    } else {
        w
    }
}

/// Wrap an angle in degrees into `(-180, 180]`.
pub fn wrap_degrees(d: Degree) -> Degree {
    let w = d.rem_euclid(360.0);
    if w > 180.0 {
        w - 360.0
    } else {
        w
    }
}

/// Solve Kepler's equation `E - e·sin(E) = M` for the eccentric anomaly.
///
/// The mean anomaly is first wrapped into `(-π, π]`. A Newton–Raphson iteration is then run for
/// at most eight steps, seeded at `E₀ = M` for `e < 0.8` and at `E₀ = π` for more eccentric
/// orbits, and stopped as soon as a correction drops under `1e-12`.
///
/// The equation is odd in `M`, so the iteration is carried out on `|M| ∈ [0, π]` and the sign is
/// restored afterwards: on that half-range the residual is convex and the π seed always sits on
/// the far side of the root.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: M in radians, any real value.
/// * `eccentricity`: e in `[0, 1)`.
///
/// Return
/// ------
/// * The eccentric anomaly E in `[-π, π]`.
///
/// Remarks
/// -------
/// * This function never fails. If the iteration budget runs out before convergence the last
///   iterate is returned as is.
pub fn solve_kepler(mean_anomaly: Radian, eccentricity: f64) -> Radian {
    let m = wrap_angle(mean_anomaly);
    let sign = if m < 0.0 { -1.0 } else { 1.0 };
    let m_abs = m.abs();

    let mut ecc_anomaly = if eccentricity < HIGH_ECCENTRICITY {
        m_abs
    } else {
        PI
    };

    for _ in 0..KEPLER_MAX_ITER {
        let f = ecc_anomaly - eccentricity * ecc_anomaly.sin() - m_abs;
        let fp = 1.0 - eccentricity * ecc_anomaly.cos();
        let step = f / fp;
        ecc_anomaly -= step;
        if step.abs() < KEPLER_STEP_TOL {
            break;
        }
    }

    sign * ecc_anomaly
}

/// Residual of Kepler's equation for a candidate eccentric anomaly.
pub fn kepler_residual(ecc_anomaly: Radian, eccentricity: f64, mean_anomaly: Radian) -> f64 {
    ecc_anomaly - eccentricity * ecc_anomaly.sin() - wrap_angle(mean_anomaly)
}

#[cfg(test)]
mod kepler_test {

    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_principal_angle() {
        assert_abs_diff_eq!(principal_angle(-PI / 2.0), 1.5 * PI, epsilon = 1e-15);
        assert_abs_diff_eq!(principal_angle(5.0 * PI), PI, epsilon = 1e-14);
        assert_eq!(principal_angle(0.0), 0.0);
    }

    #[test]
    fn test_wrap_angle() {
        assert_abs_diff_eq!(wrap_angle(1.5 * PI), -0.5 * PI, epsilon = 1e-15);
        assert_abs_diff_eq!(wrap_angle(-1.5 * PI), 0.5 * PI, epsilon = 1e-15);
        assert_abs_diff_eq!(wrap_angle(PI), PI);
        assert_abs_diff_eq!(wrap_angle(-PI), PI);
        assert_abs_diff_eq!(wrap_angle(10.25 * PI), 0.25 * PI, epsilon = 1e-14);
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(190.0), -170.0);
        assert_eq!(wrap_degrees(-190.0), 170.0);
        assert_eq!(wrap_degrees(180.0), 180.0);
        assert_eq!(wrap_degrees(-180.0), 180.0);
        assert_eq!(wrap_degrees(720.5), 0.5);
    }

    #[test]
    fn test_solve_kepler_circular() {
        // e = 0: E = M exactly
        for m in [-3.0, -1.0, 0.0, 0.5, 2.9] {
            assert_abs_diff_eq!(solve_kepler(m, 0.0), m, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_solve_kepler_known_value() {
        let e = solve_kepler(1.0, 0.5);
        assert_abs_diff_eq!(e, 1.498_701_133_517_848, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_kepler_convergence_grid() {
        let n_ecc = 19;
        let n_mean = 201;
        for i in 0..n_ecc {
            let ecc = 0.9 * i as f64 / (n_ecc - 1) as f64;
            for j in 0..n_mean {
                let m = -10.0 * PI + 20.0 * PI * j as f64 / (n_mean - 1) as f64;
                let big_e = solve_kepler(m, ecc);
                let res = kepler_residual(big_e, ecc, m);
                assert!(
                    res.abs() < 1e-6,
                    "no convergence for e = {ecc}, M = {m}: residual {res}"
                );
            }
        }
    }

    #[test]
    fn test_solve_kepler_odd_symmetry() {
        for ecc in [0.1, 0.6, 0.85] {
            for m in [0.2, 1.3, 2.7] {
                assert_abs_diff_eq!(solve_kepler(-m, ecc), -solve_kepler(m, ecc), epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_solve_kepler_never_fails_near_parabolic() {
        // e → 1 is outside the convergence guarantee but must still produce a finite value
        let big_e = solve_kepler(1e-3, 0.9999);
        assert!(big_e.is_finite());
        assert!((0.0..=PI).contains(&big_e));
    }
}

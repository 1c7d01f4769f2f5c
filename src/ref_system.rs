//! # Reference-frame helpers
//!
//! Elementary rotations and vector geometry shared by the orbit evaluator, the phase analyzer
//! and the shadow-cone detector. Every position in the crate is a full 3D
//! [`nalgebra::Vector3<f64>`]; there is no implicit `z = 0`.
//!
//! The orbital plane of a body is placed in the reference frame by the classical 3-1-3
//! composition `Rz(Ω) · Rx(i) · Rz(ω)`, see [`orbital_plane_rotation`].

use nalgebra::{Rotation3, Vector3};

use crate::constants::Radian;

/// Rotation from the perifocal frame of an orbit to the reference frame.
///
/// The perifocal vector is first turned by the argument of periapsis around Z, then tilted by
/// the inclination around X (the line of nodes), and finally turned by the longitude of the
/// ascending node around Z.
///
/// Arguments
/// ---------
/// * `periapsis_argument`: ω (radians).
/// * `inclination`: i (radians).
/// * `ascending_node_longitude`: Ω (radians).
///
/// Return
/// ------
/// * `Rz(Ω) · Rx(i) · Rz(ω)` as a [`Rotation3`].
pub fn orbital_plane_rotation(
    periapsis_argument: Radian,
    inclination: Radian,
    ascending_node_longitude: Radian,
) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), ascending_node_longitude)
        * Rotation3::from_axis_angle(&Vector3::x_axis(), inclination)
        * Rotation3::from_axis_angle(&Vector3::z_axis(), periapsis_argument)
}

/// Unit normal of an orbital plane expressed in the reference frame.
pub fn orbital_plane_normal(inclination: Radian, ascending_node_longitude: Radian) -> Vector3<f64> {
    orbital_plane_rotation(0.0, inclination, ascending_node_longitude) * Vector3::z()
}

/// Angle between two vectors, in `[0, π]`.
///
/// A zero-length input has no direction; it is treated as orthogonal to everything and the
/// result is `π/2`.
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> Radian {
    let na = a.try_normalize(0.0).unwrap_or_else(Vector3::zeros);
    let nb = b.try_normalize(0.0).unwrap_or_else(Vector3::zeros);
    na.dot(&nb).clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod ref_system_test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_orbital_plane_rotation_order() {
        // ω turns periapsis onto +Y, the 90° tilt lifts +Y onto +Z, Ω leaves Z untouched
        let rot = orbital_plane_rotation(FRAC_PI_2, FRAC_PI_2, 0.3);
        assert_abs_diff_eq!(rot * Vector3::x(), Vector3::z(), epsilon = 1e-15);

        // first column of the perifocal-to-reference matrix, written out
        let (w, i, node) = (0.7_f64, 0.2_f64, -1.1_f64);
        let expected = Vector3::new(
            node.cos() * w.cos() - node.sin() * w.sin() * i.cos(),
            node.sin() * w.cos() + node.cos() * w.sin() * i.cos(),
            w.sin() * i.sin(),
        );
        assert_abs_diff_eq!(
            orbital_plane_rotation(w, i, node) * Vector3::x(),
            expected,
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_orbital_plane_normal() {
        assert_abs_diff_eq!(orbital_plane_normal(0.0, 1.0), Vector3::z(), epsilon = 1e-15);

        let n = orbital_plane_normal(FRAC_PI_2, 0.0);
        assert_abs_diff_eq!(n, -Vector3::y(), epsilon = 1e-15);
    }

    #[test]
    fn test_angle_between() {
        let x = Vector3::x();
        assert_abs_diff_eq!(angle_between(&x, &(3.0 * x)), 0.0);
        assert_abs_diff_eq!(angle_between(&x, &-x), PI);
        assert_abs_diff_eq!(angle_between(&x, &Vector3::new(1.0, 1.0, 0.0)), PI / 4.0, epsilon = 1e-15);
        assert_abs_diff_eq!(angle_between(&x, &Vector3::zeros()), FRAC_PI_2);
    }
}

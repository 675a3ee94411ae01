//! Vector helpers that glam does not provide in the form the tracer needs.

use crate::Vec3;

/// Per-component magnitude below which a vector counts as zero.
const NEAR_ZERO_EPSILON: f64 = 1e-8;

/// Extra queries on [`Vec3`].
pub trait Vec3Ext {
    /// True if every component is within `1e-8` of zero.
    fn near_zero(&self) -> bool;
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn near_zero(&self) -> bool {
        self.x.abs() < NEAR_ZERO_EPSILON
            && self.y.abs() < NEAR_ZERO_EPSILON
            && self.z.abs() < NEAR_ZERO_EPSILON
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with unit normal `n`.
///
/// `etai_over_etat` is the ratio of the incident to the transmitted
/// refractive index. The caller must rule out total internal reflection.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_zero() {
        assert!(Vec3::ZERO.near_zero());
        assert!(Vec3::new(1e-9, -1e-9, 0.0).near_zero());
        assert!(!Vec3::new(1e-9, 1e-7, 0.0).near_zero());
        assert!(!Vec3::X.near_zero());
    }

    #[test]
    fn test_reflect_mirrors_about_normal() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        let r = reflect(v, Vec3::Y);
        assert_eq!(r, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_head_on_passes_straight() {
        let uv = Vec3::NEG_Z;
        let out = refract(uv, Vec3::Z, 1.0 / 1.5);
        assert!((out - uv).length() < 1e-12);
    }

    #[test]
    fn test_refract_obeys_snell() {
        let eta = 1.0 / 1.5;
        let uv = Vec3::new(1.0, -1.0, 0.0).normalize();
        let out = refract(uv, Vec3::Y, eta);

        let sin_in = uv.x.abs();
        let sin_out = out.x.abs() / out.length();
        assert!((sin_out - eta * sin_in).abs() < 1e-12);
        assert!((out.length() - 1.0).abs() < 1e-12);
        assert!(out.y < 0.0);
    }
}

//! Sphere primitive for ray tracing.

use std::sync::Arc;

use glint_math::{Interval, Point3, Ray};

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};

/// Squared direction lengths below this cannot be intersected reliably.
const MIN_DIRECTION_LENGTH_SQUARED: f64 = 1e-24;

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Point3,
    radius: f64,
    material: Arc<Material>,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Point3, radius: f64, material: impl Into<Arc<Material>>) -> Self {
        if radius < 0.0 {
            log::warn!("Sphere at {center:?} has negative radius {radius}, clamping to 0");
        }

        Self {
            center,
            radius: radius.max(0.0),
            material: material.into(),
        }
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn material(&self) -> &Material {
        &self.material
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let a = ray.direction().length_squared();
        // Zero-length rays and zero-radius spheres would divide by zero below
        if a < MIN_DIRECTION_LENGTH_SQUARED || self.radius == 0.0 {
            return None;
        }

        let oc = self.center - ray.origin();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(HitRecord::new(ray, root, outward_normal, &self.material))
    }
}

//! Surface materials and how they scatter light.

use glint_core::MaterialDesc;
use glint_math::{gen_f64, random_unit_vector, reflect, refract, Color, Ray, Vec3Ext};
use rand::RngCore;

use crate::hittable::HitRecord;

/// A scattered ray and the color it is tinted by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    /// Color multiplier applied to the light carried back along `scattered`
    pub attenuation: Color,
    /// The outgoing ray
    pub scattered: Ray,
}

/// How light interacts with a surface.
///
/// Materials are immutable once built and are shared between any number of
/// spheres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Diffuse surface scattering with a cosine-weighted distribution.
    Lambertian { albedo: Color },

    /// Specular reflector.
    ///
    /// `fuzz`: roughness, 0.0 = perfect mirror, 1.0 = very rough
    Metal { albedo: Color, fuzz: f64 },

    /// Clear refractive surface.
    ///
    /// `refractive_index`: 1.0 = air, 1.5 = glass, 2.4 = diamond
    Dielectric { refractive_index: f64 },
}

impl Material {
    /// Create a Lambertian material with the given albedo color.
    pub fn lambertian(albedo: Color) -> Self {
        Self::Lambertian { albedo }
    }

    /// Create a Metal material. `fuzz` is clamped to [0, 1].
    pub fn metal(albedo: Color, fuzz: f64) -> Self {
        if !(0.0..=1.0).contains(&fuzz) {
            log::warn!("Metal fuzz {fuzz} outside [0, 1], clamping");
        }
        Self::Metal {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    /// Create a Dielectric material with the given index of refraction.
    pub fn dielectric(refractive_index: f64) -> Self {
        Self::Dielectric { refractive_index }
    }

    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match *self {
            Material::Lambertian { albedo } => {
                let mut scatter_direction = rec.normal + random_unit_vector(rng);

                // Catch degenerate scatter direction
                if scatter_direction.near_zero() {
                    scatter_direction = rec.normal;
                }

                Some(ScatterResult {
                    attenuation: albedo,
                    scattered: Ray::new(rec.p, scatter_direction),
                })
            }

            Material::Metal { albedo, fuzz } => {
                let reflected = reflect(ray_in.direction().normalize(), rec.normal);
                let scattered = Ray::new(rec.p, reflected + fuzz * random_unit_vector(rng));

                // Fuzzed rays that end up below the surface are absorbed
                (scattered.direction().dot(rec.normal) > 0.0).then_some(ScatterResult {
                    attenuation: albedo,
                    scattered,
                })
            }

            Material::Dielectric { refractive_index } => {
                let refraction_ratio = if rec.front_face {
                    1.0 / refractive_index
                } else {
                    refractive_index
                };

                let unit_direction = ray_in.direction().normalize();
                let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

                let cannot_refract = refraction_ratio * sin_theta > 1.0;

                let direction = if refraction_ratio == 1.0 {
                    // Matched indices: there is no interface to bend or reflect at
                    unit_direction
                } else if cannot_refract
                    || reflectance(cos_theta, refraction_ratio) > gen_f64(rng)
                {
                    reflect(unit_direction, rec.normal)
                } else {
                    refract(unit_direction, rec.normal, refraction_ratio)
                };

                Some(ScatterResult {
                    attenuation: Color::ONE,
                    scattered: Ray::new(rec.p, direction),
                })
            }
        }
    }
}

impl From<&MaterialDesc> for Material {
    fn from(desc: &MaterialDesc) -> Self {
        match *desc {
            MaterialDesc::Lambertian { albedo } => Material::lambertian(albedo),
            MaterialDesc::Metal { albedo, fuzz } => Material::metal(albedo, fuzz),
            MaterialDesc::Dielectric { refractive_index } => Material::dielectric(refractive_index),
        }
    }
}

/// Schlick's approximation for reflectance
fn reflectance(cosine: f64, refraction_ratio: f64) -> f64 {
    let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_math::{Point3, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Hit on the top of a surface at the origin, seen from above.
    fn hit_from_above<'a>(ray: &Ray, material: &'a Material) -> HitRecord<'a> {
        HitRecord::new(ray, 1.0, Vec3::Y, material)
    }

    #[test]
    fn test_lambertian_always_scatters_with_albedo() {
        let albedo = Color::new(0.8, 0.3, 0.1);
        let material = Material::lambertian(albedo);
        let ray = Ray::new(Point3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        let rec = hit_from_above(&ray, &material);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..1000 {
            let result = material.scatter(&ray, &rec, &mut rng).expect("lambertian scatters");
            assert_eq!(result.attenuation, albedo);
            assert_eq!(result.scattered.origin(), rec.p);
            assert!(!result.scattered.direction().near_zero());
            // normal + unit vector never points below the surface
            assert!(result.scattered.direction().dot(rec.normal) >= 0.0);
        }
    }

    #[test]
    fn test_metal_mirror_axis_aligned() {
        let material = Material::metal(Color::new(0.7, 0.6, 0.5), 0.0);
        let ray = Ray::new(Point3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -3.0, 0.0));
        let rec = hit_from_above(&ray, &material);
        let mut rng = StdRng::seed_from_u64(2);

        let result = material.scatter(&ray, &rec, &mut rng).unwrap();
        assert_eq!(result.scattered.direction(), Vec3::Y);
        assert_eq!(result.attenuation, Color::new(0.7, 0.6, 0.5));
    }

    #[test]
    fn test_metal_mirror_angle_of_incidence() {
        let material = Material::metal(Color::ONE, 0.0);
        let ray = Ray::new(Point3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let rec = hit_from_above(&ray, &material);
        let mut rng = StdRng::seed_from_u64(3);

        let out = material.scatter(&ray, &rec, &mut rng).unwrap().scattered.direction();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((out - expected).length() < 1e-12);
    }

    #[test]
    fn test_metal_absorbs_rays_below_surface() {
        // Grazing incidence with maximum fuzz sends some rays under the surface
        let material = Material::metal(Color::ONE, 1.0);
        let ray = Ray::new(Point3::new(-1.0, 0.01, 0.0), Vec3::new(1.0, -0.01, 0.0));
        let rec = hit_from_above(&ray, &material);
        let mut rng = StdRng::seed_from_u64(4);

        let mut absorbed = 0;
        for _ in 0..1000 {
            match material.scatter(&ray, &rec, &mut rng) {
                Some(result) => assert!(result.scattered.direction().dot(rec.normal) > 0.0),
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 0);
    }

    #[test]
    fn test_metal_fuzz_clamped() {
        assert_eq!(
            Material::metal(Color::ONE, 3.0),
            Material::Metal {
                albedo: Color::ONE,
                fuzz: 1.0
            }
        );
    }

    #[test]
    fn test_dielectric_matched_index_does_not_bend() {
        let material = Material::dielectric(1.0);
        let mut rng = StdRng::seed_from_u64(5);

        for direction in [
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0).normalize(),
            Vec3::new(0.3, -0.05, 0.8).normalize(),
        ] {
            let ray = Ray::new(Point3::ZERO - direction, direction);
            let rec = hit_from_above(&ray, &material);

            for _ in 0..100 {
                let result = material.scatter(&ray, &rec, &mut rng).unwrap();
                assert!((result.scattered.direction() - direction).length() < 1e-15);
                assert_eq!(result.attenuation, Color::ONE);
            }
        }
    }

    #[test]
    fn test_dielectric_head_on_refracts_straight() {
        // At normal incidence glass reflects only ~4% of rays
        let material = Material::dielectric(1.5);
        let ray = Ray::new(Point3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        let rec = hit_from_above(&ray, &material);
        let mut rng = StdRng::seed_from_u64(6);

        let mut transmitted = 0;
        for _ in 0..1000 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::ONE);
            let direction = result.scattered.direction();
            if (direction - Vec3::NEG_Y).length() < 1e-12 {
                transmitted += 1;
            } else {
                assert!((direction - Vec3::Y).length() < 1e-12);
            }
        }
        assert!(transmitted > 900, "transmitted = {transmitted}");
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        // Leaving glass at 60 degrees exceeds the ~41.8 degree critical angle
        let material = Material::dielectric(1.5);
        let direction = Vec3::new(60f64.to_radians().sin(), 60f64.to_radians().cos(), 0.0);
        let ray = Ray::new(Point3::ZERO - direction, direction);
        // Back face hit: outward normal points along +Y, the ray travels up
        let rec = HitRecord::new(&ray, 1.0, Vec3::Y, &material);
        assert!(!rec.front_face);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let out = material.scatter(&ray, &rec, &mut rng).unwrap().scattered.direction();
            let expected = reflect(direction, rec.normal);
            assert!((out - expected).length() < 1e-12);
        }
    }

    #[test]
    fn test_reflectance() {
        // Normal incidence on glass reflects about 4%
        assert!((reflectance(1.0, 1.0 / 1.5) - 0.04).abs() < 1e-12);
        // Grazing incidence reflects everything
        assert!((reflectance(0.0, 1.0 / 1.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_desc() {
        let desc = MaterialDesc::Metal {
            albedo: Color::splat(0.9),
            fuzz: 0.2,
        };
        assert_eq!(Material::from(&desc), Material::metal(Color::splat(0.9), 0.2));
    }
}

//! The showcase scene: a ground plane covered in small random spheres with
//! three large feature spheres in the middle.

use glint_math::{gen_f64, Color, Point3};
use rand::RngCore;

use crate::scene::{MaterialDesc, SceneDesc};

/// Radius of the small scattered spheres.
const SMALL_RADIUS: f64 = 0.2;

/// Small spheres closer than this to the metal feature sphere are skipped.
const CLEARANCE: f64 = 0.9;

/// Build the showcase scene.
///
/// The layout depends only on the random stream, so a seeded generator
/// always produces the same scene.
pub fn random_scene(rng: &mut dyn RngCore) -> SceneDesc {
    let mut scene = SceneDesc::new().with_ground();
    let keep_out = Point3::new(4.0, SMALL_RADIUS, 0.0);

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f64(rng);
            let center = Point3::new(
                a as f64 + 0.9 * gen_f64(rng),
                SMALL_RADIUS,
                b as f64 + 0.9 * gen_f64(rng),
            );

            if (center - keep_out).length() <= CLEARANCE {
                continue;
            }

            let material = if choose_mat < 0.8 {
                let albedo = random_color(rng) * random_color(rng);
                MaterialDesc::Lambertian { albedo }
            } else if choose_mat < 0.95 {
                let albedo = Color::splat(0.5) + 0.5 * random_color(rng);
                let fuzz = 0.5 * gen_f64(rng);
                MaterialDesc::Metal { albedo, fuzz }
            } else {
                MaterialDesc::Dielectric {
                    refractive_index: 1.5,
                }
            };

            scene.add_sphere_with_material(center, SMALL_RADIUS, material);
        }
    }

    scene.add_sphere_with_material(
        Point3::new(0.0, 1.0, 0.0),
        1.0,
        MaterialDesc::Dielectric {
            refractive_index: 1.5,
        },
    );
    scene.add_sphere_with_material(
        Point3::new(-4.0, 1.0, 0.0),
        1.0,
        MaterialDesc::Lambertian {
            albedo: Color::new(0.4, 0.2, 0.1),
        },
    );
    scene.add_sphere_with_material(
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        MaterialDesc::Metal {
            albedo: Color::new(0.7, 0.6, 0.5),
            fuzz: 0.0,
        },
    );

    log::debug!("Showcase scene has {} spheres", scene.sphere_count());
    scene
}

fn random_color(rng: &mut dyn RngCore) -> Color {
    Color::new(gen_f64(rng), gen_f64(rng), gen_f64(rng))
}

//! Turns a scene description into a traceable world.

use std::sync::Arc;

use glint_core::{SceneDesc, SceneError};

use crate::{HittableList, Material, RenderResult, Sphere};

/// Build the renderable world for a scene.
///
/// Each material in the description is created once and shared by every
/// sphere that references it.
pub fn build_world(scene: &SceneDesc) -> RenderResult<HittableList> {
    let materials: Vec<Arc<Material>> = scene
        .materials()
        .iter()
        .map(|desc| Arc::new(Material::from(desc)))
        .collect();

    let mut world = HittableList::new();
    for sphere in scene.spheres() {
        let material = materials
            .get(sphere.material.index())
            .ok_or(SceneError::UnknownMaterialId(sphere.material.index()))?;
        world.add(Sphere::new(sphere.center, sphere.radius, Arc::clone(material)));
    }

    log::info!(
        "Built world: {} spheres sharing {} materials",
        world.len(),
        materials.len()
    );
    Ok(world)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Hittable, Object};
    use glint_core::{MaterialDesc, MaterialId};
    use glint_math::{Color, Interval, Point3, Ray, Vec3};

    #[test]
    fn test_build_world_shares_materials() {
        let mut scene = SceneDesc::new();
        let glass = scene.add_material(MaterialDesc::Dielectric {
            refractive_index: 1.5,
        });
        for x in 0..3 {
            scene
                .add_sphere(Point3::new(x as f64 * 2.0, 0.0, -5.0), 0.5, glass)
                .unwrap();
        }

        let world = build_world(&scene).unwrap();
        assert_eq!(world.len(), 3);

        let spheres: Vec<&Sphere> = world
            .objects()
            .iter()
            .filter_map(|object| match object {
                Object::Sphere(sphere) => Some(sphere),
                Object::List(_) => None,
            })
            .collect();
        assert_eq!(spheres.len(), 3);
        assert!(std::ptr::eq(spheres[0].material(), spheres[2].material()));
        assert_eq!(*spheres[1].material(), Material::dielectric(1.5));
    }

    #[test]
    fn test_build_world_geometry() {
        let mut scene = SceneDesc::new();
        let red = scene.add_material(MaterialDesc::Lambertian {
            albedo: Color::new(1.0, 0.0, 0.0),
        });
        scene
            .add_sphere(Point3::new(0.0, 0.0, -1.0), 0.5, red)
            .unwrap();

        let world = build_world(&scene).unwrap();
        let ray = Ray::new(Point3::ZERO, Vec3::NEG_Z);
        let rec = world.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        assert!((rec.t - 0.5).abs() < 1e-12);
        assert_eq!(*rec.material, Material::lambertian(Color::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_unknown_material_id_rejected_by_scene() {
        let mut scene = SceneDesc::new();
        let result = scene.add_sphere(Point3::ZERO, 1.0, MaterialId(3));
        assert!(result.is_err());
        assert!(build_world(&scene).unwrap().is_empty());
    }
}

//! Scene description types for Glint.
//!
//! A `SceneDesc` is a plain list of materials and the spheres that reference
//! them. It carries no renderer state; the renderer builds its own geometry
//! from it.

use glint_math::{Color, Point3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while building or loading a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown material kind: {0}")]
    UnknownMaterialKind(String),

    #[error("Material '{kind}' expects {expected} parameters, got {found}")]
    WrongParamCount {
        kind: String,
        expected: usize,
        found: usize,
    },

    #[error("Material '{kind}' has invalid {param}: {value}")]
    InvalidParam {
        kind: String,
        param: &'static str,
        value: f64,
    },

    #[error("Unknown material id: {0}")]
    UnknownMaterialId(usize),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Handle to a material stored in a [`SceneDesc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub usize);

impl MaterialId {
    /// Index into [`SceneDesc::materials`].
    pub fn index(self) -> usize {
        self.0
    }
}

/// A surface material definition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MaterialDesc {
    /// Ideal diffuse surface.
    Lambertian { albedo: Color },

    /// Specular reflector. `fuzz` is the roughness in [0, 1].
    Metal { albedo: Color, fuzz: f64 },

    /// Clear refractive surface such as glass or water.
    Dielectric { refractive_index: f64 },
}

impl MaterialDesc {
    pub const LAMBERTIAN: &'static str = "lambertian";
    pub const METAL: &'static str = "metal";
    pub const DIELECTRIC: &'static str = "dielectric";

    /// Build a material from a kind name and its numeric parameters.
    ///
    /// - `lambertian r g b`
    /// - `metal r g b fuzz`
    /// - `dielectric ior`
    ///
    /// Unknown kinds, wrong parameter counts, non-finite colors, a NaN fuzz
    /// and a non-positive refractive index are errors; nothing falls back to
    /// a default material.
    pub fn from_kind(kind: &str, params: &[f64]) -> SceneResult<Self> {
        let check_count = |expected: usize| {
            if params.len() == expected {
                Ok(())
            } else {
                Err(SceneError::WrongParamCount {
                    kind: kind.to_string(),
                    expected,
                    found: params.len(),
                })
            }
        };

        let check = |param: &'static str, value: f64, valid: bool| {
            if valid {
                Ok(value)
            } else {
                Err(SceneError::InvalidParam {
                    kind: kind.to_string(),
                    param,
                    value,
                })
            }
        };
        let albedo = || -> SceneResult<Color> {
            for &c in &params[..3] {
                check("albedo", c, c.is_finite())?;
            }
            Ok(Color::new(params[0], params[1], params[2]))
        };

        match kind {
            Self::LAMBERTIAN => {
                check_count(3)?;
                Ok(Self::Lambertian { albedo: albedo()? })
            }
            Self::METAL => {
                check_count(4)?;
                Ok(Self::Metal {
                    albedo: albedo()?,
                    fuzz: check("fuzz", params[3], !params[3].is_nan())?,
                })
            }
            Self::DIELECTRIC => {
                check_count(1)?;
                let ior = params[0];
                Ok(Self::Dielectric {
                    refractive_index: check(
                        "refractive index",
                        ior,
                        ior.is_finite() && ior > 0.0,
                    )?,
                })
            }
            other => Err(SceneError::UnknownMaterialKind(other.to_string())),
        }
    }

    /// The kind name used in scene files.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Lambertian { .. } => Self::LAMBERTIAN,
            Self::Metal { .. } => Self::METAL,
            Self::Dielectric { .. } => Self::DIELECTRIC,
        }
    }

    /// The numeric parameters in scene-file order.
    pub fn params(&self) -> Vec<f64> {
        match *self {
            Self::Lambertian { albedo } => vec![albedo.x, albedo.y, albedo.z],
            Self::Metal { albedo, fuzz } => vec![albedo.x, albedo.y, albedo.z, fuzz],
            Self::Dielectric { refractive_index } => vec![refractive_index],
        }
    }
}

/// A sphere placed in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereDesc {
    pub center: Point3,
    pub radius: f64,
    pub material: MaterialId,
}

/// A complete scene: materials plus the spheres that use them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDesc {
    materials: Vec<MaterialDesc>,
    spheres: Vec<SphereDesc>,
}

impl SceneDesc {
    /// Center of the ground sphere added by [`SceneDesc::with_ground`].
    pub const GROUND_CENTER: Point3 = Point3::new(0.0, -1000.0, 0.0);
    /// Radius of the ground sphere.
    pub const GROUND_RADIUS: f64 = 1000.0;

    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a material and return its ID.
    pub fn add_material(&mut self, material: MaterialDesc) -> MaterialId {
        let id = MaterialId(self.materials.len());
        self.materials.push(material);
        id
    }

    /// Add a sphere using a previously added material.
    pub fn add_sphere(&mut self, center: Point3, radius: f64, material: MaterialId) -> SceneResult<()> {
        if material.index() >= self.materials.len() {
            return Err(SceneError::UnknownMaterialId(material.index()));
        }
        self.spheres.push(SphereDesc {
            center,
            radius,
            material,
        });
        Ok(())
    }

    /// Add a sphere together with its own new material.
    pub fn add_sphere_with_material(
        &mut self,
        center: Point3,
        radius: f64,
        material: MaterialDesc,
    ) -> MaterialId {
        let id = self.add_material(material);
        self.spheres.push(SphereDesc {
            center,
            radius,
            material: id,
        });
        id
    }

    /// Add a large grey ground sphere beneath the origin.
    pub fn with_ground(mut self) -> Self {
        self.add_sphere_with_material(
            Self::GROUND_CENTER,
            Self::GROUND_RADIUS,
            MaterialDesc::Lambertian {
                albedo: Color::splat(0.5),
            },
        );
        self
    }

    /// Look up a material by ID.
    pub fn material(&self, id: MaterialId) -> Option<&MaterialDesc> {
        self.materials.get(id.index())
    }

    /// All materials, indexed by `MaterialId`.
    pub fn materials(&self) -> &[MaterialDesc] {
        &self.materials
    }

    /// All spheres in insertion order.
    pub fn spheres(&self) -> &[SphereDesc] {
        &self.spheres
    }

    pub fn sphere_count(&self) -> usize {
        self.spheres.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Check if the scene has no spheres.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_creation() {
        let mut scene = SceneDesc::new();

        let glass = scene.add_material(MaterialDesc::Dielectric {
            refractive_index: 1.5,
        });
        assert_eq!(glass, MaterialId(0));

        scene.add_sphere(Point3::new(0.0, 1.0, 0.0), 1.0, glass).unwrap();
        scene.add_sphere(Point3::new(2.0, 1.0, 0.0), 0.5, glass).unwrap();

        assert_eq!(scene.material_count(), 1);
        assert_eq!(scene.sphere_count(), 2);
        assert_eq!(scene.spheres()[1].material, glass);
    }

    #[test]
    fn test_add_sphere_rejects_unknown_material() {
        let mut scene = SceneDesc::new();
        let err = scene.add_sphere(Point3::ZERO, 1.0, MaterialId(3)).unwrap_err();
        assert!(matches!(err, SceneError::UnknownMaterialId(3)));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_with_ground() {
        let scene = SceneDesc::new().with_ground();
        let ground = scene.spheres()[0];

        assert_eq!(ground.center, SceneDesc::GROUND_CENTER);
        assert_eq!(ground.radius, 1000.0);
        assert_eq!(
            scene.material(ground.material),
            Some(&MaterialDesc::Lambertian {
                albedo: Color::splat(0.5)
            })
        );
    }

    #[test]
    fn test_material_from_kind() {
        let metal = MaterialDesc::from_kind("metal", &[0.7, 0.6, 0.5, 0.1]).unwrap();
        assert_eq!(
            metal,
            MaterialDesc::Metal {
                albedo: Color::new(0.7, 0.6, 0.5),
                fuzz: 0.1
            }
        );
        assert_eq!(metal.kind(), "metal");
        assert_eq!(metal.params(), vec![0.7, 0.6, 0.5, 0.1]);
    }

    #[test]
    fn test_material_from_unknown_kind_fails() {
        let err = MaterialDesc::from_kind("velvet", &[1.0]).unwrap_err();
        assert!(matches!(err, SceneError::UnknownMaterialKind(ref k) if k == "velvet"));
    }

    #[test]
    fn test_material_wrong_param_count_fails() {
        let err = MaterialDesc::from_kind("lambertian", &[0.5, 0.5]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Material 'lambertian' expects 3 parameters, got 2"
        );
    }

    #[test]
    fn test_material_invalid_params_fail() {
        for ior in [0.0, -1.5, f64::NAN, f64::INFINITY] {
            let err = MaterialDesc::from_kind("dielectric", &[ior]).unwrap_err();
            assert!(
                matches!(err, SceneError::InvalidParam { param: "refractive index", .. }),
                "ior {ior}: {err}"
            );
        }

        let err = MaterialDesc::from_kind("metal", &[0.5, 0.5, 0.5, f64::NAN]).unwrap_err();
        assert!(matches!(err, SceneError::InvalidParam { param: "fuzz", .. }));

        let err = MaterialDesc::from_kind("lambertian", &[0.5, f64::NAN, 0.5]).unwrap_err();
        assert!(matches!(err, SceneError::InvalidParam { param: "albedo", .. }));

        // Out-of-range fuzz is clamped later, not rejected
        assert!(MaterialDesc::from_kind("metal", &[0.5, 0.5, 0.5, 2.0]).is_ok());
    }

    #[test]
    fn test_add_sphere_with_material() {
        let mut scene = SceneDesc::new();
        let first = scene.add_sphere_with_material(
            Point3::ZERO,
            0.5,
            MaterialDesc::Dielectric {
                refractive_index: 1.5,
            },
        );
        let second = scene.add_sphere_with_material(
            Point3::X,
            0.5,
            MaterialDesc::Dielectric {
                refractive_index: 1.5,
            },
        );

        assert_ne!(first, second);
        assert_eq!(scene.sphere_count(), 2);
        assert_eq!(scene.material_count(), 2);
        assert_eq!(scene.spheres()[1].material, second);
    }

    #[test]
    fn test_material_json_shape() {
        let json = r#"{"kind":"dielectric","refractive_index":1.33}"#;
        let material: MaterialDesc = serde_json::from_str(json).unwrap();
        assert_eq!(
            material,
            MaterialDesc::Dielectric {
                refractive_index: 1.33
            }
        );
    }
}

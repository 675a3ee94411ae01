//! Glint math: the numeric primitives shared by the scene and renderer crates.
//!
//! Vectors are glam's double precision `DVec3`. `Point3` and `Color` are
//! aliases of the same type and only document intent.

// Re-export glam for convenience
pub use glam::DVec3;

mod interval;
mod random;
mod ray;
mod vector;

pub use interval::Interval;
pub use random::{gen_f64, random_in_unit_disk, random_unit_vector, sample_square};
pub use ray::Ray;
pub use vector::{reflect, refract, Vec3Ext};

/// Three component double precision vector.
pub type Vec3 = DVec3;

/// A position in world space.
pub type Point3 = DVec3;

/// Linear RGB color, channels nominally in [0, 1].
pub type Color = DVec3;

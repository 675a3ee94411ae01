//! Glint renderer - CPU path tracing
//!
//! A Monte Carlo path tracer for spheres with diffuse, metal and glass
//! materials. Images are rendered in buckets, optionally in parallel.

mod bucket;
mod camera;
mod error;
mod hittable;
mod material;
mod renderer;
mod sphere;
mod world;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::Camera;
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, HittableList, Object};
pub use material::{Material, ScatterResult};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, ppm_triplet, ray_color, render, render_parallel, render_pixel,
    sky_gradient, ImageBuffer, PixelSink, RenderOptions, HIT_T_MIN,
};
pub use sphere::Sphere;
pub use world::build_world;

/// Re-export common math types from glint_math
pub use glint_math::{Color, Interval, Point3, Ray, Vec3};

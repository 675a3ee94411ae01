//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing bounded by the camera's max depth
//! - Sky gradient background
//! - Anti-aliasing via multi-sampling
//! - Gamma correction

use std::path::Path;

use glint_core::PpmImage;
use glint_math::{Color, Interval, Ray};
use rand::RngCore;
use rayon::prelude::*;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::{Camera, Hittable, RenderError, RenderResult};

/// Nearest accepted hit distance. Suppresses shadow acne from rays
/// re-hitting the surface they just left.
pub const HIT_T_MIN: f64 = 0.001;

/// Channel range after gamma correction, before scaling to 8 bits.
const INTENSITY: Interval = Interval::new(0.0, 0.999);

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and multiplying in their attenuation.
/// `depth` is the number of bounces still allowed; zero returns black.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    // If we've exceeded max depth, no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(HIT_T_MIN, f64::INFINITY)) else {
        return sky_gradient(ray);
    };

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            result.attenuation * ray_color(&result.scattered, world, depth - 1, rng)
        }
        // Absorbed
        None => Color::ZERO,
    }
}

/// Background seen by rays that escape the scene: white at the horizon
/// blending to sky blue overhead.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    (1.0 - a) * white + a * blue
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to gamma-encoded 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let encode = |c: f64| (256.0 * INTENSITY.clamp(linear_to_gamma(c))) as u8;
    [encode(color.x), encode(color.y), encode(color.z)]
}

/// The `r g b` text triplet written for a linear color.
pub fn ppm_triplet(color: Color) -> String {
    let [r, g, b] = color_to_rgb8(color);
    format!("{r} {g} {b}")
}

/// Render a single pixel with multi-sampling.
///
/// Returns the average of `samples_per_pixel` radiance estimates.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel() {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth(), rng);
    }

    pixel_color * camera.samples_scale()
}

/// Destination for rendered pixels.
pub trait PixelSink {
    /// Store the linear (pre-gamma) color of pixel (x, y).
    fn set_pixel(&mut self, x: u32, y: u32, color: Color);
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    /// Row-major linear colors
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width as usize) * (height as usize)],
        }
    }

    /// Create a buffer sized for an initialized camera.
    pub fn for_camera(camera: &Camera) -> Self {
        Self::new(camera.image_width(), camera.image_height())
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Gamma-encoded 8-bit copy for PPM output.
    pub fn to_ppm(&self) -> PpmImage {
        PpmImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|&c| color_to_rgb8(c)).collect(),
        }
    }

    /// Gamma-encoded 8-bit copy for the `image` crate encoders.
    pub fn to_rgb_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(color_to_rgb8(self.get(x, y)))
        })
    }

    /// Save to disk. `.ppm` writes plain-text P3; other extensions are
    /// encoded by the `image` crate (PNG, JPEG, BMP, ...).
    pub fn save(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        let is_ppm = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

        if is_ppm {
            self.to_ppm().save(path)?;
        } else {
            self.to_rgb_image().save(path)?;
        }
        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

impl PixelSink for ImageBuffer {
    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }
}

/// Render settings that do not belong to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Base seed; every bucket derives its own random stream from it
    pub seed: u64,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    /// Worker threads for `render_parallel`. `None` uses the global rayon pool.
    pub threads: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
            threads: None,
        }
    }
}

fn check_ready(camera: &Camera, options: &RenderOptions) -> RenderResult<()> {
    if !camera.is_initialized() {
        return Err(RenderError::CameraNotInitialized);
    }
    if options.bucket_size == 0 {
        return Err(RenderError::InvalidBucketSize);
    }
    Ok(())
}

/// Render the entire scene on the calling thread.
///
/// Produces exactly the same pixels as [`render_parallel`] with the same
/// options, since each bucket owns its random stream.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    options: &RenderOptions,
    sink: &mut dyn PixelSink,
) -> RenderResult<()> {
    check_ready(camera, options)?;

    let buckets = generate_buckets(camera.image_width(), camera.image_height(), options.bucket_size);
    log::info!(
        "Rendering {}x{} @ {} spp in {} buckets (sequential)",
        camera.image_width(),
        camera.image_height(),
        camera.samples_per_pixel(),
        buckets.len()
    );

    for bucket in &buckets {
        render_bucket(bucket, camera, world, options.seed).write_to(sink);
        log::debug!("Bucket {}/{} done", bucket.index + 1, buckets.len());
    }

    Ok(())
}

/// Render the entire scene with rayon, one task per bucket.
///
/// Workers never share a random generator. Finished buckets are written
/// to `sink` on the calling thread.
pub fn render_parallel(
    camera: &Camera,
    world: &dyn Hittable,
    options: &RenderOptions,
    sink: &mut dyn PixelSink,
) -> RenderResult<()> {
    check_ready(camera, options)?;

    let buckets = generate_buckets(camera.image_width(), camera.image_height(), options.bucket_size);
    let render_all = || -> Vec<BucketResult> {
        buckets
            .par_iter()
            .map(|bucket| render_bucket(bucket, camera, world, options.seed))
            .collect()
    };

    let results = match options.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
            log::info!(
                "Rendering {}x{} @ {} spp in {} buckets on {} threads",
                camera.image_width(),
                camera.image_height(),
                camera.samples_per_pixel(),
                buckets.len(),
                pool.current_num_threads()
            );
            pool.install(render_all)
        }
        None => {
            log::info!(
                "Rendering {}x{} @ {} spp in {} buckets on {} threads",
                camera.image_width(),
                camera.image_height(),
                camera.samples_per_pixel(),
                buckets.len(),
                rayon::current_num_threads()
            );
            render_all()
        }
    };

    for result in &results {
        result.write_to(sink);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HittableList, Material, Sphere};
    use glint_math::{Point3, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn single_sphere_world() -> HittableList {
        let mut world = HittableList::new();
        world.add(Sphere::new(
            Point3::new(0.0, 0.0, -1.0),
            0.5,
            Material::lambertian(Color::new(0.5, 0.5, 0.5)),
        ));
        world
    }

    #[test]
    fn test_sky_gradient() {
        let up = sky_gradient(&Ray::new(Point3::ZERO, Vec3::new(0.0, 3.0, 0.0)));
        let down = sky_gradient(&Ray::new(Point3::ZERO, Vec3::new(0.0, -1.0, 0.0)));
        let level = sky_gradient(&Ray::new(Point3::ZERO, Vec3::new(1.0, 0.0, 0.0)));

        assert_eq!(up, Color::new(0.5, 0.7, 1.0));
        assert_eq!(down, Color::ONE);
        assert!((level - Color::new(0.75, 0.85, 1.0)).length() < 1e-12);
    }

    #[test]
    fn test_ray_color_depth_zero_is_black() {
        let world = single_sphere_world();
        let mut rng = StdRng::seed_from_u64(1);

        let hit = Ray::new(Point3::ZERO, Vec3::NEG_Z);
        let miss = Ray::new(Point3::ZERO, Vec3::Y);
        assert_eq!(ray_color(&hit, &world, 0, &mut rng), Color::ZERO);
        assert_eq!(ray_color(&miss, &world, 0, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_ray_color_miss_is_background() {
        let world = single_sphere_world();
        let mut rng = StdRng::seed_from_u64(2);
        let ray = Ray::new(Point3::ZERO, Vec3::new(0.3, 0.8, 0.1));
        assert_eq!(ray_color(&ray, &world, 5, &mut rng), sky_gradient(&ray));
    }

    #[test]
    fn test_ray_color_last_bounce_is_black() {
        // One bounce allowed: the hit scatters but the recursion returns black
        let world = single_sphere_world();
        let mut rng = StdRng::seed_from_u64(3);
        let ray = Ray::new(Point3::ZERO, Vec3::NEG_Z);
        assert_eq!(ray_color(&ray, &world, 1, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_ray_color_attenuates() {
        let world = single_sphere_world();
        let mut rng = StdRng::seed_from_u64(4);
        let ray = Ray::new(Point3::ZERO, Vec3::NEG_Z);

        for _ in 0..100 {
            let color = ray_color(&ray, &world, 10, &mut rng);
            // Each bounce off the 50% gray sphere at least halves the sky
            assert!(color.max_element() <= 0.5 + 1e-12);
            assert!(color.min_element() >= 0.0);
        }
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-12);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_color_to_rgb8() {
        assert_eq!(color_to_rgb8(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb8(Color::ONE), [255, 255, 255]);
        assert_eq!(color_to_rgb8(Color::splat(4.0)), [255, 255, 255]);
        assert_eq!(color_to_rgb8(Color::new(0.25, -1.0, f64::NAN)), [128, 0, 0]);
        assert_eq!(ppm_triplet(Color::new(0.25, 1.0, 0.0)), "128 255 0");
    }

    #[test]
    fn test_image_buffer_sink() {
        let mut image = ImageBuffer::new(3, 2);
        image.set_pixel(2, 1, Color::new(0.25, 1.0, 0.0));

        assert_eq!(image.get(2, 1), Color::new(0.25, 1.0, 0.0));
        assert_eq!(image.pixels[5], Color::new(0.25, 1.0, 0.0));

        let ppm = image.to_ppm();
        assert_eq!(ppm.get(2, 1), [128, 255, 0]);
        assert_eq!(ppm.get(0, 0), [0, 0, 0]);

        let rgb = image.to_rgb_image();
        assert_eq!(rgb.get_pixel(2, 1).0, [128, 255, 0]);
    }

    #[test]
    fn test_render_pixel() {
        let world = single_sphere_world();
        let mut camera = Camera::new()
            .with_image(1.0, 10)
            .with_quality(4, 5)
            .with_position(Point3::ZERO, Point3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(42);

        // Center pixel hits the sphere, corner pixel sees only sky
        let center = render_pixel(&camera, &world, 5, 5, &mut rng);
        let corner = render_pixel(&camera, &world, 0, 0, &mut rng);

        assert!(center.max_element() <= 0.5 + 1e-12);
        assert!(corner.min_element() > 0.5);
    }
}

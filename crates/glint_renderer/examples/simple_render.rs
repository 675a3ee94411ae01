//! Simple path tracer example.
//!
//! Renders the random showcase scene and saves it in PPM format.

use glint_core::{random_scene, CameraConfig};
use glint_renderer::{build_world, render_parallel, Camera, ImageBuffer, RenderOptions};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Build the scene
    let start = std::time::Instant::now();
    let mut rng = StdRng::seed_from_u64(2024);
    let scene = random_scene(&mut rng);
    let world = build_world(&scene)?;
    log::info!("Scene built in {:?}", start.elapsed());

    // Set up camera
    let mut config = CameraConfig::showcase();
    config.image_width = 400;
    config.samples_per_pixel = 20;
    config.max_depth = 10;
    let mut camera = Camera::from_config(&config);
    camera.initialize();

    // Render
    let start = std::time::Instant::now();
    let mut image = ImageBuffer::for_camera(&camera);
    render_parallel(&camera, &world, &RenderOptions::default(), &mut image)?;
    log::info!("Rendered in {:?}", start.elapsed());

    image.save("output.ppm")?;
    Ok(())
}

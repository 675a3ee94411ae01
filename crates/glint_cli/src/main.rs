//! `glint` command line: render scenes and compare PPM images.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glint_core::{
    load_scene_file, random_scene, write_scene_file, CameraConfig, PpmImage, SceneFile,
};
use glint_renderer::{
    build_world, render, render_parallel, Camera, ImageBuffer, RenderOptions, DEFAULT_BUCKET_SIZE,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser, Debug)]
#[command(name = "glint", version, about = "Monte Carlo sphere path tracer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a scene to an image
    Render(RenderArgs),
    /// Write the per-channel difference of two PPM images
    Diff(DiffArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Sphere list scene file. Without one the random showcase scene is rendered.
    #[arg(short, long, visible_alias = "path")]
    scene: Option<PathBuf>,

    /// JSON camera configuration (defaults to the showcase framing)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output image; `.ppm` is written as plain text, other extensions by format
    #[arg(short, long, default_value = "glint.ppm")]
    output: PathBuf,

    /// Also write the rendered scene, camera included, as a scene file
    #[arg(long)]
    save_scene: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Samples per pixel
    #[arg(long)]
    samples: Option<u32>,

    /// Maximum bounce depth
    #[arg(long)]
    depth: Option<u32>,

    /// Worker threads (rayon default when unset)
    #[arg(long, visible_alias = "cores", env = "OMP_NUM_THREADS")]
    threads: Option<usize>,

    /// Seed for the showcase scene and for pixel sampling
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Bucket edge length in pixels
    #[arg(long, default_value_t = DEFAULT_BUCKET_SIZE,
          value_parser = clap::value_parser!(u32).range(1..))]
    bucket_size: u32,

    /// Render on the calling thread only
    #[arg(long)]
    sequential: bool,
}

#[derive(Args, Debug)]
struct DiffArgs {
    /// First image
    first: PathBuf,

    /// Second image
    second: PathBuf,

    /// Where to write the difference image
    #[arg(short, long, default_value = "diff_output.ppm")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Render(args) => run_render(&args),
        Command::Diff(args) => run_diff(&args),
    }
}

fn run_render(args: &RenderArgs) -> Result<()> {
    let base = match &args.config {
        Some(path) => CameraConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => CameraConfig::showcase(),
    };

    let mut file = match &args.scene {
        Some(path) => load_scene_file(path, base)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => {
            let mut rng = StdRng::seed_from_u64(args.seed);
            SceneFile {
                scene: random_scene(&mut rng),
                camera: base,
            }
        }
    };
    apply_overrides(&mut file.camera, args);
    file.camera.validate().context("Invalid camera settings")?;

    if let Some(path) = &args.save_scene {
        save_scene(&file, path)?;
    }

    let start = Instant::now();
    let world = build_world(&file.scene)?;
    log::info!("Scene built in {:?}", start.elapsed());

    let mut camera = Camera::from_config(&file.camera);
    camera.initialize();

    let options = RenderOptions {
        seed: args.seed,
        bucket_size: args.bucket_size,
        threads: args.threads,
    };

    let start = Instant::now();
    let mut image = ImageBuffer::for_camera(&camera);
    if args.sequential {
        render(&camera, &world, &options, &mut image)?;
    } else {
        render_parallel(&camera, &world, &options, &mut image)?;
    }
    log::info!("Rendered in {:?}", start.elapsed());

    image
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    Ok(())
}

fn apply_overrides(camera: &mut CameraConfig, args: &RenderArgs) {
    if let Some(width) = args.width {
        camera.image_width = width;
    }
    if let Some(samples) = args.samples {
        camera.samples_per_pixel = samples;
    }
    if let Some(depth) = args.depth {
        camera.max_depth = depth;
    }
}

fn save_scene(file: &SceneFile, path: &Path) -> Result<()> {
    let out = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(out);
    write_scene_file(file, &mut writer)?;
    writer.flush()?;
    log::info!(
        "Saved {} spheres to {}",
        file.scene.sphere_count(),
        path.display()
    );
    Ok(())
}

fn run_diff(args: &DiffArgs) -> Result<()> {
    let load = |path: &Path| {
        PpmImage::load(path).with_context(|| format!("Failed to read {}", path.display()))
    };
    let first = load(args.first.as_path())?;
    let second = load(args.second.as_path())?;

    let diff = first.difference(&second)?;
    diff.image
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    if diff.is_identical() {
        println!("Images are identical");
    } else {
        println!(
            "Max channel difference: {}, mean: {:.4}",
            diff.max_channel_diff, diff.mean_channel_diff
        );
    }
    log::info!("Difference image written to {}", args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_defaults() {
        let cli = Cli::try_parse_from(["glint", "render"]).unwrap();
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert!(args.scene.is_none());
        assert_eq!(args.output, PathBuf::from("glint.ppm"));
        assert_eq!(args.seed, 0);
        assert_eq!(args.bucket_size, DEFAULT_BUCKET_SIZE);
        assert!(!args.sequential);
    }

    #[test]
    fn test_render_flags() {
        let cli = Cli::try_parse_from([
            "glint",
            "render",
            "--path",
            "spheres.txt",
            "--output",
            "out.png",
            "--width",
            "320",
            "--samples",
            "8",
            "--depth",
            "4",
            "--cores",
            "3",
            "--seed",
            "9",
            "--sequential",
        ])
        .unwrap();
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.scene, Some(PathBuf::from("spheres.txt")));
        assert_eq!(args.threads, Some(3));
        assert!(args.sequential);

        let mut camera = CameraConfig::showcase();
        apply_overrides(&mut camera, &args);
        assert_eq!(camera.image_width, 320);
        assert_eq!(camera.samples_per_pixel, 8);
        assert_eq!(camera.max_depth, 4);
        assert_eq!(camera.vfov, CameraConfig::showcase().vfov);
    }

    #[test]
    fn test_zero_bucket_size_rejected() {
        assert!(Cli::try_parse_from(["glint", "render", "--bucket-size", "0"]).is_err());
    }

    #[test]
    fn test_diff_args() {
        let cli = Cli::try_parse_from(["glint", "diff", "a.ppm", "b.ppm"]).unwrap();
        let Command::Diff(args) = cli.command else {
            panic!("expected diff");
        };
        assert_eq!(args.first, PathBuf::from("a.ppm"));
        assert_eq!(args.output, PathBuf::from("diff_output.ppm"));
        assert!(Cli::try_parse_from(["glint", "diff", "a.ppm"]).is_err());
    }
}

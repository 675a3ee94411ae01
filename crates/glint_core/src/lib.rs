//! Glint Core - Scene description and file formats for the Glint path tracer.
//!
//! This crate is renderer-agnostic. It provides:
//!
//! - **Scene description**: `SceneDesc`, `MaterialDesc`, `SphereDesc`
//! - **Scene files**: a line-oriented sphere list format with optional camera
//!   lines (`load_scene_file`, `write_scene_file`)
//! - **Showcase scene**: the classic field of random spheres (`random_scene`)
//! - **Configuration**: `CameraConfig`, loadable from JSON
//! - **PPM images**: P3 reading, writing and differencing
//!
//! # Example
//!
//! ```ignore
//! use glint_core::{load_scene, CameraConfig};
//!
//! let scene = load_scene("spheres.txt")?.with_ground();
//! let config = CameraConfig::load("camera.json")?;
//! println!("Loaded {} spheres", scene.sphere_count());
//! ```

pub mod config;
pub mod ppm;
pub mod scene;
pub mod scene_file;
pub mod showcase;

// Re-export commonly used types
pub use config::{CameraConfig, ConfigError, ConfigResult};
pub use ppm::{PpmDiff, PpmError, PpmImage, PpmResult};
pub use scene::{MaterialDesc, MaterialId, SceneDesc, SceneError, SceneResult, SphereDesc};
pub use scene_file::{
    load_scene, load_scene_file, parse_scene, parse_scene_file, write_scene, write_scene_file,
    SceneFile,
};
pub use showcase::random_scene;

//! Camera and render configuration.
//!
//! Stored as JSON. Every field is optional in the file and falls back to
//! the value in [`CameraConfig::default`].
//!
//! ```json
//! {
//!     "aspect_ratio": 1.7777777777777777,
//!     "image_width": 400,
//!     "samples_per_pixel": 100,
//!     "look_from": [13.0, 2.0, 3.0],
//!     "defocus_angle": 0.6
//! }
//! ```

use std::fs;
use std::path::Path;

use glint_math::{Point3, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Camera placement, lens and sampling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Image width over height
    pub aspect_ratio: f64,
    /// Rendered image width in pixels
    pub image_width: u32,
    /// Random samples averaged per pixel
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces
    pub max_depth: u32,
    /// Vertical field of view in degrees
    pub vfov: f64,
    /// Camera position
    pub look_from: Point3,
    /// Point the camera looks at
    pub look_at: Point3,
    /// Camera-relative up direction
    pub vup: Vec3,
    /// Variation angle of rays through each pixel, in degrees
    pub defocus_angle: f64,
    /// Distance from the camera to the plane of perfect focus
    pub focus_dist: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            vfov: 90.0,
            look_from: Point3::new(0.0, 0.0, 0.0),
            look_at: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            defocus_angle: 0.0,
            focus_dist: 10.0,
        }
    }
}

impl CameraConfig {
    /// Settings that frame the showcase scene.
    pub fn showcase() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            image_width: 800,
            samples_per_pixel: 50,
            max_depth: 50,
            vfov: 20.0,
            look_from: Point3::new(13.0, 2.0, 3.0),
            look_at: Point3::new(0.0, 0.0, 0.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            defocus_angle: 0.6,
            focus_dist: 10.0,
        }
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        log::debug!("Loaded camera config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |field: &'static str, reason: &str| {
            Err(ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            })
        };

        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return invalid("aspect_ratio", "must be a positive number");
        }
        if self.image_width < 1 {
            return invalid("image_width", "must be at least 1");
        }
        if self.samples_per_pixel < 1 {
            return invalid("samples_per_pixel", "must be at least 1");
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return invalid("vfov", "must be between 0 and 180 degrees, exclusive");
        }
        if !(self.defocus_angle.is_finite() && self.defocus_angle >= 0.0) {
            return invalid("defocus_angle", "must be zero or positive");
        }
        if !(self.focus_dist.is_finite() && self.focus_dist > 0.0) {
            return invalid("focus_dist", "must be a positive number");
        }
        if !self.look_from.is_finite() || !self.look_at.is_finite() || !self.vup.is_finite() {
            return invalid("look_from/look_at/vup", "must be finite");
        }
        if (self.look_from - self.look_at).length_squared() == 0.0 {
            return invalid("look_at", "must differ from look_from");
        }
        if self.vup.cross(self.look_from - self.look_at).length_squared() == 0.0 {
            return invalid("vup", "must not be parallel to the view direction");
        }
        Ok(())
    }
}

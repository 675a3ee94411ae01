//! Error types for rendering.

use glint_core::{PpmError, SceneError};
use thiserror::Error;

/// Errors that can occur while building a world or rendering it.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Camera must be initialized before rendering")]
    CameraNotInitialized,

    #[error("Bucket size must be at least one pixel")]
    InvalidBucketSize,

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PPM error: {0}")]
    Ppm(#[from] PpmError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

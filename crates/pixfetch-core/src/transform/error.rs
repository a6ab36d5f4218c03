//! Per-item transform failures.

use thiserror::Error;

/// Why one stored file was not transformed. Never fatal to the run.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("unsupported image format: {0}")]
    Unsupported(String),
    /// Halving would produce an empty image.
    #[error("image too small to halve: {width}x{height}")]
    TooSmall { width: u32, height: u32 },
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

//! Closed set of input encodings the transform stage understands.

use image::ImageFormat;
use std::fmt;

/// Encoding of a stored file, driving decode and re-encode decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
    /// Recognized but unsupported (`"gif"`, `"bmp"`, ...) or not an image at all.
    Unsupported(String),
}

impl ImageKind {
    /// Maps a detected `image` format; `None` means nothing matched.
    pub fn from_format(format: Option<ImageFormat>) -> Self {
        match format {
            Some(ImageFormat::Jpeg) => ImageKind::Jpeg,
            Some(ImageFormat::Png) => ImageKind::Png,
            Some(ImageFormat::WebP) => ImageKind::Webp,
            Some(other) => ImageKind::Unsupported(
                other
                    .extensions_str()
                    .first()
                    .copied()
                    .unwrap_or("unknown")
                    .to_string(),
            ),
            None => ImageKind::Unsupported("unknown".to_string()),
        }
    }

    /// Format the transformed image is written in: WEBP becomes JPEG.
    pub fn output_format(&self) -> Option<ImageFormat> {
        match self {
            ImageKind::Jpeg | ImageKind::Webp => Some(ImageFormat::Jpeg),
            ImageKind::Png => Some(ImageFormat::Png),
            ImageKind::Unsupported(_) => None,
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageKind::Jpeg => f.write_str("jpeg"),
            ImageKind::Png => f.write_str("png"),
            ImageKind::Webp => f.write_str("webp"),
            ImageKind::Unsupported(name) => write!(f, "{}", name),
        }
    }
}

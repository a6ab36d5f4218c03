//! Transform stage: stored file in, halved and normalized image out.
//!
//! JPEG and PNG files are rewritten in place in their own format. WEBP files
//! are re-encoded as JPEG next to the source (`<stem>.jpg`) and the `.webp` is
//! removed. Output is staged in a `.part` file and renamed over the target, so
//! a failed encode leaves the previous file untouched.

mod error;
mod format;
mod normalize;

pub use error::TransformError;
pub use format::ImageKind;
pub use normalize::{channel_stats, normalize, NormalizationStats};

use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};

use crate::config::{NormalizationMode, PixfetchConfig};
use crate::progress::ProgressCounter;
use crate::queue::WorkReceiver;
use crate::storage::{self, OutputFile};

/// Encoding and normalization settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    pub jpeg_quality: u8,
    pub normalization: NormalizationMode,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self::from_config(&PixfetchConfig::default())
    }
}

impl TransformOptions {
    pub fn from_config(cfg: &PixfetchConfig) -> Self {
        Self {
            jpeg_quality: cfg.jpeg_quality.clamp(1, 100),
            normalization: cfg.normalization,
        }
    }
}

/// Stateless image transformer shared by all transform workers.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    opts: TransformOptions,
}

impl Transformer {
    pub fn new(opts: TransformOptions) -> Self {
        Self { opts }
    }

    /// Decode, halve, normalize and re-encode the image at `path`.
    /// Returns the path of the transformed file.
    pub fn transform(&self, path: &Path) -> Result<PathBuf, TransformError> {
        let (kind, img) = decode(path)?;
        let format = kind
            .output_format()
            .ok_or_else(|| TransformError::Unsupported(kind.to_string()))?;

        let (width, height) = (img.width(), img.height());
        let (half_w, half_h) = (width / 2, height / 2);
        if half_w == 0 || half_h == 0 {
            return Err(TransformError::TooSmall { width, height });
        }
        let resized = img.resize_exact(half_w, half_h, FilterType::Lanczos3);
        let out = self.normalized(&kind, resized);

        if kind == ImageKind::Webp {
            self.replace_webp(&out, format, path)
        } else {
            self.encode_to(&out, format, path)
        }
    }

    /// Converts to the 8-bit layout of the output encoding and normalizes the
    /// color samples. Alpha survives only for PNG output.
    fn normalized(&self, kind: &ImageKind, img: DynamicImage) -> DynamicImage {
        let mode = self.opts.normalization;
        if *kind == ImageKind::Png && img.color().has_alpha() {
            let mut buf = img.into_rgba8();
            normalize(&mut buf, mode);
            DynamicImage::ImageRgba8(buf)
        } else {
            let mut buf = img.into_rgb8();
            normalize(&mut buf, mode);
            DynamicImage::ImageRgb8(buf)
        }
    }

    /// Encodes `img` as `format` over `target` via a staged `.part` file.
    fn encode_to(
        &self,
        img: &DynamicImage,
        format: ImageFormat,
        target: &Path,
    ) -> Result<PathBuf, TransformError> {
        let mut out = OutputFile::create(target)?;
        let written = match format {
            ImageFormat::Jpeg => img.write_with_encoder(JpegEncoder::new_with_quality(
                out.writer(),
                self.opts.jpeg_quality,
            )),
            ImageFormat::Png => img.write_with_encoder(PngEncoder::new(out.writer())),
            other => {
                out.discard();
                return Err(TransformError::Unsupported(format!("{:?}", other).to_lowercase()));
            }
        };
        if let Err(e) = written {
            out.discard();
            return Err(TransformError::Encode(e));
        }
        Ok(out.finalize()?)
    }

    /// Writes `<stem>.jpg` beside the WEBP source, then deletes the source.
    /// An existing `<stem>.jpg` is never overwritten; the name is suffixed.
    /// A WEBP body already stored as `<stem>.jpg` is rewritten in place.
    fn replace_webp(
        &self,
        img: &DynamicImage,
        format: ImageFormat,
        source: &Path,
    ) -> Result<PathBuf, TransformError> {
        let dir = source.parent().unwrap_or_else(|| Path::new("."));
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "image".to_string());
        let name = format!("{}.jpg", stem);
        if dir.join(&name) == source {
            return self.encode_to(img, format, source);
        }

        let (placeholder, target) = storage::create_unique(dir, &name)?;
        drop(placeholder);
        if let Err(e) = self.encode_to(img, format, &target) {
            let _ = std::fs::remove_file(&target);
            return Err(e);
        }
        if let Err(e) = std::fs::remove_file(source) {
            tracing::warn!(path = %source.display(), "failed to remove converted webp: {}", e);
        }
        Ok(target)
    }

    /// Worker loop: runs until `jobs` is closed and drained.
    pub fn run_worker(&self, jobs: WorkReceiver<PathBuf>, progress: &ProgressCounter) {
        for path in jobs.iter() {
            match self.transform(&path) {
                Ok(out) => {
                    progress.record_transformed();
                    tracing::debug!(path = %out.display(), "transformed");
                }
                Err(e) => {
                    progress.record_transform_failed();
                    tracing::error!(path = %path.display(), "error processing image: {}", e);
                }
            }
        }
    }
}

/// Sniffs the encoding from content, falling back to the extension, and
/// decodes supported kinds.
fn decode(path: &Path) -> Result<(ImageKind, DynamicImage), TransformError> {
    let mut reader = ImageReader::open(path)?.with_guessed_format()?;
    if reader.format().is_none() {
        if let Ok(format) = ImageFormat::from_path(path) {
            reader.set_format(format);
        }
    }
    let kind = ImageKind::from_format(reader.format());
    if let ImageKind::Unsupported(name) = kind {
        return Err(TransformError::Unsupported(name));
    }
    let img = reader.decode().map_err(TransformError::Decode)?;
    Ok((kind, img))
}

//! `pixfetch manifest <input-dir> <output-dir>` – fetch manifest thumbnails.

use anyhow::Result;
use pixfetch_core::pipeline::PipelineOptions;
use pixfetch_core::source::UrlSource;
use std::path::PathBuf;

pub async fn run_manifest(input_dir: PathBuf, output_dir: PathBuf, opts: PipelineOptions) -> Result<()> {
    super::run_pipeline(UrlSource::ManifestDir(input_dir), output_dir, opts).await?;
    Ok(())
}

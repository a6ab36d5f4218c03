//! `pixfetch list <input-file> <output-dir>` – fetch URLs from a text file.

use anyhow::Result;
use pixfetch_core::pipeline::PipelineOptions;
use pixfetch_core::source::UrlSource;
use std::path::PathBuf;

pub async fn run_list(input_file: PathBuf, output_dir: PathBuf, opts: PipelineOptions) -> Result<()> {
    super::run_pipeline(UrlSource::LineFile(input_file), output_dir, opts).await?;
    Ok(())
}

//! CLI command handlers. Each command is in its own file.

mod list;
mod manifest;

pub use list::run_list;
pub use manifest::run_manifest;

use anyhow::{Context, Result};
use pixfetch_core::pipeline::{self, PipelineOptions, PipelineReport};
use pixfetch_core::source::UrlSource;
use std::path::PathBuf;

/// Runs the blocking pipeline off the async runtime and prints the summary.
async fn run_pipeline(
    source: UrlSource,
    output_dir: PathBuf,
    opts: PipelineOptions,
) -> Result<PipelineReport> {
    let report = tokio::task::spawn_blocking(move || pipeline::run(&source, &output_dir, &opts))
        .await
        .context("pipeline task join")??;
    print_report(&report);
    Ok(report)
}

fn print_report(report: &PipelineReport) {
    println!("{}", report.summary_line());
    if report.fetch_failed > 0 || report.transform_failed > 0 {
        println!(
            "  {} download(s) failed, {} image(s) could not be processed (see log)",
            report.fetch_failed, report.transform_failed
        );
    }
}

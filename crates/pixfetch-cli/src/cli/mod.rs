//! CLI for pixfetch.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use pixfetch_core::config::{self, NormalizationMode, PixfetchConfig};
use pixfetch_core::pipeline::PipelineOptions;
use std::path::PathBuf;

use commands::{run_list, run_manifest};

/// Top-level CLI for pixfetch.
#[derive(Debug, Parser)]
#[command(name = "pixfetch")]
#[command(about = "pixfetch: fetch images concurrently, halve and normalize them on disk", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch the thumbnail_url of every record in a directory of YAML/JSON manifests.
    #[command(visible_alias = "yaml")]
    Manifest {
        /// Directory containing manifest files (.yaml, .yml, .json).
        input_dir: PathBuf,
        /// Directory the processed images are written to (created if missing).
        output_dir: PathBuf,
        #[command(flatten)]
        pool: PoolArgs,
    },

    /// Fetch every URL of a text file, one per line.
    #[command(visible_alias = "txt")]
    List {
        /// Text file with one URL per line; blank lines are ignored.
        input_file: PathBuf,
        /// Directory the processed images are written to (created if missing).
        output_dir: PathBuf,
        #[command(flatten)]
        pool: PoolArgs,
    },
}

/// Per-run overrides of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct PoolArgs {
    /// Number of download workers (default: fetch_workers_per_cpu x CPUs).
    #[arg(long, value_name = "N")]
    pub fetch_workers: Option<usize>,
    /// Number of image workers (default: transform_workers_per_cpu x CPUs).
    #[arg(long, value_name = "N")]
    pub transform_workers: Option<usize>,
    /// Normalization statistics.
    #[arg(long, value_enum)]
    pub normalization: Option<NormalizationArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NormalizationArg {
    /// One mean/stddev over all color samples.
    Pooled,
    /// Separate mean/stddev for R, G and B.
    PerChannel,
}

impl From<NormalizationArg> for NormalizationMode {
    fn from(arg: NormalizationArg) -> Self {
        match arg {
            NormalizationArg::Pooled => NormalizationMode::Pooled,
            NormalizationArg::PerChannel => NormalizationMode::PerChannel,
        }
    }
}

impl PoolArgs {
    /// Pipeline options from `cfg` with these overrides applied.
    pub fn options(&self, cfg: &PixfetchConfig) -> PipelineOptions {
        let mut cfg = cfg.clone();
        if let Some(mode) = self.normalization {
            cfg.normalization = mode.into();
        }
        let mut opts = PipelineOptions::from_config(&cfg);
        opts.sizes = opts
            .sizes
            .with_overrides(self.fetch_workers, self.transform_workers);
        opts
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Manifest {
                input_dir,
                output_dir,
                pool,
            } => run_manifest(input_dir, output_dir, pool.options(&cfg)).await?,
            CliCommand::List {
                input_file,
                output_dir,
                pool,
            } => run_list(input_file, output_dir, pool.options(&cfg)).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;

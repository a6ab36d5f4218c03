//! Pipeline coordinator.
//!
//! ```text
//! source ──▶ [url queue] ──▶ fetch-N ──▶ [path queue] ──▶ transform-N ──▶ disk
//! ```
//!
//! The URL queue closes when the source is exhausted. The path queue is held
//! open by the coordinator until a supervisor thread has joined every fetch
//! worker, so no late fetch result can race the close. The run ends when the
//! transform workers have drained the path queue.

mod report;
mod sizing;

pub use report::PipelineReport;
pub use sizing::PoolSizes;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::config::PixfetchConfig;
use crate::fetcher::{Fetcher, HttpOptions};
use crate::progress::ProgressCounter;
use crate::queue::{self, WorkSender};
use crate::source::UrlSource;
use crate::transform::{TransformOptions, Transformer};

/// Everything a run needs besides its input and output locations.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub sizes: PoolSizes,
    pub http: HttpOptions,
    pub transform: TransformOptions,
}

impl PipelineOptions {
    /// Options for this host: pools sized from available parallelism.
    pub fn from_config(cfg: &PixfetchConfig) -> Self {
        Self {
            sizes: PoolSizes::detect(cfg),
            http: HttpOptions::from_config(cfg),
            transform: TransformOptions::from_config(cfg),
        }
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from_config(&PixfetchConfig::default())
    }
}

/// Runs the pipeline to completion over every URL in `source`.
///
/// Only setup can fail: an unreadable source, an output directory that cannot
/// be created, or a worker thread that cannot be spawned. Per-item failures
/// are logged and show up as counts in the report.
pub fn run(source: &UrlSource, output_dir: &Path, opts: &PipelineOptions) -> Result<PipelineReport> {
    let started = Instant::now();
    let urls = source.open()?;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    let sizes = opts.sizes;
    let progress = Arc::new(ProgressCounter::new());
    let (url_tx, url_rx) = queue::bounded::<String>(sizes.fetch_queue_capacity());
    let (path_tx, path_rx) = queue::bounded::<PathBuf>(sizes.transform_queue_capacity());
    tracing::info!(
        source = %source,
        output = %output_dir.display(),
        fetch_workers = sizes.fetch_workers,
        transform_workers = sizes.transform_workers,
        url_queue = url_tx.capacity(),
        path_queue = path_tx.capacity(),
        "starting pipeline"
    );

    let transformer = Transformer::new(opts.transform);
    let mut transformers = Vec::with_capacity(sizes.transform_workers);
    for i in 0..sizes.transform_workers.max(1) {
        let jobs = path_rx.clone();
        let transformer = transformer.clone();
        let progress = Arc::clone(&progress);
        let handle = thread::Builder::new()
            .name(format!("transform-{}", i))
            .spawn(move || transformer.run_worker(jobs, &progress))
            .context("failed to spawn transform worker")?;
        transformers.push(handle);
    }
    drop(path_rx);

    let fetcher = Fetcher::new(output_dir, opts.http.clone());
    let mut fetchers = Vec::with_capacity(sizes.fetch_workers);
    for i in 0..sizes.fetch_workers.max(1) {
        let jobs = url_rx.clone();
        let stored = path_tx.clone();
        let fetcher = fetcher.clone();
        let progress = Arc::clone(&progress);
        let handle = thread::Builder::new()
            .name(format!("fetch-{}", i))
            .spawn(move || fetcher.run_worker(jobs, stored, &progress))
            .context("failed to spawn fetch worker")?;
        fetchers.push(handle);
    }
    drop(url_rx);

    let barrier = thread::Builder::new()
        .name("fetch-barrier".to_string())
        .spawn(move || close_after(fetchers, path_tx))
        .context("failed to spawn fetch supervisor")?;

    let mut submitted = 0usize;
    for url in urls {
        if let Err(rejected) = url_tx.send(url) {
            tracing::error!(url = %rejected.0, "no fetch worker left; stopping input");
            break;
        }
        submitted += 1;
    }
    url_tx.close();
    tracing::debug!(submitted, "source exhausted; url queue closed");

    if barrier.join().is_err() {
        tracing::error!("fetch supervisor panicked");
    }
    join_all("transform", transformers);

    let report = PipelineReport::new(submitted, progress.snapshot(), started.elapsed());
    tracing::info!("pipeline finished: {}", report);
    Ok(report)
}

/// Completion barrier: waits for every fetch worker, then releases the
/// coordinator's handle on the path queue so transform workers can drain it.
fn close_after(fetchers: Vec<JoinHandle<()>>, stored: WorkSender<PathBuf>) {
    join_all("fetch", fetchers);
    stored.close();
    tracing::debug!("fetch workers finished; path queue closed");
}

fn join_all(stage: &str, handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        let name = handle.thread().name().unwrap_or(stage).to_string();
        if handle.join().is_err() {
            tracing::error!(worker = %name, "{} worker panicked", stage);
        }
    }
}

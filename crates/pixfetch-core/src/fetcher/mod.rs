//! Fetch stage: URL in, stored file path out.
//!
//! Each worker pulls URLs from the fetch queue, performs one blocking GET with
//! libcurl and pushes the resolved local path onto the transform queue. There
//! is no retry: a failed URL is logged, counted and dropped.

mod error;
mod http;

pub use error::FetchError;

use std::path::PathBuf;
use std::time::Duration;

use crate::config::PixfetchConfig;
use crate::progress::ProgressCounter;
use crate::queue::{WorkReceiver, WorkSender};
use crate::url_model;

/// Per-request network settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_redirects: u32,
    pub user_agent: Option<String>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self::from_config(&PixfetchConfig::default())
    }
}

impl HttpOptions {
    pub fn from_config(cfg: &PixfetchConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            request_timeout: Duration::from_secs(cfg.request_timeout_secs),
            max_redirects: cfg.max_redirects,
            user_agent: cfg.user_agent.clone(),
        }
    }
}

/// Downloads images into one output directory. Cheap to clone per worker.
#[derive(Debug, Clone)]
pub struct Fetcher {
    output_dir: PathBuf,
    http: HttpOptions,
}

impl Fetcher {
    pub fn new(output_dir: impl Into<PathBuf>, http: HttpOptions) -> Self {
        Self {
            output_dir: output_dir.into(),
            http,
        }
    }

    /// Downloads `url` to a file named after its last path segment, suffixed
    /// `_1`, `_2`, ... when that name is taken. Returns the path written.
    pub fn fetch(&self, url: &str) -> Result<PathBuf, FetchError> {
        let name = url_model::derive_filename(url);
        http::get_to_dir(url, &self.output_dir, &name, &self.http)
    }

    /// Worker loop: runs until `jobs` is closed and drained.
    pub fn run_worker(
        &self,
        jobs: WorkReceiver<String>,
        stored: WorkSender<PathBuf>,
        progress: &ProgressCounter,
    ) {
        for url in jobs.iter() {
            match self.fetch(&url) {
                Ok(path) => {
                    progress.record_fetched();
                    tracing::info!(url = %url, path = %path.display(), "downloaded");
                    if let Err(closed) = stored.send(path) {
                        tracing::error!(
                            path = %closed.0.display(),
                            "transform queue closed; stored file will not be transformed"
                        );
                    }
                }
                Err(e) => {
                    progress.record_fetch_failed();
                    tracing::error!(url = %url, "error downloading: {}", e);
                }
            }
        }
    }
}

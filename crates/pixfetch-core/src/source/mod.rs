//! Input sources: turn a manifest directory or a URL list file into a lazy
//! stream of URL strings for the fetch queue.

mod lines;
mod manifest;

pub use lines::LineUrls;
pub use manifest::{manifest_files, parse_manifest, ManifestRecord, ManifestUrls};

use anyhow::Result;
use std::fmt;
use std::path::PathBuf;

/// Finite, non-restartable stream of non-empty URLs.
pub type UrlStream = Box<dyn Iterator<Item = String> + Send>;

/// Where the URLs of a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlSource {
    /// Directory of YAML/JSON manifests whose records may carry `thumbnail_url`.
    ManifestDir(PathBuf),
    /// Text file with one URL per line.
    LineFile(PathBuf),
}

impl UrlSource {
    /// Open the source. Failing to list the directory or open the file is fatal
    /// for the run; problems inside individual manifests are not.
    pub fn open(&self) -> Result<UrlStream> {
        match self {
            UrlSource::ManifestDir(dir) => Ok(Box::new(ManifestUrls::open(dir)?)),
            UrlSource::LineFile(path) => Ok(Box::new(LineUrls::open(path)?)),
        }
    }
}

impl fmt::Display for UrlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlSource::ManifestDir(p) => write!(f, "manifest dir {}", p.display()),
            UrlSource::LineFile(p) => write!(f, "url list {}", p.display()),
        }
    }
}

//! Structured product manifests (YAML or JSON).
//!
//! Schema:
//!
//! ```yaml
//! data:
//!   - id: 1
//!     external_id: "SKU-1"
//!     name: "Blue shoe"
//!     thumbnail_url: "https://cdn.example.com/shoe.jpg"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One product record. Only `thumbnail_url` feeds the pipeline.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ManifestDoc {
    #[serde(default)]
    data: Option<Vec<ManifestRecord>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ManifestFormat {
    Yaml,
    Json,
}

fn manifest_format(path: &Path) -> Option<ManifestFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "yaml" | "yml" => Some(ManifestFormat::Yaml),
        "json" => Some(ManifestFormat::Json),
        _ => None,
    }
}

/// Lists manifest files (`.yaml`, `.yml`, `.json`) directly inside `dir`, sorted by name.
pub fn manifest_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read input directory {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read input directory {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() && manifest_format(&path).is_some() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Parses one manifest and returns the non-blank thumbnail URLs in record order.
pub fn parse_manifest(path: &Path) -> Result<Vec<String>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let doc: ManifestDoc = match manifest_format(path) {
        Some(ManifestFormat::Json) => serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON manifest {}", path.display()))?,
        _ => serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML manifest {}", path.display()))?,
    };
    Ok(doc
        .data
        .unwrap_or_default()
        .into_iter()
        .filter_map(|r| r.thumbnail_url)
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .collect())
}

/// Lazily walks manifest files, parsing one file at a time.
pub struct ManifestUrls {
    files: std::vec::IntoIter<PathBuf>,
    current: std::vec::IntoIter<String>,
}

impl ManifestUrls {
    pub fn open(dir: &Path) -> Result<Self> {
        let files = manifest_files(dir)?;
        tracing::debug!(dir = %dir.display(), "found {} manifest file(s)", files.len());
        Ok(Self {
            files: files.into_iter(),
            current: Vec::new().into_iter(),
        })
    }
}

impl Iterator for ManifestUrls {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(url) = self.current.next() {
                return Some(url);
            }
            let path = self.files.next()?;
            match parse_manifest(&path) {
                Ok(urls) => self.current = urls.into_iter(),
                Err(e) => {
                    tracing::error!(path = %path.display(), "skipping manifest: {:#}", e);
                }
            }
        }
    }
}

//! One-URL-per-line text input.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

/// Lazily yields trimmed, non-blank lines of a text file.
///
/// A read error part way through (e.g. invalid UTF-8) is logged and ends the
/// stream; URLs already yielded stay queued.
pub struct LineUrls {
    path: PathBuf,
    lines: Option<Lines<BufReader<File>>>,
}

impl LineUrls {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open input file {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            lines: Some(BufReader::new(file).lines()),
        })
    }
}

impl Iterator for LineUrls {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let lines = self.lines.as_mut()?;
        loop {
            match lines.next() {
                Some(Ok(line)) => {
                    let url = line.trim();
                    if !url.is_empty() {
                        return Some(url.to_string());
                    }
                }
                Some(Err(e)) => {
                    tracing::error!(path = %self.path.display(), "error reading input file: {}", e);
                    self.lines = None;
                    return None;
                }
                None => {
                    self.lines = None;
                    return None;
                }
            }
        }
    }
}

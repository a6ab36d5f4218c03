//! Staged writer for transformed output.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::temp_path;

/// A buffered writer on `<final>.part` that is renamed over `<final>` on
/// [`finalize`](OutputFile::finalize). Readers of the final path see either the
/// previous content or the complete new content, never a truncated encode.
pub struct OutputFile {
    writer: BufWriter<File>,
    temp_path: PathBuf,
    final_path: PathBuf,
}

impl OutputFile {
    /// Create (or truncate) the temp file for `final_path`.
    pub fn create(final_path: &Path) -> io::Result<Self> {
        let temp_path = temp_path(final_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        Ok(OutputFile {
            writer: BufWriter::new(file),
            temp_path,
            final_path: final_path.to_path_buf(),
        })
    }

    pub fn writer(&mut self) -> &mut BufWriter<File> {
        &mut self.writer
    }

    /// Flush and atomically rename the temp file to the final path.
    /// Removes the temp file if either step fails.
    pub fn finalize(mut self) -> io::Result<PathBuf> {
        let result = self
            .writer
            .flush()
            .and_then(|()| std::fs::rename(&self.temp_path, &self.final_path));
        match result {
            Ok(()) => Ok(self.final_path),
            Err(e) => {
                let _ = std::fs::remove_file(&self.temp_path);
                Err(e)
            }
        }
    }

    /// Drop the staged content without touching the final path.
    pub fn discard(self) {
        let temp_path = self.temp_path.clone();
        drop(self.writer);
        if let Err(e) = std::fs::remove_file(&temp_path) {
            tracing::warn!(path = %temp_path.display(), "failed to remove temp file: {}", e);
        }
    }
}

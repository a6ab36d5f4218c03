use std::fmt;
use std::time::Duration;

use crate::progress::ProgressSnapshot;

/// Outcome of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineReport {
    /// URLs read from the source and queued for fetching.
    pub submitted: usize,
    pub fetched: usize,
    pub fetch_failed: usize,
    pub transformed: usize,
    pub transform_failed: usize,
    pub elapsed: Duration,
}

impl PipelineReport {
    pub(super) fn new(submitted: usize, progress: ProgressSnapshot, elapsed: Duration) -> Self {
        Self {
            submitted,
            fetched: progress.fetched,
            fetch_failed: progress.fetch_failed,
            transformed: progress.transformed,
            transform_failed: progress.transform_failed,
            elapsed,
        }
    }

    /// Final console line: the fetched count and wall time.
    pub fn summary_line(&self) -> String {
        format!(
            "Successfully downloaded and processed {} images in {:?}",
            self.fetched, self.elapsed
        )
    }

    /// True when every submitted URL was both fetched and transformed.
    pub fn is_clean(&self) -> bool {
        self.fetch_failed == 0 && self.transform_failed == 0 && self.fetched == self.submitted
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "submitted={} fetched={} fetch_failed={} transformed={} transform_failed={} elapsed={:?}",
            self.submitted,
            self.fetched,
            self.fetch_failed,
            self.transformed,
            self.transform_failed,
            self.elapsed
        )
    }
}

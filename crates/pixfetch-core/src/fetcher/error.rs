//! Per-item fetch failures.

use thiserror::Error;

/// Why one URL did not become a stored file. Never fatal to the run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (bad URL, DNS, connect, timeout, reset...).
    #[error("{0}")]
    Transport(#[from] curl::Error),
    /// Final response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Creating or writing the output file failed.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
}

//! Concurrent image ingestion: fetch remote images, halve and normalize them,
//! and re-encode them on disk.

pub mod config;
pub mod fetcher;
pub mod logging;
pub mod pipeline;
pub mod progress;
pub mod queue;
pub mod source;
pub mod storage;
pub mod transform;
pub mod url_model;

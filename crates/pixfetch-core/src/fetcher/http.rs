//! Single GET streamed to a collision-free file.

use std::cell::{Cell, RefCell};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str;

use super::{FetchError, HttpOptions};
use crate::storage;

/// Destination file, created on the first successful body chunk.
struct Sink<'a> {
    dir: &'a Path,
    name: &'a str,
    open: Option<(BufWriter<File>, PathBuf)>,
    error: Option<io::Error>,
}

impl Sink<'_> {
    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        if self.open.is_none() {
            let (file, path) = storage::create_unique(self.dir, self.name)?;
            self.open = Some((BufWriter::new(file), path));
        }
        match self.open.as_mut() {
            Some((w, _)) => w.write_all(data),
            None => Ok(()),
        }
    }

    /// Flush and return the stored path, creating an empty file if no body arrived.
    fn finish(mut self) -> io::Result<PathBuf> {
        match self.open.take() {
            Some((mut w, path)) => {
                if let Err(e) = w.flush() {
                    drop(w);
                    remove_partial(&path);
                    return Err(e);
                }
                Ok(path)
            }
            None => Ok(storage::create_unique(self.dir, self.name)?.1),
        }
    }

    /// Remove whatever was written so far.
    fn abandon(mut self) {
        if let Some((w, path)) = self.open.take() {
            drop(w);
            remove_partial(&path);
        }
    }
}

fn remove_partial(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        tracing::warn!(path = %path.display(), "failed to remove partial download: {}", e);
    }
}

/// Parses the status code from a raw header line such as `HTTP/1.1 404 Not Found`.
fn status_from_header_line(line: &[u8]) -> Option<u32> {
    let line = str::from_utf8(line).ok()?;
    if !line.starts_with("HTTP/") {
        return None;
    }
    line.split_whitespace().nth(1)?.parse().ok()
}

fn is_success(code: u32) -> bool {
    (200..300).contains(&code)
}

/// GETs `url` and streams a 2xx body into `dir/name` (or a suffixed variant).
///
/// Bodies of non-2xx responses are discarded without touching the filesystem,
/// so a failed request never leaves a file behind. A failure after the body
/// started removes the partial file.
/// Runs in the current thread.
pub(super) fn get_to_dir(
    url: &str,
    dir: &Path,
    name: &str,
    opts: &HttpOptions,
) -> Result<PathBuf, FetchError> {
    let status = Cell::new(0u32);
    let sink = RefCell::new(Sink {
        dir,
        name,
        open: None,
        error: None,
    });

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(opts.max_redirects)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.request_timeout)?;
    if let Some(ua) = opts.user_agent.as_deref() {
        easy.useragent(ua)?;
    }

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|line| {
            if let Some(code) = status_from_header_line(line) {
                status.set(code);
            }
            true
        })?;
        transfer.write_function(|data| {
            if !is_success(status.get()) {
                return Ok(data.len());
            }
            let mut sink = sink.borrow_mut();
            match sink.write(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    sink.error = Some(e);
                    // Short count aborts the transfer with a write error.
                    Ok(0)
                }
            }
        })?;
        transfer.perform()
    };

    let mut sink = sink.into_inner();
    if let Err(e) = performed {
        let storage_error = sink.error.take();
        sink.abandon();
        return Err(match storage_error {
            Some(io_err) if e.is_write_error() => FetchError::Storage(io_err),
            _ => FetchError::Transport(e),
        });
    }

    let code = easy.response_code()?;
    if !is_success(code) {
        sink.abandon();
        return Err(FetchError::Http(code));
    }

    Ok(sink.finish()?)
}

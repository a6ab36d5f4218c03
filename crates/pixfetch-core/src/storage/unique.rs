//! Collision-safe file creation.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Upper bound on suffixes tried before giving up on a name.
const MAX_SUFFIX: u32 = 100_000;

/// Splits `name` into stem and extension (extension keeps its dot).
/// A leading dot does not start an extension: `.hidden` has no extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Returns `name` with `_<n>` inserted before the extension (`cat.jpg`, 2 → `cat_2.jpg`).
fn suffixed_name(name: &str, n: u32) -> String {
    let (stem, ext) = split_extension(name);
    format!("{}_{}{}", stem, n, ext)
}

/// Creates a new file in `dir` named `name`, or `name` with the first free
/// numeric suffix (`_1`, `_2`, ...) when that path is taken.
///
/// Each attempt is a single create-if-absent (`O_CREAT | O_EXCL`), so two
/// workers racing for the same name can never both receive the same path.
pub fn create_unique(dir: &Path, name: &str) -> io::Result<(File, PathBuf)> {
    for n in 0..=MAX_SUFFIX {
        let candidate = if n == 0 {
            dir.join(name)
        } else {
            dir.join(suffixed_name(name, n))
        };
        match File::options().write(true).create_new(true).open(&candidate) {
            Ok(file) => return Ok((file, candidate)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free name for {} in {}", name, dir.display()),
    ))
}

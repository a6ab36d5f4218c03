//! Output files and their lifecycle.
//!
//! Fetched files are claimed with an atomic create-if-absent so concurrent
//! workers never share a path; transformed output is staged in a `.part` file
//! and renamed over its destination once fully encoded.

mod unique;
mod writer;

pub use unique::create_unique;
pub use writer::OutputFile;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `cat.jpg` → `cat.jpg.part`).
pub fn temp_path(final_path: &std::path::Path) -> std::path::PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    std::path::PathBuf::from(o)
}

//! URL modeling and filename derivation.
//!
//! Derives safe local filenames from the URL path, falling back to a
//! time-based name when the path carries none.

mod path;
mod sanitize;

pub use path::filename_from_url;
pub use sanitize::sanitize_filename;

use std::time::{SystemTime, UNIX_EPOCH};

/// Prefix of synthesized names for URLs without a usable path segment.
const FALLBACK_PREFIX: &str = "image_";

/// Derives a safe filename for saving a fetched image.
///
/// Uses the last path segment of `url` (query parameters stripped), sanitized.
/// When that yields nothing usable, synthesizes `image_<unix-nanos>`; collisions
/// between synthesized names are left to [`crate::storage::create_unique`].
///
/// # Examples
///
/// - `derive_filename("https://example.com/p/shoe.jpg?v=3")` → `"shoe.jpg"`
/// - `derive_filename("https://example.com/")` → `"image_1718000000123456789"`
pub fn derive_filename(url: &str) -> String {
    let sanitized = filename_from_url(url)
        .map(|raw| sanitize_filename(&raw))
        .filter(|s| !s.is_empty() && s != "." && s != "..");

    match sanitized {
        Some(name) => name,
        None => fallback_filename(),
    }
}

fn fallback_filename() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{}{}", FALLBACK_PREFIX, nanos)
}

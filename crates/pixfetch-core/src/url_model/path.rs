//! Filename extraction from URL path.

/// Extracts the last path segment from a URL for use as a filename hint.
///
/// Query string and fragment never contribute. URLs that do not parse are
/// split textually: everything after the last `/`, cut at the first `?` or `#`.
/// Returns `None` when no non-empty segment remains.
pub fn filename_from_url(url: &str) -> Option<String> {
    let segment = match url::Url::parse(url) {
        Ok(parsed) => parsed
            .path()
            .split('/')
            .filter(|s| !s.is_empty())
            .last()
            .map(str::to_string),
        Err(_) => {
            let tail = url.rsplit('/').next().unwrap_or(url);
            let end = tail.find(['?', '#']).unwrap_or(tail.len());
            Some(tail[..end].to_string())
        }
    }?;
    if segment.is_empty() || segment == "." || segment == ".." {
        return None;
    }
    Some(segment)
}

//! Filesystem-safe filename sanitization.

/// Longest filename accepted by common filesystems (Linux NAME_MAX), in bytes.
const NAME_MAX: usize = 255;

/// Characters rejected by at least one mainstream filesystem.
const UNSAFE_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Sanitizes a candidate filename.
///
/// - Replaces each of `< > : " / \ | ? *` and every control character with `_`
/// - Limits length to 255 bytes without splitting a UTF-8 sequence
pub fn sanitize_filename(name: &str) -> String {
    let out: String = name
        .chars()
        .map(|c| {
            if c.is_control() || UNSAFE_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    if out.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !out.is_char_boundary(take) {
            take -= 1;
        }
        out[..take].to_string()
    } else {
        out
    }
}

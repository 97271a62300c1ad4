//! Filename sanitization for cross-platform safety.

/// Characters replaced in stored filenames, in addition to C0 controls.
/// Covers path separators on Unix and Windows plus the Windows reserved set.
const ILLEGAL: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replaces every illegal character in `name` with `_`.
///
/// Illegal means the set `<>:"/\|?*` plus control characters below U+0020.
/// Everything else survives unchanged: spaces, dots, and non-ASCII are kept,
/// nothing is trimmed or collapsed.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if ILLEGAL.contains(&c) || (c as u32) < 0x20 {
                '_'
            } else {
                c
            }
        })
        .collect()
}

//! Markdown image-link extraction.
//!
//! One compiled pattern shared by the extraction and rewrite passes so the
//! two can never disagree about what counts as a remote image link.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::ops::Range;

/// Matches the `](...)` tail of a markdown link or image whose target is an
/// absolute http(s) URL ending in a raster-image extension. Group 1 captures
/// the URL through the extension; query or fragment text between the
/// extension and the closing parenthesis is part of the match but not the
/// capture.
pub(crate) static IMAGE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\]\(\s*(https?://[^\s)]+?\.(?:png|jpe?g|gif))[^)]*\)").unwrap()
});

/// An image URL found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// The URL exactly as captured (through the extension).
    pub url: String,
    /// Byte range of the capture within the scanned text.
    pub span: Range<usize>,
}

/// Scans markdown text for remote image links.
///
/// Returns one reference per distinct URL, in first-occurrence order.
/// Relative links, bare URLs outside `](...)`, and non-image targets are
/// ignored. Text without matches yields an empty list, never an error.
pub fn extract_image_refs(text: &str) -> Vec<ImageReference> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut refs = Vec::new();
    for caps in IMAGE_LINK.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            if seen.insert(m.as_str()) {
                refs.push(ImageReference {
                    url: m.as_str().to_string(),
                    span: m.range(),
                });
            }
        }
    }
    refs
}

//! Local filename derivation from image URLs.
//!
//! Maps each remote image URL onto a deterministic local filename: the last
//! path segment when the URL has one, otherwise a synthesized
//! `<host>_<hash><ext>` name that stays stable across runs.

mod decode;
mod sanitize;

pub use decode::percent_decode;
pub use sanitize::sanitize_filename;

use sha1::{Digest, Sha1};

/// Suffix used when the URL path does not end in a recognized image
/// extension.
const FALLBACK_EXT: &str = ".img";

/// Derives the local filename for `url`.
///
/// The last path segment (percent-decoded) wins when it is non-empty. A path
/// ending in `/` synthesizes `<host>_<12-hex-sha1(url)><ext>`, with any `:`
/// between host and port replaced by `_`. Input that does not parse as a URL
/// at all yields `download_<12-hex-sha1(url)>.img`. The result always passes
/// through [`sanitize_filename`]. Distinct URLs can still map to the same
/// name (`/a/pic.png` vs `/b/pic.png`); that collision is accepted.
///
/// # Examples
///
/// - `https://cdn.example.com/img/photo.png` → `photo.png`
/// - `https://img.example.com/assets/` → `img.example.com_db96cfba34a3.img`
pub fn derive_filename(url: &str) -> String {
    let parsed = match url::Url::parse(url) {
        Ok(p) => p,
        Err(_) => {
            return sanitize_filename(&format!("download_{}{}", short_hash(url), FALLBACK_EXT))
        }
    };

    let segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");
    let decoded = percent_decode(segment);
    if decoded.is_empty() {
        sanitize_filename(&synthesized_name(&parsed, url))
    } else {
        sanitize_filename(&decoded)
    }
}

/// Builds the `<host>_<hash><ext>` fallback for URLs without a usable last
/// path segment.
fn synthesized_name(parsed: &url::Url, url: &str) -> String {
    let host = match (parsed.host_str(), parsed.port()) {
        (Some(h), Some(p)) => format!("{}_{}", h, p),
        (Some(h), None) => h.to_string(),
        (None, _) => "download".to_string(),
    };
    format!(
        "{}_{}{}",
        host,
        short_hash(url),
        path_extension(parsed.path())
    )
}

/// Extension hint for a synthesized name: the path's trailing image
/// extension lowercased, else `.img`.
fn path_extension(path: &str) -> &'static str {
    let lower = path.to_ascii_lowercase();
    for ext in [".png", ".jpeg", ".jpg", ".gif"] {
        if lower.ends_with(ext) {
            return ext;
        }
    }
    FALLBACK_EXT
}

/// First 12 hex characters of the SHA-1 of `input`.
fn short_hash(input: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())[..12].to_string()
}

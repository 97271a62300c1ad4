//! Image fetching: probe, skip, streamed download, atomic finalize.
//!
//! `Downloader` is the shared transport for one run. `fetch` folds every
//! failure into a `DownloadResult`, so one bad URL can never unwind a batch.

mod batch;
mod transfer;

pub use batch::download_all;

use crate::filename::derive_filename;
use crate::probe;
use crate::retry::{run_with_retry, RetryPolicy, TransferError};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// User agent presented on every request.
pub const USER_AGENT: &str = "mdis/0.1 (+https://example.com)";

/// Per-run transport options shared by every request.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Transfer buffer / write chunk size in bytes.
    pub chunk_size: usize,
    /// Connect timeout, and stall bound for running transfers.
    pub timeout: Duration,
    /// User agent presented on every request.
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            chunk_size: 32 * 1024,
            timeout: Duration::from_secs(10),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// Outcome of one URL: success flag plus the message the batch layer prints.
#[derive(Debug, Clone)]
pub struct DownloadResult {
    /// The URL exactly as it was passed in (fragment included).
    pub url: String,
    pub success: bool,
    pub message: String,
}

/// Path for the in-progress file: the final path with `.part` appended.
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut p = final_path.as_os_str().to_owned();
    p.push(TEMP_SUFFIX);
    PathBuf::from(p)
}

/// Shared transport for a whole run: one set of timeouts, chunk size, user
/// agent, and retry policy for every request.
#[derive(Debug, Clone)]
pub struct Downloader {
    options: FetchOptions,
    retry: RetryPolicy,
}

impl Downloader {
    pub fn new(options: FetchOptions, retry: RetryPolicy) -> Self {
        Self { options, retry }
    }

    /// Downloads one image URL into `dest_dir`.
    ///
    /// Never returns an error: probe, transfer, integrity, and filesystem
    /// failures all fold into a failed `DownloadResult`. The destination
    /// file is only ever replaced by a complete, size-checked download; a
    /// destination whose size already matches the probed length is skipped
    /// without a GET.
    pub fn fetch(&self, url: &str, dest_dir: &Path) -> DownloadResult {
        match self.try_fetch(url, dest_dir) {
            Ok(message) => DownloadResult {
                url: url.to_string(),
                success: true,
                message,
            },
            Err(message) => DownloadResult {
                url: url.to_string(),
                success: false,
                message,
            },
        }
    }

    fn try_fetch(&self, raw_url: &str, dest_dir: &Path) -> Result<String, String> {
        // Fragments never reach the server and must not affect naming or
        // the skip check.
        let url = raw_url.split_once('#').map_or(raw_url, |(head, _)| head).trim();

        let name = derive_filename(url);
        let dest_path = dest_dir.join(&name);
        let temp = temp_path(&dest_path);

        tracing::debug!(url, name = %name, "fetching image");

        // Probe for the expected size; an unprobeable URL downloads anyway.
        let expected = match run_with_retry(&self.retry, || {
            probe::content_length(url, self.options.timeout, &self.options.user_agent)
        }) {
            Ok(len) => len,
            Err(e) => {
                tracing::debug!(url, error = %e, "size probe failed, proceeding with GET");
                None
            }
        };

        if let Some(expected) = expected {
            if let Ok(meta) = fs::metadata(&dest_path) {
                if meta.len() == expected {
                    return Ok(format!("skip (exists, size match): {}", name));
                }
            }
        }

        // Streamed GET; every attempt truncates the temp file.
        let outcome = match run_with_retry(&self.retry, || {
            transfer::get_to_file(url, &temp, &self.options)
        }) {
            Ok(o) => o,
            Err(e) => {
                // an aborted attempt can leave a stale partial file behind
                let _ = fs::remove_file(&temp);
                return Err(match e {
                    TransferError::Http(code) => format!("HTTP {} for {}", code, url),
                    other => format!("{} for url {}", other, url),
                });
            }
        };

        let expected = expected.or(outcome.content_length);
        if let Some(expected) = expected {
            if outcome.written != expected {
                let _ = fs::remove_file(&temp);
                return Err(format!(
                    "incomplete download (got {} != expected {}) for {}",
                    outcome.written, expected, name
                ));
            }
        }

        if let Err(e) = fs::rename(&temp, &dest_path) {
            let _ = fs::remove_file(&temp);
            return Err(format!("i/o: {} for url {}", e, url));
        }

        Ok(format!("downloaded: {}", name))
    }
}

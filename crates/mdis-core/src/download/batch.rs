//! Sequential batch driver with per-URL progress lines.

use super::{DownloadResult, Downloader};
use std::path::Path;

/// Downloads every URL in `urls` into `dest_dir`, in order.
///
/// One result per input URL, same order, duplicates included. Prints an
/// `[OK]`/`[FAIL]` line per URL as it completes; a failure never stops the
/// batch.
pub fn download_all(
    downloader: &Downloader,
    urls: &[String],
    dest_dir: &Path,
) -> Vec<DownloadResult> {
    let mut results = Vec::with_capacity(urls.len());
    for url in urls {
        let result = downloader.fetch(url, dest_dir);
        let tag = if result.success { "OK" } else { "FAIL" };
        println!("[{}] {}", tag, result.message);
        if result.success {
            tracing::info!(url = %result.url, "{}", result.message);
        } else {
            tracing::warn!(url = %result.url, "{}", result.message);
        }
        results.push(result);
    }
    results
}

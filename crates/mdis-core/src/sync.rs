//! Per-document pipeline: extract, download, rewrite.

use crate::download::{self, DownloadResult, Downloader};
use crate::extract::extract_image_refs;
use crate::rewrite::{rewrite_markdown, rewritten_path};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// What syncing one document produced.
#[derive(Debug)]
pub struct SyncOutcome {
    /// Per-URL download results, in document order. Empty when the document
    /// has no remote image links.
    pub results: Vec<DownloadResult>,
    /// Path of the rewritten markdown file.
    pub output: PathBuf,
}

/// Runs the full pipeline for one markdown file.
///
/// Downloads into `images_dir`, then writes `<stem>_new.md` next to the
/// input, overwriting any previous copy. The rewrite happens even when
/// every download failed. Unreadable input, an uncreatable images
/// directory, and an unwritable output are the only fatal errors.
pub fn sync_file(
    downloader: &Downloader,
    md_path: &Path,
    images_dir: &Path,
    server_path: &str,
) -> Result<SyncOutcome> {
    let text =
        fs::read_to_string(md_path).with_context(|| format!("read {}", md_path.display()))?;

    let refs = extract_image_refs(&text);
    for r in &refs {
        tracing::debug!(url = %r.url, offset = r.span.start, "image link");
    }

    let results = if refs.is_empty() {
        println!("no image links found, skipping download.");
        Vec::new()
    } else {
        println!("found {} image links, downloading...", refs.len());
        fs::create_dir_all(images_dir)
            .with_context(|| format!("create {}", images_dir.display()))?;
        let urls: Vec<String> = refs.into_iter().map(|r| r.url).collect();
        download::download_all(downloader, &urls, images_dir)
    };

    let output = rewritten_path(md_path);
    let new_text = rewrite_markdown(&text, server_path);
    fs::write(&output, new_text).with_context(|| format!("write {}", output.display()))?;
    println!("new markdown written: {}", output.display());

    Ok(SyncOutcome { results, output })
}

//! `mdis sync <files..>` – download images and write rewritten markdown.

use anyhow::{bail, Result};
use mdis_core::config::SyncConfig;
use mdis_core::download::Downloader;
use mdis_core::sync::sync_file;
use std::path::{Path, PathBuf};

pub fn run_sync(
    cfg: &SyncConfig,
    files: &[PathBuf],
    server_path: &str,
    images_dir: Option<&Path>,
) -> Result<()> {
    let missing: Vec<&PathBuf> = files.iter().filter(|f| !f.is_file()).collect();
    if !missing.is_empty() {
        for f in &missing {
            tracing::warn!("not a file: {}", f.display());
        }
        bail!("no matching markdown files ({} not found)", missing[0].display());
    }

    let images_dir = images_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&cfg.images_dir));

    let downloader = Downloader::new(cfg.fetch_options(), cfg.retry_policy());

    for file in files {
        println!("processing {}", file.display());
        let outcome = sync_file(&downloader, file, &images_dir, server_path)?;
        let failed = outcome.results.iter().filter(|r| !r.success).count();
        if failed > 0 {
            tracing::warn!(file = %file.display(), failed, "sync finished with failures");
        }
    }
    println!("all done.");
    Ok(())
}

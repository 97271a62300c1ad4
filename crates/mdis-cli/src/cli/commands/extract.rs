//! `mdis extract <file>` – list remote image URLs referenced by a markdown file.

use anyhow::{Context, Result};
use mdis_core::extract::extract_image_refs;
use std::fs;
use std::path::Path;

pub fn run_extract(file: &Path) -> Result<()> {
    let text =
        fs::read_to_string(file).with_context(|| format!("read {}", file.display()))?;
    let refs = extract_image_refs(&text);
    if refs.is_empty() {
        println!("no image links found.");
        return Ok(());
    }
    for r in &refs {
        println!("{}", r.url);
    }
    tracing::debug!("{} image links in {}", refs.len(), file.display());
    Ok(())
}

//! CLI for the mdis markdown image sync tool.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mdis_core::config;
use std::path::PathBuf;

use commands::{run_extract, run_sync};

/// Top-level CLI for the mdis markdown image sync tool.
#[derive(Debug, Parser)]
#[command(name = "mdis")]
#[command(about = "mdis: download markdown images and rewrite links to a server path", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every remote image of the given markdown files and write a
    /// rewritten `<stem>_new.md` next to each.
    Sync {
        /// Markdown files to process, in order.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Prefix substituted for each image URL in the rewritten markdown.
        /// A trailing slash is appended when missing; empty leaves bare filenames.
        #[arg(long, default_value = "")]
        server_path: String,

        /// Directory downloads land in (overrides the configured images_dir).
        #[arg(long)]
        images_dir: Option<PathBuf>,
    },

    /// List the remote image URLs a markdown file references, without downloading.
    Extract {
        /// Markdown file to scan.
        file: PathBuf,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Sync { files, server_path, images_dir } => {
                run_sync(&cfg, &files, &server_path, images_dir.as_deref())?;
            }
            CliCommand::Extract { file } => run_extract(&file)?,
        }

        Ok(())
    }
}

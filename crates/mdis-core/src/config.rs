use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::download::FetchOptions;
use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries allowed after the initial attempt.
    pub max_retries: u32,
    /// Delay in seconds before the first retry (e.g. 0.5 = 500ms); doubles
    /// for each retry after that.
    pub backoff_factor_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor_secs: 0.5,
            max_delay_secs: 30,
        }
    }
}

impl RetryConfig {
    /// Converts the serialized form into the policy used by the downloader.
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            backoff_factor: Duration::from_secs_f64(
                self.backoff_factor_secs.max(0.0).min(3600.0),
            ),
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// Global configuration loaded from `~/.config/mdis/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Directory downloads land in, resolved against the working directory.
    pub images_dir: String,
    /// Write chunk / transfer buffer size in bytes.
    pub chunk_size_bytes: usize,
    /// Per-request connect timeout and stall bound, in seconds.
    pub timeout_secs: u64,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            images_dir: "images".to_string(),
            chunk_size_bytes: 32 * 1024,
            timeout_secs: 10,
            retry: None,
        }
    }
}

impl SyncConfig {
    /// Policy from the optional `[retry]` section, or built-in defaults.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryConfig::to_policy)
            .unwrap_or_default()
    }

    /// Transport options for the downloader.
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            chunk_size: self.chunk_size_bytes,
            timeout: Duration::from_secs(self.timeout_secs),
            ..FetchOptions::default()
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mdis")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SyncConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SyncConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: SyncConfig = toml::from_str(&data)?;
    Ok(cfg)
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Strategy for computing the z-score statistics of a resized image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationMode {
    /// One mean/stddev over the R, G and B samples of every pixel.
    #[default]
    Pooled,
    /// Independent mean/stddev for each of R, G and B.
    PerChannel,
}

/// Global configuration loaded from `~/.config/pixfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PixfetchConfig {
    /// Fetch workers per unit of available parallelism.
    pub fetch_workers_per_cpu: usize,
    /// Transform workers per unit of available parallelism.
    pub transform_workers_per_cpu: usize,
    /// Queue slots per worker of the consuming pool.
    pub queue_capacity_per_worker: usize,
    /// TCP/TLS connect timeout per request, in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout (headers + body), in seconds.
    pub request_timeout_secs: u64,
    /// Redirects followed before a request is failed.
    pub max_redirects: u32,
    /// Optional User-Agent header; libcurl sends none when unset.
    pub user_agent: Option<String>,
    /// JPEG quality (1-100) used for JPEG and WEBP-converted output.
    pub jpeg_quality: u8,
    /// Normalization statistics: "pooled" (default) or "per_channel".
    pub normalization: NormalizationMode,
}

impl Default for PixfetchConfig {
    fn default() -> Self {
        Self {
            fetch_workers_per_cpu: 4,
            transform_workers_per_cpu: 4,
            queue_capacity_per_worker: 2,
            connect_timeout_secs: 15,
            request_timeout_secs: 30,
            max_redirects: 10,
            user_agent: None,
            jpeg_quality: 90,
            normalization: NormalizationMode::Pooled,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pixfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PixfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PixfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: PixfetchConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

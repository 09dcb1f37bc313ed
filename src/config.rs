use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

fn default_max_retry_times() -> u32 {
    4
}

fn default_retry_http_codes() -> Vec<u16> {
    vec![500, 502, 503, 504, 599]
}

fn default_priority_adjust() -> i32 {
    -1
}

fn default_use_proxy_probability() -> f64 {
    0.95
}

/// Global configuration loaded from `~/.config/prowl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProwlConfig {
    /// Path to the proxy list: one `scheme://[user:password@]host:port` per
    /// line, UTF-8, blank lines ignored. Required to build the middleware.
    #[serde(default)]
    pub proxy_list_path: Option<PathBuf>,
    /// Maximum number of re-issues per request lineage.
    #[serde(default = "default_max_retry_times")]
    pub max_retry_times: u32,
    /// Failures tolerated per proxy before eviction. If missing, defaults to
    /// half of `max_retry_times` (at least 1).
    #[serde(default)]
    pub max_proxy_chance: Option<u32>,
    /// HTTP status codes that penalize the proxy and trigger a retry.
    #[serde(default = "default_retry_http_codes")]
    pub retry_http_codes: Vec<u16>,
    /// Scheduling priority delta applied on every retry; negative values sink
    /// retried work in the queue.
    #[serde(default = "default_priority_adjust")]
    pub priority_adjust: i32,
    /// Probability that a fresh request is routed through a proxy at all.
    /// The remainder dispatches direct as a canary for pool-independent
    /// reachability.
    #[serde(default = "default_use_proxy_probability")]
    pub use_proxy_probability: f64,
    /// Whether a retryable transport failure also penalizes the proxy that
    /// carried the attempt. Off by default: only retry-triggering HTTP
    /// statuses count against a proxy's chance.
    #[serde(default)]
    pub penalize_on_transport_error: bool,
}

impl Default for ProwlConfig {
    fn default() -> Self {
        Self {
            proxy_list_path: None,
            max_retry_times: default_max_retry_times(),
            max_proxy_chance: None,
            retry_http_codes: default_retry_http_codes(),
            priority_adjust: default_priority_adjust(),
            use_proxy_probability: default_use_proxy_probability(),
            penalize_on_transport_error: false,
        }
    }
}

impl ProwlConfig {
    /// Failure budget per proxy, resolving the default from `max_retry_times`.
    pub fn effective_proxy_chance(&self) -> u32 {
        self.max_proxy_chance
            .unwrap_or_else(|| (self.max_retry_times / 2).max(1))
    }

    /// Validate field ranges once, at startup.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.use_proxy_probability) {
            return Err(Error::Configuration(format!(
                "use_proxy_probability must be within [0, 1], got {}",
                self.use_proxy_probability
            )));
        }
        if let Some(chance) = self.max_proxy_chance {
            if chance == 0 {
                return Err(Error::Configuration(
                    "max_proxy_chance must be at least 1".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Load and validate configuration from an explicit TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: ProwlConfig = toml::from_str(&data).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("prowl")
        .map_err(|e| Error::Configuration(format!("cannot resolve XDG base directories: {e}")))?;
    xdg_dirs
        .place_config_file("config.toml")
        .map_err(|e| Error::Configuration(format!("cannot place config file: {e}")))
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ProwlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ProwlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)
            .map_err(|e| Error::Configuration(format!("cannot serialize default config: {e}")))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::Read {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, toml).map_err(|source| Error::Read {
            path: path.clone(),
            source,
        })?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    ProwlConfig::load(&path)
}

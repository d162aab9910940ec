//! Configuration file handling.
//!
//! This module handles loading and merging settings from
//! `~/.flavorlinetool/config.toml`. Credentials are not kept here; they
//! live in the data store (see `store`).

use crate::search::DEFAULT_RATE_LIMIT_DELAY;
use crate::store::DATA_DIR;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote service settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Search settings.
    #[serde(default)]
    pub search: SearchConfig,
}

/// Remote service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Flavortown base URL.
    #[serde(default = "default_flavortown_url")]
    pub flavortown_url: String,

    /// Hackatime base URL.
    #[serde(default = "default_hackatime_url")]
    pub hackatime_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            flavortown_url: default_flavortown_url(),
            hackatime_url: default_hackatime_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_flavortown_url() -> String {
    "https://flavortown.hackclub.com".to_string()
}

fn default_hackatime_url() -> String {
    "https://hackatime.hackclub.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl ApiConfig {
    /// The request timeout. Zero is raised to one second.
    pub fn timeout(&self) -> Duration {
        if self.timeout_seconds == 0 {
            warn!("timeout_seconds = 0 is not usable, using 1 second");
            return Duration::from_secs(1);
        }
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Multi-page search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Seconds between page requests during a full scan.
    #[serde(default = "default_rate_limit_delay")]
    pub rate_limit_delay_seconds: f64,

    /// Ask before starting a full scan.
    #[serde(default = "default_true")]
    pub confirm_autoscan: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            rate_limit_delay_seconds: default_rate_limit_delay(),
            confirm_autoscan: true,
        }
    }
}

fn default_rate_limit_delay() -> f64 {
    12.5 // 5 requests per minute
}

fn default_true() -> bool {
    true
}

impl SearchConfig {
    /// The pacing delay as a duration.
    ///
    /// Values that are not a representable non-negative number of seconds
    /// (negative, NaN, infinite, overflowing) fall back to the default.
    pub fn rate_limit_delay(&self) -> Duration {
        match Duration::try_from_secs_f64(self.rate_limit_delay_seconds) {
            Ok(delay) => delay,
            Err(e) => {
                warn!(
                    "Invalid rate_limit_delay_seconds ({}): {}. Using {:?}.",
                    self.rate_limit_delay_seconds, e, DEFAULT_RATE_LIMIT_DELAY
                );
                DEFAULT_RATE_LIMIT_DELAY
            }
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Default config location, `~/.flavorlinetool/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DATA_DIR).join("config.toml"))
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        match Self::default_path() {
            Some(path) if path.exists() => Ok(Some(Self::load(&path)?)),
            _ => Ok(None),
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments (and their env vars) take precedence over the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.flavortown_url {
            self.api.flavortown_url = url.trim_end_matches('/').to_string();
        }
        if let Some(ref url) = args.hackatime_url {
            self.api.hackatime_url = url.trim_end_matches('/').to_string();
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_seconds = timeout;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

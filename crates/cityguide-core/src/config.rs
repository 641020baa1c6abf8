//! Application configuration management.
//!
//! Configuration is stored at `~/.config/cityguide/config.json`. Every field
//! is optional; an absent file means defaults. A few fields can also be
//! overridden from the environment (see `apply_env`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::api::REMOTE_JSON_URL;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "cityguide";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding `remote_url`
pub const ENV_REMOTE_URL: &str = "CITYGUIDE_REMOTE_URL";

/// Environment variable overriding `cache_dir`
pub const ENV_CACHE_DIR: &str = "CITYGUIDE_CACHE_DIR";

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Document URL; defaults to `REMOTE_JSON_URL`.
    #[serde(default)]
    pub remote_url: Option<String>,
    /// Cache directory; defaults to the platform cache dir.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Request timeout. Unset leaves the transport default in place.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Apply overrides from a variable lookup (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_REMOTE_URL).filter(|v| !v.is_empty()) {
            self.remote_url = Some(url);
        }
        if let Some(dir) = lookup(ENV_CACHE_DIR).filter(|v| !v.is_empty()) {
            self.cache_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn remote_url(&self) -> &str {
        self.remote_url.as_deref().unwrap_or(REMOTE_JSON_URL)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

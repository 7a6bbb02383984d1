//! Console configuration: a TOML file with environment overrides.
//!
//! Resolution order, last one wins:
//!
//! 1. Built-in defaults
//! 2. The config file (`--config`, `ASSETRY_CONFIG`, or the platform default
//!    `<config_dir>/assetry/config.toml`)
//! 3. `ASSETRY_REMOTE_URL`, `ASSETRY_API_KEY` and `ASSETRY_CACHE_DIR`

use assetry_client::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{Error, Result};

/// Project name used for directories and messages.
pub const PROJECT_NAME: &str = "assetry";

/// Overrides the remote URL.
pub const ENV_REMOTE_URL: &str = "ASSETRY_REMOTE_URL";
/// Overrides the remote API key.
pub const ENV_API_KEY: &str = "ASSETRY_API_KEY";
/// Overrides the cache directory.
pub const ENV_CACHE_DIR: &str = "ASSETRY_CACHE_DIR";

/// Full console configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Remote store connection
    pub remote: ClientConfig,
    /// Local cache location
    pub cache: CacheConfig,
    /// Periodic refresh intervals
    pub refresh: RefreshConfig,
}

/// `[cache]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding one JSON file per collection
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        let dir = dirs::cache_dir()
            .map(|d| d.join(PROJECT_NAME))
            .unwrap_or_else(|| PathBuf::from(".assetry-cache"));
        Self { dir }
    }
}

/// `[refresh]` section, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Compliance checks and policy violations
    pub compliance_secs: u64,
    /// Integration status
    pub integrations_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            compliance_secs: 300,
            integrations_secs: 60,
        }
    }
}

impl RefreshConfig {
    /// Compliance refresh period.
    pub fn compliance(&self) -> Duration {
        Duration::from_secs(self.compliance_secs)
    }

    /// Integration refresh period.
    pub fn integrations(&self) -> Duration {
        Duration::from_secs(self.integrations_secs)
    }
}

impl ConsoleConfig {
    /// Platform default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(PROJECT_NAME).join("config.toml"))
    }

    /// The explicit path if given, else the platform default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(PathBuf::from(path)),
            None => Self::default_config_path(),
        }
    }

    /// Loads the configuration and applies environment overrides.
    ///
    /// A missing default file yields defaults. A missing explicit file is an
    /// error.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) if explicit.is_some() => {
                return Err(Error::config(format!(
                    "Config file does not exist at {}",
                    path.display()
                )));
            }
            _ => {
                tracing::debug!("No config file, using defaults");
                Self::default()
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Reads one TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let config = toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Applies overrides from `lookup`, which maps a variable name to its
    /// value. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = set(ENV_REMOTE_URL) {
            self.remote.url = url;
        }
        if let Some(key) = set(ENV_API_KEY) {
            self.remote.api_key = key;
        }
        if let Some(dir) = set(ENV_CACHE_DIR) {
            self.cache.dir = PathBuf::from(dir);
        }
    }

    /// Pretty TOML rendering.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}

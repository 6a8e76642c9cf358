//! Configuration types for the scout command line.
//!
//! The config file is TOML. Every key is optional:
//!
//! ```toml
//! log_filter = "scout=info,scout_search=debug"
//!
//! [search]
//! cache_root = "/var/cache/scout"
//! max_attempts = 2
//! domains = ["www.google.co.uk"]
//!
//! [search.proxy]
//! url = "http://127.0.0.1:8080"
//! username = "me"
//! password = "secret"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use scout_search::SearchConfig;

use crate::error::{Result, ScoutError};
use crate::scout_dirs;

/// Default `tracing` filter when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "scout=info,scout_search=info";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub log_filter: String,
    /// Fetching, caching and extraction settings.
    pub search: SearchConfig,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            search: SearchConfig::default(),
        }
    }
}

impl ScoutConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ScoutError::Config(e.to_string()))
    }

    /// Load `path` if given, else the default config file if it exists,
    /// else built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Self::default_config_path();
                if default.is_file() {
                    Self::from_file(&default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Save configuration to a TOML file, creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| ScoutError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default config file location.
    pub fn default_config_path() -> PathBuf {
        scout_dirs::config_file()
    }

    /// The search settings with a relative `cache_root` placed under the
    /// platform cache directory.
    pub fn search_config(&self) -> SearchConfig {
        self.search_config_under(&scout_dirs::cache_dir())
    }

    fn search_config_under(&self, cache_dir: &Path) -> SearchConfig {
        let mut search = self.search.clone();
        if search.cache_root.is_relative() {
            search.cache_root = cache_dir.join(&search.cache_root);
        }
        search
    }
}

//! Centralized directory paths for scout.
//!
//! Uses the [`dirs`] crate for platform-appropriate directory resolution.
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | Config | `~/Library/Application Support/scout/` | `~/.config/scout/` |
//! | Cache | `~/Library/Caches/scout/` | `~/.cache/scout/` |
//!
//! # Environment Overrides
//!
//! - `SCOUT_CONFIG_DIR` overrides [`config_dir`]
//! - `SCOUT_CACHE_DIR` overrides [`cache_dir`]

use std::ffi::OsString;
use std::path::PathBuf;

/// Config directory, holding `config.toml`.
#[must_use]
pub fn config_dir() -> PathBuf {
    resolve(
        std::env::var_os("SCOUT_CONFIG_DIR"),
        dirs::config_dir(),
        "/tmp/scout-config",
    )
}

/// Cache directory: fetched pages and ranked result lists.
#[must_use]
pub fn cache_dir() -> PathBuf {
    resolve(
        std::env::var_os("SCOUT_CACHE_DIR"),
        dirs::cache_dir(),
        "/tmp/scout-cache",
    )
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

fn resolve(override_dir: Option<OsString>, platform: Option<PathBuf>, fallback: &str) -> PathBuf {
    if let Some(dir) = override_dir.filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    platform
        .map(|d| d.join("scout"))
        .unwrap_or_else(|| PathBuf::from(fallback))
}

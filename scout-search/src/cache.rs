//! On-disk content-addressed cache for page HTML and ranked result lists.
//!
//! Layout under the cache root:
//!
//! ```text
//! <root>/<engine>/<sha256(url)>     raw HTML of fetched pages
//! <root>/pages/<sha256(query)>      ranked result lists
//! ```
//!
//! Entries never expire. Writes go to a temporary sibling file that is then
//! renamed over the target, so readers never observe a partial entry.
//! Concurrent writers to one key race with last-writer-wins semantics.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::types::SearchEngine;

/// Directory name of the result-list scope.
const PAGES_DIR: &str = "pages";

/// A cache namespace that can be cleared independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheScope {
    /// Raw pages fetched on behalf of one engine.
    Engine(SearchEngine),
    /// Ranked result lists keyed by query.
    Pages,
    /// Every scope. Only meaningful for [`ContentCache::clear`].
    All,
}

/// Content-addressed key/value store rooted at a directory.
#[derive(Debug, Clone)]
pub struct ContentCache {
    root: PathBuf,
}

impl ContentCache {
    /// Create a cache rooted at `root`. Directories are created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of this cache.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up the entry stored for `identity`.
    ///
    /// Missing entries return `None`. Entries that cannot be read or decoded
    /// are logged and treated as missing.
    pub async fn get<T: DeserializeOwned>(&self, scope: CacheScope, identity: &str) -> Option<T> {
        let path = self.entry_path(scope, identity)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cache entry unreadable");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                tracing::debug!(path = %path.display(), "cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cache entry corrupt");
                None
            }
        }
    }

    /// Store `value` for `identity`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SearchError::Cache`] if the entry cannot be written.
    pub async fn put<T: Serialize>(&self, scope: CacheScope, identity: &str, value: &T) -> Result<()> {
        let Some(path) = self.entry_path(scope, identity) else {
            return Ok(());
        };
        let bytes = serde_json::to_vec(value)
            .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))?;

        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let tmp = path.with_extension(format!("tmp{}", rand::random::<u32>()));
        tokio::fs::write(&tmp, &bytes).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        tracing::trace!(path = %path.display(), bytes = bytes.len(), "cache entry written");
        Ok(())
    }

    /// Remove every entry in `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SearchError::Cache`] if an existing directory cannot
    /// be removed.
    pub async fn clear(&self, scope: CacheScope) -> Result<()> {
        let dirs: Vec<PathBuf> = match scope {
            CacheScope::All => {
                let mut dirs: Vec<PathBuf> = SearchEngine::all()
                    .iter()
                    .map(|engine| self.root.join(engine.cache_dir()))
                    .collect();
                dirs.push(self.root.join(PAGES_DIR));
                dirs
            }
            other => self.scope_dir(other).into_iter().collect(),
        };

        for dir in dirs {
            match tokio::fs::remove_dir_all(&dir).await {
                Ok(()) => tracing::debug!(dir = %dir.display(), "cache scope cleared"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Path of the entry for `identity`, or `None` for [`CacheScope::All`].
    pub fn entry_path(&self, scope: CacheScope, identity: &str) -> Option<PathBuf> {
        self.scope_dir(scope).map(|dir| dir.join(cache_key(identity)))
    }

    fn scope_dir(&self, scope: CacheScope) -> Option<PathBuf> {
        match scope {
            CacheScope::Engine(engine) => Some(self.root.join(engine.cache_dir())),
            CacheScope::Pages => Some(self.root.join(PAGES_DIR)),
            CacheScope::All => None,
        }
    }
}

/// Hex SHA-256 digest of an identity string.
pub fn cache_key(identity: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identity.as_bytes());
    format!("{:x}", hasher.finalize())
}

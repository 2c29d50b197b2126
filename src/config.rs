//! Store configuration.
//!
//! The durable store keeps one file per key under a root directory. By
//! default that root lives in the platform's local data directory, e.g.
//! `~/.local/share/<app>/cache` on Linux.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Sub-directory of the application data dir holding cache entries.
const CACHE_DIR: &str = "cache";

/// Location of a [`FileStore`](crate::store::FileStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    root: PathBuf,
}

impl StoreConfig {
    /// Use an explicit root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        StoreConfig { root: root.into() }
    }

    /// Resolve `<local data dir>/<app_name>/cache`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if `app_name` is empty or the platform
    /// has no local data directory.
    pub fn default_location(app_name: &str) -> Result<Self> {
        if app_name.trim().is_empty() {
            return Err(Error::ConfigError("app name must not be empty".to_string()));
        }

        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| Error::ConfigError("Could not find local data directory".to_string()))?;

        Ok(StoreConfig {
            root: data_dir.join(app_name).join(CACHE_DIR),
        })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

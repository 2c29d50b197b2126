//! In-memory store (thread-safe, async).
//!
//! Uses DashMap for lock-free concurrent access with per-key sharding.
//! Nothing survives the process; use [`FileStore`](super::FileStore) for
//! durable storage.

use super::KeyValueStore;
use crate::error::Result;
use dashmap::DashMap;
use std::sync::Arc;

/// Thread-safe async in-memory store.
///
/// Clones share the same map, so a clone handed to the cache and a clone
/// kept by a test observe the same entries.
///
/// # Example
///
/// ```no_run
/// use volunteer_cache::store::{KeyValueStore, MemoryStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryStore::new();
///
///     store.set_item("accessToken", "\"abc\"".to_string()).await?;
///
///     let value = store.get_item("accessToken").await?;
///     assert!(value.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        MemoryStore {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.clear();
        warn!("⚠ Memory store CLEAR executed - all entries removed!");
    }
}

impl KeyValueStore for MemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self.entries.get(key).map(|entry| entry.value().clone());
        if value.is_some() {
            debug!("✓ Memory GET {} -> HIT", key);
        } else {
            debug!("✓ Memory GET {} -> MISS", key);
        }
        Ok(value)
    }

    async fn set_item(&self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        debug!("✓ Memory SET {}", key);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        debug!("✓ Memory REMOVE {}", key);
        Ok(())
    }

    async fn multi_remove(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.entries.remove(*key);
        }
        debug!("✓ Memory MULTI_REMOVE {} keys", keys.len());
        Ok(())
    }

    async fn contains_key(&self, key: &str) -> Result<bool> {
        Ok(self.entries.contains_key(key))
    }
}

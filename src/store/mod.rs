//! Persistent key-value store adapters.

use crate::error::Result;

pub mod faulty;
pub mod file;
pub mod memory;

pub use faulty::FaultyStore;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Trait for the string-keyed store underneath the cache.
///
/// The cache façade is the only client of a store; it owns the string
/// encoding, the store only moves opaque strings in and out.
/// Implementations: in-memory (tests), file-backed (durable), or any
/// platform store with the same contract.
///
/// **IMPORTANT:** All methods use `&self` instead of `&mut self` to allow concurrent access.
/// Store implementations should use interior mutability or external storage.
///
/// **ASYNC:** All methods are async and must be awaited.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore: Send + Sync + Clone {
    /// Retrieve the stored string for `key`.
    ///
    /// # Returns
    /// - `Ok(Some(text))` - Value present
    /// - `Ok(None)` - Key never set, or removed
    ///
    /// # Errors
    /// Returns `Error::StoreReadError` if the store cannot answer.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Durably store `value` under `key`, replacing any prior value.
    ///
    /// Completes once the value is persisted. On failure the prior value
    /// (or absence) is left in place.
    ///
    /// # Errors
    /// Returns `Error::StoreWriteError` if the write fails.
    async fn set_item(&self, key: &str, value: String) -> Result<()>;

    /// Remove `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    /// Returns `Error::StoreWriteError` if the removal fails.
    async fn remove_item(&self, key: &str) -> Result<()>;

    /// Bulk removal (logout clears the session keys this way).
    ///
    /// Default implementation calls `remove_item()` for each key in order.
    ///
    /// # Errors
    /// Returns the first `Error::StoreWriteError` encountered.
    async fn multi_remove(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.remove_item(key).await?;
        }
        Ok(())
    }

    /// Check if a key holds a value.
    ///
    /// # Errors
    /// Returns `Error::StoreReadError` if the store cannot answer.
    async fn contains_key(&self, key: &str) -> Result<bool> {
        Ok(self.get_item(key).await?.is_some())
    }
}

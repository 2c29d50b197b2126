//! Shareable cache handle.
//!
//! Provides a convenient wrapper around [`Cache`] with Arc for easy sharing.

use crate::cache::Cache;
use crate::error::Result;
use crate::fetch::Fetched;
use crate::observability::CacheObserver;
use crate::store::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

/// Cheap-to-clone handle to one [`Cache`].
///
/// Wraps `Cache` in `Arc` so the API layer, the session and any background
/// refresh can all hold the same façade without external `Arc<Mutex<>>`.
///
/// # Design
///
/// Stores use interior mutability and every `Cache` method takes `&self`,
/// so sharing through `Arc` needs no additional lock.
///
/// # Example
///
/// ```ignore
/// use volunteer_cache::{CacheService, store::MemoryStore};
///
/// let cache = CacheService::new(MemoryStore::new());
///
/// let for_api = cache.clone();
/// let for_session = cache.clone();
/// ```
pub struct CacheService<S: KeyValueStore> {
    cache: Arc<Cache<S>>,
}

impl<S: KeyValueStore> Clone for CacheService<S> {
    fn clone(&self) -> Self {
        CacheService {
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<S: KeyValueStore> From<Cache<S>> for CacheService<S> {
    fn from(cache: Cache<S>) -> Self {
        CacheService {
            cache: Arc::new(cache),
        }
    }
}

impl<S: KeyValueStore> CacheService<S> {
    /// Create a new cache service over the given store.
    pub fn new(store: S) -> Self {
        Cache::new(store).into()
    }

    /// Create a new cache service with a custom observer.
    pub fn with_observer(store: S, observer: Box<dyn CacheObserver>) -> Self {
        Cache::new(store).with_observer(observer).into()
    }

    /// See [`Cache::set`].
    ///
    /// # Errors
    ///
    /// Same as `Cache::set()`.
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
    {
        self.cache.set(key, value).await
    }

    /// See [`Cache::get`].
    ///
    /// # Errors
    ///
    /// Same as `Cache::get()`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.cache.get(key).await
    }

    /// See [`Cache::get_network_first`].
    ///
    /// # Errors
    ///
    /// Same as `Cache::get_network_first()`.
    pub async fn get_network_first<T, E, F>(&self, key: &str, network_call: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        E: std::error::Error + Send + Sync + 'static,
        F: Future<Output = std::result::Result<T, E>>,
    {
        self.cache.get_network_first(key, network_call).await
    }

    /// See [`Cache::fetch`].
    ///
    /// # Errors
    ///
    /// Same as `Cache::fetch()`.
    pub async fn fetch<T, E, F>(&self, key: &str, network_call: F) -> Result<Fetched<T>>
    where
        T: Serialize + DeserializeOwned,
        E: std::error::Error + Send + Sync + 'static,
        F: Future<Output = std::result::Result<T, E>>,
    {
        self.cache.fetch(key, network_call).await
    }

    /// See [`Cache::remove`].
    ///
    /// # Errors
    ///
    /// Same as `Cache::remove()`.
    pub async fn remove(&self, key: &str) -> Result<()> {
        self.cache.remove(key).await
    }

    /// See [`Cache::remove_many`].
    ///
    /// # Errors
    ///
    /// Same as `Cache::remove_many()`.
    pub async fn remove_many(&self, keys: &[&str]) -> Result<()> {
        self.cache.remove_many(keys).await
    }

    /// Get a reference to the underlying cache.
    pub fn cache(&self) -> &Cache<S> {
        &self.cache
    }
}

//! Cache façade - main entry point for cache operations.

use crate::error::{Error, NetworkFailure, Result};
use crate::fetch::Fetched;
use crate::observability::{CacheObserver, NoOpObserver};
use crate::serialization;
use crate::store::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Instant;

/// Core cache façade - owns serialization and the network fallback policy.
///
/// Two access paths:
/// - **Cache-only:** [`get`](Cache::get) / [`set`](Cache::set), used by
///   session bootstrap and login.
/// - **Network-first:** [`get_network_first`](Cache::get_network_first) /
///   [`fetch`](Cache::fetch), used by the API layer for every read.
///
/// The façade is the only writer to its store; callers pick keys and decide
/// when to invalidate, but never write raw strings themselves.
///
/// # Example
///
/// ```ignore
/// use volunteer_cache::{Cache, store::MemoryStore};
///
/// let cache = Cache::new(MemoryStore::new());
/// let events: Vec<Event> = cache
///     .get_network_first("events", api.list_events())
///     .await?;
/// ```
pub struct Cache<S: KeyValueStore> {
    store: S,
    observer: Box<dyn CacheObserver>,
}

impl<S: KeyValueStore> Cache<S> {
    /// Create new cache over the given store.
    pub fn new(store: S) -> Self {
        Cache {
            store,
            observer: Box::new(NoOpObserver),
        }
    }

    /// Set custom observer.
    pub fn with_observer(mut self, observer: Box<dyn CacheObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Serialize `value` and persist it under `key`, replacing any prior value.
    ///
    /// On success a later [`get`](Cache::get) of the same key (absent
    /// intervening writes) returns a value equal to `value`.
    ///
    /// # Errors
    ///
    /// - `Error::SerializationError`: value cannot be encoded; nothing is written
    /// - `Error::StoreWriteError`: the store rejected the write; prior value kept
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
    {
        let timer = Instant::now();

        let text = serialization::encode(key, value)?;
        self.store.set_item(key, text).await?;

        self.observer.on_set(key, timer.elapsed());
        debug!("✓ Cached {} in {:?}", key, timer.elapsed());
        Ok(())
    }

    /// Read and deserialize the value stored under `key`. No side effects.
    ///
    /// # Errors
    ///
    /// - `Error::CacheMiss`: nothing stored under `key`
    /// - `Error::DeserializationError`: stored text is corrupt or has another shape
    /// - `Error::StoreReadError`: the store could not be read
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let timer = Instant::now();

        match self.store.get_item(key).await? {
            Some(text) => {
                let value = serialization::decode(key, &text)?;
                self.observer.on_hit(key, timer.elapsed());
                Ok(value)
            }
            None => {
                self.observer.on_miss(key, timer.elapsed());
                Err(Error::CacheMiss {
                    key: key.to_string(),
                })
            }
        }
    }

    /// Network-first read with cache fallback.
    ///
    /// 1. Await `network_call`.
    /// 2. On success, write the value through to the cache (best-effort) and return it.
    /// 3. On failure, return the value cached under `key`.
    ///
    /// A failed write-through is logged and reported to the observer; it never
    /// fails the call. No retries, and no de-duplication of concurrent calls
    /// for the same key (last completed write wins).
    ///
    /// # Errors
    ///
    /// Returns `Error::FallbackExhausted` when the network call fails and the
    /// cache cannot serve `key` (miss, corrupt entry, or store read fault).
    /// Both causes are kept on the error.
    pub async fn get_network_first<T, E, F>(&self, key: &str, network_call: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        E: std::error::Error + Send + Sync + 'static,
        F: Future<Output = std::result::Result<T, E>>,
    {
        self.fetch(key, network_call).await.map(Fetched::into_inner)
    }

    /// Same as [`get_network_first`](Cache::get_network_first), but also
    /// reports whether the value came from the network or the cache.
    ///
    /// # Errors
    ///
    /// Same as `get_network_first()`.
    pub async fn fetch<T, E, F>(&self, key: &str, network_call: F) -> Result<Fetched<T>>
    where
        T: Serialize + DeserializeOwned,
        E: std::error::Error + Send + Sync + 'static,
        F: Future<Output = std::result::Result<T, E>>,
    {
        let timer = Instant::now();
        debug!("» Network-first read for key: {}", key);

        match network_call.await {
            Ok(value) => {
                self.observer.on_network_success(key, timer.elapsed());

                if let Err(e) = self.set(key, &value).await {
                    self.report_write_through_failure(key, &e);
                }

                Ok(Fetched::from_network(value))
            }
            Err(network_error) => {
                let network = NetworkFailure::new(network_error);
                warn!(
                    "Network read for {} failed ({}), falling back to cache",
                    key, network
                );

                match self.get::<T>(key).await {
                    Ok(value) => {
                        self.observer.on_fallback_hit(key, &network);
                        info!("✓ Served {} from cache after network failure", key);
                        Ok(Fetched::from_cache(value))
                    }
                    Err(cache_error) => {
                        let error = Error::FallbackExhausted {
                            key: key.to_string(),
                            network,
                            cache: Box::new(cache_error),
                        };
                        self.observer.on_fallback_exhausted(key, &error);
                        Err(error)
                    }
                }
            }
        }
    }

    /// Remove `key` from the cache. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `Error::StoreWriteError` if the store fails.
    pub async fn remove(&self, key: &str) -> Result<()> {
        self.store.remove_item(key).await?;
        debug!("✓ Removed {}", key);
        Ok(())
    }

    /// Remove several keys at once (logout clears the session keys this way).
    ///
    /// # Errors
    ///
    /// Returns `Error::StoreWriteError` if the store fails.
    pub async fn remove_many(&self, keys: &[&str]) -> Result<()> {
        self.store.multi_remove(keys).await?;
        debug!("✓ Removed {} keys", keys.len());
        Ok(())
    }

    /// Check if `key` currently holds a value.
    ///
    /// # Errors
    ///
    /// Returns `Error::StoreReadError` if the store fails.
    pub async fn contains(&self, key: &str) -> Result<bool> {
        self.store.contains_key(key).await
    }

    /// Report a non-fatal failure to persist a freshly obtained value.
    pub(crate) fn report_write_through_failure(&self, key: &str, error: &Error) {
        warn!("Write-through for {} failed, keeping network value: {}", key, error);
        self.observer.on_write_through_failed(key, error);
    }

    /// Get store reference (for advanced use).
    pub fn store(&self) -> &S {
        &self.store
    }
}

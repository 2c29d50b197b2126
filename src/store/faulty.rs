//! Failure-injecting store wrapper for tests.
//!
//! Wraps any [`KeyValueStore`] and fails reads and/or writes on demand, so
//! code built on the cache can be tested against storage faults without a
//! broken disk.
//!
//! ```ignore
//! let store = FaultyStore::new(MemoryStore::new());
//! let cache = Cache::new(store.clone());
//!
//! store.fail_writes(true);
//! // every set_item / remove_item now returns Error::StoreWriteError
//! ```

use super::KeyValueStore;
use crate::error::{Error, Result};
use dashmap::DashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Message carried by injected errors.
pub const INJECTED_FAULT: &str = "injected fault";

/// Store wrapper with switchable read and write failures.
///
/// Clones share the switches and the inner store.
#[derive(Clone)]
pub struct FaultyStore<S: KeyValueStore> {
    inner: S,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    failing_write_keys: Arc<DashSet<String>>,
}

impl<S: KeyValueStore> FaultyStore<S> {
    /// Wrap `inner` with every fault switched off.
    pub fn new(inner: S) -> Self {
        FaultyStore {
            inner,
            fail_reads: Arc::new(AtomicBool::new(false)),
            fail_writes: Arc::new(AtomicBool::new(false)),
            failing_write_keys: Arc::new(DashSet::new()),
        }
    }

    /// Make `get_item` / `contains_key` fail with `StoreReadError`.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make `set_item` / `remove_item` / `multi_remove` fail with `StoreWriteError`.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make writes and removals of `key` alone fail with `StoreWriteError`.
    pub fn fail_writes_for(&self, key: &str, fail: bool) {
        if fail {
            self.failing_write_keys.insert(key.to_string());
        } else {
            self.failing_write_keys.remove(key);
        }
    }

    /// The wrapped store, bypassing injected faults.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn check_read(&self, key: &str) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::StoreReadError {
                key: key.to_string(),
                reason: INJECTED_FAULT.to_string(),
            });
        }
        Ok(())
    }

    fn check_write(&self, key: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) || self.failing_write_keys.contains(key) {
            return Err(Error::StoreWriteError {
                key: key.to_string(),
                reason: INJECTED_FAULT.to_string(),
            });
        }
        Ok(())
    }
}

impl<S: KeyValueStore> KeyValueStore for FaultyStore<S> {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.check_read(key)?;
        self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: String) -> Result<()> {
        self.check_write(key)?;
        self.inner.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.check_write(key)?;
        self.inner.remove_item(key).await
    }

    async fn multi_remove(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.check_write(key)?;
        }
        self.inner.multi_remove(keys).await
    }

    async fn contains_key(&self, key: &str) -> Result<bool> {
        self.check_read(key)?;
        self.inner.contains_key(key).await
    }
}

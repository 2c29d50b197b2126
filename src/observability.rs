//! Diagnostics channel for cache operations.
//!
//! The façade never prints on its own behalf beyond `log` records; anything
//! a caller may want to react to (notably a write-through that failed but did
//! not fail the read) is reported through an injected [`CacheObserver`].
//!
//! # Observers
//!
//! Implement the `CacheObserver` trait to forward cache events to your
//! monitoring system:
//!
//! ```ignore
//! use volunteer_cache::observability::CacheObserver;
//! use volunteer_cache::Error;
//!
//! struct Telemetry;
//!
//! impl CacheObserver for Telemetry {
//!     fn on_write_through_failed(&self, key: &str, error: &Error) {
//!         // counter!("cache_write_through_failures").inc();
//!     }
//!     // ... override the other hooks you care about
//! }
//!
//! // let cache = Cache::new(store).with_observer(Box::new(Telemetry));
//! ```
//!
//! Every hook has a default implementation that logs via the `log` crate.
//! The cache starts with [`NoOpObserver`]; tests usually install a
//! [`RecordingObserver`] and assert on the collected [`CacheEvent`]s.

use crate::error::{Error, NetworkFailure};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Trait for cache event observers.
pub trait CacheObserver: Send + Sync {
    /// A `get` found the key.
    fn on_hit(&self, key: &str, duration: Duration) {
        debug!("Cache HIT: {} took {:?}", key, duration);
    }

    /// A `get` found nothing under the key.
    fn on_miss(&self, key: &str, duration: Duration) {
        debug!("Cache MISS: {} took {:?}", key, duration);
    }

    /// A value was persisted.
    fn on_set(&self, key: &str, duration: Duration) {
        debug!("Cache SET: {} took {:?}", key, duration);
    }

    /// The network call of a network-first read succeeded.
    fn on_network_success(&self, key: &str, duration: Duration) {
        debug!("Network OK: {} took {:?}", key, duration);
    }

    /// The network failed and the cached value was served instead.
    fn on_fallback_hit(&self, key: &str, network_error: &NetworkFailure) {
        debug!("Cache FALLBACK for {} after network error: {}", key, network_error);
    }

    /// The write-through after a successful network read failed.
    ///
    /// Non-fatal: the network value was still returned to the caller.
    fn on_write_through_failed(&self, key: &str, error: &Error) {
        warn!("Write-through FAILED for {}: {}", key, error);
    }

    /// Network and cache both failed.
    fn on_fallback_exhausted(&self, key: &str, error: &Error) {
        warn!("Cache FALLBACK EXHAUSTED for {}: {}", key, error);
    }
}

/// Default observer implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpObserver;

impl CacheObserver for NoOpObserver {
    fn on_hit(&self, _key: &str, _duration: Duration) {}
    fn on_miss(&self, _key: &str, _duration: Duration) {}
    fn on_set(&self, _key: &str, _duration: Duration) {}
    fn on_network_success(&self, _key: &str, _duration: Duration) {}
    fn on_fallback_hit(&self, _key: &str, _network_error: &NetworkFailure) {}
    fn on_write_through_failed(&self, _key: &str, _error: &Error) {}
    fn on_fallback_exhausted(&self, _key: &str, _error: &Error) {}
}

/// Observer that only logs, using the trait defaults.
#[derive(Clone, Default)]
pub struct LogObserver;

impl CacheObserver for LogObserver {}

/// A recorded cache event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheEvent {
    /// `get` found the key.
    Hit { key: String },
    /// `get` found nothing.
    Miss { key: String },
    /// A value was persisted.
    Set { key: String },
    /// A network-first read got its value from the network.
    NetworkSuccess { key: String },
    /// The network failed; the cached value was served.
    FallbackHit { key: String, network_error: String },
    /// Persisting a network value failed; the read still succeeded.
    WriteThroughFailed { key: String, error: String },
    /// Network and cache both failed.
    FallbackExhausted { key: String },
}

/// Observer that keeps every event in memory.
///
/// Clones share the same event list, so keep one clone and hand the other
/// to the cache.
#[derive(Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<CacheEvent>>>,
}

impl RecordingObserver {
    /// Create an observer with no recorded events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events, oldest first.
    pub fn events(&self) -> Vec<CacheEvent> {
        self.lock().clone()
    }

    /// Recorded write-through failures as `(key, error message)`.
    pub fn write_through_failures(&self) -> Vec<(String, String)> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                CacheEvent::WriteThroughFailed { key, error } => Some((key.clone(), error.clone())),
                _ => None,
            })
            .collect()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn record(&self, event: CacheEvent) {
        self.lock().push(event);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CacheEvent>> {
        // A panic while holding the lock cannot leave a Vec half-pushed.
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CacheObserver for RecordingObserver {
    fn on_hit(&self, key: &str, _duration: Duration) {
        self.record(CacheEvent::Hit { key: key.to_string() });
    }

    fn on_miss(&self, key: &str, _duration: Duration) {
        self.record(CacheEvent::Miss { key: key.to_string() });
    }

    fn on_set(&self, key: &str, _duration: Duration) {
        self.record(CacheEvent::Set { key: key.to_string() });
    }

    fn on_network_success(&self, key: &str, _duration: Duration) {
        self.record(CacheEvent::NetworkSuccess { key: key.to_string() });
    }

    fn on_fallback_hit(&self, key: &str, network_error: &NetworkFailure) {
        self.record(CacheEvent::FallbackHit {
            key: key.to_string(),
            network_error: network_error.to_string(),
        });
    }

    fn on_write_through_failed(&self, key: &str, error: &Error) {
        self.record(CacheEvent::WriteThroughFailed {
            key: key.to_string(),
            error: error.to_string(),
        });
    }

    fn on_fallback_exhausted(&self, key: &str, _error: &Error) {
        self.record(CacheEvent::FallbackExhausted { key: key.to_string() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_observer() {
        let observer = NoOpObserver;
        observer.on_hit("key", Duration::from_secs(1));
        observer.on_miss("key", Duration::from_secs(2));
        observer.on_write_through_failed(
            "key",
            &Error::StoreWriteError {
                key: "key".to_string(),
                reason: "disk full".to_string(),
            },
        );
    }

    #[test]
    fn test_recording_observer_shares_events_across_clones() {
        let recorder = RecordingObserver::new();
        let handle = recorder.clone();

        recorder.on_set("events", Duration::ZERO);
        recorder.on_write_through_failed(
            "event-1",
            &Error::StoreWriteError {
                key: "event-1".to_string(),
                reason: "disk full".to_string(),
            },
        );

        assert_eq!(
            handle.events()[0],
            CacheEvent::Set {
                key: "events".to_string()
            }
        );
        let failures = handle.write_through_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "event-1");
        assert!(failures[0].1.contains("disk full"));

        handle.clear();
        assert!(recorder.events().is_empty());
    }
}

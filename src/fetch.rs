//! Where a network-first read was served from.
//!
//! A network-first read ends in exactly one of two ways when it succeeds:
//!
//! ```text
//! Started -> AwaitingNetwork
//!     ├─ NetworkSucceeded -> WritingCache (best-effort) -> Returned   [Source::Network]
//!     └─ NetworkFailed -> AwaitingCache
//!            ├─ CacheHit -> Returned                                   [Source::Cache]
//!            └─ CacheMiss / CacheCorrupt -> Failed                     [Error::FallbackExhausted]
//! ```
//!
//! Staleness is not measured. A [`Source::Cache`] result is the last value
//! written under the key, of unknown age.

use std::fmt;

/// Origin of a value returned by [`Cache::fetch`](crate::Cache::fetch).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Source {
    /// Fresh from the network call.
    Network,
    /// Last-known-good cached value; possibly stale.
    Cache,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Network => write!(f, "Network"),
            Source::Cache => write!(f, "Cache"),
        }
    }
}

/// A value together with its [`Source`].
#[derive(Clone, Debug, PartialEq)]
pub struct Fetched<T> {
    /// The value returned to the caller.
    pub value: T,
    /// Where `value` came from.
    pub source: Source,
}

impl<T> Fetched<T> {
    /// Value fresh from the network.
    pub fn from_network(value: T) -> Self {
        Fetched {
            value,
            source: Source::Network,
        }
    }

    /// Value served by the cache fallback.
    pub fn from_cache(value: T) -> Self {
        Fetched {
            value,
            source: Source::Cache,
        }
    }

    /// True when the value came from the cache fallback.
    pub fn is_from_cache(&self) -> bool {
        self.source == Source::Cache
    }

    /// Drop the source and keep the value.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Transform the value, keeping its source.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            value: f(self.value),
            source: self.source,
        }
    }
}

//! Error types for the cache layer.

use std::fmt;
use std::sync::Arc;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the cache layer.
///
/// All cache operations return `Result<T>` where `Result` is defined as `std::result::Result<T, Error>`.
/// Different error variants represent different failure modes:
#[derive(Debug, Clone)]
pub enum Error {
    /// The persistent store failed while reading a key.
    ///
    /// Distinct from [`Error::CacheMiss`]: the store could not answer at all.
    /// Common causes:
    /// - Storage I/O fault
    /// - Permission denied on the store directory
    /// - Stored bytes are not valid UTF-8
    StoreReadError {
        /// Key being read
        key: String,
        /// Underlying failure
        reason: String,
    },

    /// The persistent store failed while writing or removing a key.
    ///
    /// The entry is left at its prior state (or absent).
    /// Common causes:
    /// - Storage I/O fault
    /// - Disk full / quota exceeded
    StoreWriteError {
        /// Key being written
        key: String,
        /// Underlying failure
        reason: String,
    },

    /// Cache miss: the key has no stored value.
    ///
    /// Returned by `get` when the key was never set or has been removed.
    CacheMiss {
        /// Key that was looked up
        key: String,
    },

    /// Serialization failed when encoding a value for storage.
    ///
    /// Nothing is written when this is returned.
    /// Common causes:
    /// - Map keys that are not strings
    /// - Non-finite floats, which do not survive a JSON round trip
    SerializationError {
        /// Key the value was destined for
        key: String,
        /// Encoder message
        reason: String,
    },

    /// Deserialization failed when decoding a stored string.
    ///
    /// This indicates corrupted or foreign data under the key, or a stored
    /// shape that no longer matches the requested type.
    DeserializationError {
        /// Key whose value could not be decoded
        key: String,
        /// Decoder message
        reason: String,
    },

    /// Both the network call and the cache fallback failed.
    ///
    /// Only raised by `get_network_first` / `fetch`. Both causes are kept.
    FallbackExhausted {
        /// Key that was requested
        key: String,
        /// The failure that triggered the fallback
        network: NetworkFailure,
        /// Why the cache could not serve the key
        cache: Box<Error>,
    },

    /// Configuration error while setting up a store.
    ///
    /// Common causes:
    /// - No platform data directory
    /// - Store root cannot be created
    ConfigError(String),
}

impl Error {
    /// True for [`Error::CacheMiss`].
    pub fn is_cache_miss(&self) -> bool {
        matches!(self, Error::CacheMiss { .. })
    }

    /// True when a stored value exists but cannot be decoded.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Error::DeserializationError { .. })
    }

    /// Key the error refers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Error::StoreReadError { key, .. }
            | Error::StoreWriteError { key, .. }
            | Error::CacheMiss { key }
            | Error::SerializationError { key, .. }
            | Error::DeserializationError { key, .. }
            | Error::FallbackExhausted { key, .. } => Some(key),
            Error::ConfigError(_) => None,
        }
    }

    /// Network cause of a [`Error::FallbackExhausted`].
    pub fn network_error(&self) -> Option<&NetworkFailure> {
        match self {
            Error::FallbackExhausted { network, .. } => Some(network),
            _ => None,
        }
    }

    /// Cache cause of a [`Error::FallbackExhausted`].
    pub fn cache_error(&self) -> Option<&Error> {
        match self {
            Error::FallbackExhausted { cache, .. } => Some(cache),
            _ => None,
        }
    }

    /// Downcast the network cause to the caller's concrete error type.
    pub fn network_error_as<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.network_error().and_then(NetworkFailure::downcast_ref)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::StoreReadError { key, reason } => {
                write!(f, "Store read error for \"{}\": {}", key, reason)
            }
            Error::StoreWriteError { key, reason } => {
                write!(f, "Store write error for \"{}\": {}", key, reason)
            }
            Error::CacheMiss { key } => write!(f, "Key \"{}\" not in cache", key),
            Error::SerializationError { key, reason } => {
                write!(f, "Serialization error for \"{}\": {}", key, reason)
            }
            Error::DeserializationError { key, reason } => {
                write!(f, "Deserialization error for \"{}\": {}", key, reason)
            }
            Error::FallbackExhausted {
                key,
                network,
                cache,
            } => write!(
                f,
                "Network and cache both failed for \"{}\": network: {}; cache: {}",
                key, network, cache
            ),
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FallbackExhausted { network, .. } => Some(network.inner()),
            _ => None,
        }
    }
}

/// Type-erased network failure carried by [`Error::FallbackExhausted`].
///
/// Cloning is cheap; the original error stays reachable through
/// [`NetworkFailure::downcast_ref`].
#[derive(Clone)]
pub struct NetworkFailure(Arc<dyn std::error::Error + Send + Sync>);

impl NetworkFailure {
    /// Wrap a network error.
    pub fn new<E: std::error::Error + Send + Sync + 'static>(error: E) -> Self {
        NetworkFailure(Arc::new(error))
    }

    /// Borrow the wrapped error.
    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.0.as_ref()
    }

    /// Attempt to view the wrapped error as `E`.
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        let inner: &(dyn std::error::Error + 'static) = self.0.as_ref();
        inner.downcast_ref::<E>()
    }
}

impl fmt::Debug for NetworkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NetworkFailure").field(&self.0).finish()
    }
}

impl fmt::Display for NetworkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

//! JSON-based cache serialization.
//!
//! Every cache entry is stored as the JSON text of the application value,
//! with no envelope around it. This keeps entries readable by any other
//! client of the same store and matches what the backend sends over the wire.
//!
//! # Guarantees
//!
//! - **Deterministic:** Same value always produces identical text
//! - **Lossless:** `encode` refuses values whose JSON form does not decode
//!   back into the same type (e.g. a non-finite `f64`, which JSON writes as `null`)
//! - **Keyed errors:** Both directions report the cache key they were working on
//!
//! # Example
//!
//! ```rust
//! use volunteer_cache::serialization::{encode, decode};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Position {
//!     latitude: f64,
//!     longitude: f64,
//! }
//!
//! # fn main() -> volunteer_cache::Result<()> {
//! let pos = Position { latitude: -27.59, longitude: -48.55 };
//!
//! let text = encode("position", &pos)?;
//! let back: Position = decode("position", &text)?;
//! assert_eq!(pos, back);
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode a value to its stored string form.
///
/// The encoded text is decoded once more before being returned, so a value
/// that JSON cannot represent faithfully is rejected here instead of being
/// written and failing on the next read.
///
/// # Errors
///
/// Returns `Error::SerializationError` if the value cannot be encoded or does
/// not survive the round trip.
pub fn encode<T>(key: &str, value: &T) -> Result<String>
where
    T: Serialize + DeserializeOwned,
{
    let text = serde_json::to_string(value).map_err(|e| {
        log::error!("Cache serialization failed for {}: {}", key, e);
        Error::SerializationError {
            key: key.to_string(),
            reason: e.to_string(),
        }
    })?;

    if let Err(e) = serde_json::from_str::<T>(&text) {
        log::error!("Encoded value for {} does not decode back: {}", key, e);
        return Err(Error::SerializationError {
            key: key.to_string(),
            reason: format!("value does not survive a JSON round trip: {}", e),
        });
    }

    Ok(text)
}

/// Decode a stored string back into a value.
///
/// # Errors
///
/// Returns `Error::DeserializationError` if the text is not valid JSON or
/// does not match the shape of `T`.
pub fn decode<T: DeserializeOwned>(key: &str, text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| {
        log::error!("Cache deserialization failed for {}: {}", key, e);
        Error::DeserializationError {
            key: key.to_string(),
            reason: e.to_string(),
        }
    })
}

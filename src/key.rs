//! Cache keys used by the application.
//!
//! The key space is flat: each semantic identity maps to exactly one entry,
//! and writing a key replaces its previous value.

/// Current session user record.
pub const USER_INFO: &str = "userInfo";

/// Session access token.
pub const ACCESS_TOKEN: &str = "accessToken";

/// Full event list.
pub const EVENTS: &str = "events";

/// Prefix of single-event keys.
pub const EVENT_PREFIX: &str = "event-";

/// Keys cleared on logout.
pub const SESSION_KEYS: [&str; 2] = [USER_INFO, ACCESS_TOKEN];

/// Key of a single event record: `"event-<id>"`.
pub fn event_key(event_id: &str) -> String {
    format!("{}{}", EVENT_PREFIX, event_id)
}

/// Inverse of [`event_key`].
pub fn event_id_from_key(key: &str) -> Option<&str> {
    key.strip_prefix(EVENT_PREFIX)
}

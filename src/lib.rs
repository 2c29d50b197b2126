//! # volunteer-cache
//!
//! Offline-tolerant client cache for the volunteer events app.
//!
//! ## Features
//!
//! - **Network first:** Reads try the backend, write the fresh value through
//!   to the cache, and fall back to the last stored value when offline
//! - **Typed values:** Any `serde` type is stored as plain JSON text
//! - **Store agnostic:** In-memory, file-backed, or any custom [`KeyValueStore`]
//! - **Non-fatal write-through:** A failed cache write never fails a read
//!   that the network already answered; it goes to the [`CacheObserver`]
//! - **Both causes kept:** When network and cache both fail, the error carries
//!   each cause
//!
//! ## Quick Start
//!
//! ```ignore
//! use volunteer_cache::{
//!     CacheService, StoreConfig,
//!     api::CachedEventsApi,
//!     store::FileStore,
//! };
//!
//! // 1. Open the durable store
//! let store = FileStore::open(StoreConfig::default_location("volunteer-app")?).await?;
//!
//! // 2. Share one cache between the API layer and the session
//! let cache = CacheService::new(store);
//! let api = CachedEventsApi::new(http_client, cache.clone());
//!
//! // 3. App start: restore the session without the network
//! if let Some(session) = api.session().restore().await? {
//!     println!("Welcome back {}", session.user.email);
//! }
//!
//! // 4. Reads survive going offline
//! let events = api.events_with_source().await?;
//! if events.is_from_cache() {
//!     println!("Showing saved events");
//! }
//! ```
//!
//! ### Lower-level use
//!
//! ```ignore
//! use volunteer_cache::{Cache, store::MemoryStore};
//!
//! let cache = Cache::new(MemoryStore::new());
//! cache.set("accessToken", &token).await?;
//! let token: String = cache.get("accessToken").await?;
//! ```

#[macro_use]
extern crate log;

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod key;
pub mod observability;
pub mod serialization;
pub mod service;
pub mod session;
pub mod store;

// Re-exports for convenience
pub use cache::Cache;
pub use config::StoreConfig;
pub use error::{Error, NetworkFailure, Result};
pub use fetch::{Fetched, Source};
pub use observability::CacheObserver;
pub use service::CacheService;
pub use session::{Session, StoredSession};
pub use store::KeyValueStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

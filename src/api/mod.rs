//! Events backend client and its cached consumer.
//!
//! [`EventsApi`] is the raw backend (HTTP in the app, fakes in tests).
//! [`CachedEventsApi`] routes every read through the cache's network-first
//! path, so screens keep working on the last known data while offline.

pub mod models;

pub use models::{AuthResponse, Event, NewEvent, Position, User};

use crate::error::Result;
use crate::fetch::Fetched;
use crate::key::{event_key, EVENTS};
use crate::service::CacheService;
use crate::session::Session;
use crate::store::KeyValueStore;

/// Trait for the events backend.
///
/// Every call is a single request; retries and timeouts belong to the
/// implementation.
#[allow(async_fn_in_trait)]
pub trait EventsApi: Send + Sync {
    /// Transport or backend failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// `GET /events`
    async fn list_events(&self) -> std::result::Result<Vec<Event>, Self::Error>;

    /// `GET /events/{id}`
    async fn get_event(&self, event_id: &str) -> std::result::Result<Event, Self::Error>;

    /// `POST /login`
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> std::result::Result<AuthResponse, Self::Error>;

    /// `POST /events/{id}/apply`
    async fn apply_to_event(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> std::result::Result<(), Self::Error>;

    /// `POST /events`
    async fn create_event(&self, event: &NewEvent) -> std::result::Result<Event, Self::Error>;
}

/// Backend client with offline fallback on reads.
///
/// Reads go network-first and write through to the cache. Writes (apply,
/// create) always hit the backend and are never queued.
///
/// # Example
///
/// ```ignore
/// use volunteer_cache::{CacheService, api::CachedEventsApi, store::FileStore};
///
/// let cache = CacheService::new(FileStore::open(config).await?);
/// let api = CachedEventsApi::new(http_client, cache);
///
/// let events = api.events().await?; // fresh, or last known when offline
/// ```
pub struct CachedEventsApi<A: EventsApi, S: KeyValueStore> {
    api: A,
    cache: CacheService<S>,
    session: Session<S>,
}

impl<A: EventsApi, S: KeyValueStore> CachedEventsApi<A, S> {
    /// Wrap `api`, caching reads and the session in `cache`.
    pub fn new(api: A, cache: CacheService<S>) -> Self {
        let session = Session::new(cache.clone());
        CachedEventsApi {
            api,
            cache,
            session,
        }
    }

    /// Event list, network first.
    ///
    /// # Errors
    ///
    /// Returns `Error::FallbackExhausted` when the backend fails and no
    /// usable list is cached.
    pub async fn events(&self) -> Result<Vec<Event>> {
        self.cache
            .get_network_first(EVENTS, self.api.list_events())
            .await
    }

    /// Event list with its origin, so the UI can mark stale data.
    ///
    /// # Errors
    ///
    /// Same as `events()`.
    pub async fn events_with_source(&self) -> Result<Fetched<Vec<Event>>> {
        self.cache.fetch(EVENTS, self.api.list_events()).await
    }

    /// Single event, network first, cached under `event-{id}`.
    ///
    /// # Errors
    ///
    /// Returns `Error::FallbackExhausted` when the backend fails and the
    /// event was never cached.
    pub async fn event(&self, event_id: &str) -> Result<Event> {
        self.cache
            .get_network_first(&event_key(event_id), self.api.get_event(event_id))
            .await
    }

    /// Single event with its origin.
    ///
    /// # Errors
    ///
    /// Same as `event()`.
    pub async fn event_with_source(&self, event_id: &str) -> Result<Fetched<Event>> {
        self.cache
            .fetch(&event_key(event_id), self.api.get_event(event_id))
            .await
    }

    /// Log in against the backend and remember the session.
    ///
    /// Never answered from cache. Failing to persist the session is reported
    /// to the cache observer and does not fail the login.
    ///
    /// # Errors
    ///
    /// Backend errors are returned unchanged.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> std::result::Result<AuthResponse, A::Error> {
        let auth = self.api.authenticate(email, password).await?;

        if let Err(e) = self.session.persist(&auth).await {
            let key = e.key().unwrap_or(crate::key::USER_INFO).to_string();
            self.cache.cache().report_write_through_failure(&key, &e);
        }

        Ok(auth)
    }

    /// Apply `user_id` to an event. Not cached; refresh with `event()`.
    ///
    /// # Errors
    ///
    /// Backend errors are returned unchanged.
    pub async fn apply_to_event(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> std::result::Result<(), A::Error> {
        self.api.apply_to_event(event_id, user_id).await?;
        debug!("✓ User {} applied to event {}", user_id, event_id);
        Ok(())
    }

    /// Create an event. Not cached.
    ///
    /// # Errors
    ///
    /// Backend errors are returned unchanged.
    pub async fn create_event(&self, event: &NewEvent) -> std::result::Result<Event, A::Error> {
        let created = self.api.create_event(event).await?;
        debug!("✓ Created event {}", created.id);
        Ok(created)
    }

    /// Session stored in the same cache.
    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    /// Shared cache handle.
    pub fn cache(&self) -> &CacheService<S> {
        &self.cache
    }

    /// The wrapped backend client.
    pub fn api(&self) -> &A {
        &self.api
    }
}

//! Offline usage walkthrough: login, browse, lose the network, keep browsing.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use volunteer_cache::api::{AuthResponse, CachedEventsApi, Event, EventsApi, NewEvent, Position, User};
use volunteer_cache::observability::LogObserver;
use volunteer_cache::store::FileStore;
use volunteer_cache::{CacheService, Result, StoreConfig};

#[derive(Debug)]
struct Unreachable;

impl fmt::Display for Unreachable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connection refused")
    }
}

impl std::error::Error for Unreachable {}

/// Mock backend with a network switch
#[derive(Clone)]
struct MockBackend {
    online: Arc<AtomicBool>,
}

impl MockBackend {
    fn check(&self, route: &str) -> std::result::Result<(), Unreachable> {
        println!("  [HTTP] {}", route);
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Unreachable)
        }
    }
}

fn beach_cleanup() -> Event {
    Event {
        id: "evt_001".to_string(),
        name: "Beach cleanup".to_string(),
        description: "Bring gloves and sunscreen".to_string(),
        date_time: "2026-11-07T08:00:00.000Z".to_string(),
        image_url: None,
        organizer_id: "usr_042".to_string(),
        volunteers_needed: 12,
        volunteers_ids: vec!["usr_007".to_string()],
        position: Position {
            latitude: -27.5949,
            longitude: -48.5482,
        },
    }
}

impl EventsApi for MockBackend {
    type Error = Unreachable;

    async fn list_events(&self) -> std::result::Result<Vec<Event>, Unreachable> {
        self.check("GET /events")?;
        Ok(vec![beach_cleanup()])
    }

    async fn get_event(&self, event_id: &str) -> std::result::Result<Event, Unreachable> {
        self.check(&format!("GET /events/{}", event_id))?;
        Ok(beach_cleanup())
    }

    async fn authenticate(
        &self,
        email: &str,
        _password: &str,
    ) -> std::result::Result<AuthResponse, Unreachable> {
        self.check("POST /login")?;
        Ok(AuthResponse {
            user: User {
                id: "usr_001".to_string(),
                email: email.to_string(),
                name: Some("Ana".to_string()),
                mobile: None,
            },
            access_token: "demo-token".to_string(),
        })
    }

    async fn apply_to_event(
        &self,
        event_id: &str,
        _user_id: &str,
    ) -> std::result::Result<(), Unreachable> {
        self.check(&format!("POST /events/{}/apply", event_id))
    }

    async fn create_event(&self, _event: &NewEvent) -> std::result::Result<Event, Unreachable> {
        self.check("POST /events")?;
        Ok(beach_cleanup())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .try_init()
        .ok();

    println!("\n=== Volunteer Cache - Offline Example ===\n");

    // 1. Open the durable store in a scratch directory
    let root = std::env::temp_dir().join("volunteer-cache-demo");
    let store = FileStore::open(StoreConfig::new(&root)).await?;
    let backend = MockBackend {
        online: Arc::new(AtomicBool::new(true)),
    };
    let api = CachedEventsApi::new(
        backend.clone(),
        CacheService::with_observer(store, Box::new(LogObserver)),
    );
    println!("1. Store ready at {}\n", root.display());

    // 2. Login while online
    println!("2. Login:");
    match api.authenticate("ana@example.com", "secret").await {
        Ok(auth) => println!("   ✓ Logged in as {}\n", auth.user.email),
        Err(e) => println!("   ✗ Login failed: {}\n", e),
    }

    // 3. Browse while online
    println!("3. Browse events (online):");
    let events = api.events_with_source().await?;
    println!("   ✓ {} events from {}\n", events.value.len(), events.source);

    // 4. Lose the network
    backend.online.store(false, Ordering::SeqCst);
    println!("4. Browse events (offline):");
    let events = api.events_with_source().await?;
    println!("   ✓ {} events from {}\n", events.value.len(), events.source);

    // 5. Never-fetched data cannot be served
    println!("5. Unknown event (offline):");
    match api.event("evt_999").await {
        Ok(event) => println!("   ? Unexpected: {}\n", event.name),
        Err(e) => println!("   ✓ {}\n", e),
    }

    // 6. Logout
    api.session().logout().await?;
    println!("6. Logged out, session restored: {:?}", api.session().restore_valid().await?);

    println!("\n=== Example Complete ===\n");
    Ok(())
}

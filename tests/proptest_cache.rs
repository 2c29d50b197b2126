//! Property-based tests for the cache façade.
//!
//! # Properties Tested
//!
//! 1. **Roundtrip Property**: get(k) after set(k, x) == x for ANY x and k
//! 2. **Last Writer Wins**: set(k, a); set(k, b) leaves b
//! 3. **Write-through Property**: a successful network read is then served from cache
//! 4. **Determinism Property**: encode(x) == encode(x) always

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use volunteer_cache::serialization::encode;
use volunteer_cache::store::MemoryStore;
use volunteer_cache::Cache;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Record {
    id: u64,
    name: String,
    tags: Vec<String>,
    score: f64,
    active: bool,
    counts: BTreeMap<String, i64>,
    note: Option<String>,
}

#[derive(Debug)]
struct Offline;

impl fmt::Display for Offline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "network unreachable")
    }
}

impl std::error::Error for Offline {}

// ============================================================================
// Arbitrary Implementations
// ============================================================================

/// Finite floats only; NaN and infinities are rejected by `set`.
fn arb_record() -> impl Strategy<Value = Record> {
    (
        any::<u64>(),
        any::<String>(),
        prop::collection::vec(any::<String>(), 0..8),
        prop::num::f64::NORMAL | prop::num::f64::ZERO | prop::num::f64::SUBNORMAL,
        any::<bool>(),
        prop::collection::btree_map(any::<String>(), any::<i64>(), 0..5),
        prop::option::of(any::<String>()),
    )
        .prop_map(|(id, name, tags, score, active, counts, note)| Record {
            id,
            name,
            tags,
            score,
            active,
            counts,
            note,
        })
}

fn arb_key() -> impl Strategy<Value = String> {
    any::<String>()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to create Tokio runtime")
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: For any record and key, get returns what set stored
    #[test]
    fn prop_set_get_roundtrip(key in arb_key(), record in arb_record()) {
        let read: Record = runtime().block_on(async {
            let cache = Cache::new(MemoryStore::new());
            cache.set(&key, &record).await.expect("Set should succeed for finite values");
            cache.get(&key).await.expect("Get should hit after set")
        });

        prop_assert_eq!(read, record);
    }

    /// Property: The second of two sequential writes is the one read back
    #[test]
    fn prop_last_writer_wins(key in arb_key(), first in arb_record(), second in arb_record()) {
        let read: Record = runtime().block_on(async {
            let cache = Cache::new(MemoryStore::new());
            cache.set(&key, &first).await.expect("Set should succeed");
            cache.set(&key, &second).await.expect("Set should succeed");
            cache.get(&key).await.expect("Get should hit")
        });

        prop_assert_eq!(read, second);
    }

    /// Property: A network value is later served from cache when offline
    #[test]
    fn prop_write_through_then_fallback(key in arb_key(), record in arb_record()) {
        let (fresh, fallback): (Record, Record) = runtime().block_on(async {
            let cache = Cache::new(MemoryStore::new());
            let value = record.clone();
            let fresh = cache
                .get_network_first(&key, async move { Ok::<_, Offline>(value) })
                .await
                .expect("Network read should succeed");
            let fallback = cache
                .get_network_first(&key, async { Err::<Record, _>(Offline) })
                .await
                .expect("Fallback should hit");
            (fresh, fallback)
        });

        prop_assert_eq!(&fresh, &record);
        prop_assert_eq!(fallback, record);
    }

    /// Property: Encoding the same value twice produces identical text
    #[test]
    fn prop_encode_determinism(record in arb_record()) {
        let text1 = encode("k", &record).expect("Encoding should succeed");
        let text2 = encode("k", &record).expect("Encoding should succeed");

        prop_assert_eq!(text1, text2, "Encoding must be deterministic");
    }
}

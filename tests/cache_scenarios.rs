//! Integration Tests for the public cache API
//!
//! Drives `PriorityCache` only through its public surface, the way an
//! embedding application would.

use std::sync::Once;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, TimeZone, Utc};
use priority_cache::{
    shared, spawn_purge_task, CacheConfig, CacheError, PriorityCache, SetOutcome,
};

// == Helper Functions ==

static TRACING: Once = Once::new();

/// Routes cache logs to the test output; filter with RUST_LOG.
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "priority_cache=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

fn far_future() -> DateTime<Utc> {
    DateTime::<Utc>::MAX_UTC
}

fn past() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap()
}

// == Eviction Scenarios ==

#[test]
fn test_lowest_priority_is_evicted() {
    init_tracing();
    let mut cache = PriorityCache::new(3);
    assert!(cache.set("a", "1", 1, far_future()));
    assert!(cache.set("b", "2", 2, far_future()));
    assert!(cache.set("c", "3", 3, far_future()));
    assert!(cache.set("d", "4", 4, far_future()));

    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.get("d"), Some("4"));
    assert_eq!(cache.get("b"), Some("2"));
    assert_eq!(cache.get("c"), Some("3"));
}

#[test]
fn test_least_recently_used_within_priority_is_evicted() {
    init_tracing();
    let mut cache = PriorityCache::new(3);
    cache.set("x", "1", 1, far_future());
    cache.set("y", "2", 1, far_future());
    cache.set("z", "3", 1, far_future());
    cache.get("x");

    assert!(cache.set("w", "4", 1, far_future()));

    assert!(!cache.contains_key("y"));
    assert_eq!(cache.get("x"), Some("1"));
    assert_eq!(cache.get("z"), Some("3"));
    assert_eq!(cache.get("w"), Some("4"));
}

#[test]
fn test_expired_entry_is_reclaimed_first() {
    init_tracing();
    let mut cache = PriorityCache::new(1);
    cache.set("old", "v", 1, past());

    assert!(cache.set("new", "v2", 1, far_future()));

    assert_eq!(cache.get("old"), None);
    assert_eq!(cache.get("new"), Some("v2"));
    assert_eq!(cache.stats().expired_evictions, 1);
}

#[test]
fn test_zero_capacity_rejects_everything() {
    init_tracing();
    let mut cache = PriorityCache::new(0);

    assert!(!cache.set("k", "v", 1, far_future()));
    assert_eq!(cache.get("k"), None);
    assert!(cache.is_empty());
}

#[test]
fn test_priority_level_survives_repeated_evictions() {
    init_tracing();
    let mut cache = PriorityCache::new(4);
    cache.set("low1", "v", 1, far_future());
    cache.set("low2", "v", 1, far_future());
    cache.set("low3", "v", 1, far_future());
    cache.set("high", "v", 9, far_future());

    // Each insert takes one member of level 1, oldest first
    cache.set("n1", "v", 5, far_future());
    assert!(!cache.contains_key("low1"));
    cache.set("n2", "v", 5, far_future());
    assert!(!cache.contains_key("low2"));
    cache.set("n3", "v", 5, far_future());
    assert!(!cache.contains_key("low3"));

    // Level 1 is gone; level 5 is now lowest
    cache.set("n4", "v", 5, far_future());
    assert!(!cache.contains_key("n1"));
    assert!(cache.contains_key("high"));
}

// == Expiry Behaviour ==

#[test]
fn test_expiry_boundary_via_explicit_clock() {
    let now = Utc::now();
    let expiry = now + Duration::seconds(30);
    let mut cache = PriorityCache::new(2);
    cache.set_at("k", "v", 1, expiry, now);

    assert_eq!(cache.get_at("k", expiry - Duration::milliseconds(1)), Some("v"));
    assert_eq!(cache.get_at("k", expiry), None);
    assert_eq!(cache.get_at("k", expiry + Duration::seconds(1)), None);
}

#[test]
fn test_expired_entry_lingers_until_purged() {
    let mut cache = PriorityCache::new(2);
    cache.set("stale", "v", 1, past());

    assert_eq!(cache.get("stale"), None);
    assert!(cache.contains_key("stale"));

    assert_eq!(cache.purge_expired(), 1);
    assert!(!cache.contains_key("stale"));
}

#[test]
fn test_update_can_revive_expired_entry() {
    let mut cache = PriorityCache::new(2);
    cache.set("k", "old", 1, past());

    assert_eq!(
        cache.try_set("k", "new", 1, far_future()),
        Ok(SetOutcome::Updated)
    );
    assert_eq!(cache.get("k"), Some("new"));
}

// == Capacity And Config ==

#[test]
fn test_size_never_exceeds_capacity() {
    let mut cache = PriorityCache::new(5);
    for i in 0..100 {
        assert!(cache.set(format!("key_{}", i), "v", i % 7, far_future()));
        assert!(cache.len() <= 5);
    }
    assert_eq!(cache.stats().evictions(), 95);
}

#[test]
fn test_try_set_reports_zero_capacity() {
    let mut cache = PriorityCache::from_config(&CacheConfig {
        max_entries: 0,
        ..CacheConfig::default()
    });

    assert_eq!(
        cache.try_set("k", "v", 1, far_future()),
        Err(CacheError::ZeroCapacity)
    );
    assert_eq!(cache.stats().rejected_inserts, 1);
}

// == Shared Host ==

#[tokio::test]
async fn test_shared_cache_with_purge_task() {
    init_tracing();
    let cache = shared(PriorityCache::new(10));
    let handle = spawn_purge_task(cache.clone(), StdDuration::from_millis(25));

    {
        let mut guard = cache.write().await;
        guard.set("short", "v", 1, Utc::now() + Duration::milliseconds(50));
        guard.set("long", "v", 1, far_future());
    }

    tokio::time::sleep(StdDuration::from_millis(300)).await;

    {
        let mut guard = cache.write().await;
        assert!(!guard.contains_key("short"));
        assert_eq!(guard.get("long"), Some("v"));
    }

    handle.abort();
}

//! Expiry Purge Task
//!
//! Background task that periodically removes expired cache entries from a
//! shared cache.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::PriorityCache;

/// A cache shared between tasks. Every `set`, `get` and purge takes the
/// write lock, since all of them can reorder the cache's internal state.
pub type SharedCache = Arc<RwLock<PriorityCache>>;

/// Wraps a cache for shared use.
pub fn shared(cache: PriorityCache) -> SharedCache {
    Arc::new(RwLock::new(cache))
}

/// Spawns a background task that periodically purges expired cache entries.
///
/// The task runs until aborted, sleeping for `interval` between runs and
/// holding the write lock only while purging.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let cache = shared(PriorityCache::new(1000));
/// let purge_handle = spawn_purge_task(cache.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// purge_handle.abort();
/// ```
pub fn spawn_purge_task(cache: SharedCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting expiry purge task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.purge_expired()
            };

            if removed > 0 {
                info!("Expiry purge: removed {} expired entries", removed);
            } else {
                debug!("Expiry purge: no expired entries found");
            }
        }
    })
}

//! Priority Cache - An in-memory cache with three eviction pressures
//!
//! Entries are bounded by a fixed capacity, expire at an absolute instant and
//! carry a priority. When a new key arrives at a full cache, an already
//! expired entry is reclaimed first; otherwise the least recently used entry
//! of the lowest priority is evicted.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{CacheStats, PriorityCache, SetOutcome};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use tasks::{shared, spawn_purge_task, SharedCache};

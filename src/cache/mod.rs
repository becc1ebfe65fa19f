//! Cache Module
//!
//! Provides an in-memory cache with capacity, TTL and priority-based LRU
//! eviction.

mod entry;
mod expiry;
mod heap;
mod priority;
mod recency;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, EntryArena, EntryId};
pub use expiry::ExpiryOrder;
pub use heap::IndexedHeap;
pub use priority::PriorityIndex;
pub use recency::RecencyList;
pub use stats::CacheStats;
pub use store::{PriorityCache, SetOutcome};

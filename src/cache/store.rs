//! Cache Store Module
//!
//! Main cache engine binding a key index to the priority and expiry orderings
//! and enforcing the capacity bound.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, trace, warn};

use crate::cache::{CacheEntry, CacheStats, EntryArena, EntryId, ExpiryOrder, PriorityIndex};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

/// What a successful `try_set` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// A new key was stored
    Inserted,
    /// An existing key was updated in place
    Updated,
}

// == Priority Cache ==
/// Fixed-capacity cache with expiry-first, then lowest-priority LRU eviction.
///
/// Every live entry is held once in each of the key index, the priority
/// index and the expiry order. Expired entries are not removed by `get`;
/// they stay until eviction, `purge_expired` or `remove` takes them out.
///
/// The cache does no locking of its own. Hosts sharing it across tasks wrap
/// it in a lock, see [`crate::tasks::SharedCache`].
#[derive(Debug)]
pub struct PriorityCache {
    /// Entry storage addressed by handle
    entries: EntryArena,
    /// Key -> handle lookup
    index: HashMap<String, EntryId>,
    /// Priority levels with per-level recency
    priorities: PriorityIndex,
    /// Soonest-to-expire ordering
    expiries: ExpiryOrder,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_size: usize,
}

impl PriorityCache {
    // == Constructor ==
    /// Creates a cache holding at most `max_size` entries.
    ///
    /// A cache of size zero rejects every insert.
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: EntryArena::new(),
            index: HashMap::new(),
            priorities: PriorityIndex::new(),
            expiries: ExpiryOrder::new(),
            stats: CacheStats::new(),
            max_size,
        }
    }

    /// Creates a cache sized from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_entries)
    }

    // == Set ==
    /// Stores `value` under `key`, returning false if it could not be stored.
    ///
    /// See [`PriorityCache::try_set`] for the failure reasons.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        priority: i64,
        expiry: DateTime<Utc>,
    ) -> bool {
        self.set_at(key, value, priority, expiry, Utc::now())
    }

    /// `set` evaluated at an explicit instant.
    pub fn set_at(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        priority: i64,
        expiry: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool {
        self.try_set_at(key, value, priority, expiry, now).is_ok()
    }

    /// Stores `value` under `key`.
    ///
    /// An existing key is updated in place and becomes the most recently used
    /// entry of its (possibly new) priority level; this always succeeds.
    /// A new key arriving at a full cache first evicts one entry: the soonest
    /// expiring one if it has already expired, otherwise the least recently
    /// used entry of the lowest priority.
    ///
    /// # Errors
    /// - `ZeroCapacity` if the cache was built with `max_size == 0`
    /// - `CapacityExhausted` if the cache is full and nothing could be evicted
    pub fn try_set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        priority: i64,
        expiry: DateTime<Utc>,
    ) -> Result<SetOutcome> {
        self.try_set_at(key, value, priority, expiry, Utc::now())
    }

    /// `try_set` evaluated at an explicit instant.
    pub fn try_set_at(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        priority: i64,
        expiry: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<SetOutcome> {
        let key = key.into();
        let value = value.into();

        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.entries.get_mut(id) {
                entry.value = value;
                if entry.priority != priority {
                    entry.priority = priority;
                    self.priorities.reassign_priority(id, priority);
                }
                if entry.expiry != expiry {
                    entry.expiry = expiry;
                    self.expiries.update_expiry(id, expiry);
                }
                self.priorities.touch(id);
                trace!("Updated '{}' (priority={}, expiry={})", key, priority, expiry);
                return Ok(SetOutcome::Updated);
            }
        }

        if self.max_size == 0 {
            self.stats.record_rejected_insert();
            debug!("Rejected '{}': cache has zero capacity", key);
            return Err(CacheError::ZeroCapacity);
        }

        if self.index.len() >= self.max_size && !self.evict_one(now) {
            self.stats.record_rejected_insert();
            warn!(
                "Cache full with {} entries and no eviction candidate for '{}'",
                self.index.len(),
                key
            );
            return Err(CacheError::CapacityExhausted(format!(
                "no entry could be evicted to store '{}'",
                key
            )));
        }

        let id = self
            .entries
            .insert(CacheEntry::new(key.clone(), value, priority, expiry));
        self.expiries.insert(id, expiry);
        self.priorities.insert(id, priority);
        self.index.insert(key, id);
        self.stats.set_total_entries(self.index.len());
        Ok(SetOutcome::Inserted)
    }

    // == Get ==
    /// Retrieves the value for `key` if present and not expired.
    ///
    /// A hit makes the entry the most recently used of its level. An expired
    /// entry reads as absent but is left in place.
    pub fn get(&mut self, key: &str) -> Option<&str> {
        self.get_at(key, Utc::now())
    }

    /// `get` evaluated at an explicit instant.
    pub fn get_at(&mut self, key: &str, now: DateTime<Utc>) -> Option<&str> {
        let live = self
            .index
            .get(key)
            .copied()
            .filter(|&id| self.entries.get(id).is_some_and(|e| !e.is_expired_at(now)));

        let Some(id) = live else {
            self.stats.record_miss();
            return None;
        };

        self.priorities.touch(id);
        self.stats.record_hit();
        self.entries.get(id).map(CacheEntry::value)
    }

    // == Remove ==
    /// Removes `key`, returning its value even if it had expired.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let id = *self.index.get(key)?;
        let entry = self.detach(id)?;
        self.stats.set_total_entries(self.index.len());
        Some(entry.value)
    }

    // == Purge Expired ==
    /// Removes every entry that has expired, returning how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    /// `purge_expired` evaluated at an explicit instant.
    pub fn purge_expired_at(&mut self, now: DateTime<Utc>) -> usize {
        let mut removed = 0;
        while let Some(id) = self.expiries.pop_expired(now) {
            if let Some(entry) = self.detach(id) {
                trace!("Purged expired entry '{}'", entry.key());
                self.stats.record_expired_eviction();
                removed += 1;
            }
        }
        self.stats.set_total_entries(self.index.len());
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }

    /// True if `key` is stored, whether or not it has expired.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Eviction ==
    /// Frees one slot: an already expired entry if the soonest expiry has
    /// passed, otherwise the lowest-priority least recently used entry.
    fn evict_one(&mut self, now: DateTime<Utc>) -> bool {
        if let Some(id) = self.expiries.pop_expired(now) {
            if let Some(entry) = self.detach(id) {
                debug!("Evicted expired entry '{}'", entry.key());
                self.stats.record_expired_eviction();
                return true;
            }
        }

        if let Some(id) = self.priorities.evict_from_lowest_priority() {
            if let Some(entry) = self.detach(id) {
                debug!(
                    "Evicted '{}' with lowest priority {}",
                    entry.key(),
                    entry.priority()
                );
                self.stats.record_priority_eviction();
                return true;
            }
        }

        false
    }

    /// Takes an entry out of every structure. Removal from a structure the
    /// entry was already popped from is a no-op.
    fn detach(&mut self, id: EntryId) -> Option<CacheEntry> {
        self.priorities.remove(id);
        self.expiries.remove(id);
        let entry = self.entries.remove(id)?;
        self.index.remove(entry.key());
        Some(entry)
    }

    /// Checks that all four structures agree. Test-only.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let sizes_match = self.index.len() == self.entries.len()
            && self.index.len() == self.priorities.len()
            && self.index.len() == self.expiries.len();
        let entries_match = self.index.iter().all(|(key, &id)| {
            self.entries.get(id).is_some_and(|entry| {
                entry.key() == key.as_str()
                    && self.priorities.priority_of(id) == Some(entry.priority())
                    && self.expiries.expiry_of(id) == Some(entry.expiry())
            })
        });
        sizes_match
            && entries_match
            && self.index.len() <= self.max_size
            && self.priorities.is_consistent()
            && self.expiries.is_consistent()
    }

    /// Keys of one priority level, most recently used first. Test-only.
    #[cfg(test)]
    pub(crate) fn recency_keys(&self, priority: i64) -> Vec<String> {
        self.priorities
            .recency_order(priority)
            .into_iter()
            .filter_map(|id| self.entries.get(id).map(|e| e.key().to_string()))
            .collect()
    }
}

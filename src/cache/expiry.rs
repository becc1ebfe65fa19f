//! Expiry Order Module
//!
//! Orders entries by absolute expiry so the soonest-to-expire entry is always
//! at hand.

use chrono::{DateTime, Utc};

use crate::cache::heap::IndexedHeap;
use crate::cache::EntryId;

// == Expiry Order ==
/// Min-heap of entries keyed by expiry instant.
///
/// Ties between equal expiries break arbitrarily.
#[derive(Debug, Default)]
pub struct ExpiryOrder {
    heap: IndexedHeap<EntryId, DateTime<Utc>>,
}

impl ExpiryOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks a new entry.
    pub fn insert(&mut self, id: EntryId, expiry: DateTime<Utc>) {
        self.heap.push(id, expiry);
    }

    /// Entry with the earliest expiry, without removing it.
    pub fn peek_soonest(&self) -> Option<(EntryId, DateTime<Utc>)> {
        self.heap.peek()
    }

    /// Removes and returns the entry with the earliest expiry.
    pub fn pop_soonest(&mut self) -> Option<(EntryId, DateTime<Utc>)> {
        self.heap.pop()
    }

    /// Pops the soonest entry only if it is expired at `now`.
    pub fn pop_expired(&mut self, now: DateTime<Utc>) -> Option<EntryId> {
        match self.peek_soonest() {
            Some((_, expiry)) if now >= expiry => self.pop_soonest().map(|(id, _)| id),
            _ => None,
        }
    }

    /// Moves an entry to its new expiry position.
    ///
    /// Returns false if the entry is not tracked.
    pub fn update_expiry(&mut self, id: EntryId, expiry: DateTime<Utc>) -> bool {
        self.heap.update(id, expiry)
    }

    /// Removes an arbitrary entry, e.g. one evicted by priority.
    pub fn remove(&mut self, id: EntryId) -> bool {
        self.heap.remove(id).is_some()
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, id: EntryId) -> bool {
        self.heap.contains(&id)
    }

    pub fn expiry_of(&self, id: EntryId) -> Option<DateTime<Utc>> {
        self.heap.get(&id)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.heap.is_consistent()
    }
}

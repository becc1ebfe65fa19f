//! Cache Entry Module
//!
//! Defines individual cache entries and the arena that owns them. Every other
//! structure refers to an entry through its `EntryId`.

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// A single stored key with its value, priority and absolute expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    key: String,
    pub(crate) value: String,
    pub(crate) priority: i64,
    pub(crate) expiry: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry.
    pub fn new(key: String, value: String, priority: i64, expiry: DateTime<Utc>) -> Self {
        Self {
            key,
            value,
            priority,
            expiry,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Lower values are evicted first.
    pub fn priority(&self) -> i64 {
        self.priority
    }

    pub fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: the entry is dead from its expiry instant onward,
    /// so `now == expiry` counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiry
    }
}

// == Entry Handle ==
/// Stable handle to an entry stored in an `EntryArena`.
///
/// The generation guards against reuse: once a slot is freed, handles minted
/// for its previous occupant no longer resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId {
    index: u32,
    generation: u32,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    entry: Option<CacheEntry>,
}

// == Entry Arena ==
/// Owns every live `CacheEntry`, addressed by `EntryId`.
///
/// Freed slots go on a free list and are reused by later inserts.
#[derive(Debug, Default)]
pub struct EntryArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl EntryArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an entry and returns its handle.
    pub fn insert(&mut self, entry: CacheEntry) -> EntryId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            return EntryId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entry: Some(entry),
        });
        EntryId {
            index,
            generation: 0,
        }
    }

    pub fn get(&self, id: EntryId) -> Option<&CacheEntry> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut CacheEntry> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_mut())
    }

    /// Takes the entry out of the arena and frees its slot.
    ///
    /// Returns `None` for a stale or unknown handle.
    pub fn remove(&mut self, id: EntryId) -> Option<CacheEntry> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(entry)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

//! Priority Index Module
//!
//! Groups entries into priority levels, each with its own recency list, and
//! keeps a min-heap of the levels that currently hold entries.

use std::collections::HashMap;

use crate::cache::heap::IndexedHeap;
use crate::cache::recency::RecencyList;
use crate::cache::EntryId;

// == Priority Index ==
/// Chooses eviction victims: lowest priority first, then least recently used.
///
/// A priority is in `active_levels` exactly when `levels` holds a non-empty
/// list for it, and appears there once no matter how many entries share it.
#[derive(Debug, Default)]
pub struct PriorityIndex {
    levels: HashMap<i64, RecencyList>,
    active_levels: IndexedHeap<i64, i64>,
    /// Current level of every indexed entry
    membership: HashMap<EntryId, i64>,
}

impl PriorityIndex {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Insert ==
    /// Adds an entry as the most recently used member of its level, opening
    /// the level if it does not exist yet.
    ///
    /// An entry that is already indexed is reassigned instead.
    pub fn insert(&mut self, id: EntryId, priority: i64) {
        if self.membership.contains_key(&id) {
            self.reassign_priority(id, priority);
            return;
        }
        self.levels
            .entry(priority)
            .or_insert_with(|| {
                self.active_levels.push(priority, priority);
                RecencyList::new()
            })
            .push_front(id);
        self.membership.insert(id, priority);
    }

    // == Touch ==
    /// Marks an entry as the most recently used of its level.
    pub fn touch(&mut self, id: EntryId) -> bool {
        let Some(priority) = self.membership.get(&id) else {
            return false;
        };
        self.levels
            .get_mut(priority)
            .is_some_and(|level| level.move_to_front(id))
    }

    // == Reassign Priority ==
    /// Moves an entry to another level, retiring its old level if that leaves
    /// it empty. The entry lands as most recently used of the new level.
    pub fn reassign_priority(&mut self, id: EntryId, priority: i64) -> bool {
        if self.membership.get(&id) == Some(&priority) {
            return self.touch(id);
        }
        if !self.remove(id) {
            return false;
        }
        self.insert(id, priority);
        true
    }

    // == Remove ==
    /// Removes an entry from its level. An emptied level is discarded and its
    /// priority leaves the active heap.
    pub fn remove(&mut self, id: EntryId) -> bool {
        let Some(priority) = self.membership.remove(&id) else {
            return false;
        };
        let Some(level) = self.levels.get_mut(&priority) else {
            return false;
        };
        let removed = level.remove(id);
        if level.is_empty() {
            self.levels.remove(&priority);
            self.active_levels.remove(priority);
        }
        removed
    }

    // == Evict From Lowest Priority ==
    /// Removes and returns the least recently used entry of the lowest
    /// populated priority.
    ///
    /// The active heap is only peeked here; a level leaves it through `remove`
    /// once its last member is gone, so a level with other members stays the
    /// minimum for the next eviction.
    pub fn evict_from_lowest_priority(&mut self) -> Option<EntryId> {
        let (lowest, _) = self.active_levels.peek()?;
        let victim = self.levels.get(&lowest)?.peek_back()?;
        self.remove(victim);
        Some(victim)
    }

    /// Lowest priority that currently has entries.
    #[cfg(test)]
    pub(crate) fn lowest_priority(&self) -> Option<i64> {
        self.active_levels.peek().map(|(priority, _)| priority)
    }

    pub fn priority_of(&self, id: EntryId) -> Option<i64> {
        self.membership.get(&id).copied()
    }

    #[cfg(test)]
    pub(crate) fn is_active(&self, priority: i64) -> bool {
        self.active_levels.contains(&priority)
    }

    /// Number of entries at `priority`.
    #[cfg(test)]
    pub(crate) fn level_len(&self, priority: i64) -> usize {
        self.levels.get(&priority).map_or(0, RecencyList::len)
    }

    /// Number of distinct populated priorities.
    #[cfg(test)]
    pub(crate) fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Entries of one level, most recently used first.
    pub fn recency_order(&self, priority: i64) -> Vec<EntryId> {
        self.levels
            .get(&priority)
            .map(|level| level.iter().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.membership.len()
    }

    pub fn is_empty(&self) -> bool {
        self.membership.is_empty()
    }

    /// Checks the level/heap/membership coupling. Test-only.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let levels_match_heap = self.levels.len() == self.active_levels.len()
            && self
                .levels
                .iter()
                .all(|(priority, level)| !level.is_empty() && self.active_levels.contains(priority));
        let members_listed = self.membership.iter().all(|(id, priority)| {
            self.levels
                .get(priority)
                .is_some_and(|level| level.contains(*id))
        });
        let sizes_match =
            self.levels.values().map(RecencyList::len).sum::<usize>() == self.membership.len();
        levels_match_heap && members_listed && sizes_match && self.active_levels.is_consistent()
    }
}

//! Recency List Module
//!
//! Least Recently Used ordering for the entries of one priority level.

use std::collections::HashMap;

use crate::cache::EntryId;

#[derive(Debug, Clone, Copy)]
struct Link {
    /// Neighbour toward the front (more recently used)
    prev: Option<EntryId>,
    /// Neighbour toward the back (less recently used)
    next: Option<EntryId>,
}

// == Recency List ==
/// Doubly linked list of entry handles, linked through a handle -> link map.
///
/// - Front = Most recently used
/// - Back = Least recently used
///
/// All operations are O(1).
#[derive(Debug, Default)]
pub struct RecencyList {
    links: HashMap<EntryId, Link>,
    front: Option<EntryId>,
    back: Option<EntryId>,
}

impl RecencyList {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Push Front ==
    /// Adds an entry at the most recently used end.
    ///
    /// An entry already in the list is moved there instead.
    pub fn push_front(&mut self, id: EntryId) {
        if self.links.contains_key(&id) {
            self.move_to_front(id);
            return;
        }
        let link = Link {
            prev: None,
            next: self.front,
        };
        match self.front.and_then(|old_front| self.links.get_mut(&old_front)) {
            Some(old_front) => old_front.prev = Some(id),
            None => self.back = Some(id),
        }
        self.links.insert(id, link);
        self.front = Some(id);
    }

    // == Move To Front ==
    /// Marks an entry as most recently used. Returns false if it is not listed.
    pub fn move_to_front(&mut self, id: EntryId) -> bool {
        if !self.unlink(id) {
            return false;
        }
        self.push_front(id);
        true
    }

    // == Remove ==
    /// Removes an entry from the list.
    pub fn remove(&mut self, id: EntryId) -> bool {
        self.unlink(id)
    }

    // == Pop Back ==
    /// Returns and removes the least recently used entry.
    #[cfg(test)]
    pub(crate) fn pop_back(&mut self) -> Option<EntryId> {
        let id = self.back?;
        self.unlink(id);
        Some(id)
    }

    /// The least recently used entry, without removing it.
    pub fn peek_back(&self) -> Option<EntryId> {
        self.back
    }

    #[cfg(test)]
    pub(crate) fn peek_front(&self) -> Option<EntryId> {
        self.front
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.links.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Iterates from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = EntryId> + '_ {
        std::iter::successors(self.front, move |id| {
            self.links.get(id).and_then(|link| link.next)
        })
    }

    fn unlink(&mut self, id: EntryId) -> bool {
        let Some(link) = self.links.remove(&id) else {
            return false;
        };
        match link.prev.and_then(|prev| self.links.get_mut(&prev)) {
            Some(prev) => prev.next = link.next,
            None => self.front = link.next,
        }
        match link.next.and_then(|next| self.links.get_mut(&next)) {
            Some(next) => next.prev = link.prev,
            None => self.back = link.prev,
        }
        true
    }
}

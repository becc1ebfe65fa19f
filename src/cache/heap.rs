//! Indexed Heap Module
//!
//! Binary min-heap that tracks where each key sits, so any key (not just the
//! minimum) can be re-prioritised or removed in O(log n).

use std::collections::HashMap;
use std::hash::Hash;

// == Indexed Heap ==
/// Min-heap of `(priority, key)` pairs with a key -> slot position map.
///
/// Each key appears at most once. The position map is rewritten on every
/// swap, so it always points at the key's current slot.
#[derive(Debug)]
pub struct IndexedHeap<K, P> {
    items: Vec<(P, K)>,
    positions: HashMap<K, usize>,
}

impl<K, P> Default for IndexedHeap<K, P> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<K, P> IndexedHeap<K, P>
where
    K: Hash + Eq + Copy,
    P: Ord + Copy,
{
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Push ==
    /// Adds `key` with `priority`.
    ///
    /// A key that is already present is re-prioritised in place instead of
    /// being added twice.
    pub fn push(&mut self, key: K, priority: P) {
        if self.positions.contains_key(&key) {
            self.update(key, priority);
            return;
        }
        let pos = self.items.len();
        self.items.push((priority, key));
        self.positions.insert(key, pos);
        self.sift_up(pos);
    }

    // == Peek ==
    /// Returns the minimum without removing it.
    pub fn peek(&self) -> Option<(K, P)> {
        self.items.first().map(|&(priority, key)| (key, priority))
    }

    // == Pop ==
    /// Removes and returns the minimum.
    pub fn pop(&mut self) -> Option<(K, P)> {
        let (key, _) = self.peek()?;
        self.remove(key).map(|priority| (key, priority))
    }

    // == Update ==
    /// Changes the priority of a present key and restores heap order from its
    /// current slot. Returns false if the key is not in the heap.
    pub fn update(&mut self, key: K, priority: P) -> bool {
        let Some(&pos) = self.positions.get(&key) else {
            return false;
        };
        let old = self.items[pos].0;
        self.items[pos].0 = priority;
        if priority < old {
            self.sift_up(pos);
        } else {
            self.sift_down(pos);
        }
        true
    }

    // == Remove ==
    /// Removes an arbitrary key, returning its priority.
    pub fn remove(&mut self, key: K) -> Option<P> {
        let pos = self.positions.remove(&key)?;
        let last = self.items.len() - 1;
        if pos != last {
            self.items.swap(pos, last);
            let moved = self.items[pos].1;
            self.positions.insert(moved, pos);
        }
        let (priority, _) = self.items.pop()?;
        if pos < self.items.len() {
            // The element moved into `pos` may belong above or below it
            self.sift_up(pos);
            self.sift_down(pos);
        }
        Some(priority)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.positions.contains_key(key)
    }

    /// Current priority of `key`, if present.
    pub fn get(&self, key: &K) -> Option<P> {
        self.positions.get(key).map(|&pos| self.items[pos].0)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.items[pos].0 >= self.items[parent].0 {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut smallest = pos;
            if left < len && self.items[left].0 < self.items[smallest].0 {
                smallest = left;
            }
            if right < len && self.items[right].0 < self.items[smallest].0 {
                smallest = right;
            }
            if smallest == pos {
                break;
            }
            self.swap(pos, smallest);
            pos = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.items.swap(a, b);
        self.positions.insert(self.items[a].1, a);
        self.positions.insert(self.items[b].1, b);
    }

    /// Checks heap order and position map agreement. Test-only.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        if self.items.len() != self.positions.len() {
            return false;
        }
        self.items.iter().enumerate().all(|(pos, (priority, key))| {
            let parent_ok = pos == 0 || self.items[(pos - 1) / 2].0 <= *priority;
            parent_ok && self.positions.get(key) == Some(&pos)
        })
    }
}

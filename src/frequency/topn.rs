//! Bounded top-N tracking on top of a frequency sketch's per-insert estimate.

use super::heap::IndexedMinHeap;
use std::hash::Hash;

/// Tracks the `n` items with the largest observed estimate, updated
/// incrementally from each insert's resulting count.
///
/// Mirrors the reference protocol exactly: an item already being tracked has
/// its priority updated in place (via the indexed heap's decrease/increase-key,
/// rather than a linear scan plus a full reheapify); a new item is admitted
/// only if the heap has not reached capacity, or if its count exceeds the
/// current minimum tracked count, evicting that minimum.
pub struct TopNTracker<T: Hash + Eq + Clone> {
    n: usize,
    heap: IndexedMinHeap<T>,
}

impl<T: Hash + Eq + Clone> TopNTracker<T> {
    /// Track the `n` most frequent items seen.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            heap: IndexedMinHeap::new(),
        }
    }

    /// Record that `item` now has an updated sketch estimate of `new_min_count`.
    pub fn observe(&mut self, item: T, new_min_count: u64) {
        if self.n == 0 {
            return;
        }
        let heap_full = self.heap.len() >= self.n;

        if self.heap.contains(&item) {
            self.heap.update_key(&item, new_min_count);
            return;
        }

        if !heap_full {
            self.heap.push(new_min_count, item);
            return;
        }

        let Some((min_priority, _)) = self.heap.peek_min() else {
            self.heap.push(new_min_count, item);
            return;
        };
        if new_min_count > min_priority {
            self.heap.push_pop_min(new_min_count, item);
        }
    }

    /// Current number of items being tracked.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether no items are currently tracked.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Capacity this tracker was configured with.
    pub fn capacity(&self) -> usize {
        self.n
    }

    /// Whether `item` is currently among the tracked top-N.
    pub fn contains(&self, item: &T) -> bool {
        self.heap.contains(item)
    }

    /// The `k` most frequent tracked items (or all tracked items, if `k` is
    /// `None` or exceeds capacity), sorted by descending count.
    pub fn most_common(&self, k: Option<usize>) -> Vec<(T, u64)> {
        let limit = k.map(|k| k.min(self.n)).unwrap_or(self.n);
        let mut entries: Vec<(u64, T)> =
            self.heap.iter().map(|(p, k)| (p, k.clone())).collect();
        entries.sort_by(|a, b| b.0.cmp(&a.0));
        entries
            .into_iter()
            .take(limit)
            .map(|(count, item)| (item, count))
            .collect()
    }
}

//! # Cost-Bounded LRU Cache
//!
//! A generic `K -> V` store that bounds the *total cost* of its resident
//! entries rather than their count. Insertion evicts least-recently-used
//! entries until the budget is met; a successful `get` promotes its entry
//! to most-recently-used.
//!
//! ## Design
//!
//! Classic LRU implementations thread the hash map through a doubly
//! linked list of heap-allocated nodes. Rust makes that painful without
//! `unsafe`, so this cache instead keeps entries in a `Vec<Slot<K, V>>`
//! (an arena) and links them by index, with a free list recycling slots
//! vacated by `remove`/eviction. The hash map only ever stores `usize`
//! indices into the arena; `get`/`insert`/`remove` stay O(1) amortized.
//!
//! ## Example
//!
//! ```rust
//! use openscad_mesh::ops::boolean::cache::lru::Cache;
//!
//! let mut cache = Cache::new(100);
//! cache.insert("a", 1, 60);
//! cache.insert("b", 2, 30);
//! assert_eq!(cache.get(&"a"), Some(&1));
//! cache.insert("c", 3, 30); // evicts "b" (LRU), not "a" (just touched)
//! assert!(cache.contains(&"b") == false);
//! assert_eq!(cache.total_cost(), 90);
//! ```

use std::collections::HashMap;
use std::hash::Hash;

const NONE: usize = usize::MAX;

struct Slot<K, V> {
    key: K,
    value: V,
    cost: usize,
    prev: usize,
    next: usize,
}

/// A `K -> V` cache bounded by total entry cost, evicting least-recently
/// used entries on overflow.
pub struct Cache<K, V> {
    index: HashMap<K, usize>,
    slots: Vec<Option<Slot<K, V>>>,
    free: Vec<usize>,
    head: usize, // MRU
    tail: usize, // LRU
    max_cost: usize,
    total_cost: usize,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache with the given total cost budget.
    pub fn new(max_cost: usize) -> Self {
        Self {
            index: HashMap::new(),
            slots: Vec::new(),
            free: Vec::new(),
            head: NONE,
            tail: NONE,
            max_cost,
            total_cost: 0,
        }
    }

    /// Current number of resident entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True if no entries are resident.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Sum of `cost` across all resident entries. Always `<= max_cost`.
    pub fn total_cost(&self) -> usize {
        self.total_cost
    }

    /// The configured cost ceiling.
    pub fn max_cost(&self) -> usize {
        self.max_cost
    }

    /// Changes the cost ceiling, trimming LRU entries immediately if the
    /// new ceiling is lower than the current resident cost.
    pub fn set_max_cost(&mut self, max_cost: usize) {
        self.max_cost = max_cost;
        self.trim_to(max_cost);
    }

    /// Non-mutating membership check; does not affect recency order.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Looks up `key`, promoting it to most-recently-used on hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        Some(&self.slots[idx].as_ref().unwrap().value)
    }

    /// Inserts `key -> value` at the given `cost`.
    ///
    /// Returns `false` (and drops `value`) if `cost` alone exceeds
    /// `max_cost` — the entry can never fit regardless of eviction.
    /// Otherwise evicts LRU entries until there is room, then inserts at
    /// the MRU position. Re-inserting an existing key replaces it.
    pub fn insert(&mut self, key: K, value: V, cost: usize) -> bool {
        if cost > self.max_cost {
            return false;
        }
        self.remove(&key);
        self.trim_to(self.max_cost.saturating_sub(cost));

        let idx = self.alloc_slot(Slot {
            key: key.clone(),
            value,
            cost,
            prev: NONE,
            next: self.head,
        });
        if self.head != NONE {
            self.slots[self.head].as_mut().unwrap().prev = idx;
        }
        self.head = idx;
        if self.tail == NONE {
            self.tail = idx;
        }
        self.index.insert(key, idx);
        self.total_cost += cost;
        true
    }

    /// Removes `key` if present. Returns `true` if an entry was removed.
    pub fn remove(&mut self, key: &K) -> bool {
        self.take(key).is_some()
    }

    /// Removes and returns the value for `key`, if present.
    pub fn take(&mut self, key: &K) -> Option<V> {
        let idx = self.index.remove(key)?;
        self.unlink(idx);
        let slot = self.slots[idx].take().unwrap();
        self.free.push(idx);
        self.total_cost -= slot.cost;
        Some(slot.value)
    }

    /// Drops every entry, resetting total cost to zero.
    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.free.clear();
        self.head = NONE;
        self.tail = NONE;
        self.total_cost = 0;
    }

    /// Evicts LRU entries (tail-first) until resident cost is `<= target`.
    fn trim_to(&mut self, target: usize) {
        while self.total_cost > target && self.tail != NONE {
            let victim = self.tail;
            let key = self.slots[victim].as_ref().unwrap().key.clone();
            self.index.remove(&key);
            self.unlink(victim);
            let slot = self.slots[victim].take().unwrap();
            self.free.push(victim);
            self.total_cost -= slot.cost;
        }
    }

    fn alloc_slot(&mut self, slot: Slot<K, V>) -> usize {
        if let Some(idx) = self.free.pop() {
            self.slots[idx] = Some(slot);
            idx
        } else {
            self.slots.push(Some(slot));
            self.slots.len() - 1
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let slot = self.slots[idx].as_ref().unwrap();
            (slot.prev, slot.next)
        };
        if prev != NONE {
            self.slots[prev].as_mut().unwrap().next = next;
        } else {
            self.head = next;
        }
        if next != NONE {
            self.slots[next].as_mut().unwrap().prev = prev;
        } else {
            self.tail = prev;
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == idx {
            return;
        }
        self.unlink(idx);
        {
            let slot = self.slots[idx].as_mut().unwrap();
            slot.prev = NONE;
            slot.next = self.head;
        }
        if self.head != NONE {
            self.slots[self.head].as_mut().unwrap().prev = idx;
        }
        self.head = idx;
        if self.tail == NONE {
            self.tail = idx;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get_round_trip() {
        let mut cache = Cache::new(100);
        assert!(cache.insert("a", 1, 60));
        assert_eq!(cache.get(&"a"), Some(&1));
    }

    #[test]
    fn cost_never_exceeds_budget() {
        let mut cache = Cache::new(100);
        cache.insert("a", 1, 60);
        cache.insert("b", 2, 30);
        cache.insert("c", 3, 30);
        assert!(cache.total_cost() <= 100);
    }

    #[test]
    fn lru_eviction_spares_recently_touched() {
        // Scenario 4 from the spec's end-to-end properties.
        let mut cache: Cache<&str, i32> = Cache::new(100);
        cache.insert("a", 1, 60);
        cache.insert("b", 2, 30);
        assert_eq!(cache.get(&"a"), Some(&1));
        cache.insert("c", 3, 30);

        assert!(!cache.contains(&"b"));
        assert!(cache.contains(&"a"));
        assert!(cache.contains(&"c"));
        assert_eq!(cache.total_cost(), 90);
    }

    #[test]
    fn cost_over_budget_is_rejected_not_evicting_everything() {
        let mut cache: Cache<&str, i32> = Cache::new(50);
        cache.insert("a", 1, 20);
        assert!(!cache.insert("b", 2, 60));
        assert!(cache.contains(&"a"));
        assert_eq!(cache.total_cost(), 20);
    }

    #[test]
    fn reinsert_replaces_existing_entry() {
        let mut cache = Cache::new(100);
        cache.insert("a", 1, 10);
        cache.insert("a", 2, 10);
        assert_eq!(cache.get(&"a"), Some(&2));
        assert_eq!(cache.total_cost(), 10);
    }

    #[test]
    fn set_max_cost_trims_immediately() {
        let mut cache = Cache::new(100);
        cache.insert("a", 1, 40);
        cache.insert("b", 2, 40);
        cache.set_max_cost(50);
        assert!(cache.total_cost() <= 50);
    }

    #[test]
    fn remove_and_take() {
        let mut cache = Cache::new(100);
        cache.insert("a", 1, 10);
        assert_eq!(cache.take(&"a"), Some(1));
        assert!(!cache.contains(&"a"));
        assert_eq!(cache.total_cost(), 0);
    }

    #[test]
    fn clear_resets_state() {
        let mut cache = Cache::new(100);
        cache.insert("a", 1, 10);
        cache.insert("b", 2, 10);
        cache.clear();
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.total_cost(), 0);
    }

    #[test]
    fn many_insertions_keep_index_consistent() {
        let mut cache: Cache<i32, i32> = Cache::new(1000);
        for i in 0..500 {
            cache.insert(i, i, 1);
        }
        assert_eq!(cache.len(), 500);
        assert_eq!(cache.total_cost(), 500);
        for i in 0..500 {
            assert_eq!(cache.get(&i), Some(&i));
        }
    }
}

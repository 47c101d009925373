//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::Arc;

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Every touch stamps the key with a monotonically increasing tick:
/// - Smallest tick = Least recently used
/// - Largest tick = Most recently used
///
/// Keys are shared with the owning store through `Arc`, so tracking a key
/// never clones the key itself.
#[derive(Debug)]
pub struct LruTracker<K> {
    /// Tick of the last touch, per key
    ticks: HashMap<Arc<K>, u64>,
    /// Keys ordered by last touch
    order: BTreeMap<u64, Arc<K>>,
    /// Next tick to hand out
    clock: u64,
}

impl<K: Hash + Eq> LruTracker<K> {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            ticks: HashMap::new(),
            order: BTreeMap::new(),
            clock: 0,
        }
    }

    // == Touch ==
    /// Marks a key as most recently used.
    ///
    /// If the key is already tracked its previous position is dropped.
    pub fn touch(&mut self, key: &Arc<K>) {
        let tick = self.clock;
        self.clock += 1;

        if let Some(previous) = self.ticks.insert(Arc::clone(key), tick) {
            self.order.remove(&previous);
        }
        self.order.insert(tick, Arc::clone(key));
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &K) {
        if let Some(tick) = self.ticks.remove(key) {
            self.order.remove(&tick);
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<Arc<K>> {
        let (_, key) = self.order.pop_first()?;
        self.ticks.remove(&*key);
        Some(key)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&K> {
        self.order.first_key_value().map(|(_, key)| key.as_ref())
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &K) -> bool {
        self.ticks.contains_key(key)
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.ticks.clear();
        self.order.clear();
    }
}

impl<K: Hash + Eq> Default for LruTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

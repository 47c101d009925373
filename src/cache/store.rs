//! Entry Store Module
//!
//! Bounded key to entry mapping combining HashMap storage with LRU tracking.
//! The store only keeps deadlines; deciding freshness is left to the caller.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use crate::cache::{CacheEntry, LruTracker};

/// An entry pushed out of the store, returned so the caller can account for it.
pub type Evicted<K, V> = (Arc<K>, CacheEntry<V>);

// == Entry Store ==
/// Bounded storage with least-recently-used eviction.
///
/// Recency is refreshed by both [`put`](Self::put) and [`get`](Self::get).
/// Eviction never looks at deadlines, so an unused long-lived entry goes
/// before a short-lived one that was just read.
#[derive(Debug)]
pub struct EntryStore<K, V> {
    /// Key-entry storage
    entries: HashMap<Arc<K>, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker<K>,
    /// Maximum number of entries allowed
    max_elements: usize,
}

impl<K: Hash + Eq, V> EntryStore<K, V> {
    // == Constructor ==
    /// Creates an empty store holding at most `max_elements` entries.
    ///
    /// A capacity of zero is accepted: such a store never holds anything.
    pub fn new(max_elements: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            max_elements,
        }
    }

    // == Get ==
    /// Returns the entry stored for `key` and marks it most recently used.
    ///
    /// The entry itself is left untouched, including its deadline.
    pub fn get(&mut self, key: &K) -> Option<&CacheEntry<V>> {
        let (shared, entry) = self.entries.get_key_value(key)?;
        self.lru.touch(shared);
        Some(entry)
    }

    // == Peek ==
    /// Returns the entry for `key` without affecting recency.
    pub fn peek(&self, key: &K) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    // == Put ==
    /// Inserts or replaces the entry for `key`.
    ///
    /// If the insertion pushes the store over capacity, the least recently
    /// used entry other than the one just written is removed and returned.
    pub fn put(&mut self, key: K, entry: CacheEntry<V>) -> Option<Evicted<K, V>> {
        if self.max_elements == 0 {
            return None;
        }

        let key = Arc::new(key);
        self.entries.insert(Arc::clone(&key), entry);
        self.lru.touch(&key);

        if self.entries.len() > self.max_elements {
            // The new key holds the newest tick, so it cannot be picked here
            let oldest = self.lru.evict_oldest()?;
            let evicted = self.entries.remove(&*oldest)?;
            return Some((oldest, evicted));
        }

        None
    }

    // == Remove ==
    /// Removes the entry for `key`, returning it if present.
    pub fn remove(&mut self, key: &K) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        Some(entry)
    }

    // == Resize ==
    /// Changes the capacity, evicting least recently used entries that no
    /// longer fit.
    pub fn set_capacity(&mut self, max_elements: usize) -> Vec<Evicted<K, V>> {
        self.max_elements = max_elements;

        let mut evicted = Vec::new();
        while self.entries.len() > self.max_elements {
            let Some(oldest) = self.lru.evict_oldest() else {
                break;
            };
            if let Some(entry) = self.entries.remove(&*oldest) {
                evicted.push((oldest, entry));
            }
        }
        evicted
    }

    // == Clear ==
    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    /// Checks whether `key` has an entry, fresh or not.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the configured maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.max_elements
    }
}

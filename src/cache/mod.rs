//! Cache Module
//!
//! Provides call-result caching with TTL expiration and LRU eviction.

mod entry;
mod key;
mod lru;
mod memo;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::{Arguments, CacheKey, OperationId};
pub use lru::LruTracker;
pub use memo::{Lookup, MemoCache};
pub use stats::CacheStats;
pub use store::{EntryStore, Evicted};

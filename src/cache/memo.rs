//! Memoizing Cache Module
//!
//! Turns operation calls into cache keys, applies TTL freshness on read, and
//! computes and stores results on a miss.

use std::any::Any;
use std::convert::Infallible;
use std::future::Future;
use std::mem;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::cache::{Arguments, CacheEntry, CacheKey, CacheStats, EntryStore, OperationId};
use crate::config::MemoizerConfig;

/// Type-erased memoized result, shared so hits clone outside the lock.
type StoredValue = Arc<dyn Any + Send + Sync>;

// == Lookup ==
/// Outcome of reading a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<R> {
    /// A fresh result is stored
    Hit(R),
    /// Nothing usable is stored
    Miss,
    /// A result is stored but its deadline has passed
    Stale,
}

impl<R> Lookup<R> {
    pub fn into_hit(self) -> Option<R> {
        match self {
            Lookup::Hit(value) => Some(value),
            Lookup::Miss | Lookup::Stale => None,
        }
    }
}

#[derive(Debug)]
struct Inner {
    store: EntryStore<CacheKey, StoredValue>,
    stats: CacheStats,
    config: MemoizerConfig,
}

// == Memo Cache ==
/// Call-result cache with LRU eviction and per-entry TTL.
///
/// Safe to share between threads. The lock only guards store reads and
/// writes; computations run unlocked, so two concurrent misses on the same
/// key may both compute and the last write wins.
#[derive(Debug)]
pub struct MemoCache {
    inner: Mutex<Inner>,
}

impl MemoCache {
    // == Constructor ==
    pub fn new(config: MemoizerConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                store: EntryStore::new(config.max_elements),
                stats: CacheStats::new(),
                config,
            }),
        }
    }

    // == Configure ==
    /// Changes capacity and TTL.
    ///
    /// Entries beyond the new capacity are evicted right away. The new TTL
    /// only applies to results stored from now on.
    pub fn configure(&self, max_elements: usize, ttl: Duration) {
        let evicted = {
            let mut inner = self.inner.lock();
            inner.config = MemoizerConfig::new(max_elements, ttl);

            let evicted = inner.store.set_capacity(max_elements);
            for _ in &evicted {
                inner.stats.record_eviction();
            }
            let len = inner.store.len();
            inner.stats.set_total_entries(len);
            evicted
        };

        info!(
            max_elements,
            ttl_ms = ttl.as_millis() as u64,
            evicted = evicted.len(),
            "Memoizer reconfigured"
        );
    }

    /// Returns the active configuration.
    pub fn config(&self) -> MemoizerConfig {
        self.inner.lock().config
    }

    // == Call ==
    /// Returns the memoized result of `operation(arguments)`, running
    /// `compute` only when no fresh result is stored.
    ///
    /// An `Err` from `compute` is handed back unchanged and nothing is
    /// stored. Results of a zero-sized type such as `()` carry no
    /// information and are never cached: `compute` always runs.
    pub fn call<A, R, E, F>(&self, operation: OperationId, arguments: A, compute: F) -> Result<R, E>
    where
        A: Arguments,
        R: Clone + Send + Sync + 'static,
        F: FnOnce() -> Result<R, E>,
    {
        if carries_no_value::<R>() {
            return self.invoke(compute);
        }

        let key = CacheKey::new(operation, arguments);
        if let Some(value) = self.read(&key) {
            return Ok(value);
        }

        let result = compute();
        self.settle(key, result)
    }

    /// Async form of [`call`](Self::call).
    ///
    /// If the returned future is dropped before `compute` resolves, nothing
    /// is stored.
    pub async fn call_async<A, R, E, F, Fut>(
        &self,
        operation: OperationId,
        arguments: A,
        compute: F,
    ) -> Result<R, E>
    where
        A: Arguments,
        R: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        if carries_no_value::<R>() {
            self.inner.lock().stats.record_bypass();
            trace!(%operation, "Forwarding call without a value result");
            return compute().await;
        }

        let key = CacheKey::new(operation, arguments);
        if let Some(value) = self.read(&key) {
            return Ok(value);
        }

        let result = compute().await;
        self.settle(key, result)
    }

    /// [`call`](Self::call) for computations that cannot fail.
    pub fn call_infallible<A, R, F>(&self, operation: OperationId, arguments: A, compute: F) -> R
    where
        A: Arguments,
        R: Clone + Send + Sync + 'static,
        F: FnOnce() -> R,
    {
        match self.call(operation, arguments, || Ok::<R, Infallible>(compute())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    // == Invoke ==
    /// Runs `compute` without looking at or touching the store.
    pub fn invoke<R, E, F>(&self, compute: F) -> Result<R, E>
    where
        F: FnOnce() -> Result<R, E>,
    {
        self.inner.lock().stats.record_bypass();
        compute()
    }

    // == Lookup ==
    /// Reads the stored result of `operation(arguments)` without computing.
    ///
    /// Neither recency nor statistics are affected.
    pub fn lookup<A, R>(&self, operation: OperationId, arguments: A) -> Lookup<R>
    where
        A: Arguments,
        R: Clone + Send + Sync + 'static,
    {
        let key = CacheKey::new(operation, arguments);
        let now = Instant::now();

        let value = {
            let inner = self.inner.lock();
            match inner.store.peek(&key) {
                None => return Lookup::Miss,
                Some(entry) if entry.is_expired_at(now) => return Lookup::Stale,
                Some(entry) => Arc::clone(&entry.value),
            }
        };

        match value.downcast::<R>() {
            Ok(value) => Lookup::Hit((*value).clone()),
            Err(_) => Lookup::Miss,
        }
    }

    /// Drops the stored result of `operation(arguments)`, if any.
    pub fn invalidate<A: Arguments>(&self, operation: OperationId, arguments: A) -> bool {
        let key = CacheKey::new(operation, arguments);
        let mut inner = self.inner.lock();
        let removed = inner.store.remove(&key).is_some();
        let len = inner.store.len();
        inner.stats.set_total_entries(len);
        removed
    }

    /// Drops every stored result.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.store.clear();
        inner.stats.set_total_entries(0);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().store.is_empty()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.store.len());
        stats
    }

    // == Internals ==
    /// Returns the fresh value stored for `key`, recording the outcome.
    fn read<R>(&self, key: &CacheKey) -> Option<R>
    where
        R: Clone + Send + Sync + 'static,
    {
        let now = Instant::now();

        let value = {
            let mut inner = self.inner.lock();
            let Inner { store, stats, .. } = &mut *inner;

            let Some(entry) = store.get(key) else {
                stats.record_miss();
                debug!(?key, "Cache miss");
                return None;
            };
            if entry.is_expired_at(now) {
                stats.record_expiration();
                debug!(?key, "Cache entry stale, recomputing");
                return None;
            }
            if !entry.value.is::<R>() {
                stats.record_miss();
                warn!(?key, "Stored result has another type, recomputing");
                return None;
            }

            stats.record_hit();
            Arc::clone(&entry.value)
        };

        trace!(?key, "Cache hit");
        value.downcast::<R>().ok().map(|value| (*value).clone())
    }

    /// Stores a successful result under `key` and passes `result` through.
    fn settle<R, E>(&self, key: CacheKey, result: Result<R, E>) -> Result<R, E>
    where
        R: Clone + Send + Sync + 'static,
    {
        match result {
            Ok(value) => {
                self.write(key, value.clone());
                Ok(value)
            }
            Err(err) => {
                self.inner.lock().stats.record_failure();
                debug!(?key, "Computation failed, nothing stored");
                Err(err)
            }
        }
    }

    fn write<R>(&self, key: CacheKey, value: R)
    where
        R: Send + Sync + 'static,
    {
        let operation = key.operation();

        let evicted = {
            let mut inner = self.inner.lock();
            let entry = CacheEntry::new(Arc::new(value) as StoredValue, inner.config.ttl());

            let evicted = inner.store.put(key, entry);
            if evicted.is_some() {
                inner.stats.record_eviction();
            }
            let len = inner.store.len();
            inner.stats.set_total_entries(len);
            evicted
        };

        trace!(%operation, "Stored computed result");
        // The evicted value is dropped here, outside the lock
        if let Some((evicted_key, _)) = evicted {
            debug!(key = ?evicted_key, "Evicted least recently used entry");
        }
    }
}

impl Default for MemoCache {
    fn default() -> Self {
        Self::new(MemoizerConfig::default())
    }
}

/// True when `R` has a single possible value, so caching it gains nothing.
fn carries_no_value<R>() -> bool {
    mem::size_of::<R>() == 0
}

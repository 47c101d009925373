//! Memoizer Module
//!
//! The stand-in object: wraps a target and routes its operations through a
//! [`MemoCache`].
//!
//! Rust has no runtime proxies, so interception is an explicit adapter: give
//! the wrapped type's capability trait an implementation for `Memoizer<T>`
//! that forwards each operation into [`Memoizer::call`].
//!
//! ```
//! use memoizer::{op_id, Memoizer};
//!
//! trait Lookup {
//!     fn find(&self, id: u32) -> Result<String, std::io::Error>;
//!     fn log(&self, line: &str);
//! }
//!
//! struct Directory;
//!
//! impl Lookup for Directory {
//!     fn find(&self, id: u32) -> Result<String, std::io::Error> {
//!         Ok(format!("user-{}", id))
//!     }
//!     fn log(&self, _line: &str) {}
//! }
//!
//! impl<T: Lookup> Lookup for Memoizer<T> {
//!     fn find(&self, id: u32) -> Result<String, std::io::Error> {
//!         self.call(op_id!(find), id, |target| target.find(id))
//!     }
//!     fn log(&self, line: &str) {
//!         self.target().log(line)
//!     }
//! }
//!
//! let directory = Memoizer::new(Directory);
//! assert_eq!(directory.find(7).unwrap(), "user-7");
//! assert_eq!(directory.find(7).unwrap(), "user-7");
//! assert_eq!(directory.stats().hits, 1);
//! ```

use std::future::Future;
use std::time::Duration;

use tracing::info;

use crate::cache::{Arguments, CacheStats, MemoCache, OperationId};
use crate::config::MemoizerConfig;

// == Memoizer ==
/// A target paired with the cache that memoizes its operations.
#[derive(Debug)]
pub struct Memoizer<T> {
    target: T,
    cache: MemoCache,
}

impl<T> Memoizer<T> {
    // == Constructors ==
    /// Wraps `target` with the default limits (1024 results, 1000 ms TTL).
    pub fn new(target: T) -> Self {
        Self::with_config(target, MemoizerConfig::default())
    }

    /// Wraps `target` keeping at most `max_elements` results for `ttl` each.
    pub fn with_limits(target: T, max_elements: usize, ttl: Duration) -> Self {
        Self::with_config(target, MemoizerConfig::new(max_elements, ttl))
    }

    pub fn with_config(target: T, config: MemoizerConfig) -> Self {
        info!(
            target_type = std::any::type_name::<T>(),
            max_elements = config.max_elements,
            ttl_ms = config.ttl_ms,
            "Memoizer created"
        );

        Self {
            target,
            cache: MemoCache::new(config),
        }
    }

    // == Forwarding ==
    /// Runs `operation` on the target through the cache.
    ///
    /// `compute` receives the target and performs the real call; its error
    /// is returned unchanged and never cached.
    pub fn call<A, R, E, F>(&self, operation: OperationId, arguments: A, compute: F) -> Result<R, E>
    where
        A: Arguments,
        R: Clone + Send + Sync + 'static,
        F: FnOnce(&T) -> Result<R, E>,
    {
        self.cache.call(operation, arguments, || compute(&self.target))
    }

    /// [`call`](Self::call) for operations that cannot fail.
    pub fn call_infallible<A, R, F>(&self, operation: OperationId, arguments: A, compute: F) -> R
    where
        A: Arguments,
        R: Clone + Send + Sync + 'static,
        F: FnOnce(&T) -> R,
    {
        self.cache
            .call_infallible(operation, arguments, || compute(&self.target))
    }

    /// Async form of [`call`](Self::call).
    pub async fn call_async<'a, A, R, E, F, Fut>(
        &'a self,
        operation: OperationId,
        arguments: A,
        compute: F,
    ) -> Result<R, E>
    where
        A: Arguments,
        R: Clone + Send + Sync + 'static,
        F: FnOnce(&'a T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let target = &self.target;
        self.cache
            .call_async(operation, arguments, move || compute(target))
            .await
    }

    /// Forwards a call to the target without caching.
    pub fn invoke<R, E, F>(&self, compute: F) -> Result<R, E>
    where
        F: FnOnce(&T) -> Result<R, E>,
    {
        self.cache.invoke(|| compute(&self.target))
    }

    // == Accessors ==
    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn cache(&self) -> &MemoCache {
        &self.cache
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Unwraps the target, dropping every memoized result.
    pub fn into_inner(self) -> T {
        self.target
    }
}

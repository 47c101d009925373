//! Memoizer - A transparent call-result cache
//!
//! Wraps a target so that repeated calls with equal arguments reuse a
//! previously computed result, with TTL expiration and LRU eviction.

pub mod cache;
pub mod config;
pub mod error;
pub mod memoizer;
pub mod service;

pub use cache::{Arguments, CacheKey, CacheStats, Lookup, MemoCache, OperationId};
pub use config::MemoizerConfig;
pub use error::{MemoizerError, Result};
pub use memoizer::Memoizer;
pub use service::{MemoizeLayer, MemoizeService};

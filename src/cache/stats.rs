//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Calls answered from a fresh entry
    pub hits: u64,
    /// Calls that had to compute (key absent or entry stale)
    pub misses: u64,
    /// Misses caused by a stale entry, a subset of `misses`
    pub expirations: u64,
    /// Number of entries evicted due to LRU policy
    pub evictions: u64,
    /// Calls forwarded without caching because they return no value
    pub bypassed: u64,
    /// Computations that failed and were not stored
    pub failures: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Records a stale read, which also counts as a miss.
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_bypass(&mut self) {
        self.bypassed += 1;
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.expirations, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.bypassed, 0);
        assert_eq!(stats.failures, 0);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::new();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        assert_eq!(stats.hit_rate(), 1.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_expiration_counts_as_miss() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_expiration();

        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_bypass_and_failure_do_not_affect_hit_rate() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_bypass();
        stats.record_failure();

        assert_eq!(stats.bypassed, 1);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.hit_rate(), 1.0);
    }

    #[test]
    fn test_record_eviction() {
        let mut stats = CacheStats::new();
        stats.record_eviction();
        stats.record_eviction();
        assert_eq!(stats.evictions, 2);
    }

    #[test]
    fn test_stats_serialize() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.set_total_entries(3);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["hits"], 1);
        assert_eq!(json["total_entries"], 3);
        assert_eq!(json["expirations"], 0);
    }
}

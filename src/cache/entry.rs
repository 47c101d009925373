//! Cache Entry Module
//!
//! Defines a single memoized result with a fixed expiration deadline.

use std::time::Duration;

use tokio::time::Instant;

/// Upper bound used when `created_at + ttl` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

// == Cache Entry ==
/// A memoized result together with the instant it stops being fresh.
///
/// Entries are immutable once built. Refreshing a stale result means
/// storing a brand-new entry under the same key.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Instant the entry was created
    pub created_at: Instant,
    /// Instant from which the entry is stale (`created_at + ttl`)
    pub deadline: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry that stays fresh for `ttl` from now.
    pub fn new(value: V, ttl: Duration) -> Self {
        Self::starting_at(value, Instant::now(), ttl)
    }

    /// Creates an entry with an explicit creation instant.
    pub fn starting_at(value: V, created_at: Instant, ttl: Duration) -> Self {
        // Clamp absurd TTLs to a far-future deadline instead of overflowing
        let deadline = created_at
            .checked_add(ttl)
            .or_else(|| created_at.checked_add(FAR_FUTURE))
            .unwrap_or(created_at);

        Self {
            value,
            created_at,
            deadline,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is fresh only while the current time is strictly before its
    /// deadline, so a zero TTL yields an entry that is already stale.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Checks expiration against a given instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    // == Time To Live ==
    /// Returns the remaining freshness window, `Duration::ZERO` once stale.
    pub fn ttl_remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("test_value", Duration::from_secs(60));

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.deadline - entry.created_at, Duration::from_secs(60));
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_zero_ttl_is_immediately_stale() {
        let entry = CacheEntry::new(42u32, Duration::ZERO);

        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining(), Duration::ZERO);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry::starting_at("test", now, Duration::from_millis(10));

        assert!(!entry.is_expired_at(now));
        assert!(!entry.is_expired_at(now + Duration::from_millis(9)));
        // Stale exactly at the deadline
        assert!(entry.is_expired_at(now + Duration::from_millis(10)));
        assert!(entry.is_expired_at(now + Duration::from_millis(11)));
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let entry = CacheEntry::new((), Duration::MAX);
        assert!(!entry.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let entry = CacheEntry::new("test_value", Duration::from_secs(1));
        assert!(!entry.is_expired());

        tokio::time::advance(Duration::from_millis(999)).await;
        assert!(!entry.is_expired());
        assert_eq!(entry.ttl_remaining(), Duration::from_millis(1));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(entry.is_expired());
    }
}

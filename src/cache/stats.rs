//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Entries reclaimed because their expiry had passed
    pub expired_evictions: u64,
    /// Entries evicted as the lowest-priority, least recently used victim
    pub priority_evictions: u64,
    /// Inserts refused for lack of capacity
    pub rejected_inserts: u64,
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
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Evictions from both phases.
    pub fn evictions(&self) -> u64 {
        self.expired_evictions + self.priority_evictions
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expired_eviction(&mut self) {
        self.expired_evictions += 1;
    }

    pub fn record_priority_eviction(&mut self) {
        self.priority_evictions += 1;
    }

    pub fn record_rejected_insert(&mut self) {
        self.rejected_inserts += 1;
    }

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
        assert_eq!(stats.evictions(), 0);
        assert_eq!(stats.rejected_inserts, 0);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::new();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_evictions_sum_both_phases() {
        let mut stats = CacheStats::new();
        stats.record_expired_eviction();
        stats.record_priority_eviction();
        stats.record_priority_eviction();
        assert_eq!(stats.expired_evictions, 1);
        assert_eq!(stats.priority_evictions, 2);
        assert_eq!(stats.evictions(), 3);
    }

    #[test]
    fn test_stats_serialize() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.set_total_entries(4);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["hits"], 1);
        assert_eq!(json["total_entries"], 4);
        assert_eq!(json["priority_evictions"], 0);
    }
}

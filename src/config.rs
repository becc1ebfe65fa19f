//! Configuration Module
//!
//! Loads cache sizing and purge cadence from environment variables.

use std::env;
use std::time::Duration;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Interval in milliseconds between background purges of expired entries
    pub purge_interval_ms: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `CACHE_PURGE_INTERVAL_MS` - Purge frequency in milliseconds (default: 1000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_entries),
            purge_interval_ms: env::var("CACHE_PURGE_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.purge_interval_ms),
        }
    }

    /// Purge interval as a `Duration`.
    pub fn purge_interval(&self) -> Duration {
        Duration::from_millis(self.purge_interval_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            purge_interval_ms: 1000,
        }
    }
}

//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Reasons an insert can be refused.
///
/// Lookups never fail; a missing or expired key is simply `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The cache was built with a capacity of zero and rejects every insert
    #[error("Cache has zero capacity")]
    ZeroCapacity,

    /// The cache is full and neither eviction phase could free a slot
    #[error("Cache full: {0}")]
    CapacityExhausted(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(CacheError::ZeroCapacity.to_string(), "Cache has zero capacity");
        assert_eq!(
            CacheError::CapacityExhausted("no victim for 'k'".to_string()).to_string(),
            "Cache full: no victim for 'k'"
        );
    }
}

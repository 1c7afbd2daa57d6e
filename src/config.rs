//! Resolver configuration

use std::time::Duration;

/// Configuration for config resolution and caching
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Time-to-live for persisted cache entries
    pub ttl: Duration,
    /// Append a millisecond timestamp query parameter to remote fetches
    /// to defeat intermediary HTTP caches
    pub cache_bust: bool,
    /// Revalidate in the background after serving a cached value
    pub background_revalidate: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(8 * 60 * 60), // 8 hours
            cache_bust: true,
            background_revalidate: true,
        }
    }
}

//! No-op route cache for disabled caching.

use super::service::{CacheStats, RouteCache};
use tracing::debug;

/// A route cache that remembers nothing.
///
/// Every lookup misses and every store is discarded. Useful for tests that need
/// deterministic recomputation and for hosts that disable route caching outright.
pub struct NullRouteCache;

impl NullRouteCache {
    pub fn new() -> Self {
        debug!("Using NullRouteCache (route caching disabled)");
        Self
    }
}

impl Default for NullRouteCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteCache for NullRouteCache {
    fn route(&self, _node_id: i32) -> Option<String> {
        None
    }

    fn store(&self, _node_id: i32, _route: &str) {}

    fn clear(&self) {}

    fn stats(&self) -> CacheStats {
        CacheStats::default()
    }
}

//! Sharded in-memory route cache.

use super::service::{CacheStats, RouteCache};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// The shared route cache used in production setups.
///
/// Backed by a sharded concurrent map: reads take no exclusive lock and writers
/// for different keys do not contend. Hit/miss counters are kept locally for
/// [`stats`](RouteCache::stats) and mirrored to the `metrics` recorder.
#[derive(Debug, Default)]
pub struct MemoryRouteCache {
    routes: DashMap<i32, String>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryRouteCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RouteCache for MemoryRouteCache {
    fn route(&self, node_id: i32) -> Option<String> {
        match self.routes.get(&node_id) {
            Some(route) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("route_cache_hits_total").increment(1);
                Some(route.value().clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("route_cache_misses_total").increment(1);
                None
            }
        }
    }

    fn store(&self, node_id: i32, route: &str) {
        self.routes.insert(node_id, route.to_string());
    }

    fn clear(&self) {
        let dropped = self.routes.len();
        self.routes.clear();
        metrics::counter!("route_cache_clears_total").increment(1);
        debug!(dropped, "route cache cleared");
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.routes.len(),
        }
    }
}

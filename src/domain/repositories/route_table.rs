//! Trait over the host framework's route table.

/// A read-only view of the routes the host web framework has registered.
///
/// Consulted during request classification only: a path the framework already
/// routes (controllers, endpoints, health checks) is never a content document.
/// The table is queried, never mutated, from here.
///
/// # Implementations
///
/// - [`crate::infrastructure::routes::PatternRouteTable`] - compiled route
///   patterns
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
pub trait RouteTableSnapshot: Send + Sync {
    /// True when `path` (absolute, leading `/`, lowercased) matches a registered
    /// route.
    fn has_match(&self, path: &str) -> bool;
}

/// A route table with no registered routes.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyRouteTable;

impl RouteTableSnapshot for EmptyRouteTable {
    fn has_match(&self, _path: &str) -> bool {
        false
    }
}

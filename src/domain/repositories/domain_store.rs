//! Store trait for domain assignments.

use crate::domain::entities::SiteDomain;
use crate::error::RoutingError;
use async_trait::async_trait;

/// Read access to the hostname-to-content-node assignments of a multi-site setup.
///
/// Implementations must return assignments in a stable order: the first entry of
/// [`assigned_to_node`](DomainStore::assigned_to_node) is the tie-break when no
/// assignment matches the current request's URL.
///
/// # Implementations
///
/// - [`crate::infrastructure::domains::InMemoryDomainStore`] - insertion-ordered
///   in-memory assignments
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainStore: Send + Sync {
    /// Domains assigned directly to `node_id`, in assignment order.
    ///
    /// Ancestor assignments are *not* included; walking the ancestry is the URL
    /// service's concern.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::DomainStore`] on backing-store failures.
    async fn assigned_to_node(&self, node_id: i32) -> Result<Vec<SiteDomain>, RoutingError>;

    /// The assignment whose name addresses `host`, if any.
    ///
    /// Used by inbound routing to anchor a request path at the matching site
    /// root. Matching is case-insensitive on the host component.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::DomainStore`] on backing-store failures.
    async fn find_by_host(&self, host: &str) -> Result<Option<SiteDomain>, RoutingError>;
}

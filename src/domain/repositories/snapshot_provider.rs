//! Provider trait for the current published content snapshot.

use crate::domain::snapshot::ContentSnapshot;
use crate::error::RoutingError;
use async_trait::async_trait;
use std::sync::Arc;

/// Supplies the current published content tree.
///
/// The snapshot handed out must be stable for the duration of a request even if a
/// republish happens concurrently; implementations achieve this by swapping an
/// `Arc` reference, never by mutating a snapshot in place.
///
/// # Implementations
///
/// - [`crate::infrastructure::content::InMemorySnapshotProvider`] - atomically
///   swapped in-memory snapshot
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// Returns the current published snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::NotReady`] when nothing has been published yet.
    /// Returns [`RoutingError::Store`] on backing-store failures.
    async fn current(&self) -> Result<Arc<ContentSnapshot>, RoutingError>;
}

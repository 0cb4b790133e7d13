//! Atomically swapped in-memory snapshot provider.

use crate::domain::repositories::SnapshotProvider;
use crate::domain::snapshot::ContentSnapshot;
use crate::error::RoutingError;
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Holds the current published snapshot behind an atomic reference swap.
///
/// `publish` replaces the whole tree in one store; readers that already hold an
/// `Arc` keep their view for the rest of their request. Before the first publish
/// (or after [`clear`](InMemorySnapshotProvider::clear)) the provider reports
/// [`RoutingError::NotReady`].
#[derive(Debug, Default)]
pub struct InMemorySnapshotProvider {
    current: ArcSwapOption<ContentSnapshot>,
}

impl InMemorySnapshotProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider with an initial snapshot already published.
    pub fn with_snapshot(snapshot: ContentSnapshot) -> Self {
        let provider = Self::new();
        provider.publish(snapshot);
        provider
    }

    /// Atomically replaces the published tree.
    pub fn publish(&self, snapshot: ContentSnapshot) {
        let nodes = snapshot.len();
        self.current.store(Some(Arc::new(snapshot)));
        info!(nodes, "published new content snapshot");
    }

    /// Drops the published tree, returning the provider to the not-ready state.
    pub fn clear(&self) {
        self.current.store(None);
    }
}

#[async_trait]
impl SnapshotProvider for InMemorySnapshotProvider {
    async fn current(&self) -> Result<Arc<ContentSnapshot>, RoutingError> {
        self.current.load_full().ok_or(RoutingError::NotReady)
    }
}

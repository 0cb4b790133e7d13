//! Content lookup service.

use crate::application::request_context::RequestContext;
use crate::config::RoutingConfig;
use crate::domain::entities::{ContentNode, Route};
use crate::domain::repositories::SnapshotProvider;
use crate::error::RoutingError;
use std::sync::Arc;

/// Resolves content nodes from ids, routes and URL aliases.
///
/// A thin async facade over the snapshot the request resolves against; all the
/// tree logic lives on [`crate::domain::snapshot::ContentSnapshot`]. Absence is
/// always `Ok(None)`, never an error.
pub struct ContentStore<S: SnapshotProvider> {
    snapshots: Arc<S>,
    config: RoutingConfig,
}

impl<S: SnapshotProvider> ContentStore<S> {
    /// Creates a new content store.
    pub fn new(snapshots: Arc<S>, config: RoutingConfig) -> Self {
        Self { snapshots, config }
    }

    /// Looks up any node by id.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::NotReady`] when no snapshot is published yet.
    pub async fn node_by_id(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> Result<Option<ContentNode>, RoutingError> {
        let snapshot = ctx.snapshot(self.snapshots.as_ref()).await?;
        Ok(snapshot.node(id).cloned())
    }

    /// Resolves a route string (`"1234/products/widget"` or `"/products/widget"`)
    /// to a doc node.
    ///
    /// A malformed route (non-numeric root id prefix) resolves to `None`; the
    /// pipeline treats that as "not a document", never as a crash.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::NotReady`] when no snapshot is published yet.
    pub async fn node_by_route(
        &self,
        ctx: &RequestContext,
        route: &str,
    ) -> Result<Option<ContentNode>, RoutingError> {
        let snapshot = ctx.snapshot(self.snapshots.as_ref()).await?;
        let Ok(parsed) = Route::parse(route) else {
            tracing::debug!(route, "malformed route treated as no match");
            return Ok(None);
        };
        Ok(snapshot
            .node_by_route(&parsed, self.config.hide_top_level_node_from_path)
            .cloned())
    }

    /// Resolves a URL alias, optionally restricted to descendants of `root_id`.
    ///
    /// The alias is compared with the legacy page extension stripped, matching
    /// how inbound request paths are cleaned.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::NotReady`] when no snapshot is published yet.
    pub async fn node_by_url_alias(
        &self,
        ctx: &RequestContext,
        root_id: i32,
        alias: &str,
    ) -> Result<Option<ContentNode>, RoutingError> {
        let snapshot = ctx.snapshot(self.snapshots.as_ref()).await?;
        let alias = alias
            .strip_suffix(self.config.legacy_page_extension.as_str())
            .unwrap_or(alias);
        Ok(snapshot.node_by_url_alias(root_id, alias).cloned())
    }

    /// Reads a node attribute (`@id`, `@level`, ...) or named property.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::NotReady`] when no snapshot is published yet.
    pub async fn node_property(
        &self,
        ctx: &RequestContext,
        node: &ContentNode,
        alias: &str,
    ) -> Result<Option<String>, RoutingError> {
        let snapshot = ctx.snapshot(self.snapshots.as_ref()).await?;
        Ok(snapshot.node_property(node, alias))
    }

    /// True when the current snapshot has at least one doc node to serve.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::NotReady`] when no snapshot is published yet.
    pub async fn has_content(&self, ctx: &RequestContext) -> Result<bool, RoutingError> {
        let snapshot = ctx.snapshot(self.snapshots.as_ref()).await?;
        Ok(snapshot.has_content())
    }
}

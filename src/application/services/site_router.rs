//! The routing surface the host pipeline consumes.

use crate::application::request_context::RequestContext;
use crate::application::services::content_store::ContentStore;
use crate::application::services::request_classifier::{
    DocumentRequestClassifier, NotDocumentReason, RequestClassification,
};
use crate::application::services::url_service::UrlService;
use crate::config::RoutingConfig;
use crate::domain::entities::ContentNode;
use crate::domain::repositories::{DomainStore, RouteTableSnapshot, SnapshotProvider};
use crate::error::RoutingError;
use crate::infrastructure::cache::{CacheStats, RouteCache};
use crate::utils::request_path::clean_request_path;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// What to resolve a node from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTarget {
    Id(i32),
    Route(String),
    Alias { root_id: i32, alias: String },
}

/// Outcome of resolving one inbound request against the content tree.
#[derive(Debug, Clone)]
pub enum DocumentResolution {
    /// Not a content request at all; the reason says whose it is.
    NotDocument(NotDocumentReason),
    /// No published tree yet; answer "not ready", not 404.
    NotReady,
    /// A tree is published but holds nothing servable.
    NoContent,
    /// The document the request addresses.
    Found(ContentNode),
    /// A well-formed content request with no matching document.
    NotFound,
}

/// Composes content lookup, URL generation and request classification into the
/// one aggregate the rest of a host pipeline talks to.
///
/// All collaborators are injected at construction; the router holds no global
/// state of its own.
pub struct SiteRouter<S, D, C, T>
where
    S: SnapshotProvider,
    D: DomainStore,
    C: RouteCache,
    T: RouteTableSnapshot,
{
    content: ContentStore<S>,
    urls: UrlService<S, D, C>,
    classifier: DocumentRequestClassifier<T>,
    domains: Arc<D>,
    config: RoutingConfig,
}

impl<S, D, C, T> SiteRouter<S, D, C, T>
where
    S: SnapshotProvider,
    D: DomainStore,
    C: RouteCache,
    T: RouteTableSnapshot,
{
    /// Wires up the router from its collaborators.
    pub fn new(
        snapshots: Arc<S>,
        domains: Arc<D>,
        cache: Arc<C>,
        route_table: Arc<T>,
        config: RoutingConfig,
    ) -> Self {
        Self {
            content: ContentStore::new(Arc::clone(&snapshots), config.clone()),
            urls: UrlService::new(
                snapshots,
                Arc::clone(&domains),
                cache,
                config.clone(),
            ),
            classifier: DocumentRequestClassifier::new(config.clone(), route_table),
            domains,
            config,
        }
    }

    /// Resolves a node from an id, a route string, or a URL alias.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::NotReady`] before the first publish.
    pub async fn resolve_node(
        &self,
        ctx: &RequestContext,
        target: NodeTarget,
    ) -> Result<Option<ContentNode>, RoutingError> {
        match target {
            NodeTarget::Id(id) => self.content.node_by_id(ctx, id).await,
            NodeTarget::Route(route) => self.content.node_by_route(ctx, &route).await,
            NodeTarget::Alias { root_id, alias } => {
                self.content.node_by_url_alias(ctx, root_id, &alias).await
            }
        }
    }

    /// Resolves a node's canonical outbound URL.
    ///
    /// # Errors
    ///
    /// See [`UrlService::url_for`].
    pub async fn resolve_url(
        &self,
        ctx: &RequestContext,
        node_id: i32,
    ) -> Result<String, RoutingError> {
        self.urls.url_for(ctx, node_id).await
    }

    /// Classifies a request URL without resolving content.
    pub fn classify(&self, uri: &Url) -> RequestClassification {
        self.classifier.classify(uri)
    }

    /// Boolean convenience over [`classify`](Self::classify).
    pub fn is_document_request(&self, uri: &Url) -> bool {
        self.classifier.is_document_request(uri)
    }

    /// Registers an additional reserved path prefix with the classifier.
    pub fn reserve_path(&self, prefix: &str) {
        self.classifier.reserve_path(prefix);
    }

    /// Drops every cached route. Wire publish/unpublish/move/delete events here.
    pub fn clear_route_cache(&self) {
        self.urls.clear_cache();
    }

    /// Route cache counters.
    pub fn route_cache_stats(&self) -> CacheStats {
        self.urls.cache_stats()
    }

    /// The content lookup service.
    pub fn content(&self) -> &ContentStore<S> {
        &self.content
    }

    /// The outbound URL service.
    pub fn urls(&self) -> &UrlService<S, D, C> {
        &self.urls
    }

    /// Runs the full inbound flow for a request: classification, path cleanup,
    /// domain-root anchoring, route lookup, and URL-alias fallback.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::DomainStore`]/[`RoutingError::Store`] on
    /// collaborator failures; an unpublished tree is reported as
    /// [`DocumentResolution::NotReady`], not as an error.
    pub async fn resolve_document(
        &self,
        ctx: &RequestContext,
    ) -> Result<DocumentResolution, RoutingError> {
        if let RequestClassification::NotDocument(reason) = self.classify(&ctx.original_url) {
            return Ok(DocumentResolution::NotDocument(reason));
        }

        match self.content.has_content(ctx).await {
            Ok(true) => {}
            Ok(false) => return Ok(DocumentResolution::NoContent),
            Err(RoutingError::NotReady) => return Ok(DocumentResolution::NotReady),
            Err(other) => return Err(other),
        }

        let path = clean_request_path(
            ctx.original_url.path(),
            &self.config.virtual_app_prefix,
            &self.config.legacy_page_extension,
        );

        // Anchor the route at the site root owning the request host, if any.
        let domain_root = match ctx.host() {
            Some(host) => self
                .domains
                .find_by_host(&host)
                .await?
                .map(|domain| domain.node_id),
            None => None,
        };

        let route = match domain_root {
            Some(root_id) if root_id > 0 => format!("{root_id}{path}"),
            _ => path.clone(),
        };
        debug!(%route, "inbound route");

        if let Some(node) = self.content.node_by_route(ctx, &route).await? {
            return Ok(DocumentResolution::Found(node));
        }

        // Alias fallback, restricted to the matched site when there is one.
        let alias_root = domain_root.unwrap_or(0);
        if let Some(node) = self
            .content
            .node_by_url_alias(ctx, alias_root, &path)
            .await?
        {
            debug!(node = node.id, "resolved via url alias");
            return Ok(DocumentResolution::Found(node));
        }

        Ok(DocumentResolution::NotFound)
    }
}

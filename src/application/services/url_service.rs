//! Outbound URL resolution.
//!
//! Maps a content node id to its canonical front-end URL: ancestor walk, domain
//! resolution, formatting policy, with the route cache as a memo. The cache only
//! ever holds routes computed from the published tree; preview requests bypass it
//! entirely.

use crate::application::request_context::RequestContext;
use crate::config::RoutingConfig;
use crate::domain::entities::Route;
use crate::domain::repositories::{DomainStore, SnapshotProvider};
use crate::error::RoutingError;
use crate::infrastructure::cache::{CacheStats, RouteCache};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Sentinel returned for a node the published tree does not know.
pub const UNKNOWN_NODE_URL: &str = "#";

/// Computes human-friendly outbound URLs for content nodes.
pub struct UrlService<S: SnapshotProvider, D: DomainStore, C: RouteCache> {
    snapshots: Arc<S>,
    domains: Arc<D>,
    cache: Arc<C>,
    config: RoutingConfig,
}

impl<S: SnapshotProvider, D: DomainStore, C: RouteCache> UrlService<S, D, C> {
    /// Creates a new URL service.
    pub fn new(snapshots: Arc<S>, domains: Arc<D>, cache: Arc<C>, config: RoutingConfig) -> Self {
        Self {
            snapshots,
            domains,
            cache,
            config,
        }
    }

    /// Returns the canonical URL for a node, or [`UNKNOWN_NODE_URL`] when the
    /// tree does not contain it.
    ///
    /// Consults the route cache first (unless the context's cache mode or preview
    /// flag forbids it), computes and memoizes the route otherwise. Two calls for
    /// the same node and context yield byte-identical strings whether or not the
    /// second is served from cache.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::NotReady`] before the first publish and
    /// [`RoutingError::DomainStore`] when domain resolution fails.
    pub async fn url_for(
        &self,
        ctx: &RequestContext,
        node_id: i32,
    ) -> Result<String, RoutingError> {
        let mode = ctx.effective_cache_mode();

        if mode.allows_read()
            && let Some(cached) = self.cache.route(node_id)
            && let Ok(route) = Route::parse(&cached)
        {
            let domain = if self.config.use_domain_prefixes && route.root_id > 0 {
                self.domain_at_node(ctx, route.root_id).await?
            } else {
                None
            };
            return Ok(self.assemble(domain.as_deref(), &route.path));
        }

        let Some((route, domain)) = self.compute_route(ctx, node_id).await? else {
            warn!(node_id, "no node found while building url");
            return Ok(UNKNOWN_NODE_URL.to_string());
        };

        if mode.allows_write() {
            self.cache.store(node_id, &route.to_string());
            debug!(node_id, route = %route, "route cached");
        }

        Ok(self.assemble(domain.as_deref(), &route.path))
    }

    /// The raw route for a node (`root_id` + path segments), uncached.
    ///
    /// This is the value the cache memoizes and the round-trip counterpart of
    /// route lookup; `None` when the tree does not contain the node.
    ///
    /// # Errors
    ///
    /// See [`url_for`](Self::url_for).
    pub async fn route_for(
        &self,
        ctx: &RequestContext,
        node_id: i32,
    ) -> Result<Option<Route>, RoutingError> {
        Ok(self.compute_route(ctx, node_id).await?.map(|(route, _)| route))
    }

    /// Resolves the rendered domain for a node, if any is assigned to it.
    ///
    /// Picks the first assignment whose name is a URI base of the request's
    /// original URL, falling back to the first assignment in list order; a node
    /// that has at least one assignment therefore always resolves to one. The
    /// result is normalized to `scheme://host[:port]`, borrowing the scheme from
    /// the request when the assignment does not carry one.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::DomainStore`] on backing-store failures.
    pub async fn domain_at_node(
        &self,
        ctx: &RequestContext,
        node_id: i32,
    ) -> Result<Option<String>, RoutingError> {
        if node_id <= 0 {
            return Ok(None);
        }
        let assignments = self.domains.assigned_to_node(node_id).await?;
        let Some(first) = assignments.first() else {
            return Ok(None);
        };
        let best = assignments
            .iter()
            .find(|d| is_base_of(&d.name, &ctx.original_url))
            .unwrap_or(first);
        Ok(Some(normalize_domain_base(&best.name, &ctx.original_url)))
    }

    /// Drops every cached route. Called on publish, unpublish, move and delete;
    /// partial invalidation is deliberately unsupported.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Route cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Walks from the node toward the root, collecting path segments and
    /// stopping at the first domain-bearing ancestor. The walk stops there even
    /// when domain prefixing is disabled; the flag only controls rendering.
    async fn compute_route(
        &self,
        ctx: &RequestContext,
        node_id: i32,
    ) -> Result<Option<(Route, Option<String>)>, RoutingError> {
        let snapshot = ctx.snapshot(self.snapshots.as_ref()).await?;
        let Some(node) = snapshot.node(node_id) else {
            return Ok(None);
        };

        let start_depth = self.config.start_node_depth();
        let mut segments: VecDeque<String> = VecDeque::new();
        let mut current = node;
        let mut root_id = 0;
        let mut domain = None;

        loop {
            if current.level >= start_depth {
                segments.push_front(current.url_name.clone());
            }
            if let Some(found) = self.domain_at_node(ctx, current.id).await? {
                root_id = current.id;
                domain = Some(found);
                break;
            }
            let Some(parent) = current.parent_id.and_then(|id| snapshot.node(id)) else {
                break;
            };
            current = parent;
        }

        let segments: Vec<String> = segments.into();
        Ok(Some((Route::new(root_id, &segments), domain)))
    }

    /// Applies the formatting policy: base prefix, trailing slash or legacy
    /// extension at non-root paths.
    fn assemble(&self, domain: Option<&str>, path: &str) -> String {
        let mut out = match domain {
            Some(base) if self.config.use_domain_prefixes => format!("{base}{path}"),
            _ => format!("{}{}", self.config.virtual_app_prefix, path),
        };

        if path != "/" {
            if self.config.use_directory_urls {
                if self.config.add_trailing_slash {
                    out.push('/');
                }
            } else {
                out.push_str(&self.config.legacy_page_extension);
            }
        }

        out
    }
}

/// True when `name` (an assigned domain, scheme optional) is a URI base of the
/// request URL: same scheme, host and effective port, and any path prefix baked
/// into the name is a whole-segment prefix of the request path.
fn is_base_of(name: &str, request: &Url) -> bool {
    let Some(base) = candidate_url(name, request) else {
        return false;
    };
    if base.scheme() != request.scheme()
        || base.host_str() != request.host_str()
        || base.port_or_known_default() != request.port_or_known_default()
    {
        return false;
    }
    let base_path = base.path().trim_end_matches('/');
    base_path.is_empty()
        || request.path() == base_path
        || request
            .path()
            .strip_prefix(base_path)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Normalizes an assigned domain name to `scheme://host[:port]`.
fn normalize_domain_base(name: &str, request: &Url) -> String {
    match candidate_url(name, request) {
        Some(url) => url.origin().ascii_serialization(),
        None => {
            warn!(name, "unparseable domain name, using host fallback");
            let bare = name
                .trim_end_matches('/')
                .trim_start_matches("https://")
                .trim_start_matches("http://");
            let host = &bare[..bare.find('/').unwrap_or(bare.len())];
            format!("{}://{}", request.scheme(), host)
        }
    }
}

fn candidate_url(name: &str, request: &Url) -> Option<Url> {
    let name = name.trim().trim_end_matches('/');
    if name.is_empty() {
        return None;
    }
    let absolute = if name.contains("://") {
        name.to_string()
    } else {
        format!("{}://{}", request.scheme(), name)
    };
    Url::parse(&absolute).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SiteDomain;
    use crate::domain::repositories::{MockDomainStore, MockSnapshotProvider};
    use crate::domain::snapshot::{ContentSnapshot, NodeSpec, SnapshotBuilder};
    use crate::infrastructure::cache::{CacheMode, MemoryRouteCache, NullRouteCache};

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn ctx(request: &str) -> RequestContext {
        RequestContext::new(url(request))
    }

    // 1001 home / 1002 products / 1003 widget, plus 2001 second-site root.
    fn sample_snapshot() -> Arc<ContentSnapshot> {
        Arc::new(
            SnapshotBuilder::new()
                .node(NodeSpec::doc(1001, "home"))
                .node(NodeSpec::doc(1002, "products").under(1001))
                .node(NodeSpec::doc(1003, "widget").under(1002))
                .node(NodeSpec::doc(2001, "second-site"))
                .build()
                .unwrap(),
        )
    }

    fn snapshot_provider() -> Arc<MockSnapshotProvider> {
        let mut provider = MockSnapshotProvider::new();
        let snapshot = sample_snapshot();
        provider
            .expect_current()
            .returning(move || Ok(Arc::clone(&snapshot)));
        Arc::new(provider)
    }

    fn no_domains() -> Arc<MockDomainStore> {
        let mut store = MockDomainStore::new();
        store.expect_assigned_to_node().returning(|_| Ok(Vec::new()));
        Arc::new(store)
    }

    fn domains_on(node_id: i32, names: &[&str]) -> Arc<MockDomainStore> {
        let assignments: Vec<SiteDomain> =
            names.iter().map(|n| SiteDomain::new(*n, node_id)).collect();
        let mut store = MockDomainStore::new();
        store.expect_assigned_to_node().returning(move |id| {
            if id == node_id {
                Ok(assignments.clone())
            } else {
                Ok(Vec::new())
            }
        });
        Arc::new(store)
    }

    fn service(
        domains: Arc<MockDomainStore>,
        config: RoutingConfig,
    ) -> UrlService<MockSnapshotProvider, MockDomainStore, MemoryRouteCache> {
        UrlService::new(
            snapshot_provider(),
            domains,
            Arc::new(MemoryRouteCache::new()),
            config,
        )
    }

    #[tokio::test]
    async fn test_url_with_visible_top_level() {
        let urls = service(no_domains(), RoutingConfig::default());
        let result = urls.url_for(&ctx("http://example.com/"), 1003).await.unwrap();
        assert_eq!(result, "/home/products/widget");
    }

    #[tokio::test]
    async fn test_url_with_hidden_top_level() {
        let config = RoutingConfig {
            hide_top_level_node_from_path: true,
            ..RoutingConfig::default()
        };
        let urls = service(no_domains(), config);
        let result = urls.url_for(&ctx("http://example.com/"), 1003).await.unwrap();
        assert_eq!(result, "/products/widget");
    }

    #[tokio::test]
    async fn test_url_for_unknown_node_is_sentinel() {
        let urls = service(no_domains(), RoutingConfig::default());
        let result = urls.url_for(&ctx("http://example.com/"), 9999).await.unwrap();
        assert_eq!(result, UNKNOWN_NODE_URL);
    }

    #[tokio::test]
    async fn test_trailing_slash_policy() {
        let config = RoutingConfig {
            add_trailing_slash: true,
            ..RoutingConfig::default()
        };
        let urls = service(no_domains(), config);
        assert_eq!(
            urls.url_for(&ctx("http://example.com/"), 1002).await.unwrap(),
            "/home/products/"
        );
        // The root path never doubles its slash.
        let config = RoutingConfig {
            add_trailing_slash: true,
            hide_top_level_node_from_path: true,
            ..RoutingConfig::default()
        };
        let urls = service(no_domains(), config);
        assert_eq!(
            urls.url_for(&ctx("http://example.com/"), 1001).await.unwrap(),
            "/"
        );
    }

    #[tokio::test]
    async fn test_legacy_extension_policy() {
        let config = RoutingConfig {
            use_directory_urls: false,
            ..RoutingConfig::default()
        };
        let urls = service(no_domains(), config);
        assert_eq!(
            urls.url_for(&ctx("http://example.com/"), 1003).await.unwrap(),
            "/home/products/widget.aspx"
        );
    }

    #[tokio::test]
    async fn test_virtual_app_prefix() {
        let config = RoutingConfig {
            virtual_app_prefix: "/site".to_string(),
            ..RoutingConfig::default()
        };
        let urls = service(no_domains(), config);
        assert_eq!(
            urls.url_for(&ctx("http://example.com/"), 1003).await.unwrap(),
            "/site/home/products/widget"
        );
    }

    #[tokio::test]
    async fn test_walk_stops_at_domain_even_without_prefixing() {
        let config = RoutingConfig {
            hide_top_level_node_from_path: true,
            use_domain_prefixes: false,
            ..RoutingConfig::default()
        };
        let urls = service(domains_on(1001, &["example.com"]), config);

        let route = urls
            .route_for(&ctx("http://example.com/"), 1003)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(route.to_string(), "1001/products/widget");

        // Rendered without the domain, since prefixing is off.
        assert_eq!(
            urls.url_for(&ctx("http://example.com/"), 1003).await.unwrap(),
            "/products/widget"
        );
    }

    #[tokio::test]
    async fn test_domain_prefixed_url() {
        let config = RoutingConfig {
            hide_top_level_node_from_path: true,
            use_domain_prefixes: true,
            ..RoutingConfig::default()
        };
        let urls = service(domains_on(1001, &["example.com"]), config);
        assert_eq!(
            urls.url_for(&ctx("http://example.com/"), 1003).await.unwrap(),
            "http://example.com/products/widget"
        );
    }

    #[tokio::test]
    async fn test_domain_node_keeps_own_segment_when_top_level_visible() {
        let config = RoutingConfig {
            use_domain_prefixes: true,
            ..RoutingConfig::default()
        };
        let urls = service(domains_on(1001, &["example.com"]), config);

        let route = urls
            .route_for(&ctx("http://example.com/"), 1003)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(route.to_string(), "1001/home/products/widget");
        assert_eq!(
            urls.url_for(&ctx("http://example.com/"), 1003).await.unwrap(),
            "http://example.com/home/products/widget"
        );
    }

    #[tokio::test]
    async fn test_domain_tie_break_prefers_request_base() {
        let config = RoutingConfig {
            use_domain_prefixes: true,
            hide_top_level_node_from_path: true,
            ..RoutingConfig::default()
        };
        let urls = service(
            domains_on(1001, &["a.example.com", "b.example.com"]),
            config,
        );

        let under_b = ctx("http://b.example.com/products/widget");
        assert_eq!(
            urls.domain_at_node(&under_b, 1001).await.unwrap().as_deref(),
            Some("http://b.example.com")
        );

        let elsewhere = ctx("http://other.test/");
        assert_eq!(
            urls.domain_at_node(&elsewhere, 1001).await.unwrap().as_deref(),
            Some("http://a.example.com")
        );
    }

    #[tokio::test]
    async fn test_domain_at_node_short_circuits() {
        let mut store = MockDomainStore::new();
        store.expect_assigned_to_node().times(0);
        let urls = UrlService::new(
            snapshot_provider(),
            Arc::new(store),
            Arc::new(NullRouteCache::new()),
            RoutingConfig::default(),
        );
        assert!(urls
            .domain_at_node(&ctx("http://example.com/"), 0)
            .await
            .unwrap()
            .is_none());
        assert!(urls
            .domain_at_node(&ctx("http://example.com/"), -5)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let urls = service(no_domains(), RoutingConfig::default());
        let ctx = ctx("http://example.com/");

        let first = urls.url_for(&ctx, 1003).await.unwrap();
        let stats = urls.cache_stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.entries, 1);

        let second = urls.url_for(&ctx, 1003).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(urls.cache_stats().hits, 1);
    }

    #[tokio::test]
    async fn test_preview_never_touches_shared_cache() {
        let urls = service(no_domains(), RoutingConfig::default());
        let draft = Arc::new(
            SnapshotBuilder::new()
                .node(NodeSpec::doc(1001, "draft-home"))
                .node(NodeSpec::doc(1003, "draft-widget").under(1001))
                .build()
                .unwrap(),
        );
        let preview = RequestContext::preview(url("http://example.com/"), draft);

        let result = urls.url_for(&preview, 1003).await.unwrap();
        assert_eq!(result, "/draft-home/draft-widget");

        let stats = urls.cache_stats();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[tokio::test]
    async fn test_suspended_try_once_reads_but_never_writes() {
        let urls = service(no_domains(), RoutingConfig::default());

        let suspended =
            ctx("http://example.com/").with_cache_mode(CacheMode::SuspendedTryOnce);
        urls.url_for(&suspended, 1003).await.unwrap();
        assert_eq!(urls.cache_stats().entries, 0);

        // Populate normally, then the suspended mode still reads.
        let normal = ctx("http://example.com/");
        urls.url_for(&normal, 1003).await.unwrap();
        assert_eq!(urls.cache_stats().entries, 1);
        urls.url_for(&suspended, 1003).await.unwrap();
        assert!(urls.cache_stats().hits >= 1);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_recompute() {
        let urls = service(no_domains(), RoutingConfig::default());
        let ctx = ctx("http://example.com/");

        urls.url_for(&ctx, 1003).await.unwrap();
        urls.clear_cache();
        assert_eq!(urls.cache_stats().entries, 0);

        let result = urls.url_for(&ctx, 1003).await.unwrap();
        assert_eq!(result, "/home/products/widget");
        assert_eq!(urls.cache_stats().entries, 1);
    }

    #[test]
    fn test_is_base_of() {
        let request = url("http://example.com/en/products");
        assert!(is_base_of("example.com", &request));
        assert!(is_base_of("http://example.com", &request));
        assert!(is_base_of("example.com/en", &request));
        assert!(is_base_of("example.com/en/", &request));
        assert!(!is_base_of("example.com/enx", &request));
        assert!(!is_base_of("example.com/en/products/deeper", &request));
        assert!(!is_base_of("other.com", &request));
        assert!(!is_base_of("https://example.com", &request));
        assert!(!is_base_of("example.com:8080", &request));
    }

    #[test]
    fn test_normalize_domain_base() {
        let request = url("https://example.com/");
        assert_eq!(
            normalize_domain_base("example.com", &request),
            "https://example.com"
        );
        assert_eq!(
            normalize_domain_base("http://example.com/", &request),
            "http://example.com"
        );
        assert_eq!(
            normalize_domain_base("example.com/en", &request),
            "https://example.com"
        );
        assert_eq!(
            normalize_domain_base("example.com:8080/en/", &request),
            "https://example.com:8080"
        );
    }
}

#![allow(dead_code)]

use content_router::prelude::*;
use std::sync::Arc;
use url::Url;

/// Two-site fixture tree:
///
/// ```text
/// 1001 home
///   1002 products
///     1003 widget
///     1004 gadget
///   1005 about            (urlAlias: "get-in-touch, /contact")
///   1006 media            (container, not a doc)
/// 2001 second-site
///   2002 archive
///     2003 old-news       (urlAlias: "foo/bar, /foo/nil")
/// ```
pub fn fixture_snapshot() -> ContentSnapshot {
    SnapshotBuilder::new()
        .node(NodeSpec::doc(1001, "home"))
        .node(NodeSpec::doc(1002, "products").under(1001))
        .node(NodeSpec::doc(1003, "widget").under(1002))
        .node(NodeSpec::doc(1004, "gadget").under(1002))
        .node(
            NodeSpec::doc(1005, "about")
                .under(1001)
                .property(ContentSnapshot::URL_ALIAS_PROPERTY, "get-in-touch, /contact"),
        )
        .node(NodeSpec::container(1006, "media").under(1001))
        .node(NodeSpec::doc(2001, "second-site"))
        .node(NodeSpec::doc(2002, "archive").under(2001))
        .node(
            NodeSpec::doc(2003, "old-news")
                .under(2002)
                .property(ContentSnapshot::URL_ALIAS_PROPERTY, "foo/bar, /foo/nil"),
        )
        .build()
        .expect("fixture tree is consistent")
}

/// Every doc-node id of the fixture tree.
pub const FIXTURE_DOC_IDS: [i32; 8] = [1001, 1002, 1003, 1004, 1005, 2001, 2002, 2003];

pub type FixtureRouter =
    SiteRouter<InMemorySnapshotProvider, InMemoryDomainStore, MemoryRouteCache, EmptyRouteTable>;

/// A router over the fixture tree with no domain assignments.
pub fn fixture_router(config: RoutingConfig) -> FixtureRouter {
    fixture_router_with_domains(config, Vec::new())
}

/// A router over the fixture tree with the given domain assignments.
pub fn fixture_router_with_domains(
    config: RoutingConfig,
    domains: Vec<SiteDomain>,
) -> FixtureRouter {
    init_test_logging();
    SiteRouter::new(
        Arc::new(InMemorySnapshotProvider::with_snapshot(fixture_snapshot())),
        Arc::new(InMemoryDomainStore::with_domains(domains)),
        Arc::new(MemoryRouteCache::new()),
        Arc::new(EmptyRouteTable),
        config,
    )
}

/// A router with nothing published yet.
pub fn unpublished_router(config: RoutingConfig) -> FixtureRouter {
    init_test_logging();
    SiteRouter::new(
        Arc::new(InMemorySnapshotProvider::new()),
        Arc::new(InMemoryDomainStore::new()),
        Arc::new(MemoryRouteCache::new()),
        Arc::new(EmptyRouteTable),
        config,
    )
}

/// Opt-in log output while debugging test runs (`RUST_LOG=debug cargo test`).
pub fn init_test_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

pub fn ctx(request_url: &str) -> RequestContext {
    RequestContext::new(Url::parse(request_url).expect("valid request url"))
}

pub fn url(s: &str) -> Url {
    Url::parse(s).expect("valid url")
}

//! # content-router
//!
//! Content routing and URL resolution for a tree-structured CMS: resolve an
//! incoming request URL to a content node, compute a node's canonical outbound
//! URL, and classify requests as content documents versus reserved/system paths.
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Entities, the immutable published tree
//!   snapshot, and the trait seams to external collaborators
//! - **Application Layer** ([`application`]) - The request context and the
//!   routing services
//! - **Infrastructure Layer** ([`infrastructure`]) - Route cache, snapshot
//!   provider, domain store and route table implementations
//!
//! ## Features
//!
//! - Multi-site routing with per-node domain assignments and culture-aware
//!   tie-breaking
//! - Shared route cache with lock-free reads, whole-cache invalidation, and
//!   strict preview isolation
//! - Reserved-path classification combining static prefixes, the host
//!   framework's route table, and dynamically registered stop-routes
//! - Atomically swapped content snapshots; readers keep a stable view for the
//!   whole request
//!
//! ## Quick Start
//!
//! ```
//! use content_router::prelude::*;
//! use std::sync::Arc;
//! use url::Url;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), content_router::RoutingError> {
//! let snapshot = SnapshotBuilder::new()
//!     .node(NodeSpec::doc(1001, "home"))
//!     .node(NodeSpec::doc(1002, "products").under(1001))
//!     .build()
//!     .expect("consistent tree");
//!
//! let router = SiteRouter::new(
//!     Arc::new(InMemorySnapshotProvider::with_snapshot(snapshot)),
//!     Arc::new(InMemoryDomainStore::new()),
//!     Arc::new(MemoryRouteCache::new()),
//!     Arc::new(EmptyRouteTable),
//!     RoutingConfig::default(),
//! );
//!
//! let ctx = RequestContext::new(Url::parse("http://example.com/home/products").unwrap());
//! let url = router.resolve_url(&ctx, 1002).await?;
//! assert_eq!(url, "/home/products");
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! Formatting and reserved-path policy is loaded from environment variables via
//! [`config::RoutingConfig`]. See the [`config`] module for available options.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod utils;

pub use config::RoutingConfig;
pub use error::RoutingError;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        ContentStore, DocumentRequestClassifier, DocumentResolution, NodeTarget,
        NotDocumentReason, RequestClassification, SiteRouter, UrlService, UNKNOWN_NODE_URL,
    };
    pub use crate::application::RequestContext;
    pub use crate::config::RoutingConfig;
    pub use crate::domain::entities::{ContentNode, Route, SiteDomain};
    pub use crate::domain::repositories::{
        DomainStore, EmptyRouteTable, RouteTableSnapshot, SnapshotProvider,
    };
    pub use crate::domain::snapshot::{ContentSnapshot, NodeSpec, SnapshotBuilder};
    pub use crate::error::RoutingError;
    pub use crate::infrastructure::cache::{CacheMode, MemoryRouteCache, NullRouteCache, RouteCache};
    pub use crate::infrastructure::content::{snapshot_from_json, InMemorySnapshotProvider};
    pub use crate::infrastructure::domains::InMemoryDomainStore;
    pub use crate::infrastructure::routes::PatternRouteTable;
}

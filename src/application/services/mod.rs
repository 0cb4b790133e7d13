//! Application services orchestrating the routing domain.
//!
//! - [`ContentStore`] - node lookup by id, route and URL alias
//! - [`UrlService`] - outbound URL generation with the route cache as memo
//! - [`DocumentRequestClassifier`] - document-vs-reserved request classification
//! - [`SiteRouter`] - the aggregate surface the host pipeline consumes

pub mod content_store;
pub mod request_classifier;
pub mod site_router;
pub mod url_service;

pub use content_store::ContentStore;
pub use request_classifier::{
    DocumentRequestClassifier, NotDocumentReason, RequestClassification,
};
pub use site_router::{DocumentResolution, NodeTarget, SiteRouter};
pub use url_service::{UrlService, UNKNOWN_NODE_URL};

//! Document-request classification.
//!
//! Decides, per incoming URL, whether the request should be routed against the
//! content tree at all, before any tree lookup happens. Pure classification: the
//! one legacy rewrite case is returned to the caller instead of performed here.

use crate::config::RoutingConfig;
use crate::domain::repositories::RouteTableSnapshot;
use crate::infrastructure::routes::compile_route_pattern;
use crate::utils::request_path::{extension_of, resolve_virtual};
use crate::utils::PrefixSet;
use regex::Regex;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::{debug, warn};
use url::Url;

/// Marker segment of legacy web-service endpoints served by a separate handler.
const LEGACY_SERVICE_MARKER: &str = ".asmx/";

/// Outcome of classifying one request URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestClassification {
    /// The request should be resolved against the content tree.
    Document,
    /// The request belongs to something else.
    NotDocument(NotDocumentReason),
}

/// Why a request is not a content-document request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotDocumentReason {
    /// The path addresses a legacy web service; the caller should rewrite the
    /// request with this file-path/path-info split and hand it to the legacy
    /// handler.
    LegacyServicePath { file_path: String, path_info: String },
    /// The path carries an extension other than the legacy page extension.
    ForeignExtension(String),
    /// The path is reserved: statically configured, owned by the framework
    /// route table, or dynamically registered.
    ReservedPath,
}

/// Classifies request URLs as content-document requests versus reserved/system
/// paths.
///
/// The reserved set is the union of the statically configured prefixes, the host
/// framework's route table, and stop-routes compiled from dynamically registered
/// prefixes. The stop-route projection is compiled lazily exactly once, on the
/// first classification; registrations after that point are ignored (and
/// logged), matching how hosts register callback paths during startup only.
pub struct DocumentRequestClassifier<T: RouteTableSnapshot> {
    config: RoutingConfig,
    reserved: PrefixSet,
    route_table: Arc<T>,
    registered_paths: Mutex<Vec<String>>,
    stop_routes: OnceLock<Vec<Regex>>,
}

impl<T: RouteTableSnapshot> DocumentRequestClassifier<T> {
    /// Creates a classifier over the given policy and framework route table.
    pub fn new(config: RoutingConfig, route_table: Arc<T>) -> Self {
        let mut reserved = PrefixSet::new();

        for entry in &config.reserved_urls {
            let resolved = resolve_virtual(&config.virtual_app_prefix, entry)
                .trim()
                .to_ascii_lowercase();
            reserved.insert(&resolved);
        }
        // Reserved paths cover everything below them; normalize to a trailing
        // slash so `/admins` is not caught by `/admin`.
        for entry in &config.reserved_paths {
            let resolved = resolve_virtual(&config.virtual_app_prefix, entry)
                .trim()
                .to_ascii_lowercase();
            if resolved.is_empty() {
                continue;
            }
            let with_slash = if resolved.ends_with('/') {
                resolved
            } else {
                format!("{resolved}/")
            };
            reserved.insert(&with_slash);
        }

        Self {
            config,
            reserved,
            route_table,
            registered_paths: Mutex::new(Vec::new()),
            stop_routes: OnceLock::new(),
        }
    }

    /// Registers an additional reserved path prefix (identity-provider callback
    /// paths and the like). Effective only until the first classification.
    pub fn reserve_path(&self, prefix: &str) {
        if self.stop_routes.get().is_some() {
            warn!(prefix, "reserved path registered after first classification, ignored");
            return;
        }
        let mut registered = self
            .registered_paths
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        registered.push(prefix.to_string());
    }

    /// Classifies a request URL.
    pub fn classify(&self, uri: &Url) -> RequestClassification {
        let path = uri.path();
        let lpath = path.to_ascii_lowercase();

        // Legacy directory-style web-service endpoints keep their own handler.
        if self.config.use_directory_urls
            && let Some(marker) = lpath.find(LEGACY_SERVICE_MARKER)
        {
            let split = marker + LEGACY_SERVICE_MARKER.len() - 1;
            return RequestClassification::NotDocument(NotDocumentReason::LegacyServicePath {
                file_path: path[..split].to_string(),
                path_info: path[split..].to_string(),
            });
        }

        // A document may carry no extension, or only the legacy one.
        if let Some(extension) = extension_of(&lpath)
            && extension != self.config.legacy_page_extension
        {
            return RequestClassification::NotDocument(NotDocumentReason::ForeignExtension(
                extension.to_string(),
            ));
        }

        if self.is_reserved(&lpath) {
            debug!(path = %lpath, "reserved path");
            return RequestClassification::NotDocument(NotDocumentReason::ReservedPath);
        }

        RequestClassification::Document
    }

    /// Boolean convenience over [`classify`](Self::classify).
    pub fn is_document_request(&self, uri: &Url) -> bool {
        self.classify(uri) == RequestClassification::Document
    }

    fn is_reserved(&self, lpath: &str) -> bool {
        // Static prefixes; a bare path equal to a reserved directory counts too.
        if self.reserved.covers(lpath) || self.reserved.covers(&format!("{lpath}/")) {
            return true;
        }

        if self.route_table.has_match(lpath) {
            return true;
        }

        self.compiled_stop_routes()
            .iter()
            .any(|route| route.is_match(lpath))
    }

    /// Compiles the registered prefixes into stop-routes, once. Entries that
    /// fail to compile are logged and skipped; classification degrades instead
    /// of failing.
    fn compiled_stop_routes(&self) -> &[Regex] {
        self.stop_routes.get_or_init(|| {
            let registered = self
                .registered_paths
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let mut compiled = Vec::with_capacity(registered.len());
            for prefix in registered.iter() {
                let resolved = resolve_virtual(&self.config.virtual_app_prefix, prefix)
                    .to_ascii_lowercase();
                match compile_route_pattern(&resolved) {
                    Ok(regex) => compiled.push(regex),
                    Err(error) => warn!(%prefix, %error, "skipping reserved path"),
                }
            }
            compiled
        })
    }
}

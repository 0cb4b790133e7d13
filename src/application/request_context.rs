//! Explicit per-request context.
//!
//! Everything the routing services need to know about the current request is
//! carried on this value and passed down the call chain as an argument. Nothing
//! in the crate reads ambient thread-local or process-global request state.

use crate::domain::repositories::SnapshotProvider;
use crate::domain::snapshot::ContentSnapshot;
use crate::error::RoutingError;
use crate::infrastructure::cache::CacheMode;
use std::sync::Arc;
use url::Url;

/// Per-request state consumed by the routing and URL services.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The original request URL, before any rewriting. Domain matching compares
    /// against this.
    pub original_url: Url,
    /// Preview requests resolve draft content and must never touch the shared
    /// route cache.
    pub preview: bool,
    /// How this request interacts with the shared route cache. Ignored (treated
    /// as skip) while previewing.
    pub cache_mode: CacheMode,
    /// The isolated draft tree a preview request resolves against. Two preview
    /// sessions with different drafts never observe each other's routes.
    pub snapshot_override: Option<Arc<ContentSnapshot>>,
}

impl RequestContext {
    /// A live (non-preview) request context.
    pub fn new(original_url: Url) -> Self {
        Self {
            original_url,
            preview: false,
            cache_mode: CacheMode::Normal,
            snapshot_override: None,
        }
    }

    /// A preview request context resolving against `draft`.
    pub fn preview(original_url: Url, draft: Arc<ContentSnapshot>) -> Self {
        Self {
            original_url,
            preview: true,
            cache_mode: CacheMode::Normal,
            snapshot_override: Some(draft),
        }
    }

    pub fn with_cache_mode(mut self, cache_mode: CacheMode) -> Self {
        self.cache_mode = cache_mode;
        self
    }

    /// The cache mode actually in effect: preview always skips.
    pub fn effective_cache_mode(&self) -> CacheMode {
        if self.preview {
            CacheMode::SuspendedSkip
        } else {
            self.cache_mode
        }
    }

    /// The snapshot this request resolves against: its draft override when
    /// previewing, the provider's current snapshot otherwise.
    pub async fn snapshot<S: SnapshotProvider>(
        &self,
        provider: &S,
    ) -> Result<Arc<ContentSnapshot>, RoutingError> {
        if let Some(draft) = &self.snapshot_override {
            return Ok(Arc::clone(draft));
        }
        provider.current().await
    }

    /// The request host, lowercased, without port.
    pub fn host(&self) -> Option<String> {
        self.original_url.host_str().map(str::to_ascii_lowercase)
    }
}

//! Error taxonomy for the routing subsystem.
//!
//! Absence of a node, property, domain or route is *not* an error anywhere in this
//! crate; lookups return `Option` for that. `RoutingError` is reserved for the cases
//! where a collaborator genuinely failed or the system is not in a servable state yet.

/// Errors surfaced by the routing and URL-resolution services.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// No published content snapshot is available yet (still booting, or the
    /// published tree was cleared). Distinct from "not found" so the host pipeline
    /// can answer "not ready" instead of a false 404.
    #[error("no published content snapshot is available yet")]
    NotReady,

    /// The backing content snapshot store failed.
    #[error("content store error: {0}")]
    Store(String),

    /// The backing domain store failed.
    #[error("domain store error: {0}")]
    DomainStore(String),
}

impl RoutingError {
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    pub fn domain_store(message: impl Into<String>) -> Self {
        Self::DomainStore(message.into())
    }
}

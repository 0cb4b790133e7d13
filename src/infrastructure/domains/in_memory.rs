//! Insertion-ordered in-memory domain store.

use crate::domain::entities::SiteDomain;
use crate::domain::repositories::DomainStore;
use crate::error::RoutingError;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Domain assignments held in memory, in insertion order.
///
/// Insertion order doubles as the tie-break order the URL service relies on, so
/// [`assign`](InMemoryDomainStore::assign) appends and nothing ever reorders the
/// list.
#[derive(Debug, Default)]
pub struct InMemoryDomainStore {
    assignments: RwLock<Vec<SiteDomain>>,
}

impl InMemoryDomainStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_domains(domains: Vec<SiteDomain>) -> Self {
        Self {
            assignments: RwLock::new(domains),
        }
    }

    /// Appends an assignment.
    pub async fn assign(&self, domain: SiteDomain) {
        self.assignments.write().await.push(domain);
    }
}

#[async_trait]
impl DomainStore for InMemoryDomainStore {
    async fn assigned_to_node(&self, node_id: i32) -> Result<Vec<SiteDomain>, RoutingError> {
        let assignments = self.assignments.read().await;
        Ok(assignments
            .iter()
            .filter(|d| d.node_id == node_id)
            .cloned()
            .collect())
    }

    async fn find_by_host(&self, host: &str) -> Result<Option<SiteDomain>, RoutingError> {
        let assignments = self.assignments.read().await;
        Ok(assignments
            .iter()
            .find(|d| d.host().eq_ignore_ascii_case(host))
            .cloned())
    }
}

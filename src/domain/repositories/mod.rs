//! Trait seams to the subsystem's external collaborators.
//!
//! All stores are injected as `Arc<impl Trait>` at construction; there are no
//! process-global resolver singletons.

pub mod domain_store;
pub mod route_table;
pub mod snapshot_provider;

pub use domain_store::DomainStore;
pub use route_table::{EmptyRouteTable, RouteTableSnapshot};
pub use snapshot_provider::SnapshotProvider;

#[cfg(test)]
pub use domain_store::MockDomainStore;
#[cfg(test)]
pub use route_table::MockRouteTableSnapshot;
#[cfg(test)]
pub use snapshot_provider::MockSnapshotProvider;

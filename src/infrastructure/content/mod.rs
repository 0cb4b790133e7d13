//! Content snapshot infrastructure: the atomically swapped provider and the
//! JSON loading path.

mod json;
mod provider;

pub use json::{snapshot_from_json, NodeRecord, SnapshotDocument, SnapshotLoadError};
pub use provider::InMemorySnapshotProvider;

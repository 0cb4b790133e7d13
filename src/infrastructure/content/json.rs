//! JSON snapshot loading.
//!
//! The published tree can be exported/imported as a flat JSON node list; this is
//! the serialization the snapshot store hands over on boot and republish.

use crate::domain::snapshot::{ContentSnapshot, NodeSpec, SnapshotBuilder, SnapshotError};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// Errors raised while loading a snapshot from JSON.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotLoadError {
    #[error("snapshot document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("snapshot document is inconsistent: {0}")]
    Build(#[from] SnapshotError),
}

/// Top-level serialized snapshot document.
#[derive(Debug, Deserialize)]
pub struct SnapshotDocument {
    pub nodes: Vec<NodeRecord>,
}

/// One serialized node. Parent links are by id; order in the list is the
/// fallback sibling order when `sort_order` is absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: i32,
    #[serde(default)]
    pub parent_id: Option<i32>,
    pub url_name: String,
    #[serde(default = "default_is_doc")]
    pub is_doc: bool,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

fn default_is_doc() -> bool {
    true
}

impl From<NodeRecord> for NodeSpec {
    fn from(record: NodeRecord) -> Self {
        let mut spec = if record.is_doc {
            NodeSpec::doc(record.id, record.url_name)
        } else {
            NodeSpec::container(record.id, record.url_name)
        };
        if let Some(parent) = record.parent_id {
            spec = spec.under(parent);
        }
        if let Some(sort_order) = record.sort_order {
            spec = spec.sort_order(sort_order);
        }
        if let (Some(created), Some(updated)) = (record.created_at, record.updated_at) {
            spec = spec.timestamps(created, updated);
        }
        for (alias, value) in record.properties {
            spec = spec.property(alias, value);
        }
        spec
    }
}

/// Parses a serialized snapshot document and builds the tree.
///
/// # Errors
///
/// Returns [`SnapshotLoadError::Parse`] for malformed JSON and
/// [`SnapshotLoadError::Build`] for structurally inconsistent node lists
/// (duplicate ids, unknown parents, cycles).
pub fn snapshot_from_json(json: &str) -> Result<ContentSnapshot, SnapshotLoadError> {
    let document: SnapshotDocument = serde_json::from_str(json)?;
    let mut builder = SnapshotBuilder::new();
    for record in document.nodes {
        builder = builder.node(record.into());
    }
    Ok(builder.build()?)
}

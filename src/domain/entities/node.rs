//! Content node entity: one element of a published tree snapshot.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A read-only view of one node in a published content snapshot.
///
/// Nodes never change in place; a republish swaps the whole snapshot. `level` is
/// 1-based and always equals the parent's level plus one; it is computed when the
/// snapshot is built and never trusted from input data.
#[derive(Debug, Clone)]
pub struct ContentNode {
    pub id: i32,
    pub parent_id: Option<i32>,
    /// Child ids in tree order.
    pub children: Vec<i32>,
    /// The node's URL path segment, stored lowercase.
    pub url_name: String,
    /// Depth from the root, 1-based.
    pub level: u32,
    /// Distinguishes content documents from structural/media nodes. Only doc
    /// nodes participate in route and alias matching.
    pub is_doc: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Named string-valued properties.
    pub properties: HashMap<String, String>,
}

impl ContentNode {
    /// Reads a named property value.
    pub fn property(&self, alias: &str) -> Option<&str> {
        self.properties.get(alias).map(String::as_str)
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

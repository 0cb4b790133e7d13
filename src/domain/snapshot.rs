//! Immutable published content tree.
//!
//! A [`ContentSnapshot`] is an arena of [`ContentNode`]s keyed by id, with
//! parent/child links and a precomputed document order. Snapshots are built once
//! (from a builder or a serialized document), never mutated, and swapped wholesale
//! on publish; concurrent readers share them through `Arc`.
//!
//! Route and alias matching is an explicit child-step walk over the arena. The
//! matcher only ever looks at doc nodes; structural and media nodes are reachable
//! by id but invisible to URL resolution.

use crate::domain::entities::{ContentNode, Route};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Errors raised while building a snapshot from node specs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("duplicate node id {0}")]
    DuplicateId(i32),
    #[error("node {node} references unknown parent {parent}")]
    UnknownParent { node: i32, parent: i32 },
    #[error("node {0} is unreachable from any root")]
    Unreachable(i32),
}

/// An immutable view of the published content tree.
#[derive(Debug, Default)]
pub struct ContentSnapshot {
    nodes: HashMap<i32, ContentNode>,
    /// Top-level node ids in tree order.
    roots: Vec<i32>,
    /// Doc-node ids in document order (depth-first, tree order).
    doc_order: Vec<i32>,
}

impl ContentSnapshot {
    /// Property alias carrying a node's comma-separated URL alias list.
    pub const URL_ALIAS_PROPERTY: &'static str = "urlAlias";

    /// Looks up any node by id.
    pub fn node(&self, id: i32) -> Option<&ContentNode> {
        self.nodes.get(&id)
    }

    /// Top-level nodes in tree order.
    pub fn roots(&self) -> impl Iterator<Item = &ContentNode> {
        self.roots.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Doc nodes in document order.
    pub fn doc_nodes(&self) -> impl Iterator<Item = &ContentNode> {
        self.doc_order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// The first doc node in document order. This is what an unanchored empty
    /// route resolves to; there is no explicit "home" marker in the tree.
    pub fn first_doc_node(&self) -> Option<&ContentNode> {
        self.doc_order.first().and_then(|id| self.nodes.get(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True when the snapshot contains at least one doc node to serve.
    pub fn has_content(&self) -> bool {
        !self.doc_order.is_empty()
    }

    /// True when `id` is a strict descendant of `ancestor`.
    pub fn is_descendant_of(&self, id: i32, ancestor: i32) -> bool {
        let mut current = self.nodes.get(&id).and_then(|n| n.parent_id);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.nodes.get(&parent).and_then(|n| n.parent_id);
        }
        false
    }

    /// Ancestor-id chain for a node, topmost first, including the node itself.
    pub fn path_ids(&self, id: i32) -> Vec<i32> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            match self.nodes.get(&node_id) {
                Some(node) => {
                    chain.push(node_id);
                    current = node.parent_id;
                }
                None => break,
            }
        }
        chain.reverse();
        chain
    }

    /// Resolves a route against the tree.
    ///
    /// Matching is case-insensitive on `url_name` and steps through doc nodes
    /// only. An anchored route requires the anchor node to exist; with top-level
    /// hiding disabled the anchor must also own the first path segment, while with
    /// hiding enabled both query shapes are tried (anchor consuming the first
    /// segment, then anchor excluded).
    pub fn node_by_route(&self, route: &Route, hide_top_level: bool) -> Option<&ContentNode> {
        let segments: Vec<String> = route.segments().map(|s| s.to_ascii_lowercase()).collect();

        if route.root_id > 0 {
            let anchor = self.node(route.root_id).filter(|n| n.is_doc)?;
            if segments.is_empty() {
                return Some(anchor);
            }
            if hide_top_level {
                if anchor.url_name == segments[0]
                    && let Some(found) = self.follow(anchor, &segments[1..])
                {
                    return Some(found);
                }
                return self.follow(anchor, &segments);
            }
            if anchor.url_name != segments[0] {
                return None;
            }
            return self.follow(anchor, &segments[1..]);
        }

        if segments.is_empty() {
            return self.first_doc_node();
        }

        if hide_top_level {
            // The top-level node is the implicit skip: segments start matching at
            // its children. First match in tree order wins.
            for root in self.root_doc_nodes() {
                if let Some(found) = self.follow(root, &segments) {
                    return Some(found);
                }
            }
            // Fallback keeps a second site root addressable by its own segment.
        }

        let root = self
            .root_doc_nodes()
            .find(|r| r.url_name == segments[0])?;
        self.follow(root, &segments[1..])
    }

    /// Resolves a URL alias against the alias property of doc nodes.
    ///
    /// The alias is matched against each comma-delimited token of the property
    /// value (spaces stripped), either exactly or with a leading `/`; no partial
    /// token matches. A positive `root_id` restricts the search to strict
    /// descendants of that node. First match in document order wins.
    pub fn node_by_url_alias(&self, root_id: i32, alias: &str) -> Option<&ContentNode> {
        let needle = alias.trim_start_matches('/').to_ascii_lowercase();
        if needle.is_empty() {
            return None;
        }
        let slashed = format!("/{needle}");

        self.doc_nodes().find(|node| {
            if root_id > 0 && !self.is_descendant_of(node.id, root_id) {
                return false;
            }
            match node.property(Self::URL_ALIAS_PROPERTY) {
                Some(raw) => {
                    let flat = raw.to_ascii_lowercase().replace(' ', "");
                    flat.split(',').any(|token| token == needle || token == slashed)
                }
                None => false,
            }
        })
    }

    /// Reads a node attribute (`@`-prefixed alias) or named property as a string.
    ///
    /// Supported attributes: `@id`, `@parentId`, `@level`, `@urlName`,
    /// `@sortOrder`, `@isDoc`, `@path` (comma-joined id chain from the virtual
    /// `-1` top), `@createDate`, `@updateDate`. Unknown attributes and missing
    /// properties yield `None`.
    pub fn node_property(&self, node: &ContentNode, alias: &str) -> Option<String> {
        if let Some(attribute) = alias.strip_prefix('@') {
            return match attribute {
                "id" => Some(node.id.to_string()),
                "parentId" => Some(node.parent_id.unwrap_or(-1).to_string()),
                "level" => Some(node.level.to_string()),
                "urlName" => Some(node.url_name.clone()),
                "sortOrder" => Some(node.sort_order.to_string()),
                "isDoc" => Some(node.is_doc.to_string()),
                "path" => {
                    let mut ids = vec!["-1".to_string()];
                    ids.extend(self.path_ids(node.id).iter().map(i32::to_string));
                    Some(ids.join(","))
                }
                "createDate" => Some(node.created_at.to_rfc3339()),
                "updateDate" => Some(node.updated_at.to_rfc3339()),
                _ => None,
            };
        }
        node.property(alias).map(str::to_string)
    }

    fn root_doc_nodes(&self) -> impl Iterator<Item = &ContentNode> {
        self.roots().filter(|n| n.is_doc)
    }

    fn doc_child_by_url_name(&self, parent: &ContentNode, segment: &str) -> Option<&ContentNode> {
        parent
            .children
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .find(|child| child.is_doc && child.url_name == segment)
    }

    /// Steps through doc children matching one segment per level.
    fn follow<'a>(
        &'a self,
        from: &'a ContentNode,
        segments: &[String],
    ) -> Option<&'a ContentNode> {
        let mut current = from;
        for segment in segments {
            current = self.doc_child_by_url_name(current, segment)?;
        }
        Some(current)
    }
}

/// Input description of one node, consumed by [`SnapshotBuilder`].
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub id: i32,
    pub parent_id: Option<i32>,
    pub url_name: String,
    pub is_doc: bool,
    pub sort_order: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub properties: Vec<(String, String)>,
}

impl NodeSpec {
    /// A content document node.
    pub fn doc(id: i32, url_name: impl Into<String>) -> Self {
        Self {
            id,
            parent_id: None,
            url_name: url_name.into(),
            is_doc: true,
            sort_order: None,
            created_at: None,
            updated_at: None,
            properties: Vec::new(),
        }
    }

    /// A structural (non-document) node.
    pub fn container(id: i32, url_name: impl Into<String>) -> Self {
        Self {
            is_doc: false,
            ..Self::doc(id, url_name)
        }
    }

    pub fn under(mut self, parent_id: i32) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn property(mut self, alias: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push((alias.into(), value.into()));
        self
    }

    pub fn sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = Some(sort_order);
        self
    }

    pub fn timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self.updated_at = Some(updated_at);
        self
    }
}

/// Builds an immutable [`ContentSnapshot`] from node specs.
///
/// Levels are computed from the parent links (roots are level 1); sibling order
/// follows `sort_order` when given, insertion order otherwise; `url_name` is
/// lowercased.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    specs: Vec<NodeSpec>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, spec: NodeSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Validates the specs and assembles the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] on a duplicate id, a reference to an unknown
    /// parent, or a parent cycle that keeps a node unreachable from any root.
    pub fn build(self) -> Result<ContentSnapshot, SnapshotError> {
        let now = Utc::now();
        let mut nodes: HashMap<i32, ContentNode> = HashMap::with_capacity(self.specs.len());
        // (sort_order, insertion index, id) per parent; -1 keys the root level.
        let mut siblings: HashMap<i32, Vec<(i32, usize, i32)>> = HashMap::new();

        for (index, spec) in self.specs.iter().enumerate() {
            if nodes.contains_key(&spec.id) {
                return Err(SnapshotError::DuplicateId(spec.id));
            }

            let node = ContentNode {
                id: spec.id,
                parent_id: spec.parent_id,
                children: Vec::new(),
                url_name: spec.url_name.to_ascii_lowercase(),
                level: 0, // assigned below once the tree links are in place
                is_doc: spec.is_doc,
                sort_order: spec.sort_order.unwrap_or(index as i32),
                created_at: spec.created_at.unwrap_or(now),
                updated_at: spec.updated_at.unwrap_or(now),
                properties: spec.properties.iter().cloned().collect(),
            };

            siblings
                .entry(spec.parent_id.unwrap_or(-1))
                .or_default()
                .push((node.sort_order, index, spec.id));
            nodes.insert(spec.id, node);
        }

        for spec in &self.specs {
            if let Some(parent) = spec.parent_id
                && !nodes.contains_key(&parent)
            {
                return Err(SnapshotError::UnknownParent {
                    node: spec.id,
                    parent,
                });
            }
        }

        for ordered in siblings.values_mut() {
            ordered.sort_by_key(|&(sort_order, index, _)| (sort_order, index));
        }

        let roots: Vec<i32> = siblings
            .remove(&-1)
            .unwrap_or_default()
            .into_iter()
            .map(|(_, _, id)| id)
            .collect();

        for (parent, ordered) in &siblings {
            let children: Vec<i32> = ordered.iter().map(|&(_, _, id)| id).collect();
            if let Some(node) = nodes.get_mut(parent) {
                node.children = children;
            }
        }

        // Depth-first level assignment doubles as the document-order pass.
        let mut doc_order = Vec::new();
        let mut stack: Vec<(i32, u32)> = roots.iter().rev().map(|&id| (id, 1)).collect();
        let mut reached = 0usize;
        while let Some((id, level)) = stack.pop() {
            let Some(node) = nodes.get_mut(&id) else {
                continue;
            };
            node.level = level;
            reached += 1;
            if node.is_doc {
                doc_order.push(id);
            }
            for &child in node.children.iter().rev() {
                stack.push((child, level + 1));
            }
        }

        if reached != nodes.len() {
            let orphan = nodes
                .values()
                .find(|n| n.level == 0)
                .map(|n| n.id)
                .unwrap_or_default();
            return Err(SnapshotError::Unreachable(orphan));
        }

        Ok(ContentSnapshot {
            nodes,
            roots,
            doc_order,
        })
    }
}

//! Domain assignment entity for multi-site setups.

/// A hostname assigned to a content node.
///
/// The name is authoritative and may carry a scheme and/or a path prefix
/// (`"example.com"`, `"https://example.com"`, `"example.com/en"`). Several domains
/// may be assigned to the same node, typically one per culture; the assignment
/// order is significant, as the first assignment is the tie-break when none
/// matches the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDomain {
    pub name: String,
    pub node_id: i32,
    pub culture: Option<String>,
}

impl SiteDomain {
    pub fn new(name: impl Into<String>, node_id: i32) -> Self {
        Self {
            name: name.into(),
            node_id,
            culture: None,
        }
    }

    pub fn with_culture(name: impl Into<String>, node_id: i32, culture: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_id,
            culture: Some(culture.into()),
        }
    }

    /// The bare host component of the domain name: scheme, port and any path
    /// prefix stripped, lowercased.
    pub fn host(&self) -> &str {
        let name = self.name.as_str();
        let name = name.strip_prefix("https://").unwrap_or(name);
        let name = name.strip_prefix("http://").unwrap_or(name);
        let end = name.find(['/', ':']).unwrap_or(name.len());
        &name[..end]
    }
}

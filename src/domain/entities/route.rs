//! Route value type: the internal `rootId/path` key between nodes and URLs.

use std::fmt;
use std::str::FromStr;

/// A content node's position key: the id of the nearest domain-bearing ancestor
/// (`0` when there is none) plus the slash-joined `url_name` segments below it.
///
/// Canonical string form is `"{root_id}{path}"` when anchored (`"1234/products/widget"`)
/// and the bare path when not (`"/products/widget"`, the `0` root being implicit
/// in the leading slash). Routes are derived, never persisted; they are recomputed
/// from the tree or served from the route cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    pub root_id: i32,
    /// Always begins with `/`; `"/"` alone addresses the anchor itself.
    pub path: String,
}

/// Failure to parse a route string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteParseError {
    #[error("route is empty")]
    Empty,
    #[error("route root id '{0}' is not an integer")]
    InvalidRootId(String),
}

impl Route {
    /// Builds a route from an anchor id and path segments.
    pub fn new(root_id: i32, segments: &[String]) -> Self {
        let path = if segments.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", segments.join("/"))
        };
        Self { root_id, path }
    }

    /// Parses a route string.
    ///
    /// A leading `/` means "no anchor" (root id `0`); otherwise everything before
    /// the first `/` must be a decimal node id.
    ///
    /// # Errors
    ///
    /// Returns [`RouteParseError`] for an empty string or a non-numeric root id
    /// prefix. Callers in the request pipeline treat this as "no match".
    pub fn parse(input: &str) -> Result<Self, RouteParseError> {
        if input.is_empty() {
            return Err(RouteParseError::Empty);
        }

        if input.starts_with('/') {
            return Ok(Self {
                root_id: 0,
                path: input.to_string(),
            });
        }

        let (prefix, path) = match input.find('/') {
            Some(idx) => (&input[..idx], &input[idx..]),
            None => (input, "/"),
        };

        let root_id = prefix
            .parse::<i32>()
            .map_err(|_| RouteParseError::InvalidRootId(prefix.to_string()))?;

        Ok(Self {
            root_id,
            path: path.to_string(),
        })
    }

    /// Non-empty path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }

    /// True when the route addresses the anchor (or site root) itself.
    pub fn is_root(&self) -> bool {
        self.path == "/"
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.root_id > 0 {
            write!(f, "{}{}", self.root_id, self.path)
        } else {
            write!(f, "{}", self.path)
        }
    }
}

impl FromStr for Route {
    type Err = RouteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

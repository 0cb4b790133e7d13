//! Route table built from framework-style route patterns.

use crate::domain::repositories::RouteTableSnapshot;
use regex::Regex;
use tracing::warn;

/// Compiles a route pattern (`/api/{controller}/{action}`) into a path matcher.
///
/// `{name}` placeholders match exactly one path segment; literal parts match
/// verbatim, case-insensitively (the classifier lowercases paths before asking).
/// The compiled matcher also covers everything nested under the pattern.
///
/// # Errors
///
/// Returns an error for unbalanced or empty placeholders, or when the resulting
/// expression fails to compile.
pub(crate) fn compile_route_pattern(pattern: &str) -> Result<Regex, String> {
    let trimmed = pattern.trim().trim_start_matches('/');
    if trimmed.is_empty() {
        return Err("route pattern is empty".to_string());
    }

    let mut expression = String::from("^/");
    let mut rest = trimmed;
    while let Some(open) = rest.find('{') {
        let (literal, tail) = rest.split_at(open);
        expression.push_str(&regex::escape(&literal.to_ascii_lowercase()));
        let Some(close) = tail.find('}') else {
            return Err(format!("unbalanced '{{' in route pattern '{pattern}'"));
        };
        let name = &tail[1..close];
        if name.is_empty() {
            return Err(format!("empty placeholder in route pattern '{pattern}'"));
        }
        expression.push_str("[^/]+");
        rest = &tail[close + 1..];
    }
    if rest.contains('}') {
        return Err(format!("unbalanced '}}' in route pattern '{pattern}'"));
    }
    expression.push_str(&regex::escape(&rest.to_ascii_lowercase()));
    expression.push_str("(?:/.*)?$");

    Regex::new(&expression).map_err(|e| e.to_string())
}

/// A [`RouteTableSnapshot`] backed by compiled route patterns.
///
/// Patterns that fail to compile are logged and skipped: classification degrades
/// to slightly less accurate reserved-path detection instead of failing.
#[derive(Debug, Default)]
pub struct PatternRouteTable {
    routes: Vec<Regex>,
}

impl PatternRouteTable {
    pub fn new(patterns: &[&str]) -> Self {
        let mut table = Self::default();
        for pattern in patterns {
            table.add(pattern);
        }
        table
    }

    /// Adds one route pattern, skipping it on compile failure.
    pub fn add(&mut self, pattern: &str) {
        match compile_route_pattern(pattern) {
            Ok(regex) => self.routes.push(regex),
            Err(error) => warn!(pattern, %error, "skipping route pattern"),
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl RouteTableSnapshot for PatternRouteTable {
    fn has_match(&self, path: &str) -> bool {
        self.routes.iter().any(|route| route.is_match(path))
    }
}

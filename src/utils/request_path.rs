//! Inbound request path normalization.
//!
//! Turns the raw absolute path of a request into the lowercase, prefix-free,
//! extension-free form that route matching works on.

/// Resolves a `~/`-relative value against the virtual application prefix.
///
/// Values that are already absolute are returned unchanged.
pub fn resolve_virtual(virtual_prefix: &str, value: &str) -> String {
    match value.strip_prefix("~/") {
        Some(relative) => format!("{virtual_prefix}/{relative}"),
        None if value == "~" => format!("{virtual_prefix}/"),
        None => value.to_string(),
    }
}

/// The extension of the last path segment, including the dot.
///
/// `None` when the last segment has no dot, ends with one, or is empty
/// (directory-style path).
pub fn extension_of(path: &str) -> Option<&str> {
    let segment = path.rsplit('/').next().unwrap_or(path);
    let dot = segment.rfind('.')?;
    if dot == segment.len() - 1 {
        return None;
    }
    Some(&segment[dot..])
}

/// Normalizes a request path for route matching.
///
/// Lowercases, strips the virtual application prefix, drops a trailing legacy
/// extension, collapses the legacy default document to the root, and removes a
/// trailing slash. Always returns a path with a leading `/`.
pub fn clean_request_path(path: &str, virtual_prefix: &str, legacy_extension: &str) -> String {
    let mut cleaned = path.to_ascii_lowercase();

    let prefix = virtual_prefix.to_ascii_lowercase();
    if !prefix.is_empty()
        && let Some(rest) = cleaned.strip_prefix(&prefix)
    {
        cleaned = rest.to_string();
    }

    let extension = legacy_extension.to_ascii_lowercase();
    if let Some(rest) = cleaned.strip_suffix(&extension) {
        cleaned = rest.to_string();
    }

    if cleaned == "/default" {
        cleaned = String::new();
    }

    while cleaned.len() > 1 && cleaned.ends_with('/') {
        cleaned.pop();
    }

    if !cleaned.starts_with('/') {
        cleaned.insert(0, '/');
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_virtual() {
        assert_eq!(resolve_virtual("", "~/admin"), "/admin");
        assert_eq!(resolve_virtual("/site", "~/admin"), "/site/admin");
        assert_eq!(resolve_virtual("/site", "/absolute"), "/absolute");
        assert_eq!(resolve_virtual("/site", "~"), "/site/");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("/foo/bar.aspx"), Some(".aspx"));
        assert_eq!(extension_of("/foo/bar.xyz"), Some(".xyz"));
        assert_eq!(extension_of("/foo/bar"), None);
        assert_eq!(extension_of("/foo.d/bar"), None);
        assert_eq!(extension_of("/foo/bar."), None);
        assert_eq!(extension_of("/foo/.hidden"), Some(".hidden"));
        assert_eq!(extension_of("/foo/bar/"), None);
    }

    #[test]
    fn test_clean_request_path() {
        assert_eq!(clean_request_path("/Products/Widget.aspx", "", ".aspx"), "/products/widget");
        assert_eq!(clean_request_path("/products/widget/", "", ".aspx"), "/products/widget");
        assert_eq!(clean_request_path("/", "", ".aspx"), "/");
        assert_eq!(clean_request_path("", "", ".aspx"), "/");
        assert_eq!(clean_request_path("/default.aspx", "", ".aspx"), "/");
    }

    #[test]
    fn test_clean_request_path_strips_virtual_prefix() {
        assert_eq!(
            clean_request_path("/site/products", "/site", ".aspx"),
            "/products"
        );
        assert_eq!(clean_request_path("/site", "/site", ".aspx"), "/");
        // A path outside the mount point is left intact.
        assert_eq!(clean_request_path("/other", "/site", ".aspx"), "/other");
    }

    #[test]
    fn test_clean_request_path_keeps_foreign_extensions() {
        // Foreign extensions are the classifier's concern, not the cleaner's.
        assert_eq!(clean_request_path("/foo/bar.xyz", "", ".aspx"), "/foo/bar.xyz");
    }
}

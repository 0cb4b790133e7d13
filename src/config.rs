//! Routing configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before any service is
//! constructed. All settings have defaults, so an empty environment yields a
//! working single-site configuration.
//!
//! ## Variables
//!
//! - `HIDE_TOP_LEVEL_FROM_PATH` - omit the site root's segment from URLs (default: `false`)
//! - `USE_DOMAIN_PREFIXES` - render assigned domains into generated URLs (default: `false`)
//! - `USE_DIRECTORY_URLS` - extensionless directory-style URLs (default: `true`)
//! - `ADD_TRAILING_SLASH` - append `/` to directory-style URLs (default: `false`)
//! - `VIRTUAL_APP_PREFIX` - path the site is mounted under, e.g. `/site` (default: empty)
//! - `LEGACY_PAGE_EXTENSION` - the one extension a document URL may carry (default: `.aspx`)
//! - `RESERVED_PATHS` - comma-separated path prefixes excluded from content routing
//! - `RESERVED_URLS` - comma-separated exact URLs excluded from content routing
//!
//! Reserved entries may use the `~/` form, which resolves against
//! `VIRTUAL_APP_PREFIX`.

use anyhow::Result;
use std::env;

/// Formatting and reserved-path policy for content routing.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// When true, the site root's `url_name` is omitted from generated and parsed
    /// URL paths, so a level-2 node sits directly under `/`.
    pub hide_top_level_node_from_path: bool,
    /// When true, generated URLs for nodes under a domain-bearing ancestor are
    /// rendered absolute (`scheme://host/path`). The ancestor walk stops at the
    /// first domain either way; this flag only controls rendering.
    pub use_domain_prefixes: bool,
    /// Directory-style URLs (`/products/widget`) versus legacy extension URLs
    /// (`/products/widget.aspx`).
    pub use_directory_urls: bool,
    /// Append a trailing slash to non-root directory-style URLs.
    pub add_trailing_slash: bool,
    /// Path prefix the application is mounted under; empty when mounted at `/`.
    pub virtual_app_prefix: String,
    /// The single extension a document request may carry; anything else is
    /// classified as a non-document request.
    pub legacy_page_extension: String,
    /// Path prefixes excluded from content routing (back office, installer, ...).
    pub reserved_paths: Vec<String>,
    /// Exact URLs excluded from content routing.
    pub reserved_urls: Vec<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            hide_top_level_node_from_path: false,
            use_domain_prefixes: false,
            use_directory_urls: true,
            add_trailing_slash: false,
            virtual_app_prefix: String::new(),
            legacy_page_extension: ".aspx".to_string(),
            reserved_paths: vec!["~/admin".to_string(), "~/install".to_string()],
            reserved_urls: Vec::new(),
        }
    }
}

impl RoutingConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            hide_top_level_node_from_path: env_flag(
                "HIDE_TOP_LEVEL_FROM_PATH",
                defaults.hide_top_level_node_from_path,
            ),
            use_domain_prefixes: env_flag("USE_DOMAIN_PREFIXES", defaults.use_domain_prefixes),
            use_directory_urls: env_flag("USE_DIRECTORY_URLS", defaults.use_directory_urls),
            add_trailing_slash: env_flag("ADD_TRAILING_SLASH", defaults.add_trailing_slash),
            virtual_app_prefix: env::var("VIRTUAL_APP_PREFIX")
                .unwrap_or(defaults.virtual_app_prefix),
            legacy_page_extension: env::var("LEGACY_PAGE_EXTENSION")
                .unwrap_or(defaults.legacy_page_extension),
            reserved_paths: env_list("RESERVED_PATHS").unwrap_or(defaults.reserved_paths),
            reserved_urls: env_list("RESERVED_URLS").unwrap_or(defaults.reserved_urls),
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `legacy_page_extension` does not start with `.` or is just `.`
    /// - `virtual_app_prefix` is non-empty and does not start with `/`, or ends with `/`
    /// - a reserved entry is empty
    pub fn validate(&self) -> Result<()> {
        if !self.legacy_page_extension.starts_with('.') || self.legacy_page_extension.len() < 2 {
            anyhow::bail!(
                "LEGACY_PAGE_EXTENSION must be '.ext', got '{}'",
                self.legacy_page_extension
            );
        }

        if !self.virtual_app_prefix.is_empty() {
            if !self.virtual_app_prefix.starts_with('/') {
                anyhow::bail!(
                    "VIRTUAL_APP_PREFIX must start with '/', got '{}'",
                    self.virtual_app_prefix
                );
            }
            if self.virtual_app_prefix.ends_with('/') {
                anyhow::bail!(
                    "VIRTUAL_APP_PREFIX must not end with '/', got '{}'",
                    self.virtual_app_prefix
                );
            }
        }

        for entry in self.reserved_paths.iter().chain(self.reserved_urls.iter()) {
            if entry.trim().is_empty() {
                anyhow::bail!("reserved path/url entries must not be empty");
            }
        }

        Ok(())
    }

    /// The depth from which node segments enter generated paths: `2` when the top
    /// level is hidden, else `1`.
    pub fn start_node_depth(&self) -> u32 {
        if self.hide_top_level_node_from_path {
            2
        } else {
            1
        }
    }

    /// Logs a configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Routing configuration loaded:");
        tracing::info!(
            "  Hide top level from path: {}",
            self.hide_top_level_node_from_path
        );
        tracing::info!("  Domain prefixes: {}", self.use_domain_prefixes);
        tracing::info!(
            "  URL style: {}",
            if self.use_directory_urls {
                "directory"
            } else {
                "legacy extension"
            }
        );
        tracing::info!("  Virtual app prefix: '{}'", self.virtual_app_prefix);
        tracing::info!("  Reserved paths: {}", self.reserved_paths.join(", "));
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(default)
}

fn env_list(name: &str) -> Option<Vec<String>> {
    let raw = env::var(name).ok()?;
    Some(
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Loads and validates configuration from environment variables.
///
/// Reads a `.env` file first when one is present.
///
/// # Errors
///
/// Returns an error if validation fails.
pub fn load_from_env() -> Result<RoutingConfig> {
    dotenvy::dotenv().ok();
    let config = RoutingConfig::from_env();
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config_is_valid() {
        let config = RoutingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.legacy_page_extension, ".aspx");
        assert_eq!(config.start_node_depth(), 1);
    }

    #[test]
    fn test_start_node_depth_with_hidden_top_level() {
        let config = RoutingConfig {
            hide_top_level_node_from_path: true,
            ..RoutingConfig::default()
        };
        assert_eq!(config.start_node_depth(), 2);
    }

    #[test]
    fn test_config_validation() {
        let mut config = RoutingConfig::default();
        assert!(config.validate().is_ok());

        config.legacy_page_extension = "aspx".to_string();
        assert!(config.validate().is_err());

        config.legacy_page_extension = ".".to_string();
        assert!(config.validate().is_err());

        config.legacy_page_extension = ".html".to_string();
        assert!(config.validate().is_ok());

        config.virtual_app_prefix = "site".to_string();
        assert!(config.validate().is_err());

        config.virtual_app_prefix = "/site/".to_string();
        assert!(config.validate().is_err());

        config.virtual_app_prefix = "/site".to_string();
        assert!(config.validate().is_ok());

        config.reserved_paths.push("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("HIDE_TOP_LEVEL_FROM_PATH", "true");
            env::set_var("USE_DIRECTORY_URLS", "0");
            env::set_var("LEGACY_PAGE_EXTENSION", ".page");
            env::set_var("RESERVED_PATHS", "/backoffice, /install ,");
        }

        let config = RoutingConfig::from_env();

        assert!(config.hide_top_level_node_from_path);
        assert!(!config.use_directory_urls);
        assert_eq!(config.legacy_page_extension, ".page");
        assert_eq!(config.reserved_paths, vec!["/backoffice", "/install"]);

        // Cleanup
        unsafe {
            env::remove_var("HIDE_TOP_LEVEL_FROM_PATH");
            env::remove_var("USE_DIRECTORY_URLS");
            env::remove_var("LEGACY_PAGE_EXTENSION");
            env::remove_var("RESERVED_PATHS");
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults_without_variables() {
        let config = RoutingConfig::from_env();

        assert!(!config.hide_top_level_node_from_path);
        assert!(config.use_directory_urls);
        assert_eq!(config.virtual_app_prefix, "");
    }
}

//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the quiz
//! application. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the application.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP front end settings.
    pub server: ServerConfig,

    /// Controller and view locations.
    pub paths: PathsConfig,

    /// Default route, mount path and table caching.
    pub routing: RoutingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP front end configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Largest form body buffered for an action.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Where controller sources and views live.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Flat directory holding one controller type per file.
    pub controller_dir: PathBuf,

    /// Extension of controller files; empty admits every file.
    pub controller_extension: String,

    /// Root of `<ControllerShortName>/<action>.<ext>` view files.
    pub view_dir: PathBuf,

    /// Extension of view files.
    pub view_extension: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            controller_dir: PathBuf::from("app/controllers"),
            controller_extension: "php".to_string(),
            view_dir: PathBuf::from("app/views"),
            view_extension: "php".to_string(),
        }
    }
}

/// Route resolution settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Controller type used when the request names none.
    pub default_controller: String,

    /// Action used when the request names none.
    pub default_action: String,

    /// Script mount path, prefixed to every generated link.
    pub mount_path: String,

    /// Build the route table once per process instead of per request.
    pub cache_route_table: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            default_controller: "TestsController".to_string(),
            default_action: "index".to_string(),
            mount_path: "/".to_string(),
            cache_route_table: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.paths.controller_dir, PathBuf::from("app/controllers"));
        assert_eq!(config.routing.default_controller, "TestsController");
        assert!(config.routing.cache_route_table);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [routing]
            mount_path = "/quiz/"

            [paths]
            view_dir = "/srv/quiz/views"
            "#,
        )
        .unwrap();
        assert_eq!(config.routing.mount_path, "/quiz/");
        assert_eq!(config.routing.default_action, "index");
        assert_eq!(config.paths.view_dir, PathBuf::from("/srv/quiz/views"));
        assert_eq!(config.paths.view_extension, "php");
    }
}

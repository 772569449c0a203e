//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the default route is a well-formed controller/action pair
//! - Validate addresses, limits and the mount path shape
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::AppConfig;
use crate::routing::table::CONTROLLER_SUFFIX;

/// One semantic problem in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted key, e.g. `routing.mount_path`.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check a parsed configuration, collecting every problem.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let routing = &config.routing;
    if routing.default_controller.is_empty() {
        errors.push(ValidationError::new("routing.default_controller", "must not be empty"));
    } else if !routing.default_controller.ends_with(CONTROLLER_SUFFIX)
        || routing.default_controller == CONTROLLER_SUFFIX
    {
        errors.push(ValidationError::new(
            "routing.default_controller",
            format!("\"{}\" must be a type name ending in \"{CONTROLLER_SUFFIX}\"", routing.default_controller),
        ));
    }

    if routing.default_action.is_empty() {
        errors.push(ValidationError::new("routing.default_action", "must not be empty"));
    } else if routing.default_action.contains('/') {
        errors.push(ValidationError::new("routing.default_action", "must not contain '/'"));
    }

    if !routing.mount_path.starts_with('/') || !routing.mount_path.ends_with('/') {
        errors.push(ValidationError::new(
            "routing.mount_path",
            format!("\"{}\" must start and end with '/'", routing.mount_path),
        ));
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("\"{}\" is not a socket address", config.server.bind_address),
        ));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new("server.request_timeout_secs", "must be greater than zero"));
    }
    if config.server.max_body_bytes == 0 {
        errors.push(ValidationError::new("server.max_body_bytes", "must be greater than zero"));
    }

    if config.paths.view_extension.is_empty() {
        errors.push(ValidationError::new("paths.view_extension", "must not be empty"));
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("\"{}\" is not a socket address", observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(config: &AppConfig) -> Vec<&'static str> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.field)
            .collect()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_problem() {
        let mut config = AppConfig::default();
        config.routing.default_controller = "Tests".into();
        config.routing.default_action = "a/b".into();
        config.routing.mount_path = "quiz".into();
        config.server.bind_address = "localhost".into();
        config.server.request_timeout_secs = 0;

        assert_eq!(
            fields(&config),
            vec![
                "routing.default_controller",
                "routing.default_action",
                "routing.mount_path",
                "server.bind_address",
                "server.request_timeout_secs",
            ]
        );
    }

    #[test]
    fn test_bare_suffix_is_not_a_controller() {
        let mut config = AppConfig::default();
        config.routing.default_controller = "Controller".into();
        assert_eq!(fields(&config), vec!["routing.default_controller"]);
    }

    #[test]
    fn test_extensions() {
        let mut config = AppConfig::default();
        config.paths.controller_extension.clear();
        assert!(validate_config(&config).is_ok());

        config.paths.view_extension.clear();
        assert_eq!(fields(&config), vec!["paths.view_extension"]);
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(fields(&config), vec!["observability.metrics_address"]);
    }
}

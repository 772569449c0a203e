//! Routing error taxonomy.
//!
//! Every variant is terminal for the current request. None of them is
//! retried and none is downgraded to a default route.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building the route table or resolving a request.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Controller directory (or one of its files) missing or unreadable.
    #[error("cannot read \"{}\": {source}", path.display())]
    Configuration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A controller file declares a type that does not match its file name.
    #[error("invalid controller type \"{parsed}\" for file \"{file}\"")]
    SchemaMismatch { file: String, parsed: String },

    /// Two source units declare the same controller type.
    #[error("cannot redeclare controller \"{0}\"")]
    DuplicateController(String),

    /// The rewritten query does not carry the `url=` marker.
    #[error("invalid URL \"{0}\"")]
    MalformedPath(String),

    /// The requested controller is not in the route table.
    #[error("cannot find controller \"{0}\"")]
    UnknownController(String),

    /// The requested action is not exported by the controller.
    #[error("cannot find action \"{action}\" in controller \"{controller}\"")]
    UnknownAction { controller: String, action: String },

    /// The route resolved but its view file is missing.
    #[error("view \"{}\" not found", path.display())]
    ViewNotFound { path: PathBuf },

    /// Fewer positional arguments than the action requires.
    #[error("action \"{controller}::{action}\" requires {required} argument(s), got {given}")]
    ArityMismatch {
        controller: String,
        action: String,
        required: usize,
        given: usize,
    },
}

impl RoutingError {
    /// Short stable label, used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RoutingError::Configuration { .. } => "configuration",
            RoutingError::SchemaMismatch { .. } => "schema_mismatch",
            RoutingError::DuplicateController(_) => "duplicate_controller",
            RoutingError::MalformedPath(_) => "malformed_path",
            RoutingError::UnknownController(_) => "unknown_controller",
            RoutingError::UnknownAction { .. } => "unknown_action",
            RoutingError::ViewNotFound { .. } => "view_not_found",
            RoutingError::ArityMismatch { .. } => "arity_mismatch",
        }
    }

    /// True for request-routing misses, false for deployment-integrity errors.
    pub fn is_routing_miss(&self) -> bool {
        matches!(
            self,
            RoutingError::UnknownController(_)
                | RoutingError::UnknownAction { .. }
                | RoutingError::ArityMismatch { .. }
        )
    }
}

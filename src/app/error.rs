//! Top-level dispatch failures.

use axum::http::StatusCode;
use thiserror::Error;

use crate::app::controller::ActionError;
use crate::app::render::RenderError;
use crate::routing::RoutingError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// The route table lists a controller nobody implemented.
    #[error("controller \"{0}\" has no registered implementation")]
    ControllerNotRegistered(String),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Routing(e) | AppError::Action(ActionError::Routing(e)) => routing_status(e),
            AppError::Action(ActionError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            AppError::Action(ActionError::NotImplemented { .. }) => StatusCode::NOT_FOUND,
            AppError::Action(ActionError::Failed(_))
            | AppError::ControllerNotRegistered(_)
            | AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short stable label, used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Routing(e) => e.kind(),
            AppError::ControllerNotRegistered(_) => "controller_not_registered",
            AppError::Action(ActionError::Routing(e)) => e.kind(),
            AppError::Action(ActionError::InvalidInput(_)) => "invalid_input",
            AppError::Action(ActionError::NotImplemented { .. }) => "action_not_implemented",
            AppError::Action(ActionError::Failed(_)) => "action_failed",
            AppError::Render(_) => "render",
        }
    }
}

fn routing_status(error: &RoutingError) -> StatusCode {
    match error {
        RoutingError::MalformedPath(_) => StatusCode::BAD_REQUEST,
        e if e.is_routing_miss() => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

//! Controller contract.
//!
//! Controllers are looked up by type name in the registry and invoked with the
//! action name resolved by the router. There is no reflection: every
//! controller matches on its own action names.

use axum::http::Method;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::app::binding::BoundArgs;
use crate::routing::{Router, RoutingError};

/// Data handed to the renderer. Keys are placeholder names.
pub type ViewData = serde_json::Map<String, serde_json::Value>;

/// Merged query-string and form inputs; form values win on conflict.
pub type Inputs = BTreeMap<String, String>;

/// What an action asks the front end to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// Render the resolved view with this data.
    View(ViewData),
    /// Send the client elsewhere (303 See Other).
    Redirect(String),
}

/// Errors raised by action code.
#[derive(Debug, Error)]
pub enum ActionError {
    /// User input failed validation and the action cannot render.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The route table lists the action but the controller does not handle it.
    #[error("action \"{action}\" is not implemented by \"{controller}\"")]
    NotImplemented { controller: String, action: String },

    /// Link generation failed inside the action.
    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error("{0}")]
    Failed(String),
}

/// Per-request view of the world an action gets.
pub struct RequestContext<'r> {
    method: Method,
    inputs: &'r Inputs,
    router: &'r Router,
}

impl<'r> RequestContext<'r> {
    pub fn new(method: Method, inputs: &'r Inputs, router: &'r Router) -> Self {
        Self {
            method,
            inputs,
            router,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn is_post(&self) -> bool {
        self.method == Method::POST
    }

    pub fn inputs(&self) -> &Inputs {
        self.inputs
    }

    pub fn input(&self, key: &str) -> Option<&str> {
        self.inputs.get(key).map(String::as_str)
    }

    pub fn has_input(&self, key: &str) -> bool {
        self.inputs.contains_key(key)
    }

    /// Input value with surrounding whitespace removed, `None` when blank.
    pub fn non_empty_input(&self, key: &str) -> Option<&str> {
        self.input(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// The resolved route, used to build links.
    pub fn router(&self) -> &'r Router {
        self.router
    }
}

/// A controller type, invoked by action name.
pub trait Controller: Send + Sync {
    /// Type name as declared in the controller source, e.g. `TestsController`.
    fn name(&self) -> &str;

    fn invoke(
        &self,
        action: &str,
        args: &BoundArgs,
        ctx: &RequestContext<'_>,
    ) -> Result<ActionOutcome, ActionError>;
}

//! Request handling.
//!
//! # Responsibilities
//! - Generate unique request IDs (UUID v4)
//! - Merge query-string and form inputs for actions
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An incoming `x-request-id` is kept, not replaced

use axum::http::{header, HeaderMap, HeaderName, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use url::form_urlencoded;
use uuid::Uuid;

use crate::app::Inputs;

/// Header carrying the request correlation ID.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Mints a UUID v4 per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestUuid;

impl MakeRequestId for RequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        Uuid::new_v4().to_string().parse().ok().map(RequestId::new)
    }
}

/// Request ID from the headers, `"unknown"` when absent.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// True when the body is an urlencoded form.
pub fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"))
}

/// Merge query-string pairs with form pairs; form values win.
pub fn parse_inputs(query: Option<&str>, form: Option<&[u8]>) -> Inputs {
    let mut inputs = Inputs::new();
    if let Some(query) = query {
        inputs.extend(form_urlencoded::parse(query.as_bytes()).into_owned());
    }
    if let Some(form) = form {
        inputs.extend(form_urlencoded::parse(form).into_owned());
    }
    inputs
}

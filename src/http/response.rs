//! Response mapping.
//!
//! # Design Decisions
//! - Every dispatch failure renders the same minimal failure page; the status
//!   code carries the distinction
//! - Redirects are `303 See Other` so a POST is followed by a GET

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::app::render::escape_html;
use crate::app::{AppError, AppResponse};

/// `<h1 class="error">message</h1>`, with the message escaped.
pub fn failure_page(message: &str) -> String {
    format!("<h1 class=\"error\">{}</h1>", escape_html(message))
}

pub fn failure_response(status: StatusCode, message: &str) -> Response {
    (status, Html(failure_page(message))).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        failure_response(self.status_code(), &self.to_string())
    }
}

impl IntoResponse for AppResponse {
    fn into_response(self) -> Response {
        match self {
            AppResponse::Html(body) => Html(body).into_response(),
            AppResponse::Redirect(location) => Redirect::to(&location).into_response(),
        }
    }
}

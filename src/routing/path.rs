//! Rewritten request path parsing.
//!
//! The web-server rewrite rule delivers the request path as a single query
//! variable: `url=<segments>[&<remainder>]`. This module splits it into the
//! controller token, action token, positional arguments and the raw remainder.

use std::str::FromStr;

use crate::routing::error::RoutingError;

/// Marker the rewrite rule prefixes the request path with.
pub const URL_MARKER: &str = "url=";

/// Tokens extracted from one rewritten request path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPath {
    controller: String,
    action: String,
    args: Vec<String>,
    query: String,
}

impl ParsedPath {
    /// Parse `url=<segments>[&<remainder>]`.
    ///
    /// Segments are lower-cased and empty segments dropped; the controller
    /// token is then capitalised to match declared type names. The remainder
    /// after the first `&` is kept verbatim.
    pub fn parse(raw: &str) -> Result<Self, RoutingError> {
        let rest = strip_marker(raw).ok_or_else(|| RoutingError::MalformedPath(raw.to_owned()))?;

        let (segment_path, query) = rest.split_once('&').unwrap_or((rest, ""));
        let lowered = segment_path.to_lowercase();
        let mut segments = lowered.split('/').filter(|segment| !segment.is_empty());

        let controller = segments.next().map(capitalize).unwrap_or_default();
        let action = segments.next().map(str::to_owned).unwrap_or_default();
        let args = segments.map(str::to_owned).collect();

        Ok(Self {
            controller,
            action,
            args,
            query: query.to_owned(),
        })
    }

    /// Capitalised controller token (`"Tests"`), empty when absent.
    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Consume into `(controller, action, args, query)`.
    pub fn into_parts(self) -> (String, String, Vec<String>, String) {
        (self.controller, self.action, self.args, self.query)
    }
}

impl FromStr for ParsedPath {
    type Err = RoutingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

/// The text after a leading `url=` (ASCII case-insensitive).
pub(crate) fn strip_marker(raw: &str) -> Option<&str> {
    let head = raw.get(..URL_MARKER.len())?;
    head.eq_ignore_ascii_case(URL_MARKER)
        .then(|| &raw[URL_MARKER.len()..])
}

/// Upper-case the first character.
pub(crate) fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

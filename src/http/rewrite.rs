//! Front-controller rewrite.
//!
//! Emulates `RewriteRule ^(.*)$ index.php?url=$1 [QSA]`: every path under
//! the mount point becomes `url=<path>` with the original query string
//! appended, so the router sees exactly what the web server would hand it.

use axum::http::Uri;
use percent_encoding::percent_decode_str;

use crate::routing::path::{strip_marker, URL_MARKER};

/// Script name requests may address directly.
pub const ENTRY_SCRIPT: &str = "index.php";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// Path is not under the mount point; not ours to serve.
    Outside,
    /// The mount point or entry script itself, with no route.
    EntryPoint,
    /// Rewritten query, `url=<path>[&<query>]`.
    Rewritten(String),
}

/// Rewrite an incoming request URI relative to `mount` (which ends in `/`).
///
/// The path is percent-decoded before it is spliced in, as `mod_rewrite`
/// does without the `B` flag: an encoded `&` inside a segment ends
/// the route and starts the query remainder.
pub fn rewrite_request(mount: &str, uri: &Uri) -> RewriteOutcome {
    let path = percent_decode_str(uri.path()).decode_utf8_lossy();
    let query = uri.query().filter(|q| !q.is_empty());

    // `/quiz` for a `/quiz/` mount.
    if mount.strip_suffix('/').is_some_and(|bare| !bare.is_empty() && path == bare) {
        return RewriteOutcome::EntryPoint;
    }

    let Some(rest) = path.strip_prefix(mount) else {
        return RewriteOutcome::Outside;
    };

    if rest.is_empty() {
        return RewriteOutcome::EntryPoint;
    }

    if rest == ENTRY_SCRIPT {
        // Direct `index.php?url=...` links carry their own rewritten query.
        return match query {
            Some(q) if strip_marker(q).is_some() => RewriteOutcome::Rewritten(q.to_owned()),
            _ => RewriteOutcome::EntryPoint,
        };
    }

    let rewritten = match query {
        Some(q) => format!("{URL_MARKER}{rest}&{q}"),
        None => format!("{URL_MARKER}{rest}"),
    };
    RewriteOutcome::Rewritten(rewritten)
}

//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Table Build (first request, or every request when uncached):
//!     controller directory
//!     → lexer.rs (tolerant token stream per file)
//!     → introspect.rs (declared type, public actions, parameters)
//!     → table.rs (file/type agreement, uniqueness)
//!     → cache.rs (memoized Arc<RouteTable>)
//!
//! Incoming Request (rewritten query "url=...")
//!     → path.rs (controller / action / args / remainder)
//!     → router.rs (controller → action → view, fail-fast)
//!     → Return: Router (resolved route + link builder) or RoutingError
//! ```
//!
//! # Design Decisions
//! - The route table is an explicit value, never a global
//! - Resolution never falls back to a default route on error
//! - Deterministic: same directory and input always yield the same route

pub mod cache;
pub mod error;
pub mod introspect;
pub mod lexer;
pub mod path;
pub mod router;
pub mod table;

pub use cache::RouteTableCache;
pub use error::RoutingError;
pub use introspect::{introspect, introspect_all};
pub use path::ParsedPath;
pub use router::{format_url, ResolvedRoute, Router, RouterSettings, UrlArgs};
pub use table::{ActionDescriptor, ControllerDescriptor, RouteTable};

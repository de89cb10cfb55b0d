//! Dashboard route table
//!
//! Declares the navigable Istio pages, the view each one lazily resolves to
//! and the permission a router guard should demand before showing it. The
//! table is built once and never changes.

mod matcher;
mod table;
mod types;

pub use matcher::RouteMatch;
pub use table::{istio_section, RouteAction};
pub use types::{Permission, RouteEntry, RouteMeta, RouteSection, Scope, Verb, ViewHandle, ViewRef};

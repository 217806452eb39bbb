//! Routing module
//!
//! Compiles the declarative route table once at startup and classifies
//! request paths against it:
//! - `:name` segments become named captures over `[A-Za-z0-9_.]+`
//! - Literal segments match exactly
//! - Routes are scanned in declaration order, first path match wins

mod pattern;
mod table;

pub use pattern::{PathParams, RouteError};
pub use table::{Resolution, RouteDef, RouteTable};

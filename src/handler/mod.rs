//! Request handler module
//!
//! Dispatch of incoming requests plus the student pages, CSV export, JSON
//! search and static assets they lead to.

mod error;
pub mod router;
pub mod routes;
pub mod static_files;
mod students;
mod validation;

// Re-export main entry point
pub use router::handle_request;

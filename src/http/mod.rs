//! HTTP protocol layer module
//!
//! Protocol-level building blocks shared by the dispatcher and the
//! handlers: response builders, MIME detection, form decoding and the
//! access-logging body.

pub mod access_log;
pub mod form;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use access_log::{AccessSink, LoggedBody};
pub use form::{parse_form, BodyError, FormData};
pub use response::{
    build_404_response, build_405_response, build_csv_response, build_file_response,
    build_html_response, build_json_response, build_redirect_response, build_status_response,
};

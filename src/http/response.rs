//! HTTP response building module
//!
//! Builders for every response the service writes. Builders never panic: a
//! failed `Response::builder()` is logged and replaced by a bare response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{ALLOW, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use hyper::{Response, StatusCode};
use serde::Serialize;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Minimal same-origin HTML page for an error status
fn status_page(status: StatusCode) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{code} {reason}</title></head>\
         <body><h1>{reason}</h1></body></html>",
        code = status.as_u16()
    )
}

/// Build an HTML response with the given status
pub fn build_html_response(status: StatusCode, html: String) -> Response<Full<Bytes>> {
    let content_length = html.len();
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, HTML_CONTENT_TYPE)
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(Bytes::from(html)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a minimal HTML error page (400, 404, 413, 500, ...)
pub fn build_status_response(status: StatusCode) -> Response<Full<Bytes>> {
    build_html_response(status, status_page(status))
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_status_response(StatusCode::NOT_FOUND)
}

/// Build 405 Method Not Allowed response with an empty body
pub fn build_405_response(allow: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header(ALLOW, allow)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a redirect with an empty body
///
/// `Location` is the path as given, relative to the current origin. The
/// client's Host header is never used to build it. Defaults to 302.
pub fn build_redirect_response(target: &str, status: Option<StatusCode>) -> Response<Full<Bytes>> {
    let status = status.unwrap_or(StatusCode::FOUND);
    Response::builder()
        .status(status)
        .header(LOCATION, target)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Serialize `data` as a JSON response (default status 200)
pub fn build_json_response<T>(data: &T, status: Option<StatusCode>) -> Response<Full<Bytes>>
where
    T: Serialize + ?Sized,
{
    let status = status.unwrap_or(StatusCode::OK);
    let body = match serde_json::to_vec(data) {
        Ok(body) => body,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize JSON response: {e}"));
            return build_status_response(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .header(CONTENT_LENGTH, body.len())
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a CSV download served as an attachment
pub fn build_csv_response(csv: String, filename: &str) -> Response<Full<Bytes>> {
    let content_length = csv.len();
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\""))
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(Bytes::from(csv)))
        .unwrap_or_else(|e| {
            log_build_error("CSV", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 200 response carrying raw file bytes
pub fn build_file_response(data: Vec<u8>, content_type: &str) -> Response<Full<Bytes>> {
    let content_length = data.len();
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(Bytes::from(data)))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

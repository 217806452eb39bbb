//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: trailing-slash normalization,
//! the `/public/` short-circuit, then the compiled route table.

use super::routes;
use super::static_files::{self, PUBLIC_PREFIX};
use crate::config::AppState;
use crate::http::{self, access_log, LoggedBody};
use crate::logger::{self, AccessLogEntry};
use crate::routing::Resolution;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Main entry point for HTTP request handling
///
/// Every response leaves through [`access_log::wrap`], so each request is
/// logged exactly once, when its body completes.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<LoggedBody<Full<Bytes>>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let entry = AccessLogEntry::from_request(&req, remote_addr);
    let response = route_request(req, &state).await;
    Ok(access_log::wrap(response, entry, Arc::clone(&state.access_sink)))
}

/// Dispatch a request to its response
pub async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let path = req.uri().path();

    // 1. Trailing slash: redirect, no handler runs
    if let Some(target) = strip_trailing_slash(path, req.uri().query()) {
        logger::log_debug(&format!("Redirecting {path} -> {target}"));
        return http::build_redirect_response(&target, Some(StatusCode::MOVED_PERMANENTLY));
    }

    // 2. Public assets, any method
    if path.starts_with(PUBLIC_PREFIX) {
        return static_files::serve(&state.public_root, path).await;
    }

    // 3. Route table, first path match wins
    match state.routes.resolve(req.method(), path) {
        Resolution::Matched { route, params } => {
            logger::log_debug(&format!(
                "{} {path} matched {}",
                req.method(),
                route.template()
            ));
            let action = *route.handler();
            routes::invoke(action, req, &params, state).await
        }
        Resolution::MethodNotAllowed { route } => {
            logger::log_debug(&format!(
                "{} not allowed on {}",
                req.method(),
                route.template()
            ));
            http::build_405_response(&route.allow_header())
        }
        Resolution::NotFound => http::build_404_response(),
    }
}

/// Redirect target for a path with a trailing slash, keeping the query
///
/// Leading slashes are collapsed so the `Location` can never become a
/// scheme-relative URL such as `//example.com`.
fn strip_trailing_slash(path: &str, query: Option<&str>) -> Option<String> {
    if path == "/" || !path.ends_with('/') {
        return None;
    }

    let trimmed = path.trim_end_matches('/').trim_start_matches('/');
    let mut target = format!("/{trimmed}");
    if let Some(query) = query {
        target.push('?');
        target.push_str(query);
    }
    Some(target)
}

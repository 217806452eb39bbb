//! Handler failures and the responses they map to

use crate::http::{self, BodyError};
use crate::logger;
use crate::store::StoreError;
use crate::templates::TemplateError;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Body(#[from] BodyError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl HandlerError {
    /// Minimal error page; details only reach the error log
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let status = match &self {
            Self::Body(BodyError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Body(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            logger::log_error(&self.to_string());
        } else {
            logger::log_warning(&format!("Rejected request body: {self}"));
        }
        http::build_status_response(status)
    }
}

pub type HandlerResult = Result<Response<Full<Bytes>>, HandlerError>;

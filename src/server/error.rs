use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;

/// Request-level failures, surfaced as plain-text bodies.
#[derive(Debug)]
pub enum ApiError {
    /// 400 with a short fixed reason
    BadRequest(&'static str),
    /// 404 with a short fixed reason
    NotFound(&'static str),
    /// 500; the cause is logged, not sent to the client
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason).into_response(),
            ApiError::NotFound(reason) => (StatusCode::NOT_FOUND, reason).into_response(),
            ApiError::Internal(e) => {
                error!("❌ Request failed: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Internal(e.into())
    }
}

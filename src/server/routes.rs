//! # Route Table
//!
//! Explicit (method, path) routing plus the cross-origin layers. Unmatched
//! methods on known paths fall through to the same 404 fallback as unknown
//! paths.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::server::handlers;
use crate::server::AppState;

/// Build the application router.
///
/// Every response carries the permissive CORS headers. `CorsLayer` answers
/// real preflights; the `SetResponseHeaderLayer`s put the method and header
/// allowances on plain responses as well, so every response advertises the
/// same allowances.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            "/",
            get(handlers::index)
                .options(handlers::preflight)
                .fallback(handlers::fallback),
        )
        .route(
            "/images/:filename",
            get(handlers::serve_image)
                .options(handlers::preflight)
                .fallback(handlers::fallback),
        )
        .route(
            "/upload",
            post(handlers::upload)
                .options(handlers::preflight)
                .fallback(handlers::fallback),
        )
        .fallback(handlers::fallback)
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .with_state(state)
}

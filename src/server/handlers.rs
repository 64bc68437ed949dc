//! # Request Handlers
//!
//! One handler per route plus the shared preflight and fallback handlers.
//! Each request is served statelessly from the upload directory's current
//! contents.

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use log::{info, warn};
use serde::Serialize;

use crate::naming;
use crate::server::error::ApiError;
use crate::server::AppState;

/// Attempts at drawing an unused generated name before giving up.
const NAME_RETRY_LIMIT: u32 = 8;

/// Descriptor returned for a stored upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub url: String,
}

/// GET / - liveness check.
pub async fn index() -> Html<&'static str> {
    Html("Image Pool Server is running")
}

/// OPTIONS handler shared by every route. The body stays empty; the CORS
/// layers attach the actual headers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// GET /images/{filename} - serve a stored image.
///
/// The content type is inferred from the filename's extension, falling
/// back to `application/octet-stream`.
pub async fn serve_image(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let Some(bytes) = state.store.read(&filename).await? else {
        return Err(ApiError::NotFound("File not found"));
    };

    let mime = mime_guess::from_path(&filename).first_or_octet_stream();
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime.as_ref().to_string())],
        bytes,
    )
        .into_response())
}

/// POST /upload - accept one multipart image and persist it.
///
/// The form must contain a part named `file` with a non-empty original
/// filename whose extension is in the allow-set. The part's bytes are
/// written verbatim under a freshly generated name.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    // A missing or non multipart/form-data content type is rejected before
    // the field loop runs.
    let mut multipart = multipart.map_err(|_| ApiError::BadRequest("Bad request"))?;

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Bad request"))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let original_filename = field.file_name().unwrap_or("").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|_| ApiError::BadRequest("Bad request"))?;
        upload = Some((original_filename, data.to_vec()));
        break;
    }

    let Some((original_filename, data)) = upload else {
        return Err(ApiError::BadRequest("No file part"));
    };
    if original_filename.is_empty() {
        return Err(ApiError::BadRequest("No selected file"));
    }
    if !naming::is_valid_image(&original_filename) {
        warn!("Rejected upload '{}': extension not allowed", original_filename);
        return Err(ApiError::BadRequest("Invalid file type"));
    }

    info!(
        "📤 Received upload '{}' ({} bytes)",
        original_filename,
        data.len()
    );

    let filename = store_with_fresh_name(&state, &original_filename, &data).await?;
    let url = format!("{}/images/{}", state.base_url, filename);

    info!("✅ Stored '{}' as {}", original_filename, filename);

    Ok(Json(UploadResponse { filename, url }))
}

/// Persist the bytes under a generated name, drawing a new name on the off
/// chance the previous one already exists on disk.
async fn store_with_fresh_name(
    state: &AppState,
    original_filename: &str,
    data: &[u8],
) -> Result<String, ApiError> {
    for _ in 0..NAME_RETRY_LIMIT {
        let candidate = naming::generate_unique_filename(original_filename);
        match state.store.save_new(&candidate, data).await {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Err(ApiError::Internal(anyhow::anyhow!(
        "no unused filename found for '{}' after {} attempts",
        original_filename,
        NAME_RETRY_LIMIT
    )))
}

/// Catch-all for unrouted paths and methods. OPTIONS is answered with 200
/// for any path so browsers can preflight freely; everything else is 404.
pub async fn fallback(method: Method, uri: Uri) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    info!("No route for {} {}", method, uri.path());
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

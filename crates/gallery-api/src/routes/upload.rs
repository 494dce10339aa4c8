//! # Upload
//!
//! - `POST /api/upload`: store the multipart field `file` as a new image.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use gallery_core::{is_known_image, ObjectId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_multipart, multipart_error};
use crate::public::upload_path;
use crate::state::AppState;

/// Multipart field carrying the image.
pub const FILE_FIELD: &str = "file";

// ── Request/Response DTOs ───────────────────────────────────────────

/// Result of a successful upload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    /// Public path of the stored image, `/uploads/{id}`.
    pub filename: String,
    /// Identifier assigned by the store.
    pub id: String,
}

// ── Router ──────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new().route("/api/upload", post(upload_image))
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /api/upload: Store an uploaded image.
#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content_type = "multipart/form-data", description = "Form with a `file` field"),
    responses(
        (status = 200, description = "Image stored", body = UploadResponse),
        (status = 400, description = "No file in the form", body = crate::error::ErrorBody),
        (status = 413, description = "Upload exceeds the body limit", body = crate::error::ErrorBody),
        (status = 422, description = "Not an image type", body = crate::error::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody),
    ),
    tag = "images"
)]
async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = extract_multipart(multipart)?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original_name = field
            .file_name()
            .filter(|name| !name.trim().is_empty())
            .map(str::to_owned)
            .ok_or_else(|| AppError::BadRequest("uploaded file has no name".to_string()))?;

        let extension = ObjectId::sanitize(&original_name)?
            .extension()
            .map(str::to_owned);
        if !state.config.allow_any_type && !is_known_image(extension.as_deref()) {
            return Err(AppError::Validation(format!(
                "{original_name} is not a supported image type"
            )));
        }

        let bytes = field.bytes().await.map_err(multipart_error)?;
        let id = state.store.put(&original_name, &bytes).await?;

        return Ok(Json(UploadResponse {
            success: true,
            filename: upload_path(&id),
            id: id.to_string(),
        }));
    }

    Err(AppError::BadRequest("no file uploaded".to_string()))
}

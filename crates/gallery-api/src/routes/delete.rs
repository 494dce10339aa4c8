//! # Delete
//!
//! - `POST /api/delete`: remove an image by identifier or public path.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::public::id_from_reference;
use crate::state::AppState;

// ── Request/Response DTOs ───────────────────────────────────────────

/// Request to delete an image.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteRequest {
    /// Bare identifier, `/uploads/{id}`, or `/api/serve-image?file={id}`.
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

// ── Router ──────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new().route("/api/delete", post(delete_image))
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /api/delete: Delete a stored image.
#[utoipa::path(
    post,
    path = "/api/delete",
    request_body = DeleteRequest,
    responses(
        (status = 200, description = "Image deleted", body = DeleteResponse),
        (status = 400, description = "Missing or invalid filename", body = crate::error::ErrorBody),
        (status = 404, description = "No such image", body = crate::error::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody),
    ),
    tag = "images"
)]
async fn delete_image(
    State(state): State<AppState>,
    body: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Json<DeleteResponse>, AppError> {
    let req = extract_json(body)?;
    let reference = req
        .filename
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("filename is required".to_string()))?;

    let id = id_from_reference(&reference)?;
    state.store.delete(id.as_str()).await?;

    Ok(Json(DeleteResponse {
        success: true,
        message: "File deleted successfully".to_string(),
    }))
}

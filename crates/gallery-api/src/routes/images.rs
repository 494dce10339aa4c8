//! # Images: Listing and Serving
//!
//! ## Endpoints
//!
//! - `GET /api/images`: public paths of every stored image, newest first
//! - `GET /api/serve-image?file={id}`: raw image bytes
//! - `GET /uploads/:file`: raw image bytes, identifier from the path

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE,
};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use gallery_core::StoredObject;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::public::{serve_path, SERVE_IMAGE_PATH, UPLOADS_PREFIX};
use crate::state::AppState;

/// `Cache-Control` sent with every served image.
pub const CACHE_POLICY: &str = "public, max-age=0, must-revalidate";

// ── Request/Response DTOs ───────────────────────────────────────────

/// Gallery listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImageListResponse {
    /// `/api/serve-image?file={id}&t={ms}` for each image, newest first.
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ServeImageQuery {
    /// Image identifier.
    pub file: Option<String>,
    /// Cache buster; ignored.
    pub t: Option<String>,
}

// ── Router ──────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/images", get(list_images))
        .route(SERVE_IMAGE_PATH, get(serve_image))
        .route(&format!("{UPLOADS_PREFIX}/:file"), get(serve_upload))
}

// ── Handlers ────────────────────────────────────────────────────────

/// GET /api/images: List stored images.
///
/// A storage failure is logged and reported as an empty gallery.
#[utoipa::path(
    get,
    path = "/api/images",
    responses(
        (status = 200, description = "Public paths, newest first", body = ImageListResponse),
    ),
    tag = "images"
)]
async fn list_images(State(state): State<AppState>) -> Json<ImageListResponse> {
    let ids = match state.store.list().await {
        Ok(ids) => ids,
        Err(err) => {
            tracing::error!(error = %err, "listing failed, returning empty gallery");
            Vec::new()
        }
    };

    let now = state.clock.now_ms();
    Json(ImageListResponse {
        images: ids.iter().map(|id| serve_path(id, now)).collect(),
    })
}

/// GET /api/serve-image: Serve an image by query parameter.
#[utoipa::path(
    get,
    path = "/api/serve-image",
    params(ServeImageQuery),
    responses(
        (status = 200, description = "Image bytes", content_type = "application/octet-stream"),
        (status = 400, description = "Missing file parameter", body = crate::error::ErrorBody),
        (status = 404, description = "No such image", body = crate::error::ErrorBody),
    ),
    tag = "images"
)]
async fn serve_image(
    State(state): State<AppState>,
    query: Result<Query<ServeImageQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query.map_err(|err| AppError::BadRequest(err.body_text()))?;
    let file = query
        .file
        .filter(|f| !f.is_empty())
        .ok_or_else(|| AppError::BadRequest("file parameter is required".to_string()))?;

    let object = state.store.get(&file).await?;
    Ok(image_response(object))
}

/// GET /uploads/:file: Serve an image by path.
#[utoipa::path(
    get,
    path = "/uploads/{file}",
    params(("file" = String, Path, description = "Image identifier")),
    responses(
        (status = 200, description = "Image bytes", content_type = "application/octet-stream"),
        (status = 404, description = "No such image", body = crate::error::ErrorBody),
    ),
    tag = "images"
)]
async fn serve_upload(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<Response, AppError> {
    let object = state.store.get(&file).await?;
    Ok(image_response(object))
}

/// Raw bytes with the content type, length and caching headers every
/// serve path shares.
fn image_response(object: StoredObject) -> Response {
    let headers = [
        (CONTENT_TYPE, HeaderValue::from_static(object.content_type)),
        (CONTENT_LENGTH, HeaderValue::from(object.len())),
        (CACHE_CONTROL, HeaderValue::from_static(CACHE_POLICY)),
        (ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
    ];
    (headers, object.bytes).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::ObjectId;
    use http_body_util::BodyExt;

    fn object(name: &str, content_type: &'static str, bytes: &[u8]) -> StoredObject {
        StoredObject {
            id: ObjectId::sanitize(name).unwrap(),
            bytes: bytes.to_vec(),
            content_type,
        }
    }

    #[tokio::test]
    async fn image_response_sets_serving_headers() {
        let response = image_response(object("1-cat.png", "image/png", b"png-bytes"));
        let headers = response.headers();
        assert_eq!(headers[CONTENT_TYPE], "image/png");
        assert_eq!(headers[CONTENT_LENGTH], "9");
        assert_eq!(headers[CACHE_CONTROL], CACHE_POLICY);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"png-bytes");
    }

    #[test]
    fn image_response_keeps_octet_stream_for_unknown_types() {
        let response = image_response(object("1-notes.bin", "application/octet-stream", b""));
        assert_eq!(response.headers()[CONTENT_TYPE], "application/octet-stream");
        assert_eq!(response.headers()[CONTENT_LENGTH], "0");
    }
}

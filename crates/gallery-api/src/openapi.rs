//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented gallery routes into one OpenAPI
//! document served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the gallery API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gallery API",
        version = "0.1.0",
        description = "Upload, list, serve, and delete images held in a filesystem object store.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::upload::upload_image,
        crate::routes::images::list_images,
        crate::routes::images::serve_image,
        crate::routes::images::serve_upload,
        crate::routes::delete::delete_image,
    ),
    components(schemas(
        // Error types
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        // Image DTOs
        crate::routes::upload::UploadResponse,
        crate::routes::images::ImageListResponse,
        crate::routes::delete::DeleteRequest,
        crate::routes::delete::DeleteResponse,
    )),
    tags(
        (name = "images", description = "Image upload, listing, serving, and deletion"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_gallery_path() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/upload",
            "/api/images",
            "/api/serve-image",
            "/uploads/{file}",
            "/api/delete",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}

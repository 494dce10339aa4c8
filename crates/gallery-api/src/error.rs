//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps [`StoreError`] variants to HTTP status codes and a uniform JSON
//! failure body (`success: false` plus code and message). Internal error
//! details are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gallery_core::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// Every failure response uses this shape so the gallery UI can report
/// errors from any endpoint the same way.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorBody {
    /// Build a failure body.
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Image not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Input was well-formed but not acceptable, e.g. a non-image upload (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing file, missing file name, or unparseable request (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Upload exceeded the configured body limit (413).
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::NotFound(_) => tracing::debug!(error = %self, "not found"),
            _ => tracing::info!(error = %self, "request rejected"),
        }

        (status, Json(ErrorBody::new(code, message))).into_response()
    }
}

/// Convert store errors to API errors.
///
/// Store validation failures come from request input (identifiers, file
/// names), so they surface as 400. Filesystem failures are 500.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(msg) => Self::BadRequest(msg),
            StoreError::NotFound(id) => Self::NotFound(format!("image {id}")),
            other @ (StoreError::StorageWrite { .. }
            | StoreError::StorageList { .. }
            | StoreError::StorageRead { .. }
            | StoreError::StorageDelete { .. }) => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (AppError::Validation("x".into()), StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            (AppError::PayloadTooLarge("x".into()), StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            (AppError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status_and_code(), (status, code), "{err:?}");
        }
    }

    #[test]
    fn store_not_found_maps_to_404() {
        let err = AppError::from(StoreError::NotFound("1-a.png".into()));
        assert!(matches!(&err, AppError::NotFound(msg) if msg.contains("1-a.png")));
    }

    #[test]
    fn store_validation_maps_to_400() {
        let err = AppError::from(StoreError::Validation("identifier must not be empty".into()));
        assert_eq!(err.status_and_code().0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_failures_map_to_500() {
        let err = AppError::from(StoreError::StorageWrite {
            path: PathBuf::from("/srv/uploads"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        });
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_body_serializes() {
        let json = serde_json::to_string(&ErrorBody::new("TEST", "test message")).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("TEST"));
        assert!(json.contains("test message"));
    }

    #[test]
    fn error_body_has_exactly_code_and_message() {
        let value = serde_json::to_value(ErrorBody::new("NOT_FOUND", "image 1-a.png")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "success": false,
                "error": {"code": "NOT_FOUND", "message": "image 1-a.png"}
            })
        );
    }

    // ── into_response tests ──────────────────────────────────────

    use http_body_util::BodyExt;

    /// Helper to extract status and body from a Response.
    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn into_response_not_found() {
        let (status, body) = response_parts(AppError::NotFound("image 1-a.png".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!body.success);
        assert_eq!(body.error.code, "NOT_FOUND");
        assert!(body.error.message.contains("1-a.png"));
    }

    #[tokio::test]
    async fn into_response_internal_hides_details() {
        let (status, body) = response_parts(AppError::from(StoreError::StorageDelete {
            path: PathBuf::from("/srv/uploads/secret-layout"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        }))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert!(
            !body.error.message.contains("secret-layout"),
            "internal error details must not leak: {}",
            body.error.message
        );
        assert_eq!(body.error.message, "An internal error occurred");
    }
}

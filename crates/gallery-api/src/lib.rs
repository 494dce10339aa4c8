//! # gallery-api: Axum HTTP Service for the Image Gallery
//!
//! Exposes the [`gallery_core::ObjectStore`] operations over HTTP for a
//! browser gallery: upload, list, serve, and delete.
//!
//! ## API Surface
//!
//! | Path                  | Module               | Operation |
//! |-----------------------|----------------------|-----------|
//! | `/api/upload`         | [`routes::upload`]   | Put       |
//! | `/api/images`         | [`routes::images`]   | List      |
//! | `/api/serve-image`    | [`routes::images`]   | Get       |
//! | `/uploads/:file`      | [`routes::images`]   | Get       |
//! | `/api/delete`         | [`routes::delete`]   | Delete    |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → DefaultBodyLimit → Handler
//! ```
//!
//! ## OpenAPI
//!
//! Auto-generated OpenAPI spec via utoipa derive macros at `/openapi.json`.

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod public;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Router};

use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes and `/metrics` are mounted outside the metrics middleware.
pub fn app(state: AppState) -> Router {
    let metrics = ApiMetrics::new();
    let metrics_on = state.config.metrics_enabled;

    let mut api = Router::new()
        .merge(routes::upload::router())
        .merge(routes::images::router())
        .merge(routes::delete::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes));

    if metrics_on {
        api = api
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(Extension(metrics.clone()));
    }

    let api = api
        .layer(middleware::tracing_layer::layer())
        .with_state(state.clone());

    let mut probes = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    if metrics_on {
        probes = probes
            .route("/metrics", get(prometheus_metrics))
            .layer(Extension(metrics));
    }

    let probes = probes.with_state(state);

    Router::new().merge(probes).merge(api)
}

/// GET /metrics: Prometheus metrics scrape endpoint.
///
/// Refreshes the object gauge from the store, then encodes every metric
/// in Prometheus text exposition format.
async fn prometheus_metrics(
    State(state): State<AppState>,
    Extension(metrics): Extension<ApiMetrics>,
) -> impl IntoResponse {
    match state.store.list().await {
        Ok(ids) => metrics.set_objects_total(ids.len()),
        Err(e) => tracing::warn!(error = %e, "object gauge not refreshed"),
    }

    match metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode Prometheus metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 "ready" when the storage root can be listed.
///
/// An absent root is ready (it is created on first upload); a root that
/// exists but cannot be read is 503.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.list().await {
        Ok(_) => (StatusCode::OK, "ready").into_response(),
        Err(e) => {
            tracing::warn!("Storage health check failed: {e}");
            (StatusCode::SERVICE_UNAVAILABLE, "storage unavailable").into_response()
        }
    }
}

//! # gallery-api: Binary Entry Point
//!
//! Starts the Axum HTTP server for the image gallery.
//! Every flag falls back to an environment variable.

use std::path::PathBuf;

use clap::Parser;
use gallery_api::state::{AppConfig, AppState, DEFAULT_MAX_UPLOAD_BYTES};
use gallery_core::StorageConfig;

/// Image gallery HTTP service.
#[derive(Parser, Debug)]
#[command(name = "gallery-api", version, about)]
struct Cli {
    /// Directory holding stored images. Relative paths resolve against the
    /// working directory.
    #[arg(long, env = "GALLERY_STORAGE_ROOT")]
    storage_root: Option<PathBuf>,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Request body limit for uploads, in bytes.
    #[arg(long, env = "GALLERY_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,

    /// Accept uploads whose extension is not a known image type.
    #[arg(long, env = "GALLERY_ALLOW_ANY_TYPE")]
    allow_any_type: bool,

    /// Serve `/metrics` and record request metrics.
    #[arg(
        long,
        env = "GALLERY_METRICS_ENABLED",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    metrics: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize structured tracing.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if cli.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let storage = StorageConfig::resolve(cli.storage_root).map_err(|e| {
        tracing::error!("Storage configuration failed: {e}");
        e
    })?;

    let config = AppConfig {
        port: cli.port,
        storage,
        max_upload_bytes: cli.max_upload_bytes,
        allow_any_type: cli.allow_any_type,
        metrics_enabled: cli.metrics,
    };
    tracing::info!(
        storage_root = %config.storage.storage_root.display(),
        max_upload_bytes = config.max_upload_bytes,
        allow_any_type = config.allow_any_type,
        metrics = config.metrics_enabled,
        "configuration loaded"
    );

    let port = config.port;
    let app = gallery_api::app(AppState::new(config));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Gallery API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

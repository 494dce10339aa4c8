//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! The only shared resource between requests is the filesystem behind
//! [`ObjectStore`]; the state itself is immutable after construction and
//! cheap to clone.

use std::sync::Arc;

use gallery_core::{Clock, ObjectStore, StorageConfig, SystemClock};

/// Default upload body limit: 25 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Application configuration, fixed at process start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Where stored images live.
    pub storage: StorageConfig,
    /// Request body limit for uploads.
    pub max_upload_bytes: usize,
    /// Accept uploads whose extension is not in the image table.
    pub allow_any_type: bool,
    /// Mount `/metrics` and record request metrics.
    pub metrics_enabled: bool,
}

impl AppConfig {
    /// Defaults for everything except the storage root.
    pub fn new(storage: StorageConfig) -> Self {
        Self {
            port: 3000,
            storage,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allow_any_type: false,
            metrics_enabled: true,
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<ObjectStore>,
    /// Time source shared with the store; also stamps cache-busting
    /// parameters on listed paths.
    pub clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("store", &self.store)
            .finish()
    }
}

impl AppState {
    /// Build state over the configured storage root using wall-clock time.
    pub fn new(config: AppConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build state with an explicit time source.
    pub fn with_clock(config: AppConfig, clock: Arc<dyn Clock>) -> Self {
        let store = ObjectStore::with_clock(&config.storage, Arc::clone(&clock));
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            clock,
        }
    }
}

//! # Error Hierarchy
//!
//! Structured error types for the object store, built with `thiserror`.
//!
//! Storage variants carry the path that was being touched and the
//! underlying I/O error so operators can diagnose permissions or disk
//! problems from the log line alone.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by [`ObjectStore`](crate::ObjectStore) operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Missing or malformed input (empty name, `..`, NUL bytes).
    #[error("validation error: {0}")]
    Validation(String),

    /// The identifier does not name a stored object.
    #[error("object not found: {0}")]
    NotFound(String),

    /// The storage root could not be created or the object could not be written.
    #[error("failed to write {path}: {source}")]
    StorageWrite {
        /// Path being created or written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The storage root exists but could not be read.
    #[error("failed to list {path}: {source}")]
    StorageList {
        /// The storage root.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The object exists but its contents could not be read.
    #[error("failed to read {path}: {source}")]
    StorageRead {
        /// Path of the object.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The object exists but could not be removed.
    #[error("failed to delete {path}: {source}")]
    StorageDelete {
        /// Path of the object.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Whether this error reports an absent object.
    ///
    /// Readers racing a delete see `NotFound`; callers treat it as non-fatal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#![deny(missing_docs)]

//! # gallery-core: Object Store for the Image Gallery
//!
//! This crate owns everything the gallery persists. It has no HTTP
//! dependencies; the API crate is a thin collaborator over [`ObjectStore`].
//!
//! ## Design Principles
//!
//! 1. **The directory is the state.** There is no index and no metadata
//!    database. Listing reads the storage root on every call.
//!
//! 2. **[`ObjectId`] is the sole path to a filesystem location.** Every
//!    identifier arriving from a request is reduced to its base name by
//!    [`ObjectId::sanitize`] before it is joined onto the storage root, so
//!    no operation can resolve outside the root.
//!
//! 3. **Configuration is explicit.** The storage root is resolved once by
//!    [`StorageConfig::resolve`] and handed to the store at construction.
//!
//! 4. **[`StoreError`] taxonomy.** Structured errors with `thiserror`; no
//!    `.unwrap()` outside tests.

pub mod clock;
pub mod config;
pub mod error;
pub mod id;
pub mod mime;
pub mod store;

// Re-export primary types at crate root for ergonomic imports.
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, StorageConfig};
pub use error::StoreError;
pub use id::ObjectId;
pub use mime::{content_type_for, is_known_image, OCTET_STREAM};
pub use store::{ObjectStore, StoredObject};

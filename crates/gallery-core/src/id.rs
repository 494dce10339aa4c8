//! # Object Identifiers
//!
//! An identifier names one stored object and doubles as its file name in
//! the storage root: `{creation_timestamp_ms}-{original_name}`.
//!
//! Identifiers reach the store from request parameters, so construction
//! always reduces the input to its base name. Both `/` and `\` count as
//! separators regardless of platform, which makes `../../etc/passwd`,
//! `/etc/passwd` and `..\\boot.ini` collapse to a single path component.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A sanitized object identifier.
///
/// Always a single, non-empty path component: never `.` or `..`, never
/// containing a separator or NUL byte. Ordering is lexicographic, which for
/// identifiers minted by the store is creation order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// Reduce `raw` to its base name and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] when nothing usable remains after
    /// stripping directory components.
    pub fn sanitize(raw: &str) -> Result<Self, StoreError> {
        let base = base_name(raw);
        if base.is_empty() {
            return Err(StoreError::Validation(
                "identifier must not be empty".to_string(),
            ));
        }
        if base == "." || base == ".." {
            return Err(StoreError::Validation(format!(
                "identifier \"{raw}\" does not name a file"
            )));
        }
        if base.contains('\0') {
            return Err(StoreError::Validation(
                "identifier must not contain NUL bytes".to_string(),
            ));
        }
        Ok(Self(base.to_string()))
    }

    /// Mint the identifier for an upload of `original_name` at `timestamp_ms`.
    ///
    /// The original name goes through the same base-name reduction as any
    /// other identifier, so a multipart filename such as `C:\pics\cat.png`
    /// is stored as `{ts}-cat.png`.
    pub fn compose(timestamp_ms: u64, original_name: &str) -> Result<Self, StoreError> {
        let name = Self::sanitize(original_name).map_err(|_| {
            StoreError::Validation(format!(
                "original file name \"{original_name}\" is empty or not a file name"
            ))
        })?;
        Ok(Self(format!("{timestamp_ms}-{}", name.0)))
    }

    /// The file extension without the leading dot, as written.
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.0).extension().and_then(|e| e.to_str())
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Everything after the last `/` or `\`.
fn base_name(raw: &str) -> &str {
    match raw.rfind(['/', '\\']) {
        Some(pos) => &raw[pos + 1..],
        None => raw,
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ObjectId {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::sanitize(&value)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

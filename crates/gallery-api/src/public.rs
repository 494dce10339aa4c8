//! Public paths.
//!
//! The display layer reaches objects through two references:
//!
//! - `/uploads/{id}`, returned by upload;
//! - `/api/serve-image?file={id}&t={ms}`, returned by the listing. The `t`
//!   parameter busts browser caches and is ignored by the server.
//!
//! Identifiers are percent-encoded when placed in either form. Neither
//! form is stable across store reconfiguration; clients re-fetch the
//! listing instead of caching paths.

use gallery_core::{ObjectId, StoreError};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use url::form_urlencoded;

/// Route prefix for direct object paths.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Route for query-parameter serving.
pub const SERVE_IMAGE_PATH: &str = "/api/serve-image";

/// Characters escaped inside a path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// `/uploads/{id}`.
pub fn upload_path(id: &ObjectId) -> String {
    format!(
        "{UPLOADS_PREFIX}/{}",
        utf8_percent_encode(id.as_str(), SEGMENT)
    )
}

/// `/api/serve-image?file={id}&t={cache_buster_ms}`.
pub fn serve_path(id: &ObjectId, cache_buster_ms: u64) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("file", id.as_str())
        .append_pair("t", &cache_buster_ms.to_string())
        .finish();
    format!("{SERVE_IMAGE_PATH}?{query}")
}

/// Recover the identifier from any reference a client may hold.
///
/// Accepts a bare identifier, an `/uploads/{id}` path, or a route path
/// carrying `?file={id}`. Only references starting with `/` are parsed;
/// anything else is a bare identifier and is taken literally, `?`, `%`
/// and surrounding whitespace included.
pub fn id_from_reference(raw: &str) -> Result<ObjectId, StoreError> {
    if !raw.starts_with('/') {
        return ObjectId::sanitize(raw);
    }

    let (path, query) = match raw.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (raw, None),
    };

    if let Some(encoded) = path.strip_prefix(UPLOADS_PREFIX).and_then(|rest| rest.strip_prefix('/')) {
        return ObjectId::sanitize(&percent_decode_str(encoded).decode_utf8_lossy());
    }

    let file = query.and_then(|q| {
        form_urlencoded::parse(q.as_bytes())
            .find(|(k, _)| k == "file")
            .map(|(_, v)| v.into_owned())
    });
    match file {
        Some(file) => ObjectId::sanitize(&file),
        None => ObjectId::sanitize(raw),
    }
}

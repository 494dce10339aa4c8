//! # Content Types
//!
//! Fixed extension → MIME table consulted at serve time. Lookup is
//! case-insensitive; anything not in the table is served as
//! `application/octet-stream`.

/// Content type for extensions outside the table.
pub const OCTET_STREAM: &str = "application/octet-stream";

const TABLE: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("bmp", "image/bmp"),
    ("ico", "image/x-icon"),
    ("tiff", "image/tiff"),
    ("tif", "image/tiff"),
];

fn lookup(extension: &str) -> Option<&'static str> {
    TABLE
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, mime)| *mime)
}

/// Content type for a file extension (without the leading dot).
pub fn content_type_for(extension: Option<&str>) -> &'static str {
    extension.and_then(lookup).unwrap_or(OCTET_STREAM)
}

/// Whether the extension is one of the image types in the table.
pub fn is_known_image(extension: Option<&str>) -> bool {
    extension.and_then(lookup).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_entry_resolves() {
        assert_eq!(content_type_for(Some("jpg")), "image/jpeg");
        assert_eq!(content_type_for(Some("jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Some("png")), "image/png");
        assert_eq!(content_type_for(Some("gif")), "image/gif");
        assert_eq!(content_type_for(Some("webp")), "image/webp");
        assert_eq!(content_type_for(Some("svg")), "image/svg+xml");
        assert_eq!(content_type_for(Some("bmp")), "image/bmp");
        assert_eq!(content_type_for(Some("ico")), "image/x-icon");
        assert_eq!(content_type_for(Some("tiff")), "image/tiff");
        assert_eq!(content_type_for(Some("tif")), "image/tiff");
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(content_type_for(Some("PNG")), "image/png");
        assert_eq!(content_type_for(Some("JpEg")), "image/jpeg");
    }

    #[test]
    fn unknown_and_missing_fall_back() {
        assert_eq!(content_type_for(Some("exe")), OCTET_STREAM);
        assert_eq!(content_type_for(None), OCTET_STREAM);
        assert!(!is_known_image(Some("txt")));
        assert!(!is_known_image(None));
        assert!(is_known_image(Some("WEBP")));
    }
}

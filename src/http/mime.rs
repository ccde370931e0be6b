//! MIME type detection module
//!
//! Returns the Content-Type for a file based on its extension.

use std::path::Path;

/// Get MIME Content-Type for a file path, `application/octet-stream` when unknown
pub fn content_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

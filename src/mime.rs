use std::path::Path;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// MIME type for an asset, never failing.
///
/// Consults the platform extension table first, then the built-in image table,
/// and finally falls back to `application/octet-stream`.
pub fn classify_mime_type(path: &Path) -> String {
    if let Some(mime) = mime_guess::from_path(path).first_raw() {
        return mime.to_string();
    }
    fallback_mime_type(path).to_string()
}

/// Built-in table for the image types the tool inlines by default.
pub fn fallback_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        _ => OCTET_STREAM,
    }
}

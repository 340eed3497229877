use image::ImageFormat;
use std::path::Path;

pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Content type a file would be declared with, judged by its extension.
pub fn declared_mime_type(path: &Path) -> &'static str {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME)
}

pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

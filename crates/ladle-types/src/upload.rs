//! File upload contract shared by the widget and the upload endpoint.
//!
//! Validation runs on both sides: the widget rejects a file before any
//! network call, and the endpoint repeats the check before passing the bytes
//! to the media store.

use serde::{Deserialize, Serialize};

/// Maximum accepted upload size in bytes (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// MIME types accepted for upload.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
    "text/plain",
    "text/csv",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Result of a successful upload, as returned by `POST /api/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub url: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("File size must be less than 10MB")]
    TooLarge { size: u64 },

    #[error("File type not supported")]
    UnsupportedType { mime_type: String },

    #[error("File uploads are disabled")]
    Disabled,

    #[error("{0}")]
    Failed(String),
}

/// Check a file against the size and type rules.
///
/// Size is checked before type, so an oversized file of an unsupported type
/// reports the size violation.
pub fn validate_upload(mime_type: &str, size: u64) -> Result<(), UploadError> {
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge { size });
    }

    if !ALLOWED_MIME_TYPES.contains(&mime_type) {
        return Err(UploadError::UnsupportedType {
            mime_type: mime_type.to_string(),
        });
    }

    Ok(())
}

/// Best-effort MIME type for a file extension, limited to accepted types.
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    let mime = match extension.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => return None,
    };
    Some(mime)
}

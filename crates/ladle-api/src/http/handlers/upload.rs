//! File upload endpoint.
//!
//! POST /api/upload (multipart, `file` field)
//!
//! Repeats the widget's size and type checks, then hands the bytes to the
//! media store under the `chat-uploads` folder.

use axum::Json;
use axum::extract::State;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;

use ladle_core::upload::{FileUpload, accept_upload};
use ladle_types::upload::{MAX_UPLOAD_BYTES, UploadError, UploadedFile, mime_for_extension};

use crate::http::error::AppError;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

/// POST /api/upload -- validate and store one file.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadedFile>, AppError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or("upload").to_string();
        let mime_type = field
            .content_type()
            .map(str::to_string)
            .or_else(|| guess_mime(&name).map(str::to_string))
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let bytes = field.bytes().await.map_err(multipart_error)?;

        upload = Some(FileUpload::new(name, mime_type, bytes));
        break;
    }

    let upload = upload.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;
    let uploaded = accept_upload(state.media.as_ref(), upload)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "upload rejected"))?;

    Ok(Json(uploaded))
}

fn guess_mime(name: &str) -> Option<&'static str> {
    let (_, extension) = name.rsplit_once('.')?;
    mime_for_extension(extension)
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Upload(UploadError::TooLarge {
            size: MAX_UPLOAD_BYTES + 1,
        })
    } else {
        AppError::Validation(format!("Invalid upload: {}", e.body_text()))
    }
}

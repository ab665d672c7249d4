//! Application error type mapping to HTTP status codes.
//!
//! Every failure is returned as `{"error": "..."}` carrying a message that
//! is safe to show to end users.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use ladle_core::chat::prompt::RequestError;
use ladle_types::llm::UpstreamError;
use ladle_types::upload::UploadError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Malformed request.
    Validation(String),
    /// Upstream failed before any content was streamed.
    Upstream(UpstreamError),
    /// Upload rejected or failed.
    Upload(UploadError),
}

impl From<RequestError> for AppError {
    fn from(e: RequestError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<UpstreamError> for AppError {
    fn from(e: UpstreamError) -> Self {
        AppError::Upstream(e)
    }
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        AppError::Upload(e)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Upload(UploadError::Failed(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upload(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Upstream(e) => e.public_message(),
            AppError::Upload(e) => e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::from(RequestError::MissingMessages).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(UpstreamError::AuthFailed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(UploadError::UnsupportedType {
                mime_type: "video/mp4".into()
            })
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(UploadError::Failed("Failed to upload file".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_message_is_public() {
        let err = AppError::from(UpstreamError::Failure {
            message: "HTTP 502: upstream exploded".into(),
        });
        assert_eq!(err.message(), "Failed to generate AI response. Please try again.");
    }
}

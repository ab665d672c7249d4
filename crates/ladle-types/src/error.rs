use thiserror::Error;

/// Errors from session persistence.
///
/// A missing or unreadable blob is not an error; stores report it as
/// `Ok(None)`. These variants cover failures to write or remove it.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(String),
}

/// Errors from the widget's transport to the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("chat endpoint returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),
}

/// Errors from the content provider's object API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("content request failed with status {status}")]
    Status { status: u16 },

    #[error("content request failed: {0}")]
    Request(String),

    #[error("invalid content response: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::Status {
            status: 500,
            message: "Failed to generate AI response. Please try again.".into(),
        };
        assert_eq!(
            err.to_string(),
            "chat endpoint returned 500: Failed to generate AI response. Please try again."
        );
    }

    #[test]
    fn test_content_error_display() {
        assert_eq!(
            ContentError::Status { status: 403 }.to_string(),
            "content request failed with status 403"
        );
    }
}

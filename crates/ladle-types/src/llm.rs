//! Upstream text-generation request and error types.
//!
//! The upstream provider accepts a message list and yields text fragments, a
//! usage summary and an end marker, or fails with a small set of errors.

use serde::{Deserialize, Serialize};

use crate::chat::UpstreamMessage;

/// Request for a streamed text generation.
///
/// `instructions` carries system instructions and grounding context separately
/// from the conversational `messages`, ordered as they should be seen by the
/// model. Providers that lack a system role flatten them with
/// [`GenerateTextRequest::provider_messages`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateTextRequest {
    pub instructions: Vec<String>,
    pub messages: Vec<UpstreamMessage>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

impl GenerateTextRequest {
    /// Instruction blocks as leading assistant-role messages, followed by the
    /// conversation history.
    pub fn provider_messages(&self) -> Vec<UpstreamMessage> {
        self.instructions
            .iter()
            .map(|block| UpstreamMessage::assistant(block.clone()))
            .chain(self.messages.iter().cloned())
            .collect()
    }
}

/// Errors from the upstream provider.
///
/// `Display` is the diagnostic form; [`UpstreamError::public_message`] is what
/// end users and error frames see.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamError {
    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("authentication failed")]
    AuthFailed,

    #[error("upstream failure: {message}")]
    Failure { message: String },

    #[error("upstream timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },
}

impl UpstreamError {
    /// Whether the same request may succeed if the user sends it again.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, UpstreamError::AuthFailed)
    }

    /// User-facing description of the failure.
    pub fn public_message(&self) -> String {
        match self {
            UpstreamError::RateLimited { .. } => {
                "Rate limit exceeded. Please try again later.".to_string()
            }
            UpstreamError::AuthFailed => {
                "Authentication failed. Please check your API key.".to_string()
            }
            UpstreamError::Failure { .. } => {
                "Failed to generate AI response. Please try again.".to_string()
            }
            UpstreamError::Timeout { .. } => {
                "The AI service took too long to respond. Please try again.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::MessageRole;

    #[test]
    fn test_provider_messages_prepends_instructions() {
        let request = GenerateTextRequest {
            instructions: vec!["context".into(), "persona".into()],
            messages: vec![UpstreamMessage::user("hi")],
            max_tokens: 100,
            media_url: None,
        };
        let flat = request.provider_messages();
        assert_eq!(flat.len(), 3);
        assert_eq!(flat[0], UpstreamMessage::assistant("context"));
        assert_eq!(flat[1], UpstreamMessage::assistant("persona"));
        assert_eq!(flat[2].role, MessageRole::User);
    }

    #[test]
    fn test_retryability() {
        assert!(UpstreamError::RateLimited { retry_after_ms: None }.is_retryable());
        assert!(!UpstreamError::AuthFailed.is_retryable());
        assert!(
            UpstreamError::Failure {
                message: "x".into()
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_public_message_hides_detail() {
        let err = UpstreamError::Failure {
            message: "HTTP 502: bad gateway".into(),
        };
        assert!(err.to_string().contains("502"));
        assert!(!err.public_message().contains("502"));
        assert_eq!(
            UpstreamError::RateLimited {
                retry_after_ms: Some(1000)
            }
            .public_message(),
            "Rate limit exceeded. Please try again later."
        );
    }
}

//! Chat session and message types for Ladle.
//!
//! These types model one widget conversation: the ordered messages a user
//! sees, the session blob persisted in client storage, and the request body
//! the widget posts to the chat endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Role of a message in a widget conversation.
///
/// The upstream provider has no distinct system role, so only the two
/// conversational roles exist on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single conversational turn shown in the widget.
///
/// `content` may only change while `is_streaming` is true; once a message is
/// committed to a session it is immutable and never streaming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// True only for the one assistant message being assembled from a stream.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_streaming: bool,
}

/// One widget conversation, persisted as a single blob.
///
/// Messages are kept in conversational order and never reordered.
/// `updated_at` advances on every committed append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: Uuid,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A message as sent upstream: role and content only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamMessage {
    pub role: MessageRole,
    pub content: String,
}

impl UpstreamMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Vec<UpstreamMessage>,
    /// Media reference attached to the upstream call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    /// Bound on generation length; the endpoint supplies a default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::User, MessageRole::Assistant] {
            let s = role.to_string();
            let parsed: MessageRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
        assert!("system".parse::<MessageRole>().is_err());
    }

    #[test]
    fn test_message_role_serde() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn test_committed_message_omits_streaming_flag() {
        let msg = ChatMessage {
            id: Uuid::now_v7(),
            role: MessageRole::User,
            content: "hi".to_string(),
            timestamp: Utc::now(),
            is_streaming: false,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json.get("isStreaming").is_none());
        assert_eq!(json["role"], "user");
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn test_session_blob_uses_camel_case() {
        let now = Utc::now();
        let session = ChatSession {
            id: Uuid::now_v7(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn test_chat_request_optional_fields() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"messages":[{"role":"user","content":"hello"}]}"#).unwrap();
        assert_eq!(req.messages, vec![UpstreamMessage::user("hello")]);
        assert!(req.file_url.is_none());
        assert!(req.max_tokens.is_none());

        let req: ChatRequest = serde_json::from_str(
            r#"{"messages":[],"fileUrl":"https://cdn/x.png","maxTokens":800}"#,
        )
        .unwrap();
        assert_eq!(req.file_url.as_deref(), Some("https://cdn/x.png"));
        assert_eq!(req.max_tokens, Some(800));

        let json = serde_json::to_string(&ChatRequest {
            messages: vec![UpstreamMessage::assistant("a")],
            file_url: None,
            max_tokens: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"messages":[{"role":"assistant","content":"a"}]}"#);
    }
}

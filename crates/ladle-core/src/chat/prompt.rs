//! Chat request validation and upstream prompt assembly.

use ladle_types::chat::{ChatRequest, UpstreamMessage};
use ladle_types::llm::GenerateTextRequest;
use serde_json::Value;

/// Fixed persona and guidelines sent ahead of every conversation.
pub const SYSTEM_PROMPT: &str = "\
You are a helpful AI cooking assistant and customer support agent for a recipe website.

Your primary role is to:
- Help users find and understand recipes
- Provide cooking advice and techniques
- Suggest recipe alternatives and substitutions
- Answer questions about ingredients, preparation methods, and cooking times
- Share information about our chefs and their specialties
- Help users based on reviews and ratings from other cooks

Use the knowledge base provided to give specific, accurate information about available recipes. \
When users ask about recipes, always reference the actual recipes in our database when possible.

Be friendly, knowledgeable, and practical in your responses. \
If analyzing a file, explain what you found in an accessible way.";

/// Why a chat request body was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("Invalid JSON body")]
    InvalidJson,

    #[error("Messages array is required")]
    MissingMessages,

    #[error("Messages array must not be empty")]
    EmptyMessages,

    #[error("Invalid message at index {index}: {reason}")]
    InvalidMessage { index: usize, reason: String },

    #[error("{field} must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

/// Validate a raw `POST /api/chat` body.
///
/// The body is checked structurally before it is typed so each failure
/// reports a specific reason rather than a serde message.
pub fn parse_chat_request(body: &[u8]) -> Result<ChatRequest, RequestError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| RequestError::InvalidJson)?;
    let object = value.as_object().ok_or(RequestError::InvalidJson)?;

    let entries = object
        .get("messages")
        .and_then(Value::as_array)
        .ok_or(RequestError::MissingMessages)?;
    if entries.is_empty() {
        return Err(RequestError::EmptyMessages);
    }

    let mut messages = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let invalid = |reason: &str| RequestError::InvalidMessage {
            index,
            reason: reason.to_string(),
        };
        let role = entry
            .get("role")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("role is required"))?;
        let role = role
            .parse()
            .map_err(|_| invalid("role must be \"user\" or \"assistant\""))?;
        let content = entry
            .get("content")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("content must be a string"))?;
        messages.push(UpstreamMessage {
            role,
            content: content.to_string(),
        });
    }

    let file_url = match object.get("fileUrl") {
        None | Some(Value::Null) => None,
        Some(Value::String(url)) if url.is_empty() => None,
        Some(Value::String(url)) => Some(url.clone()),
        Some(_) => {
            return Err(RequestError::InvalidField {
                field: "fileUrl",
                expected: "a string",
            });
        }
    };

    let max_tokens = match object.get("maxTokens") {
        None | Some(Value::Null) => None,
        Some(v) => Some(
            v.as_u64()
                .filter(|n| *n > 0)
                .and_then(|n| u32::try_from(n).ok())
                .ok_or(RequestError::InvalidField {
                    field: "maxTokens",
                    expected: "a positive integer",
                })?,
        ),
    };

    Ok(ChatRequest {
        messages,
        file_url,
        max_tokens,
    })
}

/// Assemble the upstream request: system prompt first, then the history.
///
/// Knowledge context is inserted ahead of the system prompt by the stream
/// adapter, not here.
pub fn build_generate_request(request: ChatRequest, default_max_tokens: u32) -> GenerateTextRequest {
    GenerateTextRequest {
        instructions: vec![SYSTEM_PROMPT.to_string()],
        messages: request.messages,
        max_tokens: request.max_tokens.unwrap_or(default_max_tokens),
        media_url: request.file_url,
    }
}

//! Session and message operations.
//!
//! Sessions are append-only from the caller's point of view: committed
//! messages are never edited or reordered, and `updated_at` advances on every
//! append.

use chrono::Utc;
use ladle_types::chat::{ChatMessage, ChatSession, MessageRole, UpstreamMessage};
use uuid::Uuid;

/// Create a message with a fresh id and the current timestamp.
pub fn create_message(
    role: MessageRole,
    content: impl Into<String>,
    is_streaming: bool,
) -> ChatMessage {
    ChatMessage {
        id: Uuid::now_v7(),
        role,
        content: content.into(),
        timestamp: Utc::now(),
        is_streaming,
    }
}

/// Create an empty session with matching created/updated timestamps.
pub fn create_session() -> ChatSession {
    let now = Utc::now();
    ChatSession {
        id: Uuid::now_v7(),
        messages: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

/// Create a session seeded with one assistant greeting.
pub fn create_greeting_session(greeting: &str) -> ChatSession {
    let mut session = create_session();
    commit_message(
        &mut session,
        create_message(MessageRole::Assistant, greeting, false),
    );
    session
}

/// Append a finished message to the session.
///
/// The streaming flag is cleared: only the placeholder held outside the
/// transcript may be streaming.
pub fn commit_message(session: &mut ChatSession, mut message: ChatMessage) {
    message.is_streaming = false;
    session.messages.push(message);
    session.updated_at = Utc::now();
}

/// Bound the history sent upstream.
///
/// Within budget the input is returned unchanged. Otherwise the result is the
/// most recent `max_messages` entries, preceded by the first message when it
/// is assistant-authored (the greeting anchor) and not already in that
/// window. The result never exceeds `max_messages + 1` entries.
pub fn truncate_history(messages: &[ChatMessage], max_messages: usize) -> Vec<ChatMessage> {
    if messages.len() <= max_messages {
        return messages.to_vec();
    }

    let recent_start = messages.len() - max_messages;
    let recent = &messages[recent_start..];

    let mut out = Vec::with_capacity(max_messages + 1);
    if let Some(first) = messages.first() {
        let anchor_in_window = recent.iter().any(|m| m.id == first.id);
        if first.role == MessageRole::Assistant && !anchor_in_window {
            out.push(first.clone());
        }
    }
    out.extend_from_slice(recent);
    out
}

/// Strip messages down to what the upstream provider sees.
///
/// Messages still flagged as streaming are dropped so a partial answer is
/// never sent back upstream.
pub fn format_for_upstream(messages: &[ChatMessage]) -> Vec<UpstreamMessage> {
    messages
        .iter()
        .filter(|m| !m.is_streaming)
        .map(|m| UpstreamMessage {
            role: m.role,
            content: m.content.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(n: usize) -> Vec<ChatMessage> {
        let mut messages = vec![create_message(MessageRole::Assistant, "greeting", false)];
        for i in 1..n {
            let role = if i % 2 == 1 {
                MessageRole::User
            } else {
                MessageRole::Assistant
            };
            messages.push(create_message(role, format!("m{i}"), false));
        }
        messages
    }

    #[test]
    fn test_create_session_is_empty() {
        let session = create_session();
        assert!(session.messages.is_empty());
        assert_eq!(session.created_at, session.updated_at);
    }

    #[test]
    fn test_greeting_session_has_one_assistant_message() {
        let session = create_greeting_session("Hi there");
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].role, MessageRole::Assistant);
        assert_eq!(session.messages[0].content, "Hi there");
        assert!(!session.messages[0].is_streaming);
    }

    #[test]
    fn test_commit_clears_streaming_and_advances_updated_at() {
        let mut session = create_session();
        let before = session.updated_at;
        commit_message(
            &mut session,
            create_message(MessageRole::Assistant, "partial", true),
        );
        assert!(!session.messages[0].is_streaming);
        assert!(session.updated_at >= before);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = create_message(MessageRole::User, "a", false);
        let b = create_message(MessageRole::User, "a", false);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_truncate_within_budget_is_identity() {
        let messages = conversation(5);
        assert_eq!(truncate_history(&messages, 5), messages);
        assert_eq!(truncate_history(&messages, 50), messages);
        assert!(truncate_history(&[], 3).is_empty());
    }

    #[test]
    fn test_truncate_keeps_anchor_and_recent() {
        let messages = conversation(12);
        let truncated = truncate_history(&messages, 4);
        assert_eq!(truncated.len(), 5);
        assert_eq!(truncated[0].id, messages[0].id);
        let tail: Vec<_> = truncated[1..].iter().map(|m| m.id).collect();
        let expected: Vec<_> = messages[8..].iter().map(|m| m.id).collect();
        assert_eq!(tail, expected);
    }

    #[test]
    fn test_truncate_drops_user_authored_first_message() {
        let mut messages = conversation(10);
        messages[0].role = MessageRole::User;
        let truncated = truncate_history(&messages, 3);
        assert_eq!(truncated.len(), 3);
        assert_eq!(truncated[0].id, messages[7].id);
    }

    #[test]
    fn test_truncate_bound_holds_for_all_sizes() {
        for len in 0..20 {
            let messages = conversation(len.max(1));
            for n in 1..8 {
                let truncated = truncate_history(&messages, n);
                assert!(truncated.len() <= n + 1);
                let last = truncated.last().map(|m| m.id);
                assert_eq!(last, messages.last().map(|m| m.id));
                // Relative order preserved.
                let positions: Vec<_> = truncated
                    .iter()
                    .map(|t| messages.iter().position(|m| m.id == t.id).unwrap())
                    .collect();
                assert!(positions.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn test_format_for_upstream_drops_streaming() {
        let mut messages = conversation(3);
        messages.push(create_message(MessageRole::Assistant, "partial", true));
        let formatted = format_for_upstream(&messages);
        assert_eq!(formatted.len(), 3);
        assert_eq!(formatted[0], UpstreamMessage::assistant("greeting"));
        assert_eq!(formatted[1], UpstreamMessage::user("m1"));
    }
}

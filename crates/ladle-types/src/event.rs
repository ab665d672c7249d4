//! Wire-level stream events exchanged between the chat endpoint and the widget.
//!
//! Each data frame carries a JSON object with exactly one key (`text`,
//! `usage` or `error`). The terminal sentinel has no JSON form; it is written
//! as the literal `[DONE]` payload by the protocol codec in `ladle-core`.

use serde::{Deserialize, Serialize};

/// Token usage reported by the upstream provider for one turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(alias = "inputTokens")]
    pub input_tokens: u32,
    #[serde(alias = "outputTokens")]
    pub output_tokens: u32,
}

/// One event of a streamed assistant reply.
///
/// Serialized externally tagged, so `Text("Hi")` becomes `{"text":"Hi"}`.
/// Unknown keys and multi-key objects fail to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamEvent {
    /// Append-only content fragment.
    Text(String),
    /// Usage summary, emitted at most once near the end.
    Usage(Usage),
    /// Terminal failure; nothing follows.
    Error(String),
    /// Terminal sentinel; encoded as `[DONE]`, never as JSON.
    #[serde(skip)]
    Done,
}

impl StreamEvent {
    /// Whether this event ends the turn.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Error(_) | StreamEvent::Done)
    }
}

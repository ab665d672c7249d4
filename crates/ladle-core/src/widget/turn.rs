//! One streamed reply, from request to outcome.
//!
//! A turn ends in exactly one way: the `[DONE]` frame, an `error` frame, end
//! of body, a transport failure or cancellation. Reading stops at `[DONE]`
//! even if the server keeps the connection open.

use std::sync::Arc;

use futures_util::StreamExt;
use ladle_types::chat::ChatRequest;
use ladle_types::error::TransportError;
use ladle_types::event::StreamEvent;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::transport::{ByteStream, ChatTransport};
use crate::protocol::{FrameDecoder, FrameError, parse_frame};

/// Why a turn produced no answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("connection closed before the reply finished")]
    ConnectionClosed,

    #[error("reply was empty")]
    EmptyResponse,

    #[error("turn was cancelled")]
    Aborted,
}

/// Progress of a turn, tagged with its id so superseded turns can be
/// ignored by the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnUpdate {
    /// Full reply text accumulated so far.
    Partial { turn_id: u64, content: String },
    Finished {
        turn_id: u64,
        result: Result<String, TurnError>,
    },
}

impl TurnUpdate {
    pub fn turn_id(&self) -> u64 {
        match self {
            TurnUpdate::Partial { turn_id, .. } | TurnUpdate::Finished { turn_id, .. } => *turn_id,
        }
    }
}

/// Send `request` and stream the reply into `updates`.
///
/// Partial updates are best-effort (`try_send`); a dropped one is superseded
/// by the next, which carries the full buffer. The final outcome always waits
/// for channel capacity.
pub async fn run_turn<T: ChatTransport>(
    transport: Arc<T>,
    request: ChatRequest,
    turn_id: u64,
    cancel: CancellationToken,
    updates: mpsc::Sender<TurnUpdate>,
) {
    let result = async {
        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TurnError::Aborted),
            body = transport.send_chat(request) => body?,
        };
        consume_stream(body, &cancel, |content| {
            let _ = updates.try_send(TurnUpdate::Partial {
                turn_id,
                content: content.to_string(),
            });
        })
        .await
    }
    .await;

    match &result {
        Ok(content) => tracing::debug!(turn_id, chars = content.len(), "turn completed"),
        Err(TurnError::Aborted) => tracing::debug!(turn_id, "turn aborted"),
        Err(e) => tracing::warn!(turn_id, error = %e, "turn failed"),
    }

    // The widget may already be gone.
    let _ = updates.send(TurnUpdate::Finished { turn_id, result }).await;
}

/// Read a chat response body until its terminal condition.
///
/// `on_text` receives the full accumulated reply after every `text` frame.
/// Malformed frames are logged and skipped. Returns the reply text, which is
/// never empty.
pub async fn consume_stream(
    mut body: ByteStream,
    cancel: &CancellationToken,
    mut on_text: impl FnMut(&str),
) -> Result<String, TurnError> {
    let mut decoder = FrameDecoder::new();
    let mut reply = String::new();
    let mut frames = 0usize;

    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TurnError::Aborted),
            chunk = body.next() => chunk,
        };

        match chunk {
            Some(Ok(bytes)) => {
                decoder.push(&bytes);
                while let Some(frame) = decoder.next_frame() {
                    frames += 1;
                    if apply_frame(frame, &mut reply, &mut on_text)? {
                        tracing::trace!(frames, "reached end of stream marker");
                        return finish(reply);
                    }
                }
            }
            Some(Err(e)) => return Err(TurnError::Transport(e)),
            None => {
                if let Some(frame) = decoder.finish() {
                    if apply_frame(frame, &mut reply, &mut on_text)? {
                        return finish(reply);
                    }
                }
                tracing::debug!(frames, "body ended without end of stream marker");
                return Err(TurnError::ConnectionClosed);
            }
        }
    }
}

/// Apply one frame to the reply. Returns true at the end marker.
fn apply_frame(
    frame: Result<String, FrameError>,
    reply: &mut String,
    on_text: &mut impl FnMut(&str),
) -> Result<bool, TurnError> {
    let event = match frame.and_then(|f| parse_frame(&f)) {
        Ok(Some(event)) => event,
        Ok(None) => return Ok(false),
        Err(e) => {
            tracing::warn!(error = %e, "skipping malformed frame");
            return Ok(false);
        }
    };

    match event {
        StreamEvent::Text(text) => {
            reply.push_str(&text);
            on_text(reply.as_str());
            Ok(false)
        }
        StreamEvent::Usage(usage) => {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "turn usage"
            );
            Ok(false)
        }
        StreamEvent::Error(message) => Err(TurnError::Upstream(message)),
        StreamEvent::Done => Ok(true),
    }
}

fn finish(reply: String) -> Result<String, TurnError> {
    if reply.is_empty() {
        Err(TurnError::EmptyResponse)
    } else {
        Ok(reply)
    }
}

//! SSE decoding for Cosmic's streamed AI text endpoint.
//!
//! The endpoint answers with `text/event-stream`. Each `data:` payload is a
//! JSON chunk (see [`AiStreamChunk`]) or the literal `[DONE]`. A chunk with
//! `end: true` closes the stream; `error` closes it with a failure. Events
//! named `error` carry the message as raw data.

use eventsource_stream::Eventsource;
use futures_util::{Stream, StreamExt};

use ladle_core::llm::provider::EventStream;
use ladle_types::event::StreamEvent;
use ladle_types::llm::UpstreamError;

use super::types::AiStreamChunk;

const DONE_PAYLOAD: &str = "[DONE]";

/// Turn a raw response body into an [`EventStream`].
///
/// The stream ends after the first terminal item (`Done` or an error). If
/// the body ends without one, the stream simply ends.
pub fn ai_event_stream<S, B, E>(body: S) -> EventStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut events = std::pin::pin!(body.eventsource());

        while let Some(event) = events.next().await {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    yield Err(UpstreamError::Failure {
                        message: format!("stream read failed: {e}"),
                    });
                    return;
                }
            };

            let items = if event.event == "error" {
                vec![Err(UpstreamError::Failure { message: event.data })]
            } else {
                chunk_events(&event.data)
            };

            for item in items {
                let terminal = match &item {
                    Ok(event) => event.is_terminal(),
                    Err(_) => true,
                };
                yield item;
                if terminal {
                    return;
                }
            }
        }

        tracing::debug!("cosmic ai stream ended without an end marker");
    })
}

/// Events carried by one `data:` payload, in emission order.
pub fn chunk_events(data: &str) -> Vec<Result<StreamEvent, UpstreamError>> {
    let data = data.trim();
    if data.is_empty() {
        return Vec::new();
    }
    if data == DONE_PAYLOAD {
        return vec![Ok(StreamEvent::Done)];
    }

    let chunk = match serde_json::from_str::<AiStreamChunk>(data) {
        Ok(chunk) => chunk,
        Err(e) => {
            tracing::warn!(error = %e, payload = data, "skipping unreadable ai stream chunk");
            return Vec::new();
        }
    };

    if let Some(message) = chunk.error {
        return vec![Err(UpstreamError::Failure { message })];
    }

    let mut events = Vec::new();
    if let Some(text) = chunk.text.filter(|t| !t.is_empty()) {
        events.push(Ok(StreamEvent::Text(text)));
    }
    if let Some(usage) = chunk.usage {
        events.push(Ok(StreamEvent::Usage(usage)));
    }
    if chunk.end {
        events.push(Ok(StreamEvent::Done));
    }
    events
}

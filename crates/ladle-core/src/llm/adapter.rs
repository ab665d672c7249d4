//! Stream adapter: knowledge-context injection and upstream timeouts.
//!
//! Wraps a provider and a content source. The adapter never retries; each
//! error is surfaced to the caller as soon as it is observed.

use std::time::Duration;

use futures_util::StreamExt;

use ladle_types::config::ChatConfig;
use ladle_types::llm::{GenerateTextRequest, UpstreamError};

use super::provider::{EventStream, UpstreamProvider};
use crate::knowledge::context::generate_context;
use crate::knowledge::source::ContentSource;

/// Bounds on waiting for the upstream provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamTimeouts {
    /// Until the provider accepts the request and starts streaming.
    pub open: Duration,
    /// Between consecutive stream items.
    pub idle: Duration,
}

impl Default for UpstreamTimeouts {
    fn default() -> Self {
        Self {
            open: Duration::from_secs(30),
            idle: Duration::from_secs(60),
        }
    }
}

impl From<&ChatConfig> for UpstreamTimeouts {
    fn from(config: &ChatConfig) -> Self {
        Self {
            open: Duration::from_secs(config.open_timeout_secs),
            idle: Duration::from_secs(config.idle_timeout_secs),
        }
    }
}

pub struct StreamAdapter<P, C> {
    provider: P,
    content: C,
    timeouts: UpstreamTimeouts,
}

impl<P: UpstreamProvider, C: ContentSource> StreamAdapter<P, C> {
    pub fn new(provider: P, content: C, timeouts: UpstreamTimeouts) -> Self {
        Self {
            provider,
            content,
            timeouts,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    /// Open an upstream stream for `request`.
    ///
    /// With `include_context` and a non-empty history, the rendered knowledge
    /// context becomes the first instruction block, ahead of any system
    /// prompt already present.
    pub async fn stream_upstream(
        &self,
        request: GenerateTextRequest,
        include_context: bool,
    ) -> Result<EventStream, UpstreamError> {
        let open = self.open(request, include_context);
        let stream = match tokio::time::timeout(self.timeouts.open, open).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(open_ms = duration_ms(self.timeouts.open), "upstream open timed out");
                return Err(UpstreamError::Timeout {
                    after_ms: duration_ms(self.timeouts.open),
                });
            }
        };

        Ok(with_idle_timeout(stream, self.timeouts.idle))
    }

    /// Context gathering and the provider call, bounded together by the open
    /// timeout.
    async fn open(
        &self,
        mut request: GenerateTextRequest,
        include_context: bool,
    ) -> Result<EventStream, UpstreamError> {
        if include_context && !request.messages.is_empty() {
            let context = generate_context(&self.content).await;
            request.instructions.insert(0, context);
        }

        tracing::debug!(
            provider = self.provider.name(),
            messages = request.messages.len(),
            instructions = request.instructions.len(),
            max_tokens = request.max_tokens,
            has_media = request.media_url.is_some(),
            "opening upstream stream"
        );

        self.provider.open_stream(request).await
    }
}

/// End the stream with `UpstreamError::Timeout` if no item arrives within
/// `idle` of the previous one.
pub fn with_idle_timeout(stream: EventStream, idle: Duration) -> EventStream {
    Box::pin(async_stream::stream! {
        let mut stream = stream;
        loop {
            match tokio::time::timeout(idle, stream.next()).await {
                Ok(Some(item)) => {
                    yield item;
                }
                Ok(None) => break,
                Err(_) => {
                    tracing::warn!(idle_ms = duration_ms(idle), "upstream stream went idle");
                    yield Err(UpstreamError::Timeout { after_ms: duration_ms(idle) });
                    break;
                }
            }
        }
    })
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

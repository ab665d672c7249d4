//! UpstreamProvider trait definition.
//!
//! Opening a stream is async so that failures the provider reports before
//! any content (rate limit, bad key) surface as an `Err` the endpoint can turn
//! into a status code. Failures after that arrive as stream items.

use std::pin::Pin;

use futures_util::Stream;

use ladle_types::event::StreamEvent;
use ladle_types::llm::{GenerateTextRequest, UpstreamError};

/// Stream of upstream events: `Text`, at most one `Usage`, then `Done`.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, UpstreamError>> + Send + 'static>>;

/// Trait for streaming text-generation backends.
///
/// Implementations live in ladle-infra (e.g., `CosmicClient`). They map
/// provider HTTP 429 to `RateLimited`, 401 to `AuthFailed` and anything else
/// to `Failure`, and never retry internally.
pub trait UpstreamProvider: Send + Sync {
    /// Human-readable provider name (e.g., "cosmic").
    fn name(&self) -> &str;

    /// Start a streamed generation.
    fn open_stream(
        &self,
        request: GenerateTextRequest,
    ) -> impl std::future::Future<Output = Result<EventStream, UpstreamError>> + Send;
}

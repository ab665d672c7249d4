//! BoxUpstreamProvider -- object-safe dynamic dispatch wrapper for UpstreamProvider.
//!
//! 1. `UpstreamProviderDyn` is object-safe, with a boxed future
//! 2. Blanket-impl `UpstreamProviderDyn` for all `T: UpstreamProvider`
//! 3. `BoxUpstreamProvider` wraps `Box<dyn UpstreamProviderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use ladle_types::llm::{GenerateTextRequest, UpstreamError};

use super::provider::{EventStream, UpstreamProvider};

/// Object-safe version of [`UpstreamProvider`] with boxed futures.
pub trait UpstreamProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn open_stream_boxed(
        &self,
        request: GenerateTextRequest,
    ) -> Pin<Box<dyn Future<Output = Result<EventStream, UpstreamError>> + Send + '_>>;
}

impl<T: UpstreamProvider> UpstreamProviderDyn for T {
    fn name(&self) -> &str {
        UpstreamProvider::name(self)
    }

    fn open_stream_boxed(
        &self,
        request: GenerateTextRequest,
    ) -> Pin<Box<dyn Future<Output = Result<EventStream, UpstreamError>> + Send + '_>> {
        Box::pin(self.open_stream(request))
    }
}

/// Type-erased upstream provider for runtime provider selection.
///
/// Since `UpstreamProvider` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxUpstreamProvider` implements the trait itself by delegating
/// to the inner trait object.
pub struct BoxUpstreamProvider {
    inner: Box<dyn UpstreamProviderDyn + Send + Sync>,
}

impl BoxUpstreamProvider {
    /// Wrap a concrete `UpstreamProvider` in a type-erased box.
    pub fn new<T: UpstreamProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }
}

impl UpstreamProvider for BoxUpstreamProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn open_stream(&self, request: GenerateTextRequest) -> Result<EventStream, UpstreamError> {
        self.inner.open_stream_boxed(request).await
    }
}

//! ChatTransport trait definition.

use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

use ladle_types::chat::ChatRequest;
use ladle_types::error::TransportError;
use ladle_types::upload::{UploadError, UploadedFile};

use crate::upload::FileUpload;

/// Raw response body of the chat endpoint, chunked as it arrives.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send + 'static>>;

/// Trait for the widget's connection to the chat service.
///
/// Dropping a returned [`ByteStream`] must abort the underlying request.
/// The HTTP implementation lives in ladle-infra (`HttpChatTransport`).
pub trait ChatTransport: Send + Sync + 'static {
    /// Post a chat request and return the streamed body.
    ///
    /// A non-success status is an error; the body is only returned for 2xx.
    fn send_chat(
        &self,
        request: ChatRequest,
    ) -> impl std::future::Future<Output = Result<ByteStream, TransportError>> + Send;

    /// Upload a file for the next turn.
    fn upload(
        &self,
        file: FileUpload,
    ) -> impl std::future::Future<Output = Result<UploadedFile, UploadError>> + Send;
}

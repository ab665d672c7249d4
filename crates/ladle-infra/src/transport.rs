//! HttpChatTransport -- the widget's HTTP connection to the chat endpoint.
//!
//! Posts a [`ChatRequest`] to `{base}/api/chat` and hands back the raw body
//! stream for the widget's frame decoder. Uploads go to `{base}/api/upload`
//! as multipart form data under the `file` field.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use ladle_core::upload::FileUpload;
use ladle_core::widget::{ByteStream, ChatTransport};
use ladle_types::chat::ChatRequest;
use ladle_types::error::TransportError;
use ladle_types::upload::{UploadError, UploadedFile};

/// `{ "error": "..." }` body returned by the endpoints on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct HttpChatTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChatTransport {
    const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Self::CONNECT_TIMEOUT)
            .build()
            .map_err(|e| TransportError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Extract the `error` field of a failure body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string())
}

impl ChatTransport for HttpChatTransport {
    async fn send_chat(&self, request: ChatRequest) -> Result<ByteStream, TransportError> {
        let response = self
            .client
            .post(self.url("/api/chat"))
            .header("accept", "text/event-stream")
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| TransportError::Network(e.to_string())));
        Ok(Box::pin(stream))
    }

    async fn upload(&self, file: FileUpload) -> Result<UploadedFile, UploadError> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|_| UploadError::UnsupportedType {
                mime_type: file.mime_type.clone(),
            })?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/api/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Failed(format!("Failed to upload file: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Failed(error_message(&body)));
        }

        response
            .json::<UploadedFile>()
            .await
            .map_err(|e| UploadError::Failed(format!("invalid upload response: {e}")))
    }
}

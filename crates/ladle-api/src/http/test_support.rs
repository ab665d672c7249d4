//! Mock ports and helpers shared by the HTTP handler tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::response::Response;
use serde_json::Value;

use ladle_core::knowledge::source::{BoxContentSource, EmptyContentSource};
use ladle_core::llm::box_provider::BoxUpstreamProvider;
use ladle_core::llm::provider::{EventStream, UpstreamProvider};
use ladle_core::upload::{BoxMediaStore, FileUpload, MediaStore};
use ladle_types::config::LadleConfig;
use ladle_types::event::StreamEvent;
use ladle_types::llm::{GenerateTextRequest, UpstreamError};
use ladle_types::upload::UploadError;

use crate::state::AppState;

type Script = Result<Vec<Result<StreamEvent, UpstreamError>>, UpstreamError>;

/// Provider that replays a fixed script and records the last request.
pub struct ScriptedProvider {
    script: Script,
    seen: Arc<Mutex<Option<GenerateTextRequest>>>,
    hang: bool,
    stream_dropped: Arc<AtomicBool>,
}

/// Sets its flag when the stream holding it is dropped.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl ScriptedProvider {
    pub fn events(events: Vec<Result<StreamEvent, UpstreamError>>) -> Self {
        Self {
            script: Ok(events),
            seen: Arc::new(Mutex::new(None)),
            hang: false,
            stream_dropped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replays `events`, then stays open without yielding.
    pub fn hanging(events: Vec<Result<StreamEvent, UpstreamError>>) -> Self {
        Self {
            hang: true,
            ..Self::events(events)
        }
    }

    pub fn empty() -> Self {
        Self::events(Vec::new())
    }

    pub fn failing(error: UpstreamError) -> Self {
        Self {
            script: Err(error),
            ..Self::empty()
        }
    }

    pub fn seen(&self) -> Arc<Mutex<Option<GenerateTextRequest>>> {
        Arc::clone(&self.seen)
    }

    /// Flag set once an opened stream has been dropped.
    pub fn stream_dropped(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stream_dropped)
    }
}

impl UpstreamProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn open_stream(&self, request: GenerateTextRequest) -> Result<EventStream, UpstreamError> {
        *self.seen.lock().unwrap() = Some(request);
        let events = self.script.clone()?;
        let flag = DropFlag(Arc::clone(&self.stream_dropped));
        let hang = self.hang;
        Ok(Box::pin(async_stream::stream! {
            let _flag = flag;
            for event in events {
                yield event;
            }
            if hang {
                futures_util::future::pending::<()>().await;
            }
        }))
    }
}

/// Media store that "stores" under a predictable URL, or always fails.
pub struct TestMediaStore {
    pub fail: bool,
}

impl MediaStore for TestMediaStore {
    async fn store(&self, upload: &FileUpload, folder: &str) -> Result<String, UploadError> {
        if self.fail {
            return Err(UploadError::Failed("Failed to upload file".into()));
        }
        Ok(format!("https://cdn.test/{folder}/{}", upload.name))
    }
}

pub fn test_state(provider: ScriptedProvider) -> AppState {
    state_with_media(provider, TestMediaStore { fail: false })
}

pub fn state_with_media(provider: ScriptedProvider, media: TestMediaStore) -> AppState {
    AppState::with_services(
        LadleConfig::default(),
        BoxUpstreamProvider::new(provider),
        BoxContentSource::new(EmptyContentSource),
        BoxMediaStore::new(media),
    )
}

pub async fn text_body(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn json_body(response: Response) -> Value {
    serde_json::from_str(&text_body(response).await).unwrap()
}

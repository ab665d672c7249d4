//! Session persistence port.
//!
//! A widget persists exactly one session blob under a fixed key. Stores treat
//! an absent or unreadable blob as "no session" so a corrupt entry never
//! blocks the widget from mounting.

use ladle_types::chat::ChatSession;
use ladle_types::error::StorageError;
use tokio::sync::Mutex;

/// Fixed key the session blob is stored under.
pub const SESSION_STORAGE_KEY: &str = "ladle-chat-session";

/// Trait for client-side session persistence.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// The file-backed implementation lives in ladle-infra.
pub trait SessionStore: Send + Sync {
    /// Load the persisted session. Absent or corrupt blobs yield `Ok(None)`.
    fn load(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<ChatSession>, StorageError>> + Send;

    /// Persist the session, replacing any previous blob.
    fn save(
        &self,
        session: &ChatSession,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// Remove the persisted blob. No-op if absent.
    fn clear(&self) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;
}

/// Decode a stored blob, logging and discarding anything unreadable.
pub fn decode_session_blob(blob: &str) -> Option<ChatSession> {
    match serde_json::from_str::<ChatSession>(blob) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!(key = SESSION_STORAGE_KEY, error = %e, "discarding corrupt session blob");
            None
        }
    }
}

/// Encode a session as the stored JSON blob.
pub fn encode_session_blob(session: &ChatSession) -> Result<String, StorageError> {
    serde_json::to_string(session).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// In-memory session store holding the serialized blob.
///
/// Stores the JSON text rather than the struct so it exercises the same
/// encode/decode path as persistent stores.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    blob: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a raw blob, e.g. to simulate corrupt storage.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
        }
    }

    /// Current raw blob, if any.
    pub async fn raw(&self) -> Option<String> {
        self.blob.lock().await.clone()
    }
}

impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<ChatSession>, StorageError> {
        let blob = self.blob.lock().await;
        Ok(blob.as_deref().and_then(decode_session_blob))
    }

    async fn save(&self, session: &ChatSession) -> Result<(), StorageError> {
        let encoded = encode_session_blob(session)?;
        *self.blob.lock().await = Some(encoded);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.blob.lock().await = None;
        Ok(())
    }
}

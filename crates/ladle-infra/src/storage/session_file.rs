//! JSON-file session store for the terminal widget.
//!
//! Holds the same blob a browser widget would keep under the
//! `ladle-chat-session` key, written to `{data_dir}/ladle-chat-session.json`.

use std::path::{Path, PathBuf};

use ladle_core::chat::store::{SessionStore, decode_session_blob, encode_session_blob};
use ladle_types::chat::ChatSession;
use ladle_types::error::StorageError;

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the standard location inside `data_dir`.
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(crate::filesystem::session_path(data_dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<ChatSession>, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(blob) => Ok(decode_session_blob(&blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "unreadable session file");
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &ChatSession) -> Result<(), StorageError> {
        let blob = encode_session_blob(session)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }

        // Atomic replace via rename.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, blob)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ladle_core::chat::session::{commit_message, create_greeting_session, create_message};
    use ladle_types::chat::MessageRole;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_loads_none() {
        let tmp = TempDir::new().unwrap();
        let store = FileSessionStore::in_data_dir(tmp.path());
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_session() {
        let tmp = TempDir::new().unwrap();
        let store = FileSessionStore::in_data_dir(&tmp.path().join("nested"));

        let mut session = create_greeting_session("Hello!");
        commit_message(&mut session, create_message(MessageRole::User, "Soup ideas?", false));
        store.save(&session).await.unwrap();

        assert!(store.path().ends_with("ladle-chat-session.json"));
        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, session);
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_none() {
        let tmp = TempDir::new().unwrap();
        let store = FileSessionStore::in_data_dir(tmp.path());
        tokio::fs::write(store.path(), "{not json").await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_file_and_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = FileSessionStore::in_data_dir(tmp.path());
        store.save(&create_greeting_session("Hi")).await.unwrap();

        store.clear().await.unwrap();
        assert!(!store.path().exists());
        store.clear().await.unwrap();
    }
}

//! Media store port and the server-side upload flow.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use ladle_types::upload::{UploadError, UploadedFile, validate_upload};

/// Folder uploads are filed under in the media store.
pub const UPLOAD_FOLDER: &str = "chat-uploads";

/// A file as received from the user, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Run the size and type rules against this file.
    pub fn validate(&self) -> Result<(), UploadError> {
        validate_upload(&self.mime_type, self.size())
    }
}

/// Trait for the hosted media store.
///
/// Returns the public URL of the stored file. Implementations live in
/// ladle-infra (e.g., `CosmicClient`).
pub trait MediaStore: Send + Sync {
    fn store(
        &self,
        upload: &FileUpload,
        folder: &str,
    ) -> impl Future<Output = Result<String, UploadError>> + Send;
}

/// Object-safe version of [`MediaStore`].
pub trait MediaStoreDyn: Send + Sync {
    fn store_boxed<'a>(
        &'a self,
        upload: &'a FileUpload,
        folder: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, UploadError>> + Send + 'a>>;
}

impl<T: MediaStore> MediaStoreDyn for T {
    fn store_boxed<'a>(
        &'a self,
        upload: &'a FileUpload,
        folder: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, UploadError>> + Send + 'a>> {
        Box::pin(self.store(upload, folder))
    }
}

/// Type-erased media store.
pub struct BoxMediaStore {
    inner: Box<dyn MediaStoreDyn + Send + Sync>,
}

impl BoxMediaStore {
    pub fn new<T: MediaStore + 'static>(store: T) -> Self {
        Self {
            inner: Box::new(store),
        }
    }
}

impl MediaStore for BoxMediaStore {
    async fn store(&self, upload: &FileUpload, folder: &str) -> Result<String, UploadError> {
        self.inner.store_boxed(upload, folder).await
    }
}

/// Media store used when no bucket is configured; every upload fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledMediaStore;

impl MediaStore for DisabledMediaStore {
    async fn store(&self, _upload: &FileUpload, _folder: &str) -> Result<String, UploadError> {
        Err(UploadError::Disabled)
    }
}

/// Validate and store an upload, describing the stored file.
///
/// Nothing reaches the store unless validation passes.
pub async fn accept_upload<M: MediaStore>(
    store: &M,
    upload: FileUpload,
) -> Result<UploadedFile, UploadError> {
    upload.validate()?;
    let url = store.store(&upload, UPLOAD_FOLDER).await?;
    tracing::info!(name = %upload.name, size = upload.size(), mime = %upload.mime_type, "stored upload");
    Ok(UploadedFile {
        url,
        mime_type: upload.mime_type,
        size: upload.bytes.len() as u64,
        name: upload.name,
    })
}

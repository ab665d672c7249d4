//! Media library uploads.

use reqwest::multipart::{Form, Part};
use secrecy::ExposeSecret;

use ladle_core::upload::{FileUpload, MediaStore};
use ladle_types::upload::UploadError;

use super::client::{CosmicClient, error_detail};
use super::types::MediaResponse;

const UPLOAD_FAILED: &str = "Failed to upload file";

impl MediaStore for CosmicClient {
    async fn store(&self, upload: &FileUpload, folder: &str) -> Result<String, UploadError> {
        if !self.can_write() {
            return Err(UploadError::Disabled);
        }

        let part = Part::bytes(upload.bytes.to_vec())
            .file_name(upload.name.clone())
            .mime_str(&upload.mime_type)
            .map_err(|e| {
                tracing::warn!(mime = %upload.mime_type, error = %e, "invalid upload mime type");
                UploadError::Failed(UPLOAD_FAILED.to_string())
            })?;
        let form = Form::new().part("media", part).text("folder", folder.to_string());

        let response = self
            .http
            .post(self.workers_url("/media"))
            .bearer_auth(self.write_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "media upload request failed");
                UploadError::Failed(UPLOAD_FAILED.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, detail = %error_detail(&body), "media upload rejected");
            return Err(UploadError::Failed(UPLOAD_FAILED.to_string()));
        }

        let body: MediaResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "unreadable media upload response");
            UploadError::Failed(UPLOAD_FAILED.to_string())
        })?;

        Ok(body.media.url)
    }
}

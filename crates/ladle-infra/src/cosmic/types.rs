//! Cosmic API request and response structures.
//!
//! These mirror Cosmic's JSON shapes. Mapping to the domain records in
//! `ladle-types` happens in [`super::objects`].

use serde::{Deserialize, Serialize};

use ladle_types::chat::UpstreamMessage;
use ladle_types::event::Usage;

/// Request body for `POST /buckets/{slug}/ai/text`.
#[derive(Debug, Clone, Serialize)]
pub struct AiTextRequest {
    pub messages: Vec<UpstreamMessage>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    pub stream: bool,
}

/// One `data:` payload of the AI text stream.
///
/// Chunks may carry any combination of fields; `end` marks the final chunk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiStreamChunk {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub usage: Option<Usage>,
    #[serde(default)]
    pub end: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `GET /buckets/{slug}/objects`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectsResponse {
    #[serde(default)]
    pub objects: Vec<CosmicObject>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// A Cosmic object with its free-form metafields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CosmicObject {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Response of `POST /buckets/{slug}/media`.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaResponse {
    pub media: MediaObject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaObject {
    pub url: String,
    #[serde(default)]
    pub imgix_url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Error body Cosmic returns alongside non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct CosmicErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

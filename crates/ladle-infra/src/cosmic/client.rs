//! CosmicClient -- shared HTTP client and credentials for the Cosmic API.
//!
//! The read key authorizes object queries; the write key authorizes AI
//! generation and media uploads. Both are held as [`SecretString`] and only
//! exposed when building a request.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};

use ladle_core::llm::provider::{EventStream, UpstreamProvider};
use ladle_types::config::CosmicConfig;
use ladle_types::llm::{GenerateTextRequest, UpstreamError};

use super::streaming::ai_event_stream;
use super::types::{AiTextRequest, CosmicErrorBody};

#[derive(Debug, thiserror::Error)]
pub enum CosmicError {
    #[error("cosmic bucket slug and read key must be configured")]
    NotConfigured,

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Client for one Cosmic bucket.
#[derive(Clone)]
pub struct CosmicClient {
    pub(super) http: reqwest::Client,
    pub(super) bucket_slug: String,
    pub(super) read_key: SecretString,
    pub(super) write_key: SecretString,
    pub(super) api_base: String,
    pub(super) workers_base: String,
}

impl std::fmt::Debug for CosmicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosmicClient")
            .field("bucket_slug", &self.bucket_slug)
            .field("api_base", &self.api_base)
            .field("workers_base", &self.workers_base)
            .finish_non_exhaustive()
    }
}

impl CosmicClient {
    /// Connect timeout only; streamed generations are bounded by the adapter.
    const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(config: &CosmicConfig) -> Result<Self, CosmicError> {
        if !config.is_configured() {
            return Err(CosmicError::NotConfigured);
        }

        let http = reqwest::Client::builder()
            .connect_timeout(Self::CONNECT_TIMEOUT)
            .build()
            .map_err(|e| CosmicError::Client(e.to_string()))?;

        Ok(Self {
            http,
            bucket_slug: config.bucket_slug.clone(),
            read_key: SecretString::from(config.read_key.clone()),
            write_key: SecretString::from(config.write_key.clone()),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            workers_base: config.workers_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn bucket_slug(&self) -> &str {
        &self.bucket_slug
    }

    /// Whether a write key is present (needed for AI text and media).
    pub fn can_write(&self) -> bool {
        !self.write_key.expose_secret().is_empty()
    }

    /// `{api_base}/buckets/{slug}{path}`
    pub(super) fn api_url(&self, path: &str) -> String {
        format!("{}/buckets/{}{path}", self.api_base, self.bucket_slug)
    }

    /// `{workers_base}/buckets/{slug}{path}`
    pub(super) fn workers_url(&self, path: &str) -> String {
        format!("{}/buckets/{}{path}", self.workers_base, self.bucket_slug)
    }
}

/// Map a non-success AI response status to an [`UpstreamError`].
pub(super) fn upstream_error_for_status(
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
) -> UpstreamError {
    match status.as_u16() {
        401 => UpstreamError::AuthFailed,
        429 => UpstreamError::RateLimited {
            retry_after_ms: retry_after_ms(headers),
        },
        _ => UpstreamError::Failure {
            message: format!("HTTP {status}: {}", error_detail(body)),
        },
    }
}

/// `Retry-After` in delta-seconds, converted to milliseconds.
fn retry_after_ms(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs * 1000)
}

/// Prefer Cosmic's `message` field over the raw body.
pub(super) fn error_detail(body: &str) -> String {
    serde_json::from_str::<CosmicErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| body.to_string())
}

impl UpstreamProvider for CosmicClient {
    fn name(&self) -> &str {
        "cosmic"
    }

    async fn open_stream(&self, request: GenerateTextRequest) -> Result<EventStream, UpstreamError> {
        let body = AiTextRequest {
            messages: request.provider_messages(),
            max_tokens: request.max_tokens,
            media_url: request.media_url,
            stream: true,
        };
        let url = self.workers_url("/ai/text");

        tracing::debug!(
            messages = body.messages.len(),
            max_tokens = body.max_tokens,
            has_media = body.media_url.is_some(),
            "opening cosmic ai stream"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.write_key.expose_secret())
            .header("accept", "text/event-stream")
            .json(&body)
            .send()
            .await
            .map_err(|e| UpstreamError::Failure {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let error_body = response.text().await.unwrap_or_default();
            return Err(upstream_error_for_status(status, &headers, &error_body));
        }

        Ok(ai_event_stream(response.bytes_stream()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn config() -> CosmicConfig {
        CosmicConfig {
            bucket_slug: "kitchen".into(),
            read_key: "read".into(),
            write_key: "write".into(),
            api_base: "https://api.example.test/v3/".into(),
            workers_base: "https://workers.example.test/v3".into(),
        }
    }

    #[test]
    fn test_new_requires_configuration() {
        let err = CosmicClient::new(&CosmicConfig::default()).unwrap_err();
        assert!(matches!(err, CosmicError::NotConfigured));
    }

    #[test]
    fn test_urls_are_bucket_scoped() {
        let client = CosmicClient::new(&config()).unwrap();
        assert_eq!(
            client.api_url("/objects"),
            "https://api.example.test/v3/buckets/kitchen/objects"
        );
        assert_eq!(
            client.workers_url("/ai/text"),
            "https://workers.example.test/v3/buckets/kitchen/ai/text"
        );
        assert!(client.can_write());
    }

    #[test]
    fn test_debug_hides_keys() {
        let client = CosmicClient::new(&config()).unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("kitchen"));
        assert!(!debug.contains("write"));
    }

    #[test]
    fn test_status_mapping() {
        let mut headers = HeaderMap::new();
        assert_eq!(
            upstream_error_for_status(StatusCode::UNAUTHORIZED, &headers, ""),
            UpstreamError::AuthFailed
        );

        headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
        assert_eq!(
            upstream_error_for_status(StatusCode::TOO_MANY_REQUESTS, &headers, ""),
            UpstreamError::RateLimited {
                retry_after_ms: Some(7000)
            }
        );

        let err = upstream_error_for_status(
            StatusCode::BAD_GATEWAY,
            &HeaderMap::new(),
            r#"{"message":"worker crashed"}"#,
        );
        assert_eq!(
            err,
            UpstreamError::Failure {
                message: "HTTP 502 Bad Gateway: worker crashed".into()
            }
        );
    }

    #[test]
    fn test_forbidden_is_generic_failure() {
        let err = upstream_error_for_status(StatusCode::FORBIDDEN, &HeaderMap::new(), "denied");
        assert_eq!(
            err,
            UpstreamError::Failure {
                message: "HTTP 403 Forbidden: denied".into()
            }
        );
        assert!(err.is_retryable());
    }

    #[test]
    fn test_rate_limit_without_retry_after() {
        let err = upstream_error_for_status(StatusCode::TOO_MANY_REQUESTS, &HeaderMap::new(), "slow down");
        assert_eq!(err, UpstreamError::RateLimited { retry_after_ms: None });
    }
}

//! Streaming chat endpoint.
//!
//! POST /api/chat
//!
//! Validates the body, assembles the upstream request (system prompt,
//! knowledge context, history) and re-frames the upstream stream as
//! `data: ...\n\n` frames:
//! - `{"text":"..."}` -- content fragment
//! - `{"usage":{...}}` -- token usage
//! - `{"error":"..."}` -- mid-stream failure, last frame
//! - `[DONE]` -- completion, last frame
//!
//! The body is pulled by the transport, so frames are produced no faster
//! than the client reads them. Dropping the body drops the upstream stream.

use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use futures_util::{Stream, StreamExt};
use serde_json::{Value, json};

use ladle_core::chat::prompt::{build_generate_request, parse_chat_request};
use ladle_core::llm::provider::EventStream;
use ladle_core::protocol::encode_frame;
use ladle_types::event::StreamEvent;
use ladle_types::llm::UpstreamError;

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /api/chat -- stream an assistant reply.
pub async fn stream_chat(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let request = parse_chat_request(&body)?;
    let generate = build_generate_request(request, state.config.chat.default_max_tokens);

    tracing::info!(
        messages = generate.messages.len(),
        max_tokens = generate.max_tokens,
        has_media = generate.media_url.is_some(),
        "chat request"
    );

    let upstream = state
        .adapter
        .stream_upstream(generate, true)
        .await
        .inspect_err(log_upstream_error)?;

    let headers = [
        (header::CONTENT_TYPE, "text/event-stream"),
        (header::CACHE_CONTROL, "no-cache"),
        (header::CONNECTION, "keep-alive"),
    ];
    Ok((headers, Body::from_stream(frame_stream(upstream))).into_response())
}

/// GET /api/chat -- static capability descriptor.
pub async fn describe_chat() -> Json<Value> {
    Json(json!({
        "message": "AI Recipe Chat API is running",
        "description": "AI assistant with knowledge of recipes, authors, categories, and user reviews",
        "endpoints": {
            "POST": "/api/chat - Stream chat responses with recipe knowledge",
            "POST /api/upload": "Upload files for analysis",
        },
    }))
}

/// Configuration failures are logged loudly; user-retryable ones as warnings.
fn log_upstream_error(error: &UpstreamError) {
    if error.is_retryable() {
        tracing::warn!(%error, "upstream failed");
    } else {
        tracing::error!(%error, "upstream rejected the request");
    }
}

/// Logs how a chat stream ended, including client disconnects.
struct StreamOutcome {
    frames: usize,
    finished: bool,
}

impl Drop for StreamOutcome {
    fn drop(&mut self) {
        if !self.finished {
            tracing::info!(frames = self.frames, "client disconnected mid-stream");
        }
    }
}

/// Re-frame upstream events. Exactly one terminal frame is emitted: `[DONE]`
/// on completion (also when upstream ends without an end marker) or a single
/// error frame.
pub fn frame_stream(mut upstream: EventStream) -> impl Stream<Item = Result<String, std::convert::Infallible>> + Send + 'static {
    async_stream::stream! {
        let mut outcome = StreamOutcome { frames: 0, finished: false };

        loop {
            let terminal = match upstream.next().await {
                Some(Ok(StreamEvent::Done)) | None => StreamEvent::Done,
                Some(Ok(StreamEvent::Error(message))) => {
                    tracing::warn!(%message, "upstream reported an error");
                    StreamEvent::Error(message)
                }
                Some(Ok(event)) => {
                    outcome.frames += 1;
                    yield Ok(encode_frame(&event));
                    continue;
                }
                Some(Err(error)) => {
                    log_upstream_error(&error);
                    StreamEvent::Error(error.public_message())
                }
            };

            outcome.frames += 1;
            outcome.finished = true;
            match &terminal {
                StreamEvent::Done => tracing::debug!(frames = outcome.frames, "chat stream completed"),
                _ => tracing::info!(frames = outcome.frames, "chat stream ended with error"),
            }
            yield Ok(encode_frame(&terminal));
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use futures_util::StreamExt;
    use std::sync::atomic::Ordering;
    use tower::ServiceExt;

    use ladle_core::chat::prompt::SYSTEM_PROMPT;
    use ladle_types::chat::MessageRole;
    use ladle_types::event::{StreamEvent, Usage};
    use ladle_types::llm::UpstreamError;

    use crate::http::router::build_router;
    use crate::http::test_support::{ScriptedProvider, json_body, test_state, text_body};

    fn post_chat(body: &str) -> Request<Body> {
        Request::post("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    const ONE_MESSAGE: &str = r#"{"messages":[{"role":"user","content":"Any soup recipes?"}]}"#;

    #[tokio::test]
    async fn test_streams_frames_in_order() {
        let provider = ScriptedProvider::events(vec![
            Ok(StreamEvent::Text("Hel".into())),
            Ok(StreamEvent::Text("lo".into())),
            Ok(StreamEvent::Usage(Usage {
                input_tokens: 10,
                output_tokens: 2,
            })),
            Ok(StreamEvent::Done),
            Ok(StreamEvent::Text("after done".into())),
        ]);
        let response = build_router(test_state(provider))
            .oneshot(post_chat(ONE_MESSAGE))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/event-stream");
        assert_eq!(response.headers()["cache-control"], "no-cache");
        assert_eq!(
            text_body(response).await,
            "data: {\"text\":\"Hel\"}\n\n\
             data: {\"text\":\"lo\"}\n\n\
             data: {\"usage\":{\"input_tokens\":10,\"output_tokens\":2}}\n\n\
             data: [DONE]\n\n"
        );
    }

    #[tokio::test]
    async fn test_missing_end_marker_still_completes() {
        let provider = ScriptedProvider::events(vec![Ok(StreamEvent::Text("Hi".into()))]);
        let response = build_router(test_state(provider))
            .oneshot(post_chat(ONE_MESSAGE))
            .await
            .unwrap();

        assert_eq!(
            text_body(response).await,
            "data: {\"text\":\"Hi\"}\n\ndata: [DONE]\n\n"
        );
    }

    #[tokio::test]
    async fn test_mid_stream_error_emits_single_error_frame() {
        let provider = ScriptedProvider::events(vec![
            Ok(StreamEvent::Text("Par".into())),
            Err(UpstreamError::Failure {
                message: "connection reset".into(),
            }),
            Ok(StreamEvent::Text("never".into())),
        ]);
        let response = build_router(test_state(provider))
            .oneshot(post_chat(ONE_MESSAGE))
            .await
            .unwrap();

        let body = text_body(response).await;
        assert_eq!(
            body,
            "data: {\"text\":\"Par\"}\n\n\
             data: {\"error\":\"Failed to generate AI response. Please try again.\"}\n\n"
        );
        assert!(!body.contains("[DONE]"));
    }

    #[tokio::test]
    async fn test_client_disconnect_drops_upstream_stream() {
        let provider = ScriptedProvider::hanging(vec![Ok(StreamEvent::Text("Hel".into()))]);
        let dropped = provider.stream_dropped();
        let response = build_router(test_state(provider))
            .oneshot(post_chat(ONE_MESSAGE))
            .await
            .unwrap();

        let mut body = response.into_body().into_data_stream();
        let first = body.next().await.unwrap().unwrap();
        assert_eq!(&first[..], b"data: {\"text\":\"Hel\"}\n\n");
        assert!(!dropped.load(Ordering::SeqCst));

        drop(body);
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_validation_failures_are_400() {
        for body in [
            "not json",
            "{}",
            r#"{"messages":"hi"}"#,
            r#"{"messages":[]}"#,
            r#"{"messages":[{"role":"system","content":"x"}]}"#,
        ] {
            let response = build_router(test_state(ScriptedProvider::empty()))
                .oneshot(post_chat(body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
            let json = json_body(response).await;
            assert!(json["error"].is_string(), "body: {body}");
        }
    }

    #[tokio::test]
    async fn test_missing_messages_message() {
        let response = build_router(test_state(ScriptedProvider::empty()))
            .oneshot(post_chat("{}"))
            .await
            .unwrap();
        assert_eq!(
            json_body(response).await["error"],
            "Messages array is required"
        );
    }

    #[tokio::test]
    async fn test_open_failure_is_500_with_public_message() {
        let provider = ScriptedProvider::failing(UpstreamError::RateLimited {
            retry_after_ms: Some(2000),
        });
        let response = build_router(test_state(provider))
            .oneshot(post_chat(ONE_MESSAGE))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await["error"],
            "Rate limit exceeded. Please try again later."
        );
    }

    #[tokio::test]
    async fn test_upstream_request_assembly() {
        let provider = ScriptedProvider::events(vec![Ok(StreamEvent::Done)]);
        let seen = provider.seen();
        let response = build_router(test_state(provider))
            .oneshot(post_chat(
                r#"{"messages":[{"role":"user","content":"Analyse this"}],"fileUrl":"https://cdn.test/a.pdf"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(text_body(response).await, "data: [DONE]\n\n");

        let request = seen.lock().unwrap().clone().unwrap();
        assert_eq!(request.instructions.len(), 2);
        assert!(request.instructions[0].starts_with("=== RECIPE KNOWLEDGE BASE ==="));
        assert_eq!(request.instructions[1], SYSTEM_PROMPT);
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, MessageRole::User);
        assert_eq!(request.max_tokens, 1000);
        assert_eq!(request.media_url.as_deref(), Some("https://cdn.test/a.pdf"));
    }

    #[tokio::test]
    async fn test_max_tokens_passed_through() {
        let provider = ScriptedProvider::events(vec![Ok(StreamEvent::Done)]);
        let seen = provider.seen();
        build_router(test_state(provider))
            .oneshot(post_chat(
                r#"{"messages":[{"role":"user","content":"hi"}],"maxTokens":800}"#,
            ))
            .await
            .unwrap();

        assert_eq!(seen.lock().unwrap().as_ref().unwrap().max_tokens, 800);
    }

    #[tokio::test]
    async fn test_descriptor() {
        let response = build_router(test_state(ScriptedProvider::empty()))
            .oneshot(Request::get("/api/chat").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["message"], "AI Recipe Chat API is running");
        assert!(json["endpoints"]["POST"].is_string());
    }
}

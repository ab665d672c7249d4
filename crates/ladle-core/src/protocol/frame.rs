//! Single-frame encoding and parsing.

use ladle_types::event::StreamEvent;
use serde_json::json;

/// Separator between frames.
pub const FRAME_DELIMITER: &str = "\n\n";

/// Prefix of every data frame.
pub const DATA_PREFIX: &str = "data: ";

/// Payload of the terminal frame.
pub const DONE_SENTINEL: &str = "[DONE]";

/// A frame that could not be turned into a [`StreamEvent`].
///
/// Always recoverable: the consumer logs it and moves to the next frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("frame is not valid UTF-8")]
    InvalidUtf8,

    #[error("malformed frame payload '{payload}': {reason}")]
    Malformed { payload: String, reason: String },

    #[error("frame exceeded {limit} bytes without a delimiter")]
    TooLarge { limit: usize },
}

/// Encode one event as a complete frame, delimiter included.
pub fn encode_frame(event: &StreamEvent) -> String {
    let payload = match event {
        StreamEvent::Done => return format!("{DATA_PREFIX}{DONE_SENTINEL}{FRAME_DELIMITER}"),
        StreamEvent::Text(text) => json!({ "text": text }),
        StreamEvent::Usage(usage) => json!({
            "usage": {
                "input_tokens": usage.input_tokens,
                "output_tokens": usage.output_tokens,
            }
        }),
        StreamEvent::Error(message) => json!({ "error": message }),
    };
    format!("{DATA_PREFIX}{payload}{FRAME_DELIMITER}")
}

/// Parse one frame (without its delimiter).
///
/// Frames that are blank or carry no `data: ` line (comments, keep-alives)
/// yield `Ok(None)`.
pub fn parse_frame(frame: &str) -> Result<Option<StreamEvent>, FrameError> {
    let frame = frame.trim_matches(|c| c == '\n' || c == '\r');
    let Some(payload) = frame.strip_prefix(DATA_PREFIX) else {
        return Ok(None);
    };
    let payload = payload.trim_end();

    if payload == DONE_SENTINEL {
        return Ok(Some(StreamEvent::Done));
    }

    serde_json::from_str::<StreamEvent>(payload)
        .map(Some)
        .map_err(|e| FrameError::Malformed {
            payload: payload.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ladle_types::event::Usage;

    #[test]
    fn test_encode_text_frame() {
        assert_eq!(
            encode_frame(&StreamEvent::Text("Hel".into())),
            "data: {\"text\":\"Hel\"}\n\n"
        );
    }

    #[test]
    fn test_encode_done_frame() {
        assert_eq!(encode_frame(&StreamEvent::Done), "data: [DONE]\n\n");
    }

    #[test]
    fn test_encode_escapes_newlines_inside_payload() {
        let frame = encode_frame(&StreamEvent::Text("line one\n\nline two".into()));
        assert_eq!(frame.matches("\n\n").count(), 1);
        assert!(frame.ends_with("\n\n"));
    }

    #[test]
    fn test_encode_matches_serde_shape() {
        let events = [
            StreamEvent::Text("a \"quoted\" ü".into()),
            StreamEvent::Usage(Usage {
                input_tokens: 3,
                output_tokens: 4,
            }),
            StreamEvent::Error("boom".into()),
        ];
        for event in events {
            let frame = encode_frame(&event);
            let parsed = parse_frame(frame.trim_end_matches('\n')).unwrap().unwrap();
            assert_eq!(parsed, event);
        }
    }

    #[test]
    fn test_parse_done() {
        assert_eq!(parse_frame("data: [DONE]"), Ok(Some(StreamEvent::Done)));
    }

    #[test]
    fn test_parse_ignores_non_data_frames() {
        assert_eq!(parse_frame(": keep-alive"), Ok(None));
        assert_eq!(parse_frame(""), Ok(None));
        assert_eq!(parse_frame("event: ping"), Ok(None));
    }

    #[test]
    fn test_parse_malformed() {
        let err = parse_frame("data: {not json").unwrap_err();
        assert!(matches!(err, FrameError::Malformed { ref payload, .. } if payload == "{not json"));
        assert!(parse_frame(r#"data: {"delta":"x"}"#).is_err());
    }
}

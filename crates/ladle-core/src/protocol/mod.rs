//! Wire event protocol between the chat endpoint and the widget.
//!
//! UTF-8 text, frames separated by a blank line (`\n\n`), each data frame
//! `data: <json>` with exactly one of `text`, `usage` or `error`, and the
//! stream terminated by the literal frame `data: [DONE]`.

pub mod decoder;
pub mod frame;

pub use decoder::FrameDecoder;
pub use frame::{FrameError, encode_frame, parse_frame};

//! Incremental frame splitting over a byte stream.
//!
//! Network chunks do not respect frame or character boundaries, so bytes are
//! buffered until a full `\n\n`-terminated frame is available and only then
//! decoded as UTF-8. A multi-byte character split across chunks is never
//! decoded in halves.

use bytes::{Buf, BytesMut};

use super::frame::FrameError;

const DELIMITER: &[u8] = b"\n\n";

/// Largest frame the decoder will buffer.
pub const MAX_FRAME_BYTES: usize = 1024 * 1024;

#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: BytesMut,
    /// Prefix of `buffer` already searched for a delimiter.
    scanned: usize,
    /// Dropping the rest of an oversized frame up to its delimiter.
    discarding: bool,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of body bytes.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Take the next complete frame, without its delimiter.
    ///
    /// A frame growing past [`MAX_FRAME_BYTES`] is reported once as
    /// [`FrameError::TooLarge`] and its remaining bytes are dropped.
    pub fn next_frame(&mut self) -> Option<Result<String, FrameError>> {
        loop {
            // Back up so a delimiter split across chunks is still seen.
            let start = self.scanned.saturating_sub(DELIMITER.len() - 1);
            let Some(offset) = self.buffer[start..]
                .windows(DELIMITER.len())
                .position(|w| w == DELIMITER)
            else {
                return self.hold_partial();
            };

            let frame = self.buffer.split_to(start + offset);
            self.buffer.advance(DELIMITER.len());
            self.scanned = 0;
            if std::mem::take(&mut self.discarding) {
                continue;
            }
            return Some(decode(&frame));
        }
    }

    fn hold_partial(&mut self) -> Option<Result<String, FrameError>> {
        let overflow = !self.discarding && self.pending() > MAX_FRAME_BYTES;
        if self.discarding || overflow {
            // Keep a trailing newline that may start the delimiter.
            let keep = usize::from(self.buffer.last() == Some(&b'\n'));
            self.buffer.advance(self.buffer.len() - keep);
        }
        self.scanned = self.buffer.len();

        if overflow {
            self.discarding = true;
            return Some(Err(FrameError::TooLarge {
                limit: MAX_FRAME_BYTES,
            }));
        }
        None
    }

    /// Bytes received but not yet part of a complete frame.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Flush whatever trails the last delimiter at end of body.
    pub fn finish(&mut self) -> Option<Result<String, FrameError>> {
        self.scanned = 0;
        let discarded = std::mem::take(&mut self.discarding);
        if discarded || self.buffer.iter().all(u8::is_ascii_whitespace) {
            self.buffer.clear();
            return None;
        }
        let rest = self.buffer.split();
        Some(decode(&rest))
    }
}

fn decode(bytes: &[u8]) -> Result<String, FrameError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| FrameError::InvalidUtf8)
}

//! Incremental Server-Sent Events frame parser.

use crate::error::{RealtimeError, Result};

/// Upper bound on bytes held for a frame that has not been terminated yet.
pub const MAX_PENDING_BYTES: usize = 256 * 1024;

/// One dispatched SSE message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// Event name, `message` when the server sent none.
    pub event: String,
    pub data: String,
}

impl SseFrame {
    /// Parses one frame. Comment-only frames (keep-alives) yield `None`.
    fn parse(input: &str) -> Option<Self> {
        let mut event = None;
        let mut data: Option<String> = None;

        for line in input.lines() {
            if line.is_empty() || line.starts_with(':') {
                continue;
            }
            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (line, ""),
            };
            match field {
                "event" => event = Some(value.to_string()),
                "data" => match data.as_mut() {
                    Some(existing) => {
                        existing.push('\n');
                        existing.push_str(value);
                    }
                    None => data = Some(value.to_string()),
                },
                _ => log::trace!("Ignoring SSE field '{}'", field),
            }
        }

        data.map(|data| SseFrame {
            event: event.unwrap_or_else(|| "message".to_string()),
            data,
        })
    }
}

/// Buffers raw body chunks and yields complete frames.
///
/// Chunk boundaries are arbitrary, so bytes are kept until a blank line
/// terminates the frame.
#[derive(Debug, Default)]
pub struct SseFrameParser {
    buffer: Vec<u8>,
    /// Prefix of `buffer` already searched for a frame boundary.
    scanned: usize,
}

impl SseFrameParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `chunk` and drains every complete frame.
    ///
    /// Fails once an unterminated frame exceeds [`MAX_PENDING_BYTES`].
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<SseFrame>> {
        self.buffer.extend_from_slice(chunk);
        let mut frames = Vec::new();
        // A separator may straddle the previous chunk, so back up by its length.
        let mut from = self.scanned.saturating_sub(3);
        while let Some((end, separator)) = frame_boundary(&self.buffer, from) {
            let raw: Vec<u8> = self.buffer.drain(..end + separator).collect();
            let text = String::from_utf8_lossy(&raw[..end]);
            if let Some(frame) = SseFrame::parse(&text) {
                frames.push(frame);
            }
            from = 0;
        }
        self.scanned = self.buffer.len();

        if self.buffer.len() > MAX_PENDING_BYTES {
            self.buffer.clear();
            self.scanned = 0;
            return Err(RealtimeError::channel(format!(
                "Unterminated event exceeds {} bytes",
                MAX_PENDING_BYTES
            )));
        }
        Ok(frames)
    }
}

fn frame_boundary(buffer: &[u8], from: usize) -> Option<(usize, usize)> {
    let tail = buffer.get(from..)?;
    let lf = tail.windows(2).position(|w| w == b"\n\n").map(|i| (from + i, 2));
    let crlf = tail
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|i| (from + i, 4));
    match (lf, crlf) {
        (Some(lf), Some(crlf)) => Some(if crlf.0 < lf.0 { crlf } else { lf }),
        (lf, crlf) => lf.or(crlf),
    }
}

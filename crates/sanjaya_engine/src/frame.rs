use sanjaya_core::Event;

/// Prefix that marks an event line in the stream.
pub const DATA_PREFIX: &[u8] = b"data: ";

/// Upper bound on one line, complete or partial, before it is dropped.
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame is not valid UTF-8")]
    InvalidUtf8,
    #[error("frame is not valid JSON: {message}")]
    InvalidJson { message: String },
    #[error("frame has no string `type` field")]
    MissingType,
    #[error("malformed `{kind}` frame: {message}")]
    InvalidPayload { kind: String, message: String },
    #[error("line exceeds {max} bytes")]
    LineTooLong { max: usize },
}

/// Splits a chunked byte stream into decoded events.
///
/// Bytes are buffered until a newline arrives, so a line split across two
/// reads is decoded exactly once. Lines are split on raw bytes before UTF-8
/// decoding, which keeps multi-byte characters intact across chunk edges.
#[derive(Debug)]
pub struct FrameParser {
    buffer: Vec<u8>,
    max_line_bytes: usize,
    // Set while skipping the tail of a line that was already reported too long.
    discarding: bool,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_BYTES)
    }
}

impl FrameParser {
    pub fn new(max_line_bytes: usize) -> Self {
        Self {
            buffer: Vec::new(),
            max_line_bytes: max_line_bytes.max(1),
            discarding: false,
        }
    }

    /// Appends a chunk and returns the frames it completes.
    ///
    /// Frames are decoded lazily. Lines left unread when the iterator is
    /// dropped stay buffered and come out of the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Frames<'_> {
        self.buffer.extend_from_slice(chunk);
        Frames {
            parser: self,
            cursor: 0,
        }
    }

    /// Ends the stream, discarding any unterminated trailing line.
    /// Returns how many bytes were dropped.
    pub fn finish(&mut self) -> usize {
        let residual = self.buffer.len();
        self.buffer.clear();
        self.discarding = false;
        residual
    }

    /// Bytes currently held for an incomplete line.
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }
}

/// Lazy iterator over the complete lines of one [`FrameParser::feed`] call.
pub struct Frames<'a> {
    parser: &'a mut FrameParser,
    cursor: usize,
}

impl Iterator for Frames<'_> {
    type Item = Result<Event, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let rest = &self.parser.buffer[self.cursor..];
            let Some(offset) = rest.iter().position(|b| *b == b'\n') else {
                return self.check_partial_line();
            };
            let start = self.cursor;
            let end = start + offset;
            self.cursor = end + 1;

            if self.parser.discarding {
                self.parser.discarding = false;
                continue;
            }
            if end - start > self.parser.max_line_bytes {
                return Some(Err(FrameError::LineTooLong {
                    max: self.parser.max_line_bytes,
                }));
            }
            if let Some(frame) = decode_line(&self.parser.buffer[start..end]) {
                return Some(frame);
            }
        }
    }
}

impl Frames<'_> {
    fn check_partial_line(&mut self) -> Option<Result<Event, FrameError>> {
        let partial = self.parser.buffer.len() - self.cursor;
        if partial <= self.parser.max_line_bytes {
            return None;
        }
        self.cursor = self.parser.buffer.len();
        if self.parser.discarding {
            return None;
        }
        self.parser.discarding = true;
        Some(Err(FrameError::LineTooLong {
            max: self.parser.max_line_bytes,
        }))
    }
}

impl Drop for Frames<'_> {
    fn drop(&mut self) {
        self.parser.buffer.drain(..self.cursor);
    }
}

/// Decodes one complete line. Lines that are not `data: ` frames yield `None`.
fn decode_line(line: &[u8]) -> Option<Result<Event, FrameError>> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let payload = line.strip_prefix(DATA_PREFIX)?;
    Some(decode_payload(payload))
}

fn decode_payload(payload: &[u8]) -> Result<Event, FrameError> {
    let text = std::str::from_utf8(payload).map_err(|_| FrameError::InvalidUtf8)?;
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|err| FrameError::InvalidJson {
            message: err.to_string(),
        })?;
    let kind = value
        .get("type")
        .and_then(serde_json::Value::as_str)
        .ok_or(FrameError::MissingType)?
        .to_string();
    serde_json::from_value(value).map_err(|err| FrameError::InvalidPayload {
        kind,
        message: err.to_string(),
    })
}

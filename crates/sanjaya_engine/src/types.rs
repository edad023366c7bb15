use std::fmt;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("invalid endpoint {endpoint}: {message}")]
    InvalidEndpoint { endpoint: String, message: String },
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timed out waiting for the stream")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("stream closed before a terminal event")]
    PrematureClose,
}

/// How a pull loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamOutcome {
    /// A terminal event was dispatched; the rest of the stream was drained.
    Terminated,
    /// The transport closed with no terminal event seen.
    #[default]
    EndOfStream,
    /// The caller stopped the loop.
    Cancelled,
}

impl fmt::Display for StreamOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamOutcome::Terminated => write!(f, "terminated"),
            StreamOutcome::EndOfStream => write!(f, "end of stream"),
            StreamOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Counters for one consumed stream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamSummary {
    pub outcome: StreamOutcome,
    pub chunks: usize,
    pub events_dispatched: usize,
    pub events_ignored: usize,
    pub frames_skipped: usize,
    pub residual_bytes: usize,
}

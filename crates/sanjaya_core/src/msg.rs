#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted a free-text research query.
    QuerySubmitted(String),
    /// One decoded event from the backend stream.
    Stream(crate::Event),
    /// The transport failed or closed before a terminal event arrived.
    TransportFailed(String),
    /// The reader stopped early. Tasks and progress stay as they are.
    StreamCancelled,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}

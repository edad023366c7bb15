#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open the event stream for a freshly submitted query.
    StartQuery { query: String },
    /// Hand the final results to the navigator. Emitted once per run.
    Navigate {
        topic: String,
        results: serde_json::Value,
    },
}

use serde::{Deserialize, Serialize};

/// One decoded progress event, as carried in a `data: {...}` frame.
///
/// The `type` field selects the variant. Kinds this build does not know
/// about decode to [`Event::Unknown`] so newer backends keep working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    AgentsSelected {
        selected_agents: Vec<String>,
    },
    AgentStarted {
        agent_name: String,
    },
    AgentCompleted {
        agent_name: String,
    },
    SynthesisCompleted,
    ReportCompleted,
    Completed {
        #[serde(default)]
        results: serde_json::Value,
    },
    Error {
        message: String,
    },
    #[serde(other)]
    Unknown,
}

impl Event {
    /// Wire name of the event kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::AgentsSelected { .. } => "agents_selected",
            Event::AgentStarted { .. } => "agent_started",
            Event::AgentCompleted { .. } => "agent_completed",
            Event::SynthesisCompleted => "synthesis_completed",
            Event::ReportCompleted => "report_completed",
            Event::Completed { .. } => "completed",
            Event::Error { .. } => "error",
            Event::Unknown => "unknown",
        }
    }

    /// True for the kinds that end a workflow run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::Completed { .. } | Event::Error { .. })
    }
}

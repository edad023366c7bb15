use crate::{MessageId, Phase, Role, TaskStatus};

/// Read-only snapshot handed to the presentation layer after each update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkflowViewModel {
    pub phase: Phase,
    pub topic: Option<String>,
    pub progress: u8,
    pub tasks: Vec<TaskRowView>,
    pub messages: Vec<MessageRowView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRowView {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRowView {
    pub id: MessageId,
    pub role: Role,
    pub speaker: &'static str,
    pub content: String,
}

impl WorkflowViewModel {
    pub fn completed_tasks(&self) -> usize {
        self.tasks
            .iter()
            .filter(|task| task.status == TaskStatus::Complete)
            .count()
    }
}

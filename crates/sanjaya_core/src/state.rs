use std::sync::Arc;

use crate::registry::{Role, TaskDescriptor, TaskRegistry};
use crate::view_model::{MessageRowView, TaskRowView, WorkflowViewModel};

/// Message shown when the stream cannot be read to a terminal event.
pub const TRANSPORT_FAILURE_MESSAGE: &str =
    "❌ Error: Failed to communicate with the research agents.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Active,
    Completed,
    Errored,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Errored)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatus {
    #[default]
    Pending,
    Loading,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub status: TaskStatus,
}

impl Task {
    pub(crate) fn pending(descriptor: &TaskDescriptor) -> Self {
        Self {
            id: descriptor.task_id.clone(),
            label: descriptor.label.clone(),
            icon: descriptor.icon.clone(),
            status: TaskStatus::Pending,
        }
    }
}

pub type MessageId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
}

/// Overall completion percentage. Only ever moves forward, capped at 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ProgressMeter(u8);

impl ProgressMeter {
    pub const MAX: u8 = 100;

    pub fn value(self) -> u8 {
        self.0
    }

    /// Moves to `target` if that is further along; returns whether it moved.
    pub(crate) fn advance_to(&mut self, target: u8) -> bool {
        let target = target.min(Self::MAX);
        if target > self.0 {
            self.0 = target;
            true
        } else {
            false
        }
    }
}

/// State of one query run: the tasks, progress and message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowState {
    registry: Arc<TaskRegistry>,
    phase: Phase,
    tasks: Vec<Task>,
    progress: ProgressMeter,
    messages: Vec<MessageEntry>,
    next_message_id: MessageId,
    query: Option<String>,
    topic: Option<String>,
    failure: Option<String>,
    streaming: bool,
    dirty: bool,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::with_registry(Arc::new(TaskRegistry::builtin()))
    }

    pub fn with_registry(registry: Arc<TaskRegistry>) -> Self {
        Self {
            registry,
            phase: Phase::Idle,
            tasks: Vec::new(),
            progress: ProgressMeter::default(),
            messages: Vec::new(),
            next_message_id: 1,
            query: None,
            topic: None,
            failure: None,
            streaming: false,
            dirty: false,
        }
    }

    pub fn view(&self) -> WorkflowViewModel {
        WorkflowViewModel {
            phase: self.phase,
            topic: self.topic.clone(),
            progress: self.progress.value(),
            tasks: self
                .tasks
                .iter()
                .map(|task| TaskRowView {
                    id: task.id.clone(),
                    label: task.label.clone(),
                    icon: task.icon.clone(),
                    status: task.status,
                })
                .collect(),
            messages: self
                .messages
                .iter()
                .map(|entry| MessageRowView {
                    id: entry.id,
                    role: entry.role,
                    speaker: entry.role.display_name(),
                    content: entry.content.clone(),
                })
                .collect(),
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// True from submission until the run ends or its reader stops.
    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    pub fn progress(&self) -> ProgressMeter {
        self.progress
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn messages(&self) -> &[MessageEntry] {
        &self.messages
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// Transport detail recorded when the run failed before a terminal event.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn shared_registry(&self) -> Arc<TaskRegistry> {
        Arc::clone(&self.registry)
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn begin_run(&mut self, query: String, topic: String) {
        self.query = Some(query);
        self.topic = Some(topic);
        self.streaming = true;
        self.dirty = true;
    }

    pub(crate) fn end_stream(&mut self) {
        self.streaming = false;
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            self.phase = phase;
            self.dirty = true;
        }
        if phase.is_terminal() {
            self.streaming = false;
        }
    }

    pub(crate) fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.dirty = true;
    }

    /// Moves a task forward to `status`. Statuses never move backwards.
    pub(crate) fn advance_task(&mut self, task_id: &str, status: TaskStatus) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == task_id) else {
            return false;
        };
        if rank(status) <= rank(task.status) {
            return false;
        }
        task.status = status;
        self.dirty = true;
        true
    }

    pub(crate) fn advance_progress(&mut self, target: u8) {
        if self.progress.advance_to(target) {
            self.dirty = true;
        }
    }

    pub(crate) fn push_message(&mut self, role: Role, content: String) {
        let id = self.next_message_id;
        self.next_message_id += 1;
        self.messages.push(MessageEntry { id, role, content });
        self.dirty = true;
    }

    pub(crate) fn record_failure(&mut self, detail: String) {
        self.failure = Some(detail);
    }
}

fn rank(status: TaskStatus) -> u8 {
    match status {
        TaskStatus::Pending => 0,
        TaskStatus::Loading => 1,
        TaskStatus::Complete => 2,
    }
}

//! Sanjaya core: pure workflow state machine and view-model helpers.
mod effect;
mod event;
mod msg;
mod registry;
mod state;
mod topic;
mod update;
mod view_model;

pub use effect::Effect;
pub use event::Event;
pub use msg::Msg;
pub use registry::{RegistryEntry, Role, TaskDescriptor, TaskRegistry, REPORT_TASK_ID};
pub use state::{
    MessageEntry, MessageId, Phase, ProgressMeter, Task, TaskStatus, WorkflowState,
    TRANSPORT_FAILURE_MESSAGE,
};
pub use topic::infer_topic;
pub use update::{synthesized_summary, update};
pub use view_model::{MessageRowView, TaskRowView, WorkflowViewModel};

use serde_json::Value;

use crate::state::Task;
use crate::{infer_topic, Effect, Event, Msg, Phase, Role, TaskStatus, WorkflowState};
use crate::TRANSPORT_FAILURE_MESSAGE;

const SELECTION_PROGRESS: u8 = 10;
const AGENT_PROGRESS_STEP: u8 = 15;
const AGENT_PROGRESS_CAP: u8 = 80;
const SYNTHESIS_PROGRESS: u8 = 90;
const REPORT_PROGRESS: u8 = 100;
const UNMAPPED_AGENT_LABEL: &str = "results";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: WorkflowState, msg: Msg) -> (WorkflowState, Vec<Effect>) {
    let effects = match msg {
        Msg::QuerySubmitted(raw) => {
            let query = raw.trim();
            // One outstanding query at a time.
            if query.is_empty() || state.is_streaming() {
                return (state, Vec::new());
            }
            let topic = infer_topic(query);
            state = WorkflowState::with_registry(state.shared_registry());
            state.begin_run(query.to_string(), topic);
            vec![Effect::StartQuery {
                query: query.to_string(),
            }]
        }
        Msg::Stream(event) => {
            if state.is_terminal() {
                return (state, Vec::new());
            }
            apply_event(&mut state, event)
        }
        Msg::TransportFailed(detail) => {
            if !state.is_terminal() {
                state.record_failure(detail);
                state.push_message(Role::Master, TRANSPORT_FAILURE_MESSAGE.to_string());
                state.set_phase(Phase::Errored);
            }
            Vec::new()
        }
        Msg::StreamCancelled => {
            state.end_stream();
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn apply_event(state: &mut WorkflowState, event: Event) -> Vec<Effect> {
    let active = state.phase() == Phase::Active;
    match event {
        Event::AgentsSelected { selected_agents } => {
            let tasks = build_tasks(state, &selected_agents);
            state.replace_tasks(tasks);
            state.advance_progress(SELECTION_PROGRESS);
            state.set_phase(Phase::Active);
        }
        Event::AgentStarted { agent_name } if active => {
            if let Some(task_id) = resolve_task_id(state, &agent_name) {
                state.advance_task(&task_id, TaskStatus::Loading);
            }
        }
        Event::AgentCompleted { agent_name } if active => {
            agent_completed(state, &agent_name);
        }
        Event::SynthesisCompleted if active => {
            state.advance_progress(SYNTHESIS_PROGRESS);
        }
        Event::ReportCompleted if active => {
            let report_id = state.registry().report_task().task_id.clone();
            state.advance_task(&report_id, TaskStatus::Complete);
            state.advance_progress(REPORT_PROGRESS);
        }
        Event::Completed { results } if active => {
            state.push_message(Role::Master, completion_message(&results));
            state.set_phase(Phase::Completed);
            let topic = state.topic().unwrap_or_default().to_string();
            return vec![Effect::Navigate { topic, results }];
        }
        Event::Error { message } => {
            state.push_message(Role::Master, format!("❌ Error: {message}"));
            state.set_phase(Phase::Errored);
        }
        // Stage events before selection, and kinds newer than this build.
        Event::AgentStarted { .. }
        | Event::AgentCompleted { .. }
        | Event::SynthesisCompleted
        | Event::ReportCompleted
        | Event::Completed { .. }
        | Event::Unknown => {}
    }
    Vec::new()
}

fn build_tasks(state: &WorkflowState, selected: &[String]) -> Vec<Task> {
    let registry = state.registry();
    let mut tasks: Vec<Task> = Vec::with_capacity(selected.len() + 1);
    let descriptors = selected
        .iter()
        .filter_map(|agent| registry.lookup(agent))
        .chain(std::iter::once(registry.report_task()));
    for descriptor in descriptors {
        // Aliases can map two agents onto one task.
        if !tasks.iter().any(|task| task.id == descriptor.task_id) {
            tasks.push(Task::pending(descriptor));
        }
    }
    tasks
}

fn resolve_task_id(state: &WorkflowState, agent_name: &str) -> Option<String> {
    state
        .registry()
        .lookup(agent_name)
        .map(|descriptor| descriptor.task_id.clone())
}

fn agent_completed(state: &mut WorkflowState, agent_name: &str) {
    let descriptor = state.registry().lookup(agent_name).cloned();
    let (role, label) = match &descriptor {
        Some(descriptor) => {
            state.advance_task(&descriptor.task_id, TaskStatus::Complete);
            (descriptor.role.unwrap_or(Role::Master), descriptor.label.as_str())
        }
        None => (Role::Master, UNMAPPED_AGENT_LABEL),
    };
    state.push_message(role, format!("✅ {agent_name} finished: {label} retrieved"));
    let current = state.progress().value();
    let target = current
        .saturating_add(AGENT_PROGRESS_STEP)
        .min(AGENT_PROGRESS_CAP);
    state.advance_progress(target);
}

/// Summary text of the `SYNTHESIZED` block, if the backend sent one.
pub fn synthesized_summary(results: &Value) -> Option<&str> {
    results
        .get("SYNTHESIZED")
        .and_then(|synth| synth.get("summary").or_else(|| synth.get("final_summary")))
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}

fn completion_message(results: &Value) -> String {
    let summary = synthesized_summary(results).unwrap_or("Report generated.");
    format!("✅ Analysis complete.\n\n{summary}")
}

use sanjaya_core::{update, Effect, Event, Msg, WorkflowState, WorkflowViewModel};
use sanjaya_logging::sanjaya_info;
use serde_json::Value;

use crate::dispatch::{EventHandler, Flow};

/// Read-only consumer of state snapshots.
pub trait Presenter {
    fn present(&mut self, view: &WorkflowViewModel);
}

/// Receives the final results once per completed run.
pub trait Navigator {
    fn navigate(&mut self, topic: &str, results: &Value);
}

/// Owns the workflow state of one query and threads every update to the
/// presenter and navigator.
pub struct WorkflowSession<P, N> {
    state: WorkflowState,
    presenter: P,
    navigator: N,
}

impl<P: Presenter, N: Navigator> WorkflowSession<P, N> {
    pub fn new(state: WorkflowState, presenter: P, navigator: N) -> Self {
        Self {
            state,
            presenter,
            navigator,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn into_parts(self) -> (WorkflowState, P, N) {
        (self.state, self.presenter, self.navigator)
    }

    /// Starts a new run. Returns the query to stream, or `None` when the
    /// submission was rejected.
    pub fn submit(&mut self, query: &str) -> Option<String> {
        self.step(Msg::QuerySubmitted(query.to_string()))
            .into_iter()
            .find_map(|effect| match effect {
                Effect::StartQuery { query } => Some(query),
                Effect::Navigate { .. } => None,
            })
    }

    /// Moves the run to the errored state after a transport failure.
    pub fn fail(&mut self, detail: impl Into<String>) {
        self.step(Msg::TransportFailed(detail.into()));
    }

    /// Marks the stream as stopped so the next query can start.
    pub fn cancel(&mut self) {
        self.step(Msg::StreamCancelled);
    }

    /// Applies one message and carries out the navigation effects it emits.
    /// Returns the effects this session does not handle itself.
    pub fn step(&mut self, msg: Msg) -> Vec<Effect> {
        let placeholder = WorkflowState::with_registry(self.state.shared_registry());
        let state = std::mem::replace(&mut self.state, placeholder);
        let (mut state, effects) = update(state, msg);
        let view = state.view();
        if state.consume_dirty() {
            self.presenter.present(&view);
        }
        self.state = state;

        let mut pending = Vec::new();
        for effect in effects {
            match effect {
                Effect::Navigate { topic, results } => {
                    sanjaya_info!("Navigating to results for topic={:?}", topic);
                    self.navigator.navigate(&topic, &results);
                }
                other => pending.push(other),
            }
        }
        pending
    }
}

impl<P: Presenter, N: Navigator> EventHandler for WorkflowSession<P, N> {
    fn handle(&mut self, event: Event) -> Flow {
        self.step(Msg::Stream(event));
        if self.state.is_terminal() {
            Flow::Terminal
        } else {
            Flow::Continue
        }
    }
}

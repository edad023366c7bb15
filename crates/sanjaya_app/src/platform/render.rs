use std::io::Write;

use sanjaya_core::{Phase, TaskStatus, WorkflowViewModel};
use sanjaya_engine::Presenter;

const BAR_WIDTH: usize = 20;

/// Prints new chat messages and a one-line progress summary.
///
/// Messages are append-only, so only the ones not yet printed are written.
/// The progress line is written only when it changes.
pub struct TerminalPresenter<W: Write> {
    out: W,
    printed_messages: usize,
    last_status: Option<String>,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed_messages: 0,
            last_status: None,
        }
    }

    fn pending_lines(&mut self, view: &WorkflowViewModel) -> Vec<String> {
        let mut lines = Vec::new();
        if view.messages.len() < self.printed_messages {
            // A fresh run started; its log begins empty.
            self.printed_messages = 0;
        }
        for message in &view.messages[self.printed_messages..] {
            lines.push(format!("[{}] {}", message.speaker, message.content));
        }
        self.printed_messages = view.messages.len();

        if !view.tasks.is_empty() {
            let status = status_line(view);
            if self.last_status.as_deref() != Some(status.as_str()) {
                lines.push(status.clone());
                self.last_status = Some(status);
            }
        }
        lines
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn present(&mut self, view: &WorkflowViewModel) {
        for line in self.pending_lines(view) {
            let _ = writeln!(self.out, "{line}");
        }
        let _ = self.out.flush();
    }
}

pub fn status_line(view: &WorkflowViewModel) -> String {
    let tasks: Vec<String> = view
        .tasks
        .iter()
        .map(|task| format!("{} {} {}", status_glyph(task.status), task.icon, task.label))
        .collect();
    let phase = match view.phase {
        Phase::Idle | Phase::Active => "",
        Phase::Completed => " done",
        Phase::Errored => " failed",
    };
    format!(
        "{} {:>3}%{}  {}",
        progress_bar(view.progress),
        view.progress,
        phase,
        tasks.join("  ")
    )
}

fn progress_bar(progress: u8) -> String {
    let filled = usize::from(progress.min(100)) * BAR_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn status_glyph(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "·",
        TaskStatus::Loading => "…",
        TaskStatus::Complete => "✓",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanjaya_core::{update, Event, Msg, WorkflowState};

    fn view_after(events: Vec<Event>) -> WorkflowViewModel {
        let mut state = WorkflowState::new();
        for event in events {
            state = update(state, Msg::Stream(event)).0;
        }
        state.view()
    }

    #[test]
    fn progress_bar_scales_to_width() {
        assert_eq!(progress_bar(0), format!("[{}]", ".".repeat(20)));
        assert_eq!(progress_bar(50), format!("[{}{}]", "#".repeat(10), ".".repeat(10)));
        assert_eq!(progress_bar(100), format!("[{}]", "#".repeat(20)));
    }

    #[test]
    fn status_line_lists_tasks() {
        let view = view_after(vec![
            Event::AgentsSelected {
                selected_agents: vec!["Market Agent".to_string()],
            },
            Event::AgentStarted {
                agent_name: "Market Agent".to_string(),
            },
        ]);
        let line = status_line(&view);
        assert!(line.contains(" 10%"));
        assert!(line.contains("… 📊 Market Data"));
        assert!(line.contains("· 🧾 Report Generation"));
    }

    #[test]
    fn only_new_output_is_printed() {
        let mut presenter = TerminalPresenter::new(Vec::new());
        let selected = view_after(vec![Event::AgentsSelected {
            selected_agents: vec!["Market Agent".to_string()],
        }]);
        let finished = view_after(vec![
            Event::AgentsSelected {
                selected_agents: vec!["Market Agent".to_string()],
            },
            Event::AgentCompleted {
                agent_name: "Market Agent".to_string(),
            },
        ]);

        presenter.present(&selected);
        presenter.present(&selected);
        presenter.present(&finished);

        let output = String::from_utf8(presenter.out).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("[IQVIA Insights Agent] ✅ Market Agent finished"));
        assert!(lines[2].contains(" 25%"));
    }
}

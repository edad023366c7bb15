use serde::{Deserialize, Serialize};

/// Task id of the trailing report stage appended to every run.
pub const REPORT_TASK_ID: &str = "report";

/// Who a message in the log is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Master,
    Market,
    Trials,
    Patent,
    Web,
}

impl Role {
    pub fn display_name(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Master => "Master Agent",
            Role::Market => "IQVIA Insights Agent",
            Role::Trials => "Clinical Trials Agent",
            Role::Patent => "Patent Landscape Agent",
            Role::Web => "Web Intelligence Agent",
        }
    }
}

/// Rendering data for one tracked task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    pub task_id: String,
    pub label: String,
    pub icon: String,
    /// Display role for acknowledgements. `None` falls back to the coordinator.
    #[serde(default)]
    pub role: Option<Role>,
}

/// One table row: backend agent identifier to task descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub agent: String,
    pub task: TaskDescriptor,
}

type BuiltinRow = (&'static str, &'static str, &'static str, &'static str, Option<Role>);

const BUILTIN_AGENTS: &[BuiltinRow] = &[
    ("IQVIA Insights Agent", "market", "Market Data", "📊", Some(Role::Market)),
    ("Market Agent", "market", "Market Data", "📊", Some(Role::Market)),
    ("Clinical Trials Agent", "trials", "Clinical Trials", "🧬", Some(Role::Trials)),
    ("Patent Landscape Agent", "patent", "Patent Landscape", "📜", Some(Role::Patent)),
    ("Web Intelligence Agent", "web", "Web Intelligence", "🌐", Some(Role::Web)),
    ("Internal Knowledge Agent", "internal", "Internal Knowledge", "📁", None),
];

const REPORT_ROW: (&str, &str) = ("Report Generation", "🧾");

/// Static lookup table from agent identifiers to task descriptors.
///
/// Data only: adding a backend agent means adding an entry, nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRegistry {
    entries: Vec<RegistryEntry>,
    report: TaskDescriptor,
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TaskRegistry {
    /// The table shipped with the application.
    pub fn builtin() -> Self {
        let entries = BUILTIN_AGENTS
            .iter()
            .map(|(agent, task_id, label, icon, role)| RegistryEntry {
                agent: (*agent).to_string(),
                task: TaskDescriptor {
                    task_id: (*task_id).to_string(),
                    label: (*label).to_string(),
                    icon: (*icon).to_string(),
                    role: *role,
                },
            })
            .collect();
        Self::from_entries(entries)
    }

    /// Builds a registry from explicit rows. A later row for the same agent
    /// replaces the earlier one.
    pub fn from_entries(entries: Vec<RegistryEntry>) -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(entries.len()),
            report: TaskDescriptor {
                task_id: REPORT_TASK_ID.to_string(),
                label: REPORT_ROW.0.to_string(),
                icon: REPORT_ROW.1.to_string(),
                role: Some(Role::Master),
            },
        };
        registry.extend(entries);
        registry
    }

    /// Adds rows on top of the current table, replacing same-agent rows.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = RegistryEntry>) {
        for entry in entries {
            match self.entries.iter_mut().find(|e| e.agent == entry.agent) {
                Some(existing) => *existing = entry,
                None => self.entries.push(entry),
            }
        }
    }

    /// Descriptor for a backend agent identifier.
    pub fn lookup(&self, agent: &str) -> Option<&TaskDescriptor> {
        self.entries
            .iter()
            .find(|e| e.agent == agent)
            .map(|e| &e.task)
    }

    /// Reverse lookup: descriptor for a task id, including the report task.
    pub fn descriptor_for_task(&self, task_id: &str) -> Option<&TaskDescriptor> {
        if task_id == self.report.task_id {
            return Some(&self.report);
        }
        self.entries
            .iter()
            .find(|e| e.task.task_id == task_id)
            .map(|e| &e.task)
    }

    /// Reverse lookup: the first agent identifier that maps to `task_id`.
    pub fn agent_for_task(&self, task_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.task.task_id == task_id)
            .map(|e| e.agent.as_str())
    }

    pub fn report_task(&self) -> &TaskDescriptor {
        &self.report
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

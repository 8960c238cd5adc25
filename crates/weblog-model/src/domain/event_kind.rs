use serde::{Deserialize, Serialize};

/// Lifecycle marker carried in the `event` field of every message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Workflow run started.
    Started,
    /// A task was submitted to the executor.
    ProcessSubmitted,
    /// A task started running.
    ProcessStarted,
    /// A task finished.
    ProcessCompleted,
    /// The workflow reported an error.
    Error,
    /// Workflow run finished.
    Completed,
    #[default]
    #[serde(other)]
    Unknown,
}

impl EventKind {
    /// Short symbolic name used in logs and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Started => "started",
            EventKind::ProcessSubmitted => "process_submitted",
            EventKind::ProcessStarted => "process_started",
            EventKind::ProcessCompleted => "process_completed",
            EventKind::Error => "error",
            EventKind::Completed => "completed",
            EventKind::Unknown => "unknown",
        }
    }

    /// Returns `true` for workflow-level markers (as opposed to per-task ones).
    pub fn is_workflow(&self) -> bool {
        matches!(
            self,
            EventKind::Started | EventKind::Error | EventKind::Completed
        )
    }
}

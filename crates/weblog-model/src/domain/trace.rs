use serde::{Deserialize, Serialize};

use crate::{TaskId, TraceStatus, UNKNOWN_PROCESS};

/// Task-specific part of a lifecycle event.
///
/// Timestamps are epoch milliseconds. The engine omits them (or sends `0`)
/// while the value is not known yet, so every one of them is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TraceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete: Option<i64>,
    /// Free text, display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

impl Trace {
    /// Process name, or [`UNKNOWN_PROCESS`] when the trace has none.
    pub fn process_name(&self) -> &str {
        self.process.as_deref().unwrap_or(UNKNOWN_PROCESS)
    }

    /// Preferred start timestamp: `start`, then `submit`, skipping zeros.
    pub fn start_millis(&self) -> Option<i64> {
        nonzero(self.start).or_else(|| nonzero(self.submit))
    }

    /// Completion timestamp, skipping zero.
    pub fn complete_millis(&self) -> Option<i64> {
        nonzero(self.complete)
    }
}

fn nonzero(v: Option<i64>) -> Option<i64> {
    v.filter(|ms| *ms != 0)
}

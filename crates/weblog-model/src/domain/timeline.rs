use serde::Serialize;

use crate::{LocalTime, ProcessName, TaskId};

/// A task that has been submitted and not yet completed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningTask {
    pub id: TaskId,
    pub process: ProcessName,
    #[serde(with = "crate::local_time")]
    pub start: LocalTime,
    /// Moves forward as later events for the same task arrive.
    #[serde(with = "crate::local_time")]
    pub end: LocalTime,
}

/// Time span covered by all completed tasks of one process.
///
/// `start` is pinned by the first batch of completions; only `end` moves afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccumulatedProcess {
    pub process: ProcessName,
    #[serde(with = "crate::local_time")]
    pub start: LocalTime,
    #[serde(with = "crate::local_time")]
    pub end: LocalTime,
}

/// One bar of the rendered timeline.
///
/// `id` is the process name for accumulated rows and the task id for running ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRow {
    pub id: String,
    pub process: ProcessName,
    #[serde(with = "crate::local_time")]
    pub start: LocalTime,
    #[serde(with = "crate::local_time")]
    pub end: LocalTime,
}

impl TimelineRow {
    /// Returns `true` when the interval is well-formed (`start <= end`).
    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }
}

impl From<&AccumulatedProcess> for TimelineRow {
    fn from(p: &AccumulatedProcess) -> Self {
        Self {
            id: p.process.clone(),
            process: p.process.clone(),
            start: p.start,
            end: p.end,
        }
    }
}

impl From<&RunningTask> for TimelineRow {
    fn from(t: &RunningTask) -> Self {
        Self {
            id: t.id.to_string(),
            process: t.process.clone(),
            start: t.start,
            end: t.end,
        }
    }
}

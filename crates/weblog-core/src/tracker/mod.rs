use std::collections::HashMap;

use tracing::trace;
use weblog_model::{LocalTime, ProcessName, RunningTask, TaskId, Trace, TraceStatus};

use crate::{error::CoreError, time::TimeNormalizer};

/// A finished task handed over to the process accumulator.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub task_id: TaskId,
    pub process: ProcessName,
    pub start: LocalTime,
    pub end: LocalTime,
}

/// What a single trace did to the tracker.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// First SUBMITTED for this id: the task is now tracked.
    Tracked,
    /// RUNNING for a tracked task: its end moved.
    Extended,
    /// COMPLETED for a tracked task: it left the tracker.
    Completed(Completion),
    /// Nothing changed (unseen id, duplicate submit, unrecognized status, no id).
    Ignored,
}

/// In-flight tasks keyed by task id.
#[derive(Debug, Default)]
pub struct TaskTracker {
    running: HashMap<TaskId, RunningTask>,
}

impl TaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the state of the task named by `trace`.
    ///
    /// `event_time` is the normalized `utcTime` of the carrying event; it stands in
    /// for start and end whenever the trace does not provide them. Trace timestamps
    /// are converted before any state is touched, so a malformed one leaves the
    /// tracker unchanged.
    pub fn apply(
        &mut self,
        trace: &Trace,
        event_time: LocalTime,
        normalizer: &TimeNormalizer,
    ) -> Result<Transition, CoreError> {
        let (Some(id), Some(status)) = (trace.task_id.as_ref(), trace.status) else {
            return Ok(Transition::Ignored);
        };

        let transition = match status {
            TraceStatus::Submitted => {
                if self.running.contains_key(id) {
                    trace!(task = %id, "duplicate submit ignored");
                    Transition::Ignored
                } else {
                    let start = resolve_start(trace, event_time, normalizer)?;
                    let end = resolve_end(trace, event_time, normalizer)?;
                    self.running.insert(
                        id.clone(),
                        RunningTask {
                            id: id.clone(),
                            process: trace.process_name().to_string(),
                            start,
                            end,
                        },
                    );
                    Transition::Tracked
                }
            }
            TraceStatus::Running => match self.running.get_mut(id) {
                Some(task) => {
                    task.end = resolve_end(trace, event_time, normalizer)?;
                    Transition::Extended
                }
                None => Transition::Ignored,
            },
            TraceStatus::Completed => {
                if !self.running.contains_key(id) {
                    trace!(task = %id, "completion for untracked task ignored");
                    return Ok(Transition::Ignored);
                }
                let end = resolve_end(trace, event_time, normalizer)?;
                match self.running.remove(id) {
                    Some(task) => Transition::Completed(Completion {
                        task_id: task.id,
                        process: task.process,
                        start: task.start,
                        end,
                    }),
                    None => Transition::Ignored,
                }
            }
            TraceStatus::Other => Transition::Ignored,
        };
        Ok(transition)
    }

    pub fn get(&self, id: &TaskId) -> Option<&RunningTask> {
        self.running.get(id)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.running.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RunningTask> {
        self.running.values()
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }
}

/// `start`, else `submit`, else the event's own time.
pub fn resolve_start(
    trace: &Trace,
    event_time: LocalTime,
    normalizer: &TimeNormalizer,
) -> Result<LocalTime, CoreError> {
    match trace.start_millis() {
        Some(ms) => normalizer.from_epoch_millis(ms),
        None => Ok(event_time),
    }
}

/// `complete`, else the event's own time.
pub fn resolve_end(
    trace: &Trace,
    event_time: LocalTime,
    normalizer: &TimeNormalizer,
) -> Result<LocalTime, CoreError> {
    match trace.complete_millis() {
        Some(ms) => normalizer.from_epoch_millis(ms),
        None => Ok(event_time),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> TimeNormalizer {
        TimeNormalizer::new(chrono_tz::UTC)
    }

    fn at(ms: i64) -> LocalTime {
        normalizer().from_epoch_millis(ms).unwrap()
    }

    fn trace(id: &str, process: &str, status: TraceStatus) -> Trace {
        Trace {
            task_id: Some(TaskId::from(id)),
            process: Some(process.to_string()),
            status: Some(status),
            ..Default::default()
        }
    }

    #[test]
    fn submit_running_complete_lifecycle() {
        let n = normalizer();
        let mut tracker = TaskTracker::new();
        let id = TaskId::from("t1");

        let submit = Trace {
            start: Some(1_000),
            ..trace("t1", "align", TraceStatus::Submitted)
        };
        assert_eq!(tracker.apply(&submit, at(1_200), &n).unwrap(), Transition::Tracked);
        let task = tracker.get(&id).unwrap();
        assert_eq!(task.start, at(1_000));
        assert_eq!(task.end, at(1_200));

        let running = trace("t1", "align", TraceStatus::Running);
        assert_eq!(tracker.apply(&running, at(3_000), &n).unwrap(), Transition::Extended);
        assert_eq!(tracker.get(&id).unwrap().end, at(3_000));

        let complete = Trace {
            complete: Some(5_000),
            ..trace("t1", "align", TraceStatus::Completed)
        };
        let Transition::Completed(done) = tracker.apply(&complete, at(5_100), &n).unwrap() else {
            panic!("expected completion");
        };
        assert_eq!(done.process, "align");
        assert_eq!(done.start, at(1_000));
        assert_eq!(done.end, at(5_000));
        assert!(tracker.is_empty());

        // A redelivered completion contributes nothing further.
        assert_eq!(tracker.apply(&complete, at(5_100), &n).unwrap(), Transition::Ignored);
    }

    #[test]
    fn unseen_ids_are_not_fabricated() {
        let n = normalizer();
        let mut tracker = TaskTracker::new();

        let running = trace("ghost", "p", TraceStatus::Running);
        assert_eq!(tracker.apply(&running, at(1), &n).unwrap(), Transition::Ignored);

        let complete = Trace {
            complete: Some(10),
            ..trace("ghost", "p", TraceStatus::Completed)
        };
        assert_eq!(tracker.apply(&complete, at(1), &n).unwrap(), Transition::Ignored);
        assert!(tracker.is_empty());
    }

    #[test]
    fn duplicate_submit_keeps_original_interval() {
        let n = normalizer();
        let mut tracker = TaskTracker::new();
        let first = Trace {
            submit: Some(1_000),
            ..trace("t", "p", TraceStatus::Submitted)
        };
        tracker.apply(&first, at(1_500), &n).unwrap();

        let again = Trace {
            submit: Some(9_000),
            ..trace("t", "p", TraceStatus::Submitted)
        };
        assert_eq!(tracker.apply(&again, at(9_500), &n).unwrap(), Transition::Ignored);
        assert_eq!(tracker.get(&TaskId::from("t")).unwrap().start, at(1_000));
    }

    #[test]
    fn other_status_and_missing_id_are_ignored() {
        let n = normalizer();
        let mut tracker = TaskTracker::new();

        let cached = trace("t", "p", TraceStatus::Other);
        assert_eq!(tracker.apply(&cached, at(1), &n).unwrap(), Transition::Ignored);

        let no_id = Trace {
            task_id: None,
            ..trace("t", "p", TraceStatus::Submitted)
        };
        assert_eq!(tracker.apply(&no_id, at(1), &n).unwrap(), Transition::Ignored);
        assert!(tracker.is_empty());
    }

    #[test]
    fn start_falls_back_to_submit_then_event_time() {
        let n = normalizer();
        let t = Trace {
            start: Some(0),
            submit: Some(7_000),
            ..Default::default()
        };
        assert_eq!(resolve_start(&t, at(9_000), &n).unwrap(), at(7_000));

        let t = Trace::default();
        assert_eq!(resolve_start(&t, at(9_000), &n).unwrap(), at(9_000));
        assert_eq!(resolve_end(&t, at(9_000), &n).unwrap(), at(9_000));
    }

    #[test]
    fn malformed_trace_timestamp_leaves_state_unchanged() {
        let n = normalizer();
        let mut tracker = TaskTracker::new();
        let submit = trace("t", "p", TraceStatus::Submitted);
        tracker.apply(&submit, at(10), &n).unwrap();

        let bad = Trace {
            complete: Some(-5),
            ..trace("t", "p", TraceStatus::Completed)
        };
        let err = tracker.apply(&bad, at(20), &n).unwrap_err();
        assert!(matches!(err, CoreError::MalformedTimestamp { .. }));
        assert!(tracker.contains(&TaskId::from("t")));
    }

    #[test]
    fn missing_process_is_unknown() {
        let n = normalizer();
        let mut tracker = TaskTracker::new();
        let submit = Trace {
            process: None,
            ..trace("t", "ignored", TraceStatus::Submitted)
        };
        tracker.apply(&submit, at(1), &n).unwrap();
        assert_eq!(tracker.get(&TaskId::from("t")).unwrap().process, "Unknown");
    }
}

use std::borrow::Borrow;

use tracing::{debug, info, trace, warn};
use weblog_model::{EventKind, TraceStatus, WorkflowEvent};

pub trait View {
    fn as_run(&self) -> &str;
    fn as_task(&self) -> &str;
    fn as_process(&self) -> &str;
    fn as_status(&self) -> &'static str;
    fn kind(&self) -> EventKind;
    fn has_trace(&self) -> bool;
}

impl<T> View for T
where
    T: Borrow<WorkflowEvent>,
{
    #[inline]
    fn as_run(&self) -> &str {
        let e = self.borrow();
        if e.run_name.is_empty() {
            "unknown"
        } else {
            &e.run_name
        }
    }
    #[inline]
    fn as_task(&self) -> &str {
        self.borrow()
            .trace
            .as_ref()
            .and_then(|t| t.task_id.as_ref())
            .map(|id| id.as_str())
            .unwrap_or("unknown")
    }
    #[inline]
    fn as_process(&self) -> &str {
        self.borrow()
            .trace
            .as_ref()
            .map(|t| t.process_name())
            .unwrap_or("unknown")
    }
    #[inline]
    fn as_status(&self) -> &'static str {
        self.borrow()
            .trace
            .as_ref()
            .and_then(|t| t.status)
            .map(|s| s.as_str())
            .unwrap_or(TraceStatus::Other.as_str())
    }
    #[inline]
    fn kind(&self) -> EventKind {
        self.borrow().kind
    }
    #[inline]
    fn has_trace(&self) -> bool {
        self.borrow().trace.is_some()
    }
}

#[inline]
pub fn message_for(kind: EventKind) -> &'static str {
    match kind {
        // workflow
        EventKind::Started => "workflow run started",
        EventKind::Completed => "workflow run completed",
        EventKind::Error => "workflow reported an error",

        // process
        EventKind::ProcessSubmitted => "task submitted to executor",
        EventKind::ProcessStarted => "task started running",
        EventKind::ProcessCompleted => "task completed",

        EventKind::Unknown => "unrecognized workflow event",
    }
}

#[inline]
pub fn log_event<E: View>(e: E) {
    let msg = message_for(e.kind());

    match e.kind() {
        // workflow
        EventKind::Started => info!(run = e.as_run(), "{msg}"),
        EventKind::Completed => info!(run = e.as_run(), "{msg}"),
        EventKind::Error => warn!(run = e.as_run(), "{msg}"),

        // process
        EventKind::ProcessSubmitted => trace!(
            run = e.as_run(),
            task = e.as_task(),
            process = e.as_process(),
            "{msg}"
        ),
        EventKind::ProcessStarted => trace!(
            run = e.as_run(),
            task = e.as_task(),
            process = e.as_process(),
            "{msg}"
        ),
        EventKind::ProcessCompleted => debug!(
            run = e.as_run(),
            task = e.as_task(),
            process = e.as_process(),
            status = e.as_status(),
            "{msg}"
        ),

        EventKind::Unknown => {
            if e.has_trace() {
                debug!(run = e.as_run(), task = e.as_task(), "{msg}")
            } else {
                debug!(run = e.as_run(), "{msg}")
            }
        }
    }
}

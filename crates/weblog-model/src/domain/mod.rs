mod task_id;
pub use task_id::TaskId;

mod trace_status;
pub use trace_status::TraceStatus;

mod trace;
pub use trace::Trace;

mod event_kind;
pub use event_kind::EventKind;

mod event;
pub use event::WorkflowEvent;

mod timeline;
pub use timeline::{AccumulatedProcess, RunningTask, TimelineRow};

mod metadata;
pub use metadata::MetadataSnapshot;

mod details;
pub use details::EventDetails;

mod diagnostic;
pub use diagnostic::{Diagnostic, DiagnosticKind};

pub mod local_time;

/// Timestamp normalized into the configured display time zone.
pub type LocalTime = chrono::DateTime<chrono_tz::Tz>;

/// Logical process (stage) name reported by the workflow engine.
///
/// Not unique: many tasks share one process name.
pub type ProcessName = String;

/// Process name used when a trace does not carry one.
pub const UNKNOWN_PROCESS: &str = "Unknown";

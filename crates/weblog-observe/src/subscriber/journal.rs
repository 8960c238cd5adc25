use weblog_core::Subscribe;
use weblog_model::WorkflowEvent;

use crate::subscriber::view::log_event;

/// Logs every accepted workflow event through `tracing`.
#[derive(Debug, Default)]
pub struct Journal;

impl Journal {
    pub fn new() -> Self {
        Self
    }
}

impl Subscribe for Journal {
    fn on_event(&self, event: &WorkflowEvent) {
        log_event(event);
    }

    fn name(&self) -> &'static str {
        "journal"
    }
}

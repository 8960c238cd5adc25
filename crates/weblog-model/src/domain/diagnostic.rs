use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of a recoverable failure observed during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// `utcTime` or a trace timestamp could not be converted. The event was skipped.
    MalformedTimestamp,
    /// Metadata was not an object or nested too deep. Only the metadata was dropped.
    InvalidMetadataShape,
    /// A materialized row had `start > end`. The row was left out of the timeline.
    InvalidInterval,
    /// The body did not match the event schema. The event was skipped.
    MalformedEvent,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::MalformedTimestamp => "malformed_timestamp",
            DiagnosticKind::InvalidMetadataShape => "invalid_metadata_shape",
            DiagnosticKind::InvalidInterval => "invalid_interval",
            DiagnosticKind::MalformedEvent => "malformed_event",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded failure, pointing back at the event or row that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Position of the offending event within its drained batch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    /// Task id, process name or timeline row id the failure refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            event_index: None,
            run_id: None,
            subject: None,
            message: message.into(),
        }
    }

    pub fn with_event_index(mut self, index: usize) -> Self {
        self.event_index = Some(index);
        self
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_optional_fields() {
        let d = Diagnostic::new(DiagnosticKind::MalformedTimestamp, "bad utcTime")
            .with_event_index(1)
            .with_run_id("r-1");
        assert_eq!(d.event_index, Some(1));
        assert_eq!(d.run_id.as_deref(), Some("r-1"));
        assert!(d.subject.is_none());
    }

    #[test]
    fn optional_fields_are_skipped() {
        let d = Diagnostic::new(DiagnosticKind::InvalidInterval, "start after end");
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains(r#""kind":"invalidInterval""#));
        assert!(!json.contains("eventIndex"));
    }
}

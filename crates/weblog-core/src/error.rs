use thiserror::Error;
use weblog_model::DiagnosticKind;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed timestamp '{value}': {reason}")]
    MalformedTimestamp { value: String, reason: String },

    #[error("invalid metadata shape: {0}")]
    InvalidMetadataShape(String),

    #[error("invalid interval for '{id}' (process '{process}'): start {start} is after end {end}")]
    InvalidInterval {
        id: String,
        process: String,
        start: String,
        end: String,
    },

    #[error("malformed event: {0}")]
    MalformedEvent(String),

    #[error("unknown time zone: {0}")]
    UnknownTimeZone(String),
}

impl CoreError {
    pub(crate) fn timestamp(value: impl ToString, reason: impl Into<String>) -> Self {
        CoreError::MalformedTimestamp {
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Diagnostic category for errors that are recorded instead of propagated.
    ///
    /// Configuration errors have no category: they never happen during a tick.
    pub fn diagnostic_kind(&self) -> Option<DiagnosticKind> {
        match self {
            CoreError::MalformedTimestamp { .. } => Some(DiagnosticKind::MalformedTimestamp),
            CoreError::InvalidMetadataShape(_) => Some(DiagnosticKind::InvalidMetadataShape),
            CoreError::InvalidInterval { .. } => Some(DiagnosticKind::InvalidInterval),
            CoreError::MalformedEvent(_) => Some(DiagnosticKind::MalformedEvent),
            CoreError::UnknownTimeZone(_) => None,
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::MalformedEvent(e.to_string())
    }
}

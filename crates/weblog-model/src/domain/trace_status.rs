use serde::{Deserialize, Serialize};

/// Task status carried by a trace record.
///
/// Only the three lifecycle markers drive the tracker; every other value the
/// engine may send (`NEW`, `CACHED`, `ABORTED`, ...) collapses into [`TraceStatus::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TraceStatus {
    /// Task handed to the executor.
    Submitted,
    /// Task started executing.
    Running,
    /// Task finished (successfully or not).
    Completed,
    /// Any status the tracker ignores.
    #[serde(other)]
    Other,
}

impl TraceStatus {
    /// Returns `true` for statuses that move a task through the tracker.
    pub fn is_lifecycle(&self) -> bool {
        !matches!(self, TraceStatus::Other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TraceStatus::Submitted => "SUBMITTED",
            TraceStatus::Running => "RUNNING",
            TraceStatus::Completed => "COMPLETED",
            TraceStatus::Other => "OTHER",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_states() {
        assert!(TraceStatus::Submitted.is_lifecycle());
        assert!(TraceStatus::Running.is_lifecycle());
        assert!(TraceStatus::Completed.is_lifecycle());
        assert!(!TraceStatus::Other.is_lifecycle());
    }

    #[test]
    fn unknown_status_maps_to_other() {
        let status: TraceStatus = serde_json::from_str(r#""CACHED""#).unwrap();
        assert_eq!(status, TraceStatus::Other);
    }

    #[test]
    fn wire_names_are_upper_case() {
        let status: TraceStatus = serde_json::from_str(r#""SUBMITTED""#).unwrap();
        assert_eq!(status, TraceStatus::Submitted);
        assert_eq!(
            serde_json::to_string(&TraceStatus::Running).unwrap(),
            r#""RUNNING""#
        );
    }
}

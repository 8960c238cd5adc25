use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{EventKind, Trace};

/// One lifecycle message posted by the workflow engine.
///
/// `metadata` is kept as raw JSON: its shape is only validated when it is merged,
/// so a malformed metadata block never prevents the trace from being processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowEvent {
    #[serde(default)]
    pub run_name: String,
    #[serde(default)]
    pub run_id: String,
    #[serde(default, rename = "event")]
    pub kind: EventKind,
    /// ISO-8601 UTC timestamp (`%Y-%m-%dT%H:%M:%SZ`).
    pub utc_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<Trace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl WorkflowEvent {
    /// Metadata block, if present and not an empty object.
    pub fn metadata(&self) -> Option<&Value> {
        match &self.metadata {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) if map.is_empty() => None,
            Some(v) => Some(v),
        }
    }

    /// Trace script, if any.
    pub fn script(&self) -> Option<&str> {
        self.trace.as_ref().and_then(|t| t.script.as_deref())
    }
}

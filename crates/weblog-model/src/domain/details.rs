use serde::Serialize;
use serde_json::Value;

use crate::{EventKind, LocalTime};

/// Display card for the most recent event the engine accepted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub run_name: String,
    pub run_id: String,
    pub event: EventKind,
    pub utc_time: String,
    #[serde(with = "crate::local_time")]
    pub local_time: LocalTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    /// The event body exactly as it was posted.
    pub raw: Value,
}

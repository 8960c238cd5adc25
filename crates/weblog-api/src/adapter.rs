use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::trace;
use weblog_core::{Dashboard, DashboardSnapshot};

use crate::error::ApiError;
use crate::handler::ApiHandler;

/// Adapter that bridges `Dashboard` to `ApiHandler`.
///
/// Ingestion only queues the event; the ticker applies it later.
pub struct DashboardApiAdapter {
    dashboard: Dashboard,
}

impl DashboardApiAdapter {
    pub fn new(dashboard: Dashboard) -> Self {
        Self { dashboard }
    }
}

#[async_trait]
impl ApiHandler for DashboardApiAdapter {
    async fn ingest(&self, event: Value) -> Result<(), ApiError> {
        if !event.is_object() {
            return Err(ApiError::InvalidRequest(
                "event must be a JSON object".into(),
            ));
        }
        let pending = self.dashboard.push(event);
        trace!(pending, "weblog event queued");
        Ok(())
    }

    async fn snapshot(&self) -> Result<Arc<DashboardSnapshot>, ApiError> {
        Ok(self.dashboard.snapshot())
    }
}

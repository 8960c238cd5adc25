use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use weblog_core::DashboardSnapshot;

use crate::error::ApiError;

/// Weblog ingestion and query handler.
///
/// This trait abstracts the backend implementation, allowing users to:
/// - Use the provided `DashboardApiAdapter`
/// - Implement custom handlers with additional logic (auth, filtering, etc.)
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    /// Accept one raw weblog event for the next tick.
    async fn ingest(&self, event: Value) -> Result<(), ApiError>;

    /// Latest published dashboard state.
    async fn snapshot(&self) -> Result<Arc<DashboardSnapshot>, ApiError>;
}

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;
use weblog_core::DashboardSnapshot;
use weblog_model::{EventDetails, LocalTime, MetadataSnapshot, TimelineRow, local_time};

use crate::{error::ApiError, handler::ApiHandler};

/// Body returned for an accepted weblog event.
pub const INGEST_ACK: &str = "Data received";

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    /// Create new HTTP API with the given handler.
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - POST /nf-weblog - Ingest one weblog event
    /// - GET /api/v1/timeline - Timeline rows
    /// - GET /api/v1/metadata - Filtered workflow metadata
    /// - GET /api/v1/events/latest - Latest accepted event
    /// - GET /api/v1/dashboard - Whole published snapshot
    pub fn router(self) -> Router {
        Router::new()
            .route("/nf-weblog", post(ingest::<H>))
            .route("/api/v1/timeline", get(timeline::<H>))
            .route("/api/v1/metadata", get(metadata::<H>))
            .route("/api/v1/events/latest", get(latest_event::<H>))
            .route("/api/v1/dashboard", get(dashboard::<H>))
            .with_state(self.handler)
    }
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Serialize)]
struct AckResponse {
    message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TimelineResponse<'a> {
    seq: u64,
    #[serde(with = "local_time::option")]
    generated_at: Option<LocalTime>,
    rows: &'a [TimelineRow],
    process_order: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LatestEventResponse<'a> {
    seq: u64,
    latest_event: Option<&'a EventDetails>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /nf-weblog
async fn ingest<H>(
    State(handler): State<Arc<H>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let Json(event) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    handler.ingest(event).await?;

    Ok(Json(AckResponse {
        message: INGEST_ACK,
    }))
}

/// GET /api/v1/timeline
async fn timeline<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let snap = handler.snapshot().await?;
    let response = TimelineResponse {
        seq: snap.seq,
        generated_at: snap.generated_at,
        rows: &snap.timeline,
        process_order: &snap.process_order,
    };
    Ok(Json(to_value(&response)?))
}

/// GET /api/v1/metadata
async fn metadata<H>(State(handler): State<Arc<H>>) -> Result<Json<MetadataSnapshot>, ApiError>
where
    H: ApiHandler,
{
    let snap = handler.snapshot().await?;
    Ok(Json(snap.metadata.clone()))
}

/// GET /api/v1/events/latest
async fn latest_event<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let snap = handler.snapshot().await?;
    let response = LatestEventResponse {
        seq: snap.seq,
        latest_event: snap.latest_event.as_ref(),
    };
    Ok(Json(to_value(&response)?))
}

/// GET /api/v1/dashboard
async fn dashboard<H>(State(handler): State<Arc<H>>) -> Result<Json<Value>, ApiError>
where
    H: ApiHandler,
{
    let snap: Arc<DashboardSnapshot> = handler.snapshot().await?;
    Ok(Json(to_value(snap.as_ref())?))
}

// Borrowed views cannot outlive the handler, so they are rendered here.
fn to_value<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Internal(e.to_string()))
}

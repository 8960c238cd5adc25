mod config;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use weblog_api::{DashboardApiAdapter, HttpApi};
use weblog_core::{Dashboard, Subscribe, spawn_ticker};
use weblog_observe::{Journal, logger_init};
use weblog_prometheus::PrometheusMetrics;

use crate::config::AgentConfig;

fn main() -> anyhow::Result<()> {
    // 1) Config + logger, before any runtime thread exists
    let cfg = AgentConfig::from_env().context("invalid configuration")?;
    logger_init(&cfg.logger).context("logger init failed")?;
    info!(
        bind = %cfg.bind,
        timezone = cfg.dashboard.timezone.name(),
        tick_ms = cfg.dashboard.tick_interval.as_millis() as u64,
        "configuration loaded"
    );

    // 2) Runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    runtime.block_on(run(cfg))
}

async fn run(cfg: AgentConfig) -> anyhow::Result<()> {
    // 3) Dashboard
    let metrics = PrometheusMetrics::new().context("failed to register metrics")?;
    let subscribers: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Journal::new())];
    let dashboard = Dashboard::builder(&cfg.dashboard)
        .with_metrics(Arc::new(metrics.clone()))
        .with_subscribers(subscribers)
        .build();

    // 4) Ticker
    let token = CancellationToken::new();
    let ticker = spawn_ticker(dashboard.clone(), cfg.dashboard.tick_interval, token.clone());

    // 5) HTTP
    let api = HttpApi::new(Arc::new(DashboardApiAdapter::new(dashboard))).router();
    let app = api.merge(metrics_router(metrics));

    let listener = tokio::net::TcpListener::bind(cfg.bind)
        .await
        .with_context(|| format!("failed to bind {}", cfg.bind))?;
    info!(addr = %cfg.bind, "weblog agent listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // 6) Drain the intake and stop the ticker
    token.cancel();
    if let Err(e) = ticker.await {
        error!("ticker task failed: {e}");
    }
    info!("weblog agent stopped");

    served.context("http server failed")
}

fn metrics_router(metrics: PrometheusMetrics) -> Router {
    Router::new()
        .route("/metrics", get(render_metrics))
        .with_state(metrics)
}

async fn render_metrics(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    match metrics.render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, metrics.content_type())],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("metrics encoding failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutting down..."),
        Err(e) => {
            // Without a signal handler the server runs until killed.
            error!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await
        }
    }
}

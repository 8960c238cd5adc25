//! Prometheus metrics backend for the weblog aggregation engine.
//!
//! This crate provides a [`PrometheusMetrics`] implementation of [`weblog_core::MetricsBackend`] that exposes engine counters in Prometheus format.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use weblog_core::{Dashboard, DashboardConfig};
//! use weblog_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let dashboard = Dashboard::builder(&DashboardConfig::default())
//!     .with_metrics(Arc::new(metrics.clone()))
//!     .build();
//!
//! dashboard.tick();
//! let text = metrics.render()?;
//! assert!(text.contains("weblog_ticks_total 1"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `weblog_events_received_total` - Counter
//! - `weblog_events_processed_total` - Counter
//! - `weblog_task_completions_total` - Counter
//! - `weblog_diagnostics_total{kind}` - Counter
//! - `weblog_ticks_total` - Counter
//! - `weblog_tick_duration_seconds` - Histogram
//! - `weblog_running_tasks` - Gauge
//! - `weblog_accumulated_processes` - Gauge
//!
//! ## HTTP Server
//! This crate does NOT provide HTTP server for `/metrics` endpoint.
//! Mount [`PrometheusMetrics::render`] behind your application's router.

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};

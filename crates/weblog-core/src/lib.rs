//! Aggregation engine turning workflow lifecycle events into a task timeline.
//!
//! Events are pushed into an [`IntakeBuffer`] by the transport. On every tick a
//! [`Dashboard`] drains the buffer into its [`Engine`], which updates the
//! running-task tracker, the per-process accumulator and the metadata store,
//! then publishes a fresh [`DashboardSnapshot`] for readers.

pub mod accumulator;
pub mod config;
pub mod engine;
pub mod error;
pub mod intake;
pub mod metadata;
pub mod metrics;
pub mod state;
pub mod subscriber;
pub mod ticker;
pub mod time;
pub mod timeline;
pub mod tracker;

pub use config::DashboardConfig;
pub use engine::{Engine, TickReport};
pub use error::CoreError;
pub use intake::IntakeBuffer;
pub use metrics::{MetricsBackend, NoopMetrics};
pub use state::{Dashboard, DashboardBuilder, DashboardSnapshot};
pub use subscriber::Subscribe;
pub use ticker::spawn_ticker;
pub use time::TimeNormalizer;

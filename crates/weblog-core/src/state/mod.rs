use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::Serialize;
use serde_json::Value;
use weblog_model::{Diagnostic, EventDetails, LocalTime, MetadataSnapshot, TimelineRow};

use crate::{
    config::DashboardConfig,
    engine::{Engine, TickReport},
    intake::IntakeBuffer,
    metrics::{MetricsBackend, NoopMetrics},
    subscriber::Subscribe,
};

/// Everything a renderer needs, as of the end of one tick.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// Tick that produced this snapshot; `0` before the first tick.
    pub seq: u64,
    #[serde(with = "weblog_model::local_time::option")]
    pub generated_at: Option<LocalTime>,
    pub timeline: Vec<TimelineRow>,
    /// Process names in display order (category axis).
    pub process_order: Vec<String>,
    pub metadata: MetadataSnapshot,
    pub latest_event: Option<EventDetails>,
    pub running_tasks: usize,
    pub accumulated_processes: usize,
    /// Diagnostics recorded by the tick that produced this snapshot.
    pub diagnostics: Vec<Diagnostic>,
}

/// Shared handle to one engine, its intake buffer and its published snapshot.
///
/// Cheap to clone. Producers call [`Dashboard::push`], the ticker calls
/// [`Dashboard::tick`], readers call [`Dashboard::snapshot`].
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    intake: IntakeBuffer,
    /// Held for the whole tick: two ticks never interleave.
    engine: Mutex<Engine>,
    /// Replaced wholesale at the end of each tick.
    published: RwLock<Arc<DashboardSnapshot>>,
    metrics: Arc<dyn MetricsBackend>,
}

impl Dashboard {
    /// Dashboard without metrics or subscribers.
    pub fn new(config: &DashboardConfig) -> Self {
        Self::builder(config).build()
    }

    pub fn builder(config: &DashboardConfig) -> DashboardBuilder {
        DashboardBuilder {
            config: config.clone(),
            metrics: Arc::new(NoopMetrics),
            subscribers: Vec::new(),
        }
    }

    /// Queue a raw event for the next tick. Returns the number of pending events.
    pub fn push(&self, event: Value) -> usize {
        let pending = self.inner.intake.push(event);
        self.inner.metrics.record_event_received();
        pending
    }

    /// Run one aggregation cycle and publish its snapshot.
    pub fn tick(&self) -> TickReport {
        let mut engine = self
            .inner
            .engine
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let batch = self.inner.intake.drain_all();
        let report = engine.process_batch(batch);
        let snapshot = Arc::new(engine.snapshot(&report));

        // Publish before releasing the engine so snapshots appear in tick order.
        *self
            .inner
            .published
            .write()
            .unwrap_or_else(PoisonError::into_inner) = snapshot;
        drop(engine);

        self.inner.metrics.record_tick(&report);
        report
    }

    /// Latest complete snapshot.
    pub fn snapshot(&self) -> Arc<DashboardSnapshot> {
        let published = self
            .inner
            .published
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&published)
    }

    /// Events waiting for the next tick.
    pub fn pending(&self) -> usize {
        self.inner.intake.len()
    }
}

pub struct DashboardBuilder {
    config: DashboardConfig,
    metrics: Arc<dyn MetricsBackend>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl DashboardBuilder {
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsBackend>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    pub fn build(self) -> Dashboard {
        let engine = Engine::new(&self.config).with_subscribers(self.subscribers);
        Dashboard {
            inner: Arc::new(DashboardInner {
                intake: IntakeBuffer::new(),
                engine: Mutex::new(engine),
                published: RwLock::new(Arc::new(DashboardSnapshot::default())),
                metrics: self.metrics,
            }),
        }
    }
}

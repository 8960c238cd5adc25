use crate::engine::TickReport;

/// Sink for engine counters.
///
/// The default [`NoopMetrics`] discards everything; `weblog-prometheus`
/// provides an exporter.
pub trait MetricsBackend: Send + Sync + 'static {
    /// An event was accepted into the intake buffer.
    fn record_event_received(&self);

    /// A tick finished.
    fn record_tick(&self, report: &TickReport);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsBackend for NoopMetrics {
    fn record_event_received(&self) {}

    fn record_tick(&self, _report: &TickReport) {}
}

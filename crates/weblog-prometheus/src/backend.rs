use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use weblog_core::{MetricsBackend, TickReport};
use weblog_model::DiagnosticKind;

const DIAGNOSTIC_KINDS: [DiagnosticKind; 4] = [
    DiagnosticKind::MalformedTimestamp,
    DiagnosticKind::InvalidMetadataShape,
    DiagnosticKind::InvalidInterval,
    DiagnosticKind::MalformedEvent,
];

/// Engine counters registered in a private [`Registry`].
///
/// Clones share the same underlying metrics.
#[derive(Clone)]
pub struct PrometheusMetrics {
    registry: Registry,
    events_received: IntCounter,
    events_processed: IntCounter,
    completions: IntCounter,
    diagnostics: IntCounterVec,
    ticks: IntCounter,
    tick_duration: Histogram,
    running_tasks: IntGauge,
    accumulated_processes: IntGauge,
}

impl PrometheusMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::with_registry(Registry::new())
    }

    /// Register all metrics in `registry`.
    pub fn with_registry(registry: Registry) -> Result<Self, prometheus::Error> {
        let events_received = IntCounter::with_opts(Opts::new(
            "weblog_events_received_total",
            "Events accepted into the intake buffer",
        ))?;
        let events_processed = IntCounter::with_opts(Opts::new(
            "weblog_events_processed_total",
            "Events that updated engine state",
        ))?;
        let completions = IntCounter::with_opts(Opts::new(
            "weblog_task_completions_total",
            "Task completions folded into process spans",
        ))?;
        let diagnostics = IntCounterVec::new(
            Opts::new(
                "weblog_diagnostics_total",
                "Recoverable failures recorded during ticks",
            ),
            &["kind"],
        )?;
        let ticks = IntCounter::with_opts(Opts::new(
            "weblog_ticks_total",
            "Aggregation ticks executed",
        ))?;
        let tick_duration = Histogram::with_opts(
            HistogramOpts::new(
                "weblog_tick_duration_seconds",
                "Time spent in one aggregation tick",
            )
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        )?;
        let running_tasks = IntGauge::with_opts(Opts::new(
            "weblog_running_tasks",
            "Tasks submitted and not yet completed",
        ))?;
        let accumulated_processes = IntGauge::with_opts(Opts::new(
            "weblog_accumulated_processes",
            "Processes with at least one completed task",
        ))?;

        registry.register(Box::new(events_received.clone()))?;
        registry.register(Box::new(events_processed.clone()))?;
        registry.register(Box::new(completions.clone()))?;
        registry.register(Box::new(diagnostics.clone()))?;
        registry.register(Box::new(ticks.clone()))?;
        registry.register(Box::new(tick_duration.clone()))?;
        registry.register(Box::new(running_tasks.clone()))?;
        registry.register(Box::new(accumulated_processes.clone()))?;

        // Pre-create every label so zero counts are exported.
        for kind in DIAGNOSTIC_KINDS {
            diagnostics.with_label_values(&[kind.as_str()]);
        }

        Ok(Self {
            registry,
            events_received,
            events_processed,
            completions,
            diagnostics,
            ticks,
            tick_duration,
            running_tasks,
            accumulated_processes,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn gather(&self) -> Vec<prometheus::proto::MetricFamily> {
        self.registry.gather()
    }

    /// Text exposition format, ready to serve on `/metrics`.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_event_received(&self) {
        self.events_received.inc();
    }

    fn record_tick(&self, report: &TickReport) {
        self.ticks.inc();
        self.events_processed.inc_by(report.processed as u64);
        self.completions.inc_by(report.completions as u64);
        for d in &report.diagnostics {
            self.diagnostics.with_label_values(&[d.kind.as_str()]).inc();
        }
        self.tick_duration.observe(report.elapsed.as_secs_f64());
        self.running_tasks.set(report.running as i64);
        self.accumulated_processes.set(report.accumulated as i64);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use weblog_model::Diagnostic;

    use super::*;

    fn report() -> TickReport {
        TickReport {
            seq: 1,
            events: 3,
            processed: 2,
            completions: 1,
            running: 4,
            accumulated: 2,
            diagnostics: vec![Diagnostic::new(
                DiagnosticKind::MalformedTimestamp,
                "bad utcTime",
            )],
            elapsed: Duration::from_micros(250),
        }
    }

    #[test]
    fn tick_updates_counters_and_gauges() {
        let m = PrometheusMetrics::new().unwrap();
        m.record_event_received();
        m.record_event_received();
        m.record_tick(&report());

        let text = m.render().unwrap();
        assert!(text.contains("weblog_events_received_total 2"));
        assert!(text.contains("weblog_events_processed_total 2"));
        assert!(text.contains("weblog_task_completions_total 1"));
        assert!(text.contains("weblog_ticks_total 1"));
        assert!(text.contains("weblog_running_tasks 4"));
        assert!(text.contains("weblog_accumulated_processes 2"));
        assert!(text.contains(r#"weblog_diagnostics_total{kind="malformed_timestamp"} 1"#));
        assert!(text.contains(r#"weblog_diagnostics_total{kind="invalid_interval"} 0"#));
        assert!(text.contains("weblog_tick_duration_seconds_count 1"));
    }

    #[test]
    fn clones_share_state() {
        let m = PrometheusMetrics::new().unwrap();
        let c = m.clone();
        c.record_event_received();
        assert!(m.render().unwrap().contains("weblog_events_received_total 1"));
    }

    #[test]
    fn double_registration_fails() {
        let registry = Registry::new();
        PrometheusMetrics::with_registry(registry.clone()).unwrap();
        assert!(PrometheusMetrics::with_registry(registry).is_err());
    }
}

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, instrument, warn};
use weblog_model::{Diagnostic, DiagnosticKind, EventDetails, LocalTime, WorkflowEvent};

use crate::{
    accumulator::ProcessAccumulator,
    config::DashboardConfig,
    error::CoreError,
    metadata::{MetadataFilter, MetadataStore},
    state::DashboardSnapshot,
    subscriber::Subscribe,
    time::TimeNormalizer,
    timeline::{self, Materialized},
    tracker::{Completion, TaskTracker, Transition},
};

/// Outcome of one tick.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickReport {
    /// Tick sequence number, starting at 1.
    pub seq: u64,
    /// Events drained from the intake buffer.
    pub events: usize,
    /// Events that updated state (the rest produced diagnostics).
    pub processed: usize,
    /// Task completions folded into the accumulator.
    pub completions: usize,
    pub running: usize,
    pub accumulated: usize,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl TickReport {
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }
}

/// Owner of all derived state for one workflow event stream.
///
/// Not synchronized: [`Dashboard`](crate::Dashboard) serializes access to it.
pub struct Engine {
    normalizer: TimeNormalizer,
    metadata: MetadataStore,
    tracker: TaskTracker,
    accumulator: ProcessAccumulator,
    latest: Option<EventDetails>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    timeline: Materialized,
    seq: u64,
}

impl Engine {
    pub fn new(config: &DashboardConfig) -> Self {
        let filter = MetadataFilter::new(
            config.noisy_keys.iter().cloned(),
            config.metadata_max_depth,
        );
        Self {
            normalizer: TimeNormalizer::new(config.timezone),
            metadata: MetadataStore::new(filter),
            tracker: TaskTracker::new(),
            accumulator: ProcessAccumulator::new(),
            latest: None,
            subscribers: Vec::new(),
            timeline: Materialized::default(),
            seq: 0,
        }
    }

    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Fold a drained batch into the state and rematerialize the timeline.
    ///
    /// Every event is handled in isolation: a failing event is recorded as a
    /// diagnostic and the rest of the batch still applies.
    #[instrument(level = "debug", skip(self, batch), fields(events = batch.len()))]
    pub fn process_batch(&mut self, batch: Vec<Value>) -> TickReport {
        let started = Instant::now();
        self.seq += 1;

        let mut report = TickReport {
            seq: self.seq,
            events: batch.len(),
            ..Default::default()
        };
        let mut completions = Vec::new();

        for (index, raw) in batch.into_iter().enumerate() {
            match self.apply_event(&raw, &mut completions, &mut report.diagnostics, index) {
                Ok((event, local_time)) => {
                    report.processed += 1;
                    self.latest = Some(EventDetails {
                        script: event.script().map(str::to_string),
                        run_name: event.run_name,
                        run_id: event.run_id,
                        event: event.kind,
                        utc_time: event.utc_time,
                        local_time,
                        raw,
                    });
                }
                Err(e) => {
                    let diagnostic = event_diagnostic(&e, index, &raw);
                    warn!(
                        index,
                        kind = %diagnostic.kind,
                        run_id = diagnostic.run_id.as_deref().unwrap_or("unknown"),
                        "event skipped: {e}"
                    );
                    report.diagnostics.push(diagnostic);
                }
            }
        }

        report.completions = completions.len();
        self.accumulator.fold(completions);

        self.timeline = timeline::materialize(&self.accumulator, &self.tracker);
        for e in &self.timeline.rejected {
            error!("timeline row excluded: {e}");
            report.diagnostics.push(row_diagnostic(e));
        }

        report.running = self.tracker.len();
        report.accumulated = self.accumulator.len();
        report.elapsed = started.elapsed();

        debug!(
            seq = report.seq,
            processed = report.processed,
            completions = report.completions,
            running = report.running,
            accumulated = report.accumulated,
            diagnostics = report.diagnostics.len(),
            "tick complete"
        );
        report
    }

    fn apply_event(
        &mut self,
        raw: &Value,
        completions: &mut Vec<Completion>,
        diagnostics: &mut Vec<Diagnostic>,
        index: usize,
    ) -> Result<(WorkflowEvent, LocalTime), CoreError> {
        let event = WorkflowEvent::deserialize(raw)?;
        let local_time = self.normalizer.from_utc_str(&event.utc_time)?;

        // Trace first: the tracker validates before mutating, so a bad trace
        // timestamp skips the whole event without touching the metadata store.
        if let Some(trace) = &event.trace
            && let Transition::Completed(done) =
                self.tracker.apply(trace, local_time, &self.normalizer)?
        {
            completions.push(done);
        }

        if let Some(metadata) = event.metadata()
            && let Err(e) = self.metadata.merge(metadata)
        {
            warn!(index, run_id = %event.run_id, "metadata dropped: {e}");
            diagnostics.push(event_diagnostic(&e, index, raw));
        }

        for s in &self.subscribers {
            s.on_event(&event);
        }
        Ok((event, local_time))
    }

    /// Build the read-only view published after a tick.
    pub fn snapshot(&self, report: &TickReport) -> DashboardSnapshot {
        DashboardSnapshot {
            seq: report.seq,
            generated_at: Some(self.normalizer.now()),
            process_order: timeline::process_order(&self.timeline.rows),
            timeline: self.timeline.rows.clone(),
            metadata: self.metadata.snapshot(),
            latest_event: self.latest.clone(),
            running_tasks: report.running,
            accumulated_processes: report.accumulated,
            diagnostics: report.diagnostics.clone(),
        }
    }

    pub fn tracker(&self) -> &TaskTracker {
        &self.tracker
    }

    pub fn accumulator(&self) -> &ProcessAccumulator {
        &self.accumulator
    }

    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    pub fn normalizer(&self) -> &TimeNormalizer {
        &self.normalizer
    }

    pub fn latest_event(&self) -> Option<&EventDetails> {
        self.latest.as_ref()
    }
}

fn event_diagnostic(e: &CoreError, index: usize, raw: &Value) -> Diagnostic {
    let kind = e.diagnostic_kind().unwrap_or(DiagnosticKind::MalformedEvent);
    let mut d = Diagnostic::new(kind, e.to_string()).with_event_index(index);
    if let Some(run_id) = raw.get("runId").and_then(Value::as_str) {
        d = d.with_run_id(run_id);
    }
    if let Some(task) = raw.pointer("/trace/task_id") {
        match task {
            Value::String(s) => d = d.with_subject(s.as_str()),
            Value::Number(n) => d = d.with_subject(n.to_string()),
            _ => {}
        }
    }
    d
}

fn row_diagnostic(e: &CoreError) -> Diagnostic {
    let d = Diagnostic::new(DiagnosticKind::InvalidInterval, e.to_string());
    match e {
        CoreError::InvalidInterval { id, .. } => d.with_subject(id.as_str()),
        _ => d,
    }
}

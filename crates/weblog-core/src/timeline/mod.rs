use weblog_model::TimelineRow;

use crate::{accumulator::ProcessAccumulator, error::CoreError, tracker::TaskTracker};

/// Rows ready for display plus the rows that had to be left out.
#[derive(Debug, Default)]
pub struct Materialized {
    pub rows: Vec<TimelineRow>,
    pub rejected: Vec<CoreError>,
}

/// Merge accumulated processes and running tasks into one ordered timeline.
///
/// The two sources live in disjoint key spaces (process names vs task ids), so
/// rows are simply concatenated and sorted by start, then process, then id.
/// Rows whose start is after their end are excluded and reported.
pub fn materialize(accumulator: &ProcessAccumulator, tracker: &TaskTracker) -> Materialized {
    let mut out = Materialized {
        rows: Vec::with_capacity(accumulator.len() + tracker.len()),
        rejected: Vec::new(),
    };

    let candidates = accumulator
        .iter()
        .map(TimelineRow::from)
        .chain(tracker.iter().map(TimelineRow::from));

    for row in candidates {
        match check_interval(row) {
            Ok(row) => out.rows.push(row),
            Err(e) => out.rejected.push(e),
        }
    }

    sort_rows(&mut out.rows);
    out
}

/// Stable display order: start ascending, then process name, then row id.
pub fn sort_rows(rows: &mut [TimelineRow]) {
    rows.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| a.process.cmp(&b.process))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Distinct process names in display order, for category axes.
pub fn process_order(rows: &[TimelineRow]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    rows.iter()
        .filter(|r| seen.insert(r.process.as_str()))
        .map(|r| r.process.clone())
        .collect()
}

fn check_interval(row: TimelineRow) -> Result<TimelineRow, CoreError> {
    if row.is_ordered() {
        Ok(row)
    } else {
        Err(CoreError::InvalidInterval {
            id: row.id,
            process: row.process,
            start: row.start.to_rfc3339(),
            end: row.end.to_rfc3339(),
        })
    }
}

use std::collections::{BTreeMap, HashMap};

use weblog_model::{AccumulatedProcess, LocalTime, ProcessName};

use crate::tracker::Completion;

/// Completed time span per process name.
#[derive(Debug, Default)]
pub struct ProcessAccumulator {
    processes: HashMap<ProcessName, AccumulatedProcess>,
}

impl ProcessAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one tick's completions into the accumulated spans.
    ///
    /// Completions are first reduced per process to `(min start, max end)`.
    /// A process seen for the first time takes that span as is; an existing one
    /// keeps its start and only extends its end. Returns the number of processes touched.
    pub fn fold<I>(&mut self, completions: I) -> usize
    where
        I: IntoIterator<Item = Completion>,
    {
        let mut batch: BTreeMap<ProcessName, (LocalTime, LocalTime)> = BTreeMap::new();
        for c in completions {
            batch
                .entry(c.process)
                .and_modify(|(start, end)| {
                    if c.start < *start {
                        *start = c.start;
                    }
                    if c.end > *end {
                        *end = c.end;
                    }
                })
                .or_insert((c.start, c.end));
        }

        let touched = batch.len();
        for (process, (start, end)) in batch {
            match self.processes.get_mut(&process) {
                Some(existing) => {
                    if end > existing.end {
                        existing.end = end;
                    }
                }
                None => {
                    self.processes.insert(
                        process.clone(),
                        AccumulatedProcess {
                            process,
                            start,
                            end,
                        },
                    );
                }
            }
        }
        touched
    }

    pub fn get(&self, process: &str) -> Option<&AccumulatedProcess> {
        self.processes.get(process)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccumulatedProcess> {
        self.processes.values()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use weblog_model::TaskId;

    use super::*;
    use crate::time::TimeNormalizer;

    fn at(ms: i64) -> LocalTime {
        TimeNormalizer::new(chrono_tz::UTC)
            .from_epoch_millis(ms)
            .unwrap()
    }

    fn done(id: &str, process: &str, start: i64, end: i64) -> Completion {
        Completion {
            task_id: TaskId::from(id),
            process: process.to_string(),
            start: at(start),
            end: at(end),
        }
    }

    #[test]
    fn batch_takes_min_start_and_max_end() {
        let mut acc = ProcessAccumulator::new();
        acc.fold([done("a", "merge", 5_000, 20_000), done("b", "merge", 8_000, 90_000)]);

        let p = acc.get("merge").unwrap();
        assert_eq!(p.start, at(5_000));
        assert_eq!(p.end, at(90_000));
    }

    #[test]
    fn start_is_pinned_after_first_batch() {
        let mut acc = ProcessAccumulator::new();
        acc.fold([done("a", "p", 1_000, 2_000)]);
        acc.fold([done("b", "p", 0, 3_000)]);

        let p = acc.get("p").unwrap();
        assert_eq!(p.start, at(1_000));
        assert_eq!(p.end, at(3_000));
    }

    #[test]
    fn end_never_moves_backwards() {
        let mut acc = ProcessAccumulator::new();
        acc.fold([done("a", "p", 1_000, 8_000)]);
        acc.fold([done("b", "p", 2_000, 4_000)]);

        assert_eq!(acc.get("p").unwrap().end, at(8_000));
    }

    #[test]
    fn processes_are_independent() {
        let mut acc = ProcessAccumulator::new();
        let touched = acc.fold([
            done("a", "align", 0, 10_000),
            done("b", "sort", 5_000, 20_000),
            done("c", "align", 2_000, 30_000),
        ]);
        assert_eq!(touched, 2);
        assert_eq!(acc.len(), 2);
        assert_eq!(acc.get("align").unwrap().start, at(0));
        assert_eq!(acc.get("align").unwrap().end, at(30_000));
        assert_eq!(acc.get("sort").unwrap().start, at(5_000));
    }

    #[test]
    fn empty_batch_changes_nothing() {
        let mut acc = ProcessAccumulator::new();
        assert_eq!(acc.fold(Vec::new()), 0);
        assert!(acc.is_empty());
    }
}

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;

/// Raw events accepted by the transport and waiting for the next tick.
///
/// `push` and `drain_all` share one mutex: an event pushed while a drain is in
/// progress lands in the following batch.
#[derive(Debug, Default)]
pub struct IntakeBuffer {
    queue: Mutex<Vec<Value>>,
}

impl IntakeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event; returns the queue length after the push.
    pub fn push(&self, event: Value) -> usize {
        let mut queue = self.lock();
        queue.push(event);
        queue.len()
    }

    /// Take every queued event in arrival order, leaving the buffer empty.
    pub fn drain_all(&self) -> Vec<Value> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Value>> {
        // A panic while holding the lock cannot leave a Vec half-written.
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use serde_json::json;

    use super::*;

    #[test]
    fn drain_returns_arrival_order_and_empties() {
        let buf = IntakeBuffer::new();
        buf.push(json!(1));
        buf.push(json!(2));
        assert_eq!(buf.push(json!(3)), 3);

        assert_eq!(buf.drain_all(), vec![json!(1), json!(2), json!(3)]);
        assert!(buf.is_empty());
    }

    #[test]
    fn drain_on_empty_buffer_is_empty() {
        let buf = IntakeBuffer::new();
        assert!(buf.drain_all().is_empty());
    }

    #[test]
    fn concurrent_pushes_are_never_lost_or_duplicated() {
        let buf = Arc::new(IntakeBuffer::new());
        let producers: Vec<_> = (0..4)
            .map(|p| {
                let buf = Arc::clone(&buf);
                thread::spawn(move || {
                    for i in 0..500 {
                        buf.push(json!(p * 1_000 + i));
                    }
                })
            })
            .collect();

        let mut drained = Vec::new();
        while producers.iter().any(|h| !h.is_finished()) {
            drained.extend(buf.drain_all());
        }
        for h in producers {
            h.join().unwrap();
        }
        drained.extend(buf.drain_all());

        let mut seen: Vec<i64> = drained.iter().map(|v| v.as_i64().unwrap()).collect();
        assert_eq!(seen.len(), 2_000);
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 2_000);
    }
}

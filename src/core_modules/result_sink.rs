// THEORY:
// The `ResultSink` is the single collection point on the far side of the
// worker pool. It owns its own mutex, condition variable, collection and
// counters; callers interact with it only through its operations and never
// see a raw reference to its internals.
//
// The sink is constructed with the number of chunks the partition produced.
// Workers deposit processed chunks as they finish, in arbitrary order, and
// the orchestrating thread parks in `wait_for_all` until the completed count
// reaches that expectation. `wait_for_all` then moves the whole collection
// out to the caller in one transfer, so the sink can only be harvested once.

use std::sync::{Condvar, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core_modules::chunk::ImageChunk;

/// Thread-safe accumulator for processed chunks with a completion gate.
pub struct ResultSink {
    results: Mutex<Vec<ImageChunk>>,
    all_done: Condvar,
    expected: usize,
    completed: AtomicUsize,
}

impl ResultSink {
    /// Creates a sink that considers itself complete after `expected`
    /// deposits.
    pub fn new(expected: usize) -> Self {
        Self {
            results: Mutex::new(Vec::with_capacity(expected)),
            all_done: Condvar::new(),
            expected,
            completed: AtomicUsize::new(0),
        }
    }

    /// Deposits one processed chunk, taking ownership. Wakes the waiter once
    /// the expected count is reached.
    pub fn add_result(&self, chunk: ImageChunk) {
        let mut results = self.results.lock().unwrap();
        results.push(chunk);
        let completed = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        if completed >= self.expected {
            self.all_done.notify_all();
        }
    }

    /// Blocks until the expected number of chunks has been deposited, then
    /// moves the entire collection out. The sink is emptied by this call; a
    /// second call returns an empty vector.
    pub fn wait_for_all(&self) -> Vec<ImageChunk> {
        let mut results = self.results.lock().unwrap();
        while self.completed.load(Ordering::SeqCst) < self.expected {
            results = self.all_done.wait(results).unwrap();
        }
        std::mem::take(&mut *results)
    }

    /// Fraction of expected chunks deposited so far, 0.0 when nothing is
    /// expected.
    pub fn progress(&self) -> f32 {
        if self.expected == 0 {
            return 0.0;
        }
        self.completed.load(Ordering::SeqCst) as f32 / self.expected as f32
    }

    /// Number of chunks deposited so far.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Number of chunks this sink was constructed to expect.
    pub fn expected(&self) -> usize {
        self.expected
    }
}

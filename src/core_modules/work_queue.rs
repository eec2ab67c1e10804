// THEORY:
// The `WorkQueue` is the synchronization heart of the pipeline: a thread-safe
// FIFO with blocking pop and explicit closure. Its whole contract fits in
// three rules:
//
// 1.  `pop` blocks while the queue is open and empty.
// 2.  `pop` returns an item whenever one is available, closed or not, so a
//     closed queue still drains completely.
// 3.  `pop` returns `None` only when the queue is both empty and closed.
//     That is the signal a worker uses to terminate.
//
// Emptiness and closure are checked together under one mutex, which is what
// makes the contract race-free: a push, a close, and a pop can interleave in
// any order without a popper missing a wakeup or reporting "drained" while an
// item is still in the queue. The closed flag is monotonic (false -> true,
// once), and pushes after closure are rejected as a defined no-op.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// A closable, thread-safe FIFO queue with blocking pop.
pub struct WorkQueue<T> {
    state: Mutex<QueueState<T>>,
    available: Condvar,
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Appends an item to the tail and wakes one blocked popper.
    ///
    /// Returns `false` without enqueuing if the queue has been closed. The
    /// producer in this pipeline always finishes pushing before it closes,
    /// so a rejected push indicates a protocol violation by the caller.
    pub fn push(&self, item: T) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return false;
        }
        state.items.push_back(item);
        self.available.notify_one();
        true
    }

    /// Removes and returns the head item, blocking while the queue is open
    /// and empty. Returns `None` only once the queue is empty and closed.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.state.lock().unwrap();
        loop {
            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }
            if state.closed {
                return None;
            }
            state = self.available.wait(state).unwrap();
        }
    }

    /// Marks the queue closed and wakes every blocked popper. Idempotent.
    /// Items already queued remain poppable until drained.
    pub fn close(&self) {
        let mut state = self.state.lock().unwrap();
        state.closed = true;
        self.available.notify_all();
    }

    /// Instantaneous item count, for diagnostics only.
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().items.len()
    }

    /// Instantaneous emptiness check, for diagnostics only.
    pub fn is_empty(&self) -> bool {
        self.state.lock().unwrap().items.is_empty()
    }

    /// True once [`WorkQueue::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

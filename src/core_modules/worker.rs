// THEORY:
// The `WorkerPool` owns the N consumer threads of the pipeline. Each worker
// runs the same loop: pop a task from the shared queue, execute its
// transform, move the resulting chunk out of the task and deposit it in the
// sink. A `None` from the queue means closed-and-drained, and the worker
// exits permanently; workers never re-subscribe.
//
// Per-chunk problems are absorbed at this boundary. A task whose chunk has
// already been extracted yields nothing; the worker logs it and keeps
// looping rather than crashing the thread. Because such a task deposits no
// result, the pool keeps its own delivered tally, separate from the sink's
// completed count, so the orchestrator can verify that every queued task
// actually produced a result before it trusts the sink's contents.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use log::{debug, warn};

use crate::core_modules::result_sink::ResultSink;
use crate::core_modules::task::TaskHandle;
use crate::core_modules::work_queue::WorkQueue;

/// A fixed pool of worker threads draining a shared task queue into a shared
/// result sink.
pub struct WorkerPool {
    workers: Vec<JoinHandle<()>>,
    delivered: Arc<AtomicUsize>,
}

impl WorkerPool {
    /// Spawns `worker_count` threads, each looping pop/execute/deposit until
    /// the queue reports closed and drained.
    pub fn spawn(
        worker_count: usize,
        queue: Arc<WorkQueue<TaskHandle>>,
        sink: Arc<ResultSink>,
    ) -> Self {
        let delivered = Arc::new(AtomicUsize::new(0));
        let mut workers = Vec::with_capacity(worker_count);

        for worker_id in 0..worker_count {
            let queue = Arc::clone(&queue);
            let sink = Arc::clone(&sink);
            let delivered = Arc::clone(&delivered);

            workers.push(thread::spawn(move || {
                Self::run_worker(worker_id, &queue, &sink, &delivered);
            }));
        }

        Self { workers, delivered }
    }

    fn run_worker(
        worker_id: usize,
        queue: &WorkQueue<TaskHandle>,
        sink: &ResultSink,
        delivered: &AtomicUsize,
    ) {
        while let Some(mut task) = queue.pop() {
            task.execute();
            match task.take_result() {
                Some(chunk) => {
                    debug!("worker {worker_id}: finished chunk {}", chunk.id);
                    sink.add_result(chunk);
                    delivered.fetch_add(1, Ordering::SeqCst);
                }
                None => {
                    // Already-extracted task: skip it, keep the loop alive.
                    warn!("worker {worker_id}: task yielded no chunk, skipping");
                }
            }
        }
        debug!("worker {worker_id}: queue drained, exiting");
    }

    /// Number of chunks the pool has deposited into the sink so far.
    pub fn delivered(&self) -> usize {
        self.delivered.load(Ordering::SeqCst)
    }

    /// Blocks until every worker thread has exited, then reports the total
    /// number of chunks delivered across the pool.
    pub fn join(self) -> usize {
        for worker in self.workers {
            if worker.join().is_err() {
                warn!("a worker thread panicked before exiting");
            }
        }
        self.delivered.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::chunk::{CHANNELS, ImageChunk};
    use crate::core_modules::task::{InvertTask, Task};

    fn spawn_pipeline(task_count: u32, worker_count: usize) -> (Arc<WorkQueue<TaskHandle>>, Arc<ResultSink>, WorkerPool) {
        let queue: Arc<WorkQueue<TaskHandle>> = Arc::new(WorkQueue::new());
        let sink = Arc::new(ResultSink::new(task_count as usize));
        let pool = WorkerPool::spawn(worker_count, Arc::clone(&queue), Arc::clone(&sink));
        (queue, sink, pool)
    }

    #[test]
    fn pool_processes_every_queued_task() {
        let (queue, sink, pool) = spawn_pipeline(16, 4);

        for id in 0..16 {
            let mut chunk = ImageChunk::new(id, 2, 2, CHANNELS, 0, 0);
            chunk.data.fill(100);
            assert!(queue.push(Box::new(InvertTask::new(chunk))));
        }
        queue.close();

        assert_eq!(pool.join(), 16);

        let mut results = sink.wait_for_all();
        results.sort_by_key(|c| c.id);
        assert_eq!(results.len(), 16);
        for (expected_id, chunk) in results.iter().enumerate() {
            assert_eq!(chunk.id, expected_id as u32);
            assert!(chunk.data.iter().all(|&b| b == 155));
        }
    }

    #[test]
    fn workers_exit_on_immediate_close() {
        let (queue, _sink, pool) = spawn_pipeline(0, 3);
        queue.close();
        assert_eq!(pool.join(), 0);
    }

    #[test]
    fn extracted_task_is_skipped_without_stalling_the_pool() {
        let (queue, sink, pool) = spawn_pipeline(2, 2);

        // One poisoned task whose chunk is already gone, two healthy ones.
        let mut hollow = InvertTask::new(ImageChunk::new(7, 2, 2, CHANNELS, 0, 0));
        hollow.take_result();
        assert!(queue.push(Box::new(hollow)));
        assert!(queue.push(Box::new(InvertTask::new(ImageChunk::new(0, 2, 2, CHANNELS, 0, 0)))));
        assert!(queue.push(Box::new(InvertTask::new(ImageChunk::new(1, 2, 2, CHANNELS, 2, 0)))));
        queue.close();

        // The hollow task must not count as delivered.
        assert_eq!(pool.join(), 2);
        assert_eq!(sink.wait_for_all().len(), 2);
    }
}

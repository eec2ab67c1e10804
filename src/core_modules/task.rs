// THEORY:
// A `Task` is the capability interface between the queue and the workers. The
// queue is typed directly over `Box<dyn Task + Send>`, so a worker never needs
// to know which concrete transform it is running and never needs a runtime
// downcast: it pops a task, executes it, and takes the result.
//
// The ownership protocol is the important part. A task wraps exactly one
// `ImageChunk` and yields it at most once: `take_result` is a one-time move.
// After the move the task is an empty husk whose `id` reports `None`, which
// is how a worker recognizes (and skips) a task that has nothing left to give.

use crate::core_modules::chunk::ImageChunk;

/// A unit of work wrapping one chunk and the operation to apply to it.
pub trait Task {
    /// Identity of the wrapped chunk, or `None` once the chunk has been
    /// extracted with [`Task::take_result`].
    fn id(&self) -> Option<u32>;

    /// Runs the transform against the wrapped chunk in place. A no-op if the
    /// chunk has already been extracted.
    fn execute(&mut self);

    /// Moves the processed chunk out of the task. Yields `Some` exactly once;
    /// every later call yields `None`.
    fn take_result(&mut self) -> Option<ImageChunk>;
}

/// Boxed task handle as it travels through the work queue.
pub type TaskHandle = Box<dyn Task + Send>;

/// The single concrete task variant: inverts the chunk's colors in place.
pub struct InvertTask {
    chunk: Option<ImageChunk>,
}

impl InvertTask {
    pub fn new(chunk: ImageChunk) -> Self {
        Self { chunk: Some(chunk) }
    }
}

impl Task for InvertTask {
    fn id(&self) -> Option<u32> {
        self.chunk.as_ref().map(|c| c.id)
    }

    fn execute(&mut self) {
        if let Some(chunk) = self.chunk.as_mut() {
            chunk.invert_colors();
        }
    }

    fn take_result(&mut self) -> Option<ImageChunk> {
        self.chunk.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::chunk::CHANNELS;

    #[test]
    fn execute_inverts_wrapped_chunk() {
        let mut chunk = ImageChunk::new(5, 2, 2, CHANNELS, 0, 0);
        chunk.data.fill(10);

        let mut task = InvertTask::new(chunk);
        assert_eq!(task.id(), Some(5));
        task.execute();

        let result = task.take_result().expect("first extraction yields the chunk");
        assert!(result.data.iter().all(|&b| b == 245));
    }

    #[test]
    fn take_result_is_a_one_time_move() {
        let mut task = InvertTask::new(ImageChunk::new(1, 2, 2, CHANNELS, 0, 0));

        assert!(task.take_result().is_some());
        assert!(task.take_result().is_none());
        assert_eq!(task.id(), None);
    }

    #[test]
    fn execute_after_extraction_is_a_no_op() {
        let mut task = InvertTask::new(ImageChunk::new(0, 2, 2, CHANNELS, 0, 0));
        task.take_result();
        task.execute();
        assert!(task.take_result().is_none());
    }
}

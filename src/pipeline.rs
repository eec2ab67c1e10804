// THEORY:
// The `pipeline` module is the top-level API for the whole engine. It wires
// the core modules into the one fixed data flow the crate exists for:
//
//   partition -> enqueue all tasks -> close the queue -> workers drain it
//   -> wait for every result -> sort by chunk id -> reassemble
//
// The producer side runs to completion before the queue is closed, so a
// rejected push can only mean a caller bug. On the consumer side the pool's
// delivered tally is checked against the partition's chunk count *before*
// the sink is harvested: a pipeline that lost a chunk fails loudly with
// `IncompleteResults` instead of blocking forever or writing a corrupted
// image. The final sort by id is the only ordering guarantee in the system;
// everything between enqueue and harvest is deliberately unordered.

use std::path::Path;
use std::sync::Arc;

use log::info;
use thiserror::Error;

use crate::core_modules::chunk::{CHANNELS, ImageChunk};
use crate::core_modules::partition::{CoverageError, partition, reassemble};
use crate::core_modules::result_sink::ResultSink;
use crate::core_modules::task::{InvertTask, TaskHandle};
use crate::core_modules::utils::image_io;
use crate::core_modules::work_queue::WorkQueue;
use crate::core_modules::worker::WorkerPool;

/// Nominal chunk edge used when the caller does not pick one.
pub const DEFAULT_CHUNK_WIDTH: u32 = 128;
pub const DEFAULT_CHUNK_HEIGHT: u32 = 128;

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Nominal chunk width in pixels. Edge chunks may be narrower.
    pub chunk_width: u32,
    /// Nominal chunk height in pixels. Edge chunks may be shorter.
    pub chunk_height: u32,
    /// Number of worker threads draining the queue.
    pub worker_count: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_width: DEFAULT_CHUNK_WIDTH,
            chunk_height: DEFAULT_CHUNK_HEIGHT,
            worker_count: num_cpus::get().max(1),
        }
    }
}

impl PipelineConfig {
    fn validate(&self) -> Result<(), PipelineError> {
        if self.chunk_width == 0 || self.chunk_height == 0 {
            return Err(PipelineError::InvalidConfig(
                "chunk dimensions must be positive",
            ));
        }
        if self.worker_count == 0 {
            return Err(PipelineError::InvalidConfig(
                "worker count must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Failures a pipeline run can surface to the orchestrator.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source image could not be read or the output could not be
    /// written.
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    /// The configuration cannot describe a runnable pipeline.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// The input buffer does not match the declared image geometry.
    #[error("pixel buffer holds {actual} bytes, geometry requires {expected}")]
    BufferMismatch { expected: usize, actual: usize },

    /// The partition produced chunks but no results were collected.
    #[error("no results were collected")]
    NoResults,

    /// Fewer results came back than chunks were queued.
    #[error("incomplete results: expected {expected} chunks, workers delivered {delivered}")]
    IncompleteResults { expected: usize, delivered: usize },

    /// The collected chunk set does not tile the output image.
    #[error(transparent)]
    Coverage(#[from] CoverageError),
}

/// Summary of a completed file run.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub image_width: u32,
    pub image_height: u32,
    pub chunks_processed: usize,
}

/// The main, top-level struct for the processing engine.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Runs the full concurrent pipeline over an in-memory RGB buffer and
    /// returns the transformed buffer with the original spatial layout.
    pub fn run(
        &self,
        pixels: &[u8],
        image_width: u32,
        image_height: u32,
    ) -> Result<Vec<u8>, PipelineError> {
        let expected_len =
            image_width as usize * image_height as usize * CHANNELS as usize;
        if pixels.len() != expected_len {
            return Err(PipelineError::BufferMismatch {
                expected: expected_len,
                actual: pixels.len(),
            });
        }

        let chunks = partition(
            pixels,
            image_width,
            image_height,
            self.config.chunk_width,
            self.config.chunk_height,
        );
        let expected = chunks.len();
        if expected == 0 {
            return Err(PipelineError::NoResults);
        }
        info!(
            "partitioned {image_width}x{image_height} image into {expected} chunks \
             (nominal {}x{})",
            self.config.chunk_width, self.config.chunk_height
        );

        let queue: Arc<WorkQueue<TaskHandle>> = Arc::new(WorkQueue::new());
        let sink = Arc::new(ResultSink::new(expected));
        let pool = WorkerPool::spawn(self.config.worker_count, Arc::clone(&queue), Arc::clone(&sink));
        info!("spawned {} worker threads", self.config.worker_count);

        // The producer finishes pushing before it signals closure, so every
        // push lands on an open queue.
        for chunk in chunks {
            queue.push(Box::new(InvertTask::new(chunk)));
        }
        queue.close();

        let delivered = pool.join();
        if delivered < expected {
            return Err(PipelineError::IncompleteResults { expected, delivered });
        }

        let mut results = sink.wait_for_all();
        if results.is_empty() {
            return Err(PipelineError::NoResults);
        }

        // Arrival order is arbitrary; the id sort restores the partition's
        // row-major layout.
        results.sort_by_key(|chunk: &ImageChunk| chunk.id);
        info!("collected {} chunks, reassembling", results.len());

        Ok(reassemble(&results, image_width, image_height)?)
    }

    /// Loads an image file, runs the pipeline over it, and writes the
    /// transformed image to `output`.
    pub fn run_file(&self, input: &Path, output: &Path) -> Result<RunSummary, PipelineError> {
        let (pixels, width, height) = image_io::load(input)?;
        info!("loaded {} ({width}x{height})", input.display());

        let transformed = self.run(&pixels, width, height)?;

        image_io::save(output, &transformed, width, height)?;
        info!("wrote {}", output.display());

        Ok(RunSummary {
            image_width: width,
            image_height: height,
            chunks_processed: (width.div_ceil(self.config.chunk_width)
                * height.div_ceil(self.config.chunk_height)) as usize,
        })
    }
}

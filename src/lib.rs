// THEORY:
// This file is the main entry point for the `rastermill` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the
// public API that will be exposed to external consumers (like the CLI
// binary in `main.rs`).
//
// The primary goal is to export the `Pipeline` and its associated data
// structures (`PipelineConfig`, `PipelineError`, `RunSummary`) as the
// clean, high-level interface for the entire engine. The concurrent
// internals (`core_modules`) stay available for callers that want to
// compose the queue, pool and sink themselves, but the pipeline surface is
// all most users need.

pub mod core_modules;
pub mod pipeline;

pub use crate::core_modules::chunk::{CHANNELS, ImageChunk};
pub use crate::pipeline::{
    DEFAULT_CHUNK_HEIGHT, DEFAULT_CHUNK_WIDTH, Pipeline, PipelineConfig, PipelineError, RunSummary,
};

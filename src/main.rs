// CLI orchestrator around the `rastermill` library: parse arguments, run the
// pipeline over one file, report timing. All pipeline failures surface here
// as a stage-identifying message and a non-zero exit code.

use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use rastermill::{DEFAULT_CHUNK_HEIGHT, DEFAULT_CHUNK_WIDTH, Pipeline, PipelineConfig};

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!(
            "Usage: {} <input_image> <output_image> <worker_count> [chunk_width] [chunk_height]",
            args[0]
        );
        return ExitCode::FAILURE;
    }

    let input = Path::new(&args[1]);
    let output = Path::new(&args[2]);
    let worker_count: usize = match args[3].parse() {
        Ok(n) if n >= 1 => n,
        _ => {
            eprintln!("worker_count must be a positive integer, got '{}'", args[3]);
            return ExitCode::FAILURE;
        }
    };
    let chunk_width = parse_dimension(args.get(4), DEFAULT_CHUNK_WIDTH);
    let chunk_height = parse_dimension(args.get(5), DEFAULT_CHUNK_HEIGHT);

    let config = PipelineConfig {
        chunk_width,
        chunk_height,
        worker_count,
    };

    let pipeline = match Pipeline::new(config) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("Input image:  {}", input.display());
    println!("Output image: {}", output.display());
    println!("Chunk size:   {chunk_width}x{chunk_height}");
    println!("Workers:      {worker_count}");

    let start = Instant::now();
    let summary = match pipeline.run_file(input, output) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("pipeline failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    let elapsed = start.elapsed();

    println!();
    println!("Resolution:       {}x{}", summary.image_width, summary.image_height);
    println!("Chunks processed: {}", summary.chunks_processed);
    println!("Total time:       {} ms", elapsed.as_millis());
    if summary.chunks_processed > 0 {
        println!(
            "Mean per chunk:   {:.3} ms",
            elapsed.as_secs_f64() * 1000.0 / summary.chunks_processed as f64
        );
    }

    ExitCode::SUCCESS
}

fn parse_dimension(arg: Option<&String>, default: u32) -> u32 {
    arg.and_then(|value| value.parse().ok()).unwrap_or(default)
}

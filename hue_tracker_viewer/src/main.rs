use anyhow::{Context, Result};
use clap::Parser;
use hue_tracker::{TrackerConfig, run};
use std::path::PathBuf;
use tracing::{Level, info};

mod capture;
mod display;

use capture::{DEFAULT_CAMERA, OpenCvSource, VideoInput};
use display::WindowSink;

/// Track a colored robot in live or recorded video and draw its path
#[derive(Parser, Debug)]
#[command(name = "hue_tracker_viewer")]
#[command(about = "Live hue tracking with a path overlay", long_about = None)]
struct Args {
    /// Path to the input video file. Skip this argument to capture frames from a camera.
    #[arg(long)]
    video: Option<String>,

    /// TOML file overriding the default tracker settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also record the annotated frames to this video file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not open a window (useful together with --output)
    #[arg(long)]
    headless: bool,

    /// Log every detection and trail segment
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    // --- 1. Argument Parsing & Setup ---
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let config = match &args.config {
        Some(path) => TrackerConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TrackerConfig::default(),
    };

    // --- 2. Video I/O Initialization ---
    let input = match args.video {
        Some(path) => VideoInput::File(path),
        None => VideoInput::Camera(DEFAULT_CAMERA),
    };
    let mut source = OpenCvSource::open(input).context("Error opening video stream or file")?;
    let mut sink = WindowSink::new(
        &config.window_name,
        !args.headless,
        args.output.clone(),
        config.record_fps,
    )?;

    // --- 3. Main Processing Loop ---
    let summary = run(&mut source, &mut sink, config)?;

    // --- 4. Teardown ---
    source.release()?;
    sink.close()?;

    info!(
        frames = summary.frames_processed,
        segments = summary.segments.len(),
        stop = ?summary.stop,
        "processing complete"
    );
    Ok(())
}

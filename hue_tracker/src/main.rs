// Headless runner: tracks the configured color through a directory of frames and
// optionally writes the annotated frames back out as PNGs.

use anyhow::{Context, Result};
use clap::Parser;
use hue_tracker::session::{HeadlessSink, ImageDirSource};
use hue_tracker::{TrackerConfig, run};
use std::path::PathBuf;
use tracing::Level;

/// Track a hue band through a directory of still frames
#[derive(Parser, Debug)]
#[command(name = "hue_tracker")]
#[command(about = "Track a colored blob through image frames and draw its path", long_about = None)]
struct Args {
    /// Directory of input frames, processed in file-name order
    #[arg(short, long)]
    frames: PathBuf,

    /// Directory for annotated output frames
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// TOML file overriding the default tracker settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log every detection and trail segment
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
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

    let mut source = ImageDirSource::open(&args.frames)?;
    let mut sink = HeadlessSink::new(args.out.clone())?;
    let summary = run(&mut source, &mut sink, config)?;

    println!(
        "Processed {} frame(s): {} detection(s), {} trail segment(s), stopped on {:?}",
        summary.frames_processed,
        summary.detections,
        summary.segments.len(),
        summary.stop
    );
    if let Some(out) = &args.out {
        println!("Annotated frames written to {}", out.display());
    }
    Ok(())
}

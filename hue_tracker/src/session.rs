// THEORY:
// The `session` module is the outer loop. It knows nothing about pixels; it moves
// frames from a `FrameSource` through a `TrackingPipeline` into a `FrameSink` and
// decides when to stop. The loop is strictly sequential: it blocks on the next
// frame, processes it, shows it, then waits a short moment for a key press.
//
// Stop conditions are cooperative:
// - the source returns no frame (end of stream, or an empty camera read),
// - the sink reports the quit key.
// Both are normal endings and produce a `RunSummary`. Errors are reserved for
// collaborators that fail outright.

use crate::config::TrackerConfig;
use crate::core_modules::trail::Segment;
use crate::core_modules::utils::image_helper::{list_frames, save_png};
use crate::error::{Result, TrackerError};
use crate::pipeline::{FrameReport, TrackingPipeline};
use image::RgbImage;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Where frames come from.
pub trait FrameSource {
    /// Human-readable name for logs.
    fn describe(&self) -> String;

    /// Geometry as reported by the source; `(0, 0)` when unknown.
    fn frame_size(&self) -> (u32, u32);

    /// The next frame, or `None` once the stream is exhausted.
    fn read(&mut self) -> Result<Option<RgbImage>>;
}

/// Where processed frames go, and where key presses come from.
pub trait FrameSink {
    fn show(&mut self, report: &FrameReport) -> Result<()>;

    /// Waits up to `delay` for a key press and returns its code.
    fn poll_key(&mut self, delay: Duration) -> Result<Option<i32>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndOfStream,
    QuitKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames_processed: u64,
    pub detections: u64,
    /// Every segment on the trail at the end of the run, in drawing order.
    pub segments: Vec<Segment>,
    pub stop: StopReason,
}

impl RunSummary {
    fn empty(stop: StopReason) -> Self {
        Self {
            frames_processed: 0,
            detections: 0,
            segments: Vec::new(),
            stop,
        }
    }
}

/// Runs the tracking loop until the source ends or the quit key is pressed.
pub fn run<S, K>(source: &mut S, sink: &mut K, config: TrackerConfig) -> Result<RunSummary>
where
    S: FrameSource + ?Sized,
    K: FrameSink + ?Sized,
{
    config.validate()?;
    let (width, height) = source.frame_size();
    info!(
        source = %source.describe(),
        width,
        height,
        track = config.track,
        annotate = config.annotate,
        composite_background = config.composite_background,
        "starting tracking run"
    );

    // --- 1. Background warm-up ---
    let mut background = None;
    if config.composite_background {
        for _ in 0..config.background_frames {
            match source.read()? {
                Some(frame) => background = Some(frame),
                None => {
                    info!("stream ended during background warm-up");
                    return Ok(RunSummary::empty(StopReason::EndOfStream));
                }
            }
        }
        info!(frames = config.background_frames, "background captured");
    }

    let poll_delay = Duration::from_millis(config.poll_delay_ms);
    let quit_key = config.quit_key;

    // --- 2. Trail allocation ---
    // The trail is sized from the first real frame and kept for the whole run.
    let Some(first) = source.read()? else {
        info!("stream ended before the first frame");
        return Ok(RunSummary::empty(StopReason::EndOfStream));
    };
    let mut pipeline = TrackingPipeline::new(config, first.width(), first.height())?;
    if let Some(plate) = background {
        pipeline.set_background(plate)?;
    }

    // --- 3. Main loop ---
    let mut next = Some(first);
    let mut detections = 0u64;
    let stop = loop {
        let frame = match next.take() {
            Some(frame) => frame,
            None => match source.read()? {
                Some(frame) => frame,
                None => break StopReason::EndOfStream,
            },
        };

        let report = pipeline.process_frame(&frame)?;
        if report.detection.is_some() {
            detections += 1;
        }
        sink.show(&report)?;
        drop(report);

        if sink.poll_key(poll_delay)? == Some(quit_key) {
            break StopReason::QuitKey;
        }
    };

    let summary = RunSummary {
        frames_processed: pipeline.frames_processed(),
        detections,
        segments: pipeline.trail().segments().to_vec(),
        stop,
    };
    info!(
        frames = summary.frames_processed,
        detections = summary.detections,
        segments = summary.segments.len(),
        stop = ?summary.stop,
        "tracking run finished"
    );
    Ok(summary)
}

/// Reads every image file of a directory, in file-name order.
pub struct ImageDirSource {
    dir: PathBuf,
    pending: VecDeque<PathBuf>,
    frame_size: (u32, u32),
}

impl ImageDirSource {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let frames = list_frames(&dir).map_err(|e| TrackerError::SourceUnavailable {
            source_name: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        let frame_size = match frames.first() {
            Some(first) => image::image_dimensions(first).unwrap_or((0, 0)),
            None => (0, 0),
        };
        Ok(Self {
            dir,
            pending: frames.into(),
            frame_size,
        })
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl FrameSource for ImageDirSource {
    fn describe(&self) -> String {
        self.dir.display().to_string()
    }

    fn frame_size(&self) -> (u32, u32) {
        self.frame_size
    }

    fn read(&mut self) -> Result<Option<RgbImage>> {
        match self.pending.pop_front() {
            Some(path) => Ok(Some(image::open(&path)?.to_rgb8())),
            None => Ok(None),
        }
    }
}

/// Writes each composed frame as `frame_NNNNNN.png` when given a directory,
/// otherwise discards it. Never reports a key press.
pub struct HeadlessSink {
    out_dir: Option<PathBuf>,
    written: u64,
}

impl HeadlessSink {
    pub fn new(out_dir: Option<PathBuf>) -> Result<Self> {
        if let Some(dir) = &out_dir {
            std::fs::create_dir_all(dir)?;
        }
        Ok(Self {
            out_dir,
            written: 0,
        })
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for HeadlessSink {
    fn show(&mut self, report: &FrameReport) -> Result<()> {
        if let Some(dir) = &self.out_dir {
            let path = dir.join(format!("frame_{:06}.png", report.frame_index));
            save_png(&path, &report.output)?;
            self.written += 1;
        }
        Ok(())
    }

    fn poll_key(&mut self, _delay: Duration) -> Result<Option<i32>> {
        Ok(None)
    }
}

// THEORY:
// This file is the entry point of the `hue_tracker` library crate. It exposes the
// pieces a driver needs to track a colored object through a video:
//
// - `config`    : every tunable, with defaults for the purple robot
// - `pipeline`  : per-frame processing (mask, centroid, trail, composition)
// - `session`   : the read/process/show loop over pluggable sources and sinks
// - `error`     : the single error type
//
// The pixel-level building blocks (`core_modules`) stay public for drivers that
// want to reuse a single stage, such as thresholding a still image.
// Nothing here links against a native vision library; video capture and windows
// are supplied by the driver binaries.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod pipeline;
pub mod session;

pub use config::{HsvRange, TrackerConfig};
pub use error::{Result, TrackerError};
pub use pipeline::{FrameReport, TrackingPipeline};
pub use session::{FrameSink, FrameSource, RunSummary, StopReason, run};

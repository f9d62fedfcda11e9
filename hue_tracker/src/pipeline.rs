// THEORY:
// The `pipeline` module is the per-frame API of the tracker. One call to
// `process_frame` runs the whole chain for a single frame:
//
//   frame -> HSV threshold -> open + dilate -> moments -> tracker -> trail -> compose
//
// The pipeline owns the only state that survives between frames (the tracker's
// last detection and the trail canvas). Per-frame buffers (mask, composed output)
// are created inside the call and handed out in the `FrameReport`; nothing from a
// frame is retained once its report is dropped.

use crate::config::TrackerConfig;
use crate::core_modules::compositor::{Backdrop, compose};
use crate::core_modules::mask::{Mask, build_mask};
use crate::core_modules::moment::SpatialMoments;
use crate::core_modules::tracker::Tracker;
use crate::core_modules::trail::Trail;
use crate::error::{Result, TrackerError};
use image::RgbImage;
use tracing::{debug, warn};

// Re-export key data structures for the public API.
pub use crate::core_modules::draw::DrawCommand;
pub use crate::core_modules::moment::Point;
pub use crate::core_modules::tracker::{Annotation, TrackerState};
pub use crate::core_modules::trail::Segment;

/// Everything the pipeline learned from one frame.
#[derive(Debug, Clone)]
pub struct FrameReport {
    /// Zero-based index among processed frames (warm-up frames excluded).
    pub frame_index: u64,
    /// Foreground area of the cleaned mask.
    pub area: f64,
    pub detection: Option<Point>,
    /// The segment added to the trail by this frame, if any.
    pub segment: Option<Segment>,
    /// The caption currently visible on the trail. It persists across frames.
    pub annotation: Option<Annotation>,
    /// Whether `annotation`'s text is already part of `output`.
    pub text_rendered: bool,
    pub output: RgbImage,
}

pub struct TrackingPipeline {
    config: TrackerConfig,
    tracker: Tracker,
    trail: Trail,
    background: Option<RgbImage>,
    frames_processed: u64,
}

impl TrackingPipeline {
    /// Creates a pipeline for frames of `width` x `height`. The trail canvas is
    /// allocated here, once, for the whole run.
    pub fn new(config: TrackerConfig, width: u32, height: u32) -> Result<Self> {
        config.validate()?;
        let font = match &config.font_path {
            Some(path) => match Trail::load_font(path) {
                Ok(font) => Some(font),
                Err(e) => {
                    warn!("caption text will be drawn by the display: {e}");
                    None
                }
            },
            None => None,
        };
        Ok(Self {
            tracker: Tracker::new(&config),
            trail: Trail::new(width, height, font),
            background: None,
            frames_processed: 0,
            config,
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.trail.dimensions()
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn tracker_state(&self) -> TrackerState {
        self.tracker.state()
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Installs the plate shown under the mask. Ignored unless background
    /// compositing is enabled; until a plate is installed masked pixels are black.
    pub fn set_background(&mut self, background: RgbImage) -> Result<()> {
        self.check_geometry(&background)?;
        self.background = Some(background);
        Ok(())
    }

    /// Color isolation only: threshold and clean.
    pub fn mask_for(&self, frame: &RgbImage) -> Mask {
        build_mask(frame, &self.config.bands, self.config.kernel_size)
    }

    pub fn process_frame(&mut self, frame: &RgbImage) -> Result<FrameReport> {
        self.check_geometry(frame)?;

        // --- 1. Color isolation ---
        let mask = self.mask_for(frame);

        // --- 2. Localization ---
        let moments = SpatialMoments::of(&mask);
        let detection = moments.detection(self.config.min_area);

        // --- 3. Path tracking ---
        let mut segment = None;
        if self.config.track {
            if let Some(command) = self.tracker.update(detection) {
                segment = self.trail.draw_segment(&command);
            }
            if let Some(annotation) = self.tracker.render(detection) {
                self.trail.draw_annotation(annotation);
            }
        }
        if let Some(point) = detection {
            debug!(frame = self.frames_processed, x = point.x, y = point.y, area = moments.area(), "detection");
        }

        // --- 4. Composition ---
        let backdrop = match (&self.background, self.config.composite_background) {
            (_, false) => Backdrop::LiveFrame,
            (Some(plate), true) => Backdrop::Plate(plate),
            (None, true) => Backdrop::Blank,
        };
        let output = compose(frame, &mask, backdrop, self.trail.canvas());

        let report = FrameReport {
            frame_index: self.frames_processed,
            area: moments.area(),
            detection,
            segment,
            annotation: self.trail.annotation().cloned(),
            text_rendered: self.trail.text_rendered(),
            output,
        };
        self.frames_processed += 1;
        Ok(report)
    }

    fn check_geometry(&self, frame: &RgbImage) -> Result<()> {
        let expected = self.trail.dimensions();
        let found = frame.dimensions();
        if expected != found {
            return Err(TrackerError::FrameGeometry { expected, found });
        }
        Ok(())
    }
}

// THEORY:
// `TrackerConfig` gathers every tunable of the loop in one place. The defaults
// reproduce the finished purple-robot tracker: two overlapping purple bands, a
// 3x3 clean-up kernel, a 10,000 pixel noise floor, a red trail two pixels wide, a
// green "x = .., y = .." caption on a black box in the top-left corner, and the
// tracked color replaced by a background captured over the first 60 frames.
//
// The earlier program revisions are reachable by flipping switches instead of
// keeping separate binaries:
// - `track = false`                 : mask compositing only, no trail
// - `annotate = false`              : trail without the caption box
// - `composite_background = false`  : show the live frame, mask not applied
//
// Every field is optional in TOML; missing fields take the default.

use crate::core_modules::pixel::{HUE_MAX, Hsv};
use crate::error::{Result, TrackerError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// An inclusive HSV range on the 8-bit scale (hue 0..=180).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    /// Inclusive on both ends, per channel.
    pub fn contains(&self, hsv: Hsv) -> bool {
        let channels = [hsv.hue, hsv.saturation, hsv.value];
        channels
            .iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .all(|(c, (lo, hi))| lo <= c && c <= hi)
    }
}

/// Configuration for a tracking run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Hue bands; a pixel is foreground when it falls in any of them.
    pub bands: Vec<HsvRange>,
    /// Side of the square structuring element used to clean the mask. 1 disables cleaning.
    pub kernel_size: u8,
    /// Zeroth-moment floor. Masks with area at or below it produce no detection.
    pub min_area: f64,
    /// Draw trail segments between consecutive detections.
    pub track: bool,
    pub trail_color: [u8; 3],
    pub trail_thickness: u32,
    /// Draw the coordinate caption box.
    pub annotate: bool,
    pub annotation_origin: [i32; 2],
    pub annotation_size: [u32; 2],
    pub annotation_fill: [u8; 3],
    pub text_color: [u8; 3],
    /// Left end of the caption baseline.
    pub text_origin: [i32; 2],
    /// Caption glyph height in pixels.
    pub text_scale: f32,
    /// TrueType font used to rasterize captions onto the trail. Without it the
    /// display sink is responsible for drawing the caption text.
    pub font_path: Option<PathBuf>,
    /// Replace the tracked color with a background captured at start-up.
    pub composite_background: bool,
    /// Frames consumed while the camera settles; the last one becomes the background.
    pub background_frames: u32,
    pub poll_delay_ms: u64,
    pub quit_key: i32,
    pub window_name: String,
    /// Frame rate stamped on recordings.
    pub record_fps: f64,
}

/// Purple robot, full band.
pub const PURPLE_BAND: HsvRange = HsvRange::new([122, 120, 70], [148, 255, 255]);
/// Purple robot, narrow band kept from the two-mask revision.
pub const PURPLE_NARROW_BAND: HsvRange = HsvRange::new([122, 120, 70], [128, 255, 255]);
/// Red straddles hue 0, so it needs both of these.
pub const RED_LOW_BAND: HsvRange = HsvRange::new([0, 120, 70], [10, 255, 255]);
pub const RED_HIGH_BAND: HsvRange = HsvRange::new([170, 120, 70], [180, 255, 255]);

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            bands: vec![PURPLE_BAND, PURPLE_NARROW_BAND],
            kernel_size: 3,
            min_area: 10_000.0,
            track: true,
            trail_color: [255, 0, 0],
            trail_thickness: 2,
            annotate: true,
            annotation_origin: [0, 0],
            annotation_size: [160, 50],
            annotation_fill: [0, 0, 0],
            text_color: [0, 255, 0],
            text_origin: [10, 30],
            text_scale: 12.0,
            font_path: None,
            composite_background: true,
            background_frames: 60,
            poll_delay_ms: 25,
            quit_key: 27,
            window_name: String::from("Color Segmentation"),
            record_fps: 10.0,
        }
    }
}

impl TrackerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bands.is_empty() {
            return Err(TrackerError::Config("at least one hue band is required".into()));
        }
        for (i, band) in self.bands.iter().enumerate() {
            if band.lower[0] > HUE_MAX || band.upper[0] > HUE_MAX {
                return Err(TrackerError::Config(format!(
                    "band {i}: hue must be within 0..={HUE_MAX}"
                )));
            }
            if band.lower.iter().zip(band.upper.iter()).any(|(lo, hi)| lo > hi) {
                return Err(TrackerError::Config(format!(
                    "band {i}: lower bound {:?} exceeds upper bound {:?}",
                    band.lower, band.upper
                )));
            }
        }
        if self.kernel_size == 0 || self.kernel_size % 2 == 0 {
            return Err(TrackerError::Config(format!(
                "kernel_size must be odd and positive, got {}",
                self.kernel_size
            )));
        }
        if !(self.min_area >= 0.0) {
            return Err(TrackerError::Config(format!(
                "min_area must be a non-negative number, got {}",
                self.min_area
            )));
        }
        if self.trail_thickness == 0 {
            return Err(TrackerError::Config("trail_thickness must be at least 1".into()));
        }
        if !(self.text_scale > 0.0) {
            return Err(TrackerError::Config("text_scale must be positive".into()));
        }
        Ok(())
    }
}

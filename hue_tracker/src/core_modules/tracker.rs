// THEORY:
// The `tracker` module adds the only memory the system has: the last detection.
// With it, a stream of per-frame centroids becomes a path. Each time two
// consecutive frames both produce a detection, the tracker emits a line segment
// joining them.
//
// Lifecycle rules:
// - Every update replaces the stored detection, including with "nothing seen".
//   An occlusion of a single frame therefore breaks the path; the next sighting
//   starts a fresh one rather than bridging the gap.
// - Points with negative coordinates never take part in a segment.
//
// The tracker also produces the caption annotation (black box + coordinates) for
// the current detection. It only emits draw commands; the trail owns the pixels.

use crate::config::TrackerConfig;
use crate::core_modules::draw::DrawCommand;
use crate::core_modules::moment::Point;
use image::Rgb;

/// The last detection seen, or `None` before the first one and after a miss.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerState {
    pub last: Option<Point>,
}

/// The caption drawn for the current detection: a filled box and a text line.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub top_left: Point,
    pub width: u32,
    pub height: u32,
    pub fill: Rgb<u8>,
    pub text: String,
    pub text_origin: Point,
    pub text_color: Rgb<u8>,
    pub text_scale: f32,
}

impl Annotation {
    pub fn caption_for(point: Point) -> String {
        format!("x = {}, y = {}", point.x, point.y)
    }

    pub fn box_command(&self) -> DrawCommand {
        DrawCommand::FilledRect {
            top_left: self.top_left,
            width: self.width,
            height: self.height,
            color: self.fill,
        }
    }

    pub fn text_command(&self) -> DrawCommand {
        DrawCommand::Text {
            origin: self.text_origin,
            text: self.text.clone(),
            color: self.text_color,
            scale: self.text_scale,
        }
    }
}

#[derive(Debug, Clone)]
struct CaptionStyle {
    top_left: Point,
    width: u32,
    height: u32,
    fill: Rgb<u8>,
    text_origin: Point,
    text_color: Rgb<u8>,
    text_scale: f32,
}

/// Turns detections into trail segments and captions.
#[derive(Debug, Clone)]
pub struct Tracker {
    state: TrackerState,
    line_color: Rgb<u8>,
    line_thickness: u32,
    caption: Option<CaptionStyle>,
}

impl Tracker {
    pub fn new(config: &TrackerConfig) -> Self {
        let caption = config.annotate.then(|| CaptionStyle {
            top_left: Point::new(config.annotation_origin[0], config.annotation_origin[1]),
            width: config.annotation_size[0],
            height: config.annotation_size[1],
            fill: Rgb(config.annotation_fill),
            text_origin: Point::new(config.text_origin[0], config.text_origin[1]),
            text_color: Rgb(config.text_color),
            text_scale: config.text_scale,
        });
        Self {
            state: TrackerState::default(),
            line_color: Rgb(config.trail_color),
            line_thickness: config.trail_thickness,
            caption,
        }
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// Records `detection` and returns the segment from the previous detection,
    /// when both exist and lie on the canvas.
    pub fn update(&mut self, detection: Option<Point>) -> Option<DrawCommand> {
        let previous = std::mem::replace(&mut self.state.last, detection);
        match (previous, detection) {
            (Some(from), Some(to)) if from.is_on_canvas() && to.is_on_canvas() => {
                Some(DrawCommand::Line {
                    from,
                    to,
                    color: self.line_color,
                    thickness: self.line_thickness,
                })
            }
            _ => None,
        }
    }

    /// Caption for `detection`, if captions are enabled and something was seen.
    pub fn render(&self, detection: Option<Point>) -> Option<Annotation> {
        let style = self.caption.as_ref()?;
        let point = detection?;
        Some(Annotation {
            top_left: style.top_left,
            width: style.width,
            height: style.height,
            fill: style.fill,
            text: Annotation::caption_for(point),
            text_origin: style.text_origin,
            text_color: style.text_color,
            text_scale: style.text_scale,
        })
    }
}

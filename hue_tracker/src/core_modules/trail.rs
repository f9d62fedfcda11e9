// THEORY:
// The `Trail` is the one resource that lives for the whole run. It is an RGB canvas
// the size of the frame, initially black, onto which path segments and captions are
// rasterized. It is never cleared: a segment drawn on frame 10 is still visible on
// frame 10,000. Captions persist the same way, until the next caption box is drawn
// over them at the same spot.
//
// Alongside the pixels the trail keeps a plain record of what it has drawn (the
// list of segments and the latest caption) so callers can reason about the path
// without reading pixels back.

use crate::core_modules::draw::{DrawCommand, rasterize};
use crate::core_modules::moment::Point;
use crate::core_modules::tracker::Annotation;
use crate::error::{Result, TrackerError};
use ab_glyph::FontVec;
use image::RgbImage;
use std::path::Path;
use tracing::debug;

/// A path segment recorded on the trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

pub struct Trail {
    canvas: RgbImage,
    segments: Vec<Segment>,
    annotation: Option<Annotation>,
    text_rendered: bool,
    font: Option<FontVec>,
}

impl Trail {
    pub fn new(width: u32, height: u32, font: Option<FontVec>) -> Self {
        Self {
            canvas: RgbImage::new(width, height),
            segments: Vec::new(),
            annotation: None,
            text_rendered: false,
            font,
        }
    }

    pub fn load_font(path: &Path) -> Result<FontVec> {
        let bytes = std::fs::read(path)?;
        FontVec::try_from_vec(bytes)
            .map_err(|e| TrackerError::Font(format!("{}: {e}", path.display())))
    }

    /// Draws a path segment. Commands other than lines are ignored.
    pub fn draw_segment(&mut self, command: &DrawCommand) -> Option<Segment> {
        let DrawCommand::Line { from, to, .. } = command else {
            return None;
        };
        rasterize(&mut self.canvas, command, None);
        let segment = Segment {
            from: *from,
            to: *to,
        };
        debug!(from = ?segment.from, to = ?segment.to, "trail segment");
        self.segments.push(segment);
        Some(segment)
    }

    /// Paints the caption box and, when a font is loaded, its text.
    pub fn draw_annotation(&mut self, annotation: Annotation) {
        rasterize(&mut self.canvas, &annotation.box_command(), None);
        self.text_rendered = rasterize(
            &mut self.canvas,
            &annotation.text_command(),
            self.font.as_ref(),
        );
        self.annotation = Some(annotation);
    }

    pub fn canvas(&self) -> &RgbImage {
        &self.canvas
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The caption currently visible on the trail.
    pub fn annotation(&self) -> Option<&Annotation> {
        self.annotation.as_ref()
    }

    /// Whether the visible caption's text is already in the canvas pixels.
    pub fn text_rendered(&self) -> bool {
        self.text_rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use crate::core_modules::tracker::Tracker;
    use image::Rgb;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);

    fn line(from: Point, to: Point) -> DrawCommand {
        DrawCommand::Line {
            from,
            to,
            color: RED,
            thickness: 2,
        }
    }

    #[test]
    fn segments_accumulate_and_are_never_erased() {
        let mut trail = Trail::new(64, 64, None);
        trail.draw_segment(&line(Point::new(5, 5), Point::new(15, 15)));
        trail.draw_segment(&line(Point::new(40, 40), Point::new(50, 40)));

        assert_eq!(trail.segments().len(), 2);
        assert_eq!(*trail.canvas().get_pixel(5, 5), RED);
        assert_eq!(*trail.canvas().get_pixel(50, 40), RED);
    }

    #[test]
    fn non_line_commands_are_not_segments() {
        let mut trail = Trail::new(8, 8, None);
        let rect = DrawCommand::FilledRect {
            top_left: Point::new(0, 0),
            width: 2,
            height: 2,
            color: RED,
        };
        assert_eq!(trail.draw_segment(&rect), None);
        assert!(trail.segments().is_empty());
    }

    #[test]
    fn caption_box_overwrites_the_trail_beneath_it() {
        let tracker = Tracker::new(&TrackerConfig::default());
        let mut trail = Trail::new(200, 100, None);
        trail.draw_segment(&line(Point::new(0, 10), Point::new(199, 10)));

        let annotation = tracker.render(Some(Point::new(100, 10))).expect("caption");
        trail.draw_annotation(annotation);

        // Inside the 160x50 box the red line is covered by black fill...
        assert_eq!(*trail.canvas().get_pixel(100, 10), Rgb([0, 0, 0]));
        // ...outside the box it is still there.
        assert_eq!(*trail.canvas().get_pixel(180, 10), RED);
        assert_eq!(trail.annotation().map(|a| a.text.as_str()), Some("x = 100, y = 10"));
        assert!(!trail.text_rendered());
    }

    #[test]
    fn missing_font_file_is_an_io_error() {
        let err = Trail::load_font(Path::new("/definitely/not/a/font.ttf")).err();
        assert!(matches!(err, Some(TrackerError::Io(_))));
    }

    #[test]
    fn garbage_font_bytes_are_a_font_error() {
        let path = std::env::temp_dir().join(format!("hue_tracker_bad_font_{}.ttf", std::process::id()));
        std::fs::write(&path, b"not a font").expect("write temp file");
        let err = Trail::load_font(&path).err();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(err, Some(TrackerError::Font(_))));
    }

    #[test]
    fn loaded_font_puts_the_caption_text_on_the_trail() {
        let fixture = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/DejaVuSansMono.ttf");
        let font = Trail::load_font(Path::new(fixture)).expect("font fixture");
        let tracker = Tracker::new(&TrackerConfig::default());
        let mut trail = Trail::new(200, 100, Some(font));

        trail.draw_annotation(tracker.render(Some(Point::new(42, 7))).expect("caption"));

        assert!(trail.text_rendered());
        let green_inside_box = trail
            .canvas()
            .enumerate_pixels()
            .filter(|(x, y, p)| *x < 160 && *y < 50 && p.0[1] > 0)
            .count();
        assert!(green_inside_box > 0);
        assert!(
            trail
                .canvas()
                .enumerate_pixels()
                .all(|(x, y, p)| (x < 160 && y < 50) || p.0 == [0, 0, 0])
        );
    }
}

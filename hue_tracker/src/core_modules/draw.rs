// THEORY:
// Drawing is split into "what to draw" and "drawing it". The tracker and the
// caption renderer only emit `DrawCommand`s; this module rasterizes them onto an
// RGB canvas with `imageproc`. Keeping commands as plain data lets the run loop
// record them, lets tests assert on them without inspecting pixels, and lets a
// display backend with its own text engine draw captions the library cannot.

use crate::core_modules::moment::Point;
use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut};
use imageproc::rect::Rect;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        from: Point,
        to: Point,
        color: Rgb<u8>,
        thickness: u32,
    },
    FilledRect {
        top_left: Point,
        width: u32,
        height: u32,
        color: Rgb<u8>,
    },
    /// `origin` is the left end of the text baseline.
    Text {
        origin: Point,
        text: String,
        color: Rgb<u8>,
        scale: f32,
    },
}

/// Rasterizes `command` onto `canvas`.
///
/// Returns `false` only for text when no font is available; the caller decides
/// who draws it instead.
pub fn rasterize(canvas: &mut RgbImage, command: &DrawCommand, font: Option<&FontVec>) -> bool {
    match command {
        DrawCommand::Line {
            from,
            to,
            color,
            thickness,
        } => {
            draw_thick_line(canvas, *from, *to, *color, *thickness);
            true
        }
        DrawCommand::FilledRect {
            top_left,
            width,
            height,
            color,
        } => {
            if *width > 0 && *height > 0 {
                let rect = Rect::at(top_left.x, top_left.y).of_size(*width, *height);
                draw_filled_rect_mut(canvas, rect, *color);
            }
            true
        }
        DrawCommand::Text {
            origin,
            text,
            color,
            scale,
        } => match font {
            Some(font) => {
                // imageproc places text by its top edge.
                let top = origin.y - scale.round() as i32;
                draw_text_mut(canvas, *color, origin.x, top, PxScale::from(*scale), font, text);
                true
            }
            None => false,
        },
    }
}

/// `imageproc` lines are one pixel wide; a wider stroke is the same segment
/// stamped across a `thickness` x `thickness` square of offsets.
fn draw_thick_line(canvas: &mut RgbImage, from: Point, to: Point, color: Rgb<u8>, thickness: u32) {
    let start = -((thickness.saturating_sub(1) / 2) as i32);
    let end = start + thickness.max(1) as i32;
    for dy in start..end {
        for dx in start..end {
            draw_line_segment_mut(
                canvas,
                ((from.x + dx) as f32, (from.y + dy) as f32),
                ((to.x + dx) as f32, (to.y + dy) as f32),
                color,
            );
        }
    }
}

// THEORY:
// The `moment` module reduces a whole mask to a single position. It computes the
// raw spatial moments of the binary mask:
//
//   m00 = number of foreground pixels                (area)
//   m10 = sum of x over foreground pixels
//   m01 = sum of y over foreground pixels
//
// and the centroid (m10 / m00, m01 / m00). The area doubles as a noise gate: a
// mask whose area does not exceed the configured floor is treated as "nothing
// seen this frame". That is the designed failure path; degenerate masks never
// raise errors.

use crate::core_modules::mask::{Mask, is_foreground};

/// An integer pixel position on the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_on_canvas(&self) -> bool {
        self.x >= 0 && self.y >= 0
    }
}

/// Zeroth and first order spatial moments of a binary mask.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpatialMoments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl SpatialMoments {
    pub fn of(mask: &Mask) -> Self {
        let mut area: u64 = 0;
        let mut sum_x: u64 = 0;
        let mut sum_y: u64 = 0;
        for (x, y, value) in mask.enumerate_pixels() {
            if is_foreground(value) {
                area += 1;
                sum_x += x as u64;
                sum_y += y as u64;
            }
        }
        Self {
            m00: area as f64,
            m10: sum_x as f64,
            m01: sum_y as f64,
        }
    }

    pub fn area(&self) -> f64 {
        self.m00
    }

    /// Sub-pixel centroid, `None` for an empty mask.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.m00 <= 0.0 {
            return None;
        }
        Some((self.m10 / self.m00, self.m01 / self.m00))
    }

    /// Centroid truncated to whole pixels, gated by `min_area`.
    pub fn detection(&self, min_area: f64) -> Option<Point> {
        if self.m00 <= min_area {
            return None;
        }
        self.centroid()
            .map(|(cx, cy)| Point::new(cx as i32, cy as i32))
    }
}

/// Locates the blob in `mask`. Returns `None` when the foreground area is at or
/// below `min_area`.
pub fn locate_centroid(mask: &Mask, min_area: f64) -> Option<Point> {
    SpatialMoments::of(mask).detection(min_area)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::mask::{FOREGROUND, clean};
    use image::Luma;

    fn block_mask(width: u32, height: u32, x0: u32, y0: u32, side_x: u32, side_y: u32) -> Mask {
        let mut mask = Mask::new(width, height);
        for y in y0..y0 + side_y {
            for x in x0..x0 + side_x {
                mask.put_pixel(x, y, Luma([FOREGROUND]));
            }
        }
        mask
    }

    #[test]
    fn empty_mask_has_no_detection() {
        let mask = Mask::new(64, 48);
        assert_eq!(locate_centroid(&mask, 10_000.0), None);
        assert_eq!(locate_centroid(&mask, 0.0), None);
    }

    #[test]
    fn area_exactly_at_the_floor_is_noise() {
        let mask = block_mask(200, 200, 10, 10, 100, 100);
        assert_eq!(SpatialMoments::of(&mask).area(), 10_000.0);
        assert_eq!(locate_centroid(&mask, 10_000.0), None);
    }

    #[test]
    fn area_just_above_the_floor_is_detected() {
        let mut mask = block_mask(200, 200, 10, 10, 100, 100);
        mask.put_pixel(60, 110, Luma([FOREGROUND]));
        assert_eq!(SpatialMoments::of(&mask).area(), 10_001.0);
        assert!(locate_centroid(&mask, 10_000.0).is_some());
    }

    #[test]
    fn filled_block_centroid_is_its_mean_pixel() {
        let mask = block_mask(320, 320, 50, 50, 200, 200);
        let moments = SpatialMoments::of(&mask);
        assert_eq!(moments.centroid(), Some((149.5, 149.5)));
        assert_eq!(locate_centroid(&mask, 10_000.0), Some(Point::new(149, 149)));
    }

    #[test]
    fn cleaning_keeps_the_block_centroid() {
        let mask = clean(&block_mask(320, 320, 50, 50, 200, 200), 3);
        assert_eq!(locate_centroid(&mask, 10_000.0), Some(Point::new(149, 149)));
    }

    #[test]
    fn centroid_truncates_toward_zero() {
        // Columns 0 and 1 of a single row: mean x is 0.5.
        let mask = block_mask(4, 1, 0, 0, 2, 1);
        assert_eq!(locate_centroid(&mask, 0.0), Some(Point::new(0, 0)));
    }
}

// THEORY:
// The compositor builds the image that is finally shown. It has two jobs:
// 1. Apply the mask: wherever it is set, the pixel is taken from a backdrop instead
//    of the live frame. This is the (res1 = frame & !mask) + (res2 = background & mask)
//    blend, done per pixel. The backdrop is the background plate captured at
//    start-up, or black when no plate exists yet.
// 2. Lay the trail over the result with a saturating per-channel add, so black
//    trail pixels leave the frame untouched and drawn pixels show through.

use crate::core_modules::mask::{Mask, is_foreground};
use image::{Rgb, RgbImage};

const BLANK: Rgb<u8> = Rgb([0, 0, 0]);

/// What shows through wherever the mask is set.
#[derive(Debug, Clone, Copy)]
pub enum Backdrop<'a> {
    /// The mask does not touch the output.
    LiveFrame,
    /// Masked pixels are blacked out.
    Blank,
    /// Masked pixels come from a background plate of the frame's size.
    Plate(&'a RgbImage),
}

/// Composes one output frame. All images must share the frame's dimensions.
pub fn compose(frame: &RgbImage, mask: &Mask, backdrop: Backdrop<'_>, trail: &RgbImage) -> RgbImage {
    RgbImage::from_fn(frame.width(), frame.height(), |x, y| {
        let live = frame.get_pixel(x, y);
        let base = if is_foreground(mask.get_pixel(x, y)) {
            match backdrop {
                Backdrop::LiveFrame => live,
                Backdrop::Blank => &BLANK,
                Backdrop::Plate(plate) => plate.get_pixel(x, y),
            }
        } else {
            live
        };
        saturating_add(base, trail.get_pixel(x, y))
    })
}

fn saturating_add(a: &Rgb<u8>, b: &Rgb<u8>) -> Rgb<u8> {
    Rgb([
        a.0[0].saturating_add(b.0[0]),
        a.0[1].saturating_add(b.0[1]),
        a.0[2].saturating_add(b.0[2]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::mask::FOREGROUND;
    use image::Luma;

    #[test]
    fn trail_is_added_over_the_frame() {
        let frame = RgbImage::from_pixel(4, 4, Rgb([100, 100, 100]));
        let mut trail = RgbImage::new(4, 4);
        trail.put_pixel(1, 1, Rgb([255, 0, 0]));
        let mask = Mask::new(4, 4);

        let out = compose(&frame, &mask, Backdrop::LiveFrame, &trail);
        assert_eq!(*out.get_pixel(1, 1), Rgb([255, 100, 100]));
        assert_eq!(*out.get_pixel(0, 0), Rgb([100, 100, 100]));
    }

    #[test]
    fn masked_pixels_come_from_the_background_plate() {
        let frame = RgbImage::from_pixel(3, 1, Rgb([140, 40, 200]));
        let background = RgbImage::from_pixel(3, 1, Rgb([10, 20, 30]));
        let mut mask = Mask::new(3, 1);
        mask.put_pixel(1, 0, Luma([FOREGROUND]));
        let trail = RgbImage::new(3, 1);

        let out = compose(&frame, &mask, Backdrop::Plate(&background), &trail);
        assert_eq!(*out.get_pixel(0, 0), Rgb([140, 40, 200]));
        assert_eq!(*out.get_pixel(1, 0), Rgb([10, 20, 30]));
    }

    #[test]
    fn live_frame_backdrop_ignores_the_mask() {
        let frame = RgbImage::from_pixel(2, 1, Rgb([1, 2, 3]));
        let mask = Mask::from_pixel(2, 1, Luma([FOREGROUND]));
        let out = compose(&frame, &mask, Backdrop::LiveFrame, &RgbImage::new(2, 1));
        assert_eq!(out, frame);
    }

    #[test]
    fn blank_backdrop_blacks_out_masked_pixels_under_the_trail() {
        let frame = RgbImage::from_pixel(3, 1, Rgb([140, 40, 200]));
        let mut mask = Mask::new(3, 1);
        mask.put_pixel(0, 0, Luma([FOREGROUND]));
        mask.put_pixel(1, 0, Luma([FOREGROUND]));
        let mut trail = RgbImage::new(3, 1);
        trail.put_pixel(1, 0, Rgb([255, 0, 0]));

        let out = compose(&frame, &mask, Backdrop::Blank, &trail);
        assert_eq!(*out.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*out.get_pixel(1, 0), Rgb([255, 0, 0]));
        assert_eq!(*out.get_pixel(2, 0), Rgb([140, 40, 200]));
    }
}

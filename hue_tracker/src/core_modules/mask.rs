// THEORY:
// The `mask` module is the color-isolation stage. It turns an RGB frame into a
// binary mask of candidate foreground pixels and then cleans that mask so that the
// moment computation downstream sees one solid blob rather than sensor speckle.
//
// Steps:
// 1. Threshold: each pixel is converted to HSV and marked foreground when it lies in
//    any configured band. Several bands exist because some colors (red) wrap around
//    the hue origin; for purple the bands simply overlap.
// 2. Open: erosion then dilation with a square kernel. Removes specks smaller than
//    the kernel.
// 3. Dilate: one more dilation, which closes pinholes and slightly fattens the blob.

use crate::config::HsvRange;
use crate::core_modules::pixel::Hsv;
use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology;

/// Binary mask. Foreground pixels hold `FOREGROUND`, background pixels zero.
pub type Mask = GrayImage;

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// Marks every pixel whose HSV falls in at least one band.
pub fn threshold(frame: &RgbImage, bands: &[HsvRange]) -> Mask {
    let mut mask = Mask::new(frame.width(), frame.height());
    for (x, y, pixel) in frame.enumerate_pixels() {
        let hsv = Hsv::from_pixel(pixel);
        if bands.iter().any(|band| band.contains(hsv)) {
            mask.put_pixel(x, y, Luma([FOREGROUND]));
        }
    }
    mask
}

/// Opening followed by a dilation with a `kernel_size` x `kernel_size` square.
///
/// A square kernel of side `2k + 1` is the L-infinity ball of radius `k`, which is
/// exactly what `imageproc`'s distance-based morphology takes.
pub fn clean(mask: &Mask, kernel_size: u8) -> Mask {
    let radius = kernel_size / 2;
    if radius == 0 {
        return mask.clone();
    }
    let opened = morphology::open(mask, Norm::LInf, radius);
    morphology::dilate(&opened, Norm::LInf, radius)
}

/// Threshold then clean; the full color-isolation stage.
pub fn build_mask(frame: &RgbImage, bands: &[HsvRange], kernel_size: u8) -> Mask {
    let raw = threshold(frame, bands);
    clean(&raw, kernel_size)
}

pub fn is_foreground(value: &Luma<u8>) -> bool {
    value.0[0] != BACKGROUND
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PURPLE_BAND, PURPLE_NARROW_BAND, RED_HIGH_BAND, RED_LOW_BAND};
    use image::Rgb;

    const PURPLE: Rgb<u8> = Rgb([140, 40, 200]);

    fn count_foreground(mask: &Mask) -> usize {
        mask.pixels().filter(|p| is_foreground(p)).count()
    }

    #[test]
    fn only_in_band_pixels_become_foreground() {
        let mut frame = RgbImage::from_pixel(8, 8, Rgb([30, 200, 30]));
        frame.put_pixel(2, 3, PURPLE);
        frame.put_pixel(5, 5, PURPLE);

        let mask = threshold(&frame, &[PURPLE_BAND, PURPLE_NARROW_BAND]);
        assert_eq!(count_foreground(&mask), 2);
        assert_eq!(mask.get_pixel(2, 3).0[0], FOREGROUND);
        assert_eq!(mask.get_pixel(0, 0).0[0], BACKGROUND);
    }

    #[test]
    fn red_needs_both_wrapping_bands() {
        let mut frame = RgbImage::new(2, 1);
        frame.put_pixel(0, 0, Rgb([220, 30, 10])); // hue just above 0
        frame.put_pixel(1, 0, Rgb([220, 10, 30])); // hue just below 180

        assert_eq!(count_foreground(&threshold(&frame, &[RED_LOW_BAND])), 1);
        assert_eq!(count_foreground(&threshold(&frame, &[RED_HIGH_BAND])), 1);
        assert_eq!(count_foreground(&threshold(&frame, &[RED_LOW_BAND, RED_HIGH_BAND])), 2);
    }

    #[test]
    fn dim_or_washed_out_purple_is_rejected() {
        let mut frame = RgbImage::new(2, 1);
        frame.put_pixel(0, 0, Rgb([28, 8, 40])); // too dark
        frame.put_pixel(1, 0, Rgb([200, 180, 220])); // too pale

        assert_eq!(count_foreground(&threshold(&frame, &[PURPLE_BAND])), 0);
    }

    #[test]
    fn cleaning_removes_isolated_specks() {
        let mut mask = Mask::new(40, 40);
        mask.put_pixel(3, 3, Luma([FOREGROUND]));
        for y in 20..30 {
            for x in 20..30 {
                mask.put_pixel(x, y, Luma([FOREGROUND]));
            }
        }

        let cleaned = clean(&mask, 3);
        assert_eq!(cleaned.get_pixel(3, 3).0[0], BACKGROUND);
        // The 10x10 block survives the opening and grows by one pixel on each side.
        assert_eq!(count_foreground(&cleaned), 12 * 12);
    }

    #[test]
    fn unit_kernel_leaves_the_mask_untouched() {
        let mut mask = Mask::new(5, 5);
        mask.put_pixel(1, 1, Luma([FOREGROUND]));
        assert_eq!(clean(&mask, 1), mask);
    }
}

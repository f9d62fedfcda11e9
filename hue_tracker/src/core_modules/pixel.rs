// THEORY:
// The `pixel` module holds the only per-pixel math the tracker needs: turning an
// RGB sample into the 8-bit HSV triple used by the hue bands. Everything here is
// single-pixel scope. Nothing reads neighbors or history; masks and moments live
// in higher modules.
//
// The HSV scale is the one camera tooling conventionally uses for 8-bit images:
// - Hue:        angle on the color wheel halved, so it fits a byte (0..=180)
// - Saturation: chroma relative to value, scaled to 0..=255
// - Value:      the brightest channel, 0..=255
//
// Keeping this scale means band limits tuned with common HSV pickers (for example
// the purple band 122..148) can be pasted into the configuration unchanged.

use image::Rgb;

/// Upper bound of the halved hue scale.
pub const HUE_MAX: u8 = 180;

/// A single pixel expressed in 8-bit HSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hsv {
    /// Hue in degrees / 2 (0..=180).
    pub hue: u8,
    /// Saturation (0..=255).
    pub saturation: u8,
    /// Value, the maximum channel (0..=255).
    pub value: u8,
}

impl Hsv {
    pub fn new(hue: u8, saturation: u8, value: u8) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    /// Converts one RGB sample to HSV.
    ///
    /// - Gray pixels (no chroma) get hue 0 and saturation 0.
    /// - Black gets all zeros.
    pub fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        let maximum_channel = red.max(green.max(blue));
        let minimum_channel = red.min(green.min(blue));
        let chroma = (maximum_channel - minimum_channel) as f32;

        if maximum_channel == 0 {
            return Self::new(0, 0, 0);
        }

        let saturation = (chroma * 255.0 / maximum_channel as f32).round() as u8;
        if chroma <= 0.0 {
            return Self::new(0, saturation, maximum_channel);
        }

        let (r, g, b) = (red as f32, green as f32, blue as f32);
        let hue_degrees = if maximum_channel == red {
            (g - b) * 60.0 / chroma
        } else if maximum_channel == green {
            120.0 + (b - r) * 60.0 / chroma
        } else {
            240.0 + (r - g) * 60.0 / chroma
        };

        // Halve and round half up first, then wrap: a hue just below red rounds to 0
        // instead of landing on the top of the scale.
        let mut hue = (hue_degrees / 2.0 + 0.5).floor() as i32;
        if hue < 0 {
            hue += HUE_MAX as i32;
        }
        Self::new(hue.min(HUE_MAX as i32) as u8, saturation, maximum_channel)
    }

    pub fn from_pixel(pixel: &Rgb<u8>) -> Self {
        let [red, green, blue] = pixel.0;
        Self::from_rgb(red, green, blue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries_land_on_the_halved_wheel() {
        assert_eq!(Hsv::from_rgb(255, 0, 0), Hsv::new(0, 255, 255));
        assert_eq!(Hsv::from_rgb(0, 255, 0), Hsv::new(60, 255, 255));
        assert_eq!(Hsv::from_rgb(0, 0, 255), Hsv::new(120, 255, 255));
    }

    #[test]
    fn gray_and_black_have_no_hue() {
        assert_eq!(Hsv::from_rgb(0, 0, 0), Hsv::new(0, 0, 0));
        assert_eq!(Hsv::from_rgb(128, 128, 128), Hsv::new(0, 0, 128));
    }

    #[test]
    fn purple_robot_color_falls_in_the_tracked_band() {
        // A saturated violet, roughly what the robot shell looks like under room light.
        let hsv = Hsv::from_rgb(140, 40, 200);
        assert!((122..=148).contains(&hsv.hue), "hue was {}", hsv.hue);
        assert!(hsv.saturation >= 120);
        assert!(hsv.value >= 70);
    }

    #[test]
    fn reds_just_below_zero_round_before_wrapping() {
        // -0.35 half-degrees rounds to 0, like the 8-bit OpenCV conversion.
        assert_eq!(Hsv::from_rgb(255, 0, 1).hue, 0);
        assert_eq!(Hsv::from_rgb(255, 0, 3).hue, 0);
        // -0.59 rounds to -1 and wraps to the last step of the scale.
        assert_eq!(Hsv::from_rgb(255, 0, 5).hue, 179);
        assert!(crate::config::RED_LOW_BAND.contains(Hsv::from_rgb(255, 0, 1)));
    }

    #[test]
    fn magenta_wraps_below_the_top_of_the_scale() {
        let hsv = Hsv::from_rgb(255, 0, 255);
        assert_eq!(hsv.hue, 150);
    }
}

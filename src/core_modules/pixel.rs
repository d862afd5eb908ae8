// THEORY:
// The `pixel` module holds the one classification every other stage agrees on: is a
// single RGBA pixel part of the white canvas or not. The slicer uses it to find where
// the drawn grid starts and stops; the matte uses it to decide which pixels a flood
// fill may walk through. Both must share the exact same predicate and threshold,
// otherwise a pixel could count as margin for the crop yet block the matte (or the
// other way round), so the rule lives here and nowhere else.
//
// Key principles:
// 1.  **Single-pixel scope**: the predicate reads one pixel, never its neighbours.
// 2.  **Alpha-blind**: only the colour channels are inspected. A pixel that was already
//     made transparent still classifies as white, which keeps matting idempotent.
// 3.  **Strict comparison**: every colour channel must be strictly greater than the
//     threshold, so a threshold of 255 means "nothing is white".

pub mod pixel {
    use image::Rgba;

    pub type Channel = u8;

    /// Default near-white threshold (≈98% of full brightness). Tolerates the light
    /// compression noise of generated images without swallowing pale content.
    pub const DEFAULT_WHITE_THRESHOLD: Channel = 250;

    /// Returns true when all three colour channels exceed `threshold`.
    #[inline]
    pub fn is_near_white(red: Channel, green: Channel, blue: Channel, threshold: Channel) -> bool {
        red > threshold && green > threshold && blue > threshold
    }

    /// Near-white test for an `image` pixel. Alpha is ignored.
    #[inline]
    pub fn is_background(pixel: &Rgba<Channel>, threshold: Channel) -> bool {
        let [red, green, blue, _alpha] = pixel.0;
        is_near_white(red, green, blue, threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::*;
    use image::Rgba;

    #[test]
    fn pure_white_is_background() {
        assert!(is_background(&Rgba([255, 255, 255, 255]), DEFAULT_WHITE_THRESHOLD));
    }

    #[test]
    fn threshold_is_exclusive() {
        assert!(!is_near_white(250, 255, 255, 250));
        assert!(is_near_white(251, 251, 251, 250));
    }

    #[test]
    fn one_dark_channel_is_content() {
        assert!(!is_background(&Rgba([255, 255, 200, 255]), DEFAULT_WHITE_THRESHOLD));
        assert!(!is_background(&Rgba([255, 0, 0, 255]), DEFAULT_WHITE_THRESHOLD));
    }

    #[test]
    fn alpha_does_not_change_classification() {
        assert!(is_background(&Rgba([253, 254, 255, 0]), DEFAULT_WHITE_THRESHOLD));
        assert!(!is_background(&Rgba([10, 10, 10, 0]), DEFAULT_WHITE_THRESHOLD));
    }
}

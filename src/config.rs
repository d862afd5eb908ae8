use crate::core_modules::pixel::pixel::{Channel, DEFAULT_WHITE_THRESHOLD};

/// Default padding, in pixels, added around the detected content before slicing.
///
/// Too little and the outer cells lose the gap that surrounds their artwork, which shows
/// up as horizontal cut drift. Too much and the white margin the crop is meant to remove
/// comes back, shifting every cut. 20px sits between the two failure modes.
pub const DEFAULT_PADDING: u32 = 20;

/// Tunable constants for slicing and matting.
///
/// Both stages read `white_threshold`, so one config keeps the crop and the matte in
/// agreement about what counts as background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetConfig {
    /// A pixel is background when all of R, G and B are strictly above this value.
    pub white_threshold: Channel,
    /// Pixels added on every side of the tight content box, clamped to the image.
    pub padding: u32,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            white_threshold: DEFAULT_WHITE_THRESHOLD,
            padding: DEFAULT_PADDING,
        }
    }
}

impl SheetConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the near-white threshold.
    ///
    /// # Example
    /// ```rust
    /// use emoji_sheet::SheetConfig;
    ///
    /// let config = SheetConfig::new().with_white_threshold(240);
    /// assert_eq!(config.white_threshold, 240);
    /// ```
    pub fn with_white_threshold(mut self, white_threshold: Channel) -> Self {
        self.white_threshold = white_threshold;
        self
    }

    /// Overrides the content padding.
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = SheetConfig::default();
        assert_eq!(config.white_threshold, 250);
        assert_eq!(config.padding, 20);
    }

    #[test]
    fn setters_chain() {
        let config = SheetConfig::new().with_padding(0).with_white_threshold(200);
        assert_eq!(config, SheetConfig { white_threshold: 200, padding: 0 });
    }
}

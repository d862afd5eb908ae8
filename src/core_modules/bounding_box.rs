// THEORY:
// The generative model never lays the grid out on the canvas the same way twice: the
// white margin around it is uneven and sometimes wide. Slicing the raw canvas into equal
// cells would therefore cut through the artwork. This module finds where the drawn
// content actually is, so the slicer can partition that region instead.
//
// Algorithm:
// 1.  **Single scan**: every pixel is visited once in row-major order. Any pixel that is
//     not near-white extends the running min/max x and y.
// 2.  **Blank fallback**: if nothing but canvas was found, the box is the whole image.
//     An all-white composite is odd but must not fail the caller.
// 3.  **Padding**: the tight box is grown by a fixed padding on every side and clamped to
//     the image, restoring the outer gutter of the edge cells.

use crate::config::SheetConfig;
use crate::core_modules::pixel::pixel::{Channel, is_background};
use image::RgbaImage;

/// An axis-aligned rectangle inside an image, `x + w <= width` and `y + h <= height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl BoundingBox {
    /// The box covering the whole of an image of the given size.
    pub fn full(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, w: width, h: height }
    }

    /// One past the last column covered by the box.
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// One past the last row covered by the box.
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    /// Grows the box by `padding` on every side without leaving a `width`x`height` image.
    pub fn padded(&self, padding: u32, width: u32, height: u32) -> Self {
        let x = self.x.saturating_sub(padding);
        let y = self.y.saturating_sub(padding);
        let right = self.right().saturating_add(padding).min(width);
        let bottom = self.bottom().saturating_add(padding).min(height);
        Self { x, y, w: right - x, h: bottom - y }
    }
}

/// Tight box around every non-background pixel, or `None` for a blank image.
///
/// The box includes the extreme pixels themselves, so cropping an image to its tight box
/// and scanning again yields the full extent of the crop.
pub fn content_bounds(image: &RgbaImage, threshold: Channel) -> Option<BoundingBox> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut found = false;

    for (x, y, pixel) in image.enumerate_pixels() {
        if is_background(pixel, threshold) {
            continue;
        }
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
        found = true;
    }

    found.then(|| BoundingBox {
        x: min_x,
        y: min_y,
        w: max_x - min_x + 1,
        h: max_y - min_y + 1,
    })
}

/// The region the slicer partitions: the padded content box, or the full image when
/// the image holds nothing but canvas.
pub fn content_bounding_box(image: &RgbaImage, config: &SheetConfig) -> BoundingBox {
    let (width, height) = image.dimensions();
    match content_bounds(image, config.white_threshold) {
        Some(tight) => {
            let padded = tight.padded(config.padding, width, height);
            tracing::debug!(?tight, ?padded, width, height, "content bounding box");
            padded
        }
        None => {
            tracing::debug!(width, height, "no content found, using full image");
            BoundingBox::full(width, height)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, imageops};

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const INK: Rgba<u8> = Rgba([20, 20, 20, 255]);

    fn canvas_with_block(width: u32, height: u32, block: BoundingBox) -> RgbaImage {
        let mut image = RgbaImage::from_pixel(width, height, WHITE);
        for y in block.y..block.bottom() {
            for x in block.x..block.right() {
                image.put_pixel(x, y, INK);
            }
        }
        image
    }

    #[test]
    fn all_white_image_uses_full_extent() {
        let image = RgbaImage::from_pixel(64, 48, WHITE);
        assert_eq!(content_bounds(&image, 250), None);
        assert_eq!(
            content_bounding_box(&image, &SheetConfig::default()),
            BoundingBox::full(64, 48)
        );
    }

    #[test]
    fn tight_box_covers_extreme_pixels() {
        let block = BoundingBox { x: 10, y: 5, w: 30, h: 12 };
        let image = canvas_with_block(100, 50, block);
        assert_eq!(content_bounds(&image, 250), Some(block));
    }

    #[test]
    fn single_pixel_content_has_unit_box() {
        let mut image = RgbaImage::from_pixel(9, 9, WHITE);
        image.put_pixel(4, 6, INK);
        assert_eq!(
            content_bounds(&image, 250),
            Some(BoundingBox { x: 4, y: 6, w: 1, h: 1 })
        );
    }

    #[test]
    fn padding_expands_and_clamps() {
        let block = BoundingBox { x: 10, y: 40, w: 30, h: 55 };
        let image = canvas_with_block(100, 100, block);
        let padded = content_bounding_box(&image, &SheetConfig::default());

        // Left and top move out by 20; the bottom would pass the image edge and clamps.
        assert_eq!(padded, BoundingBox { x: 0, y: 20, w: 60, h: 80 });
        assert!(padded.right() <= 100 && padded.bottom() <= 100);
    }

    #[test]
    fn cropping_to_the_tight_box_does_not_shrink_it_further() {
        let block = BoundingBox { x: 13, y: 7, w: 41, h: 29 };
        let mut image = canvas_with_block(80, 60, block);
        // Light content inside the box must still count once cropped.
        image.put_pixel(20, 20, Rgba([240, 240, 240, 255]));

        let tight = content_bounds(&image, 250).expect("content expected");
        let cropped = imageops::crop_imm(&image, tight.x, tight.y, tight.w, tight.h).to_image();

        assert_eq!(
            content_bounds(&cropped, 250),
            Some(BoundingBox::full(tight.w, tight.h))
        );
    }

    #[test]
    fn near_white_noise_is_ignored() {
        let mut image = RgbaImage::from_pixel(30, 30, WHITE);
        image.put_pixel(0, 0, Rgba([252, 251, 254, 255]));
        image.put_pixel(15, 15, INK);
        assert_eq!(
            content_bounds(&image, 250),
            Some(BoundingBox { x: 15, y: 15, w: 1, h: 1 })
        );
    }
}

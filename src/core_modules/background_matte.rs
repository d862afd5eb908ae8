// THEORY:
// The `BackgroundMatte` removes the white canvas around a character without touching
// the white that belongs to the character itself (eye highlights, teeth, a white shirt).
// A global "white becomes transparent" rule cannot tell those apart. Connectivity can:
// canvas white is reachable from the image border, enclosed white is not.
//
// Algorithm (border-seeded region growing):
// 1.  **Classification**: a pixel is a white candidate under the same near-white
//     predicate the slicer uses. Alpha is not consulted.
// 2.  **Seeding**: every white candidate on the four borders goes onto the worklist and
//     is marked visited immediately, so no pixel is ever queued twice.
// 3.  **Growing**: pop a pixel, zero its alpha in the output, and push its unvisited
//     white-candidate neighbours. Only the 4 direct neighbours count; a diagonal gap in
//     an outline does not let the fill leak inside.
// 4.  **Termination**: the fill ends when the worklist is empty. Membership depends
//     only on reachability, so the stack order used here is as good as a queue.
//
// The fill is iterative with an explicit worklist so stack depth stays constant on
// large tiles. The worklist starts with room for the border and grows fallibly, so a
// fill that outruns memory ends in the fallback below instead of an abort. The output
// is a private copy of the input; the caller's buffer is never written.
//
// Failure policy: decoding errors surface to the caller, but a failure inside the fill
// itself falls back to an unmodified copy of the input. A tile without transparency is
// still deliverable; a missing tile is not.

use crate::config::SheetConfig;
use crate::core_modules::pixel::pixel::{Channel, is_background};
use crate::core_modules::utils::image_helper::image_helper::{
    decode, ensure_non_empty, try_clone_rgba, try_filled, try_grow, try_with_capacity,
};
use crate::error::Result;
use image::RgbaImage;

pub mod background_matte {
    use super::*; // Make imports from parent module available.

    /// Alpha written to every background pixel.
    pub const TRANSPARENT: Channel = 0;
    const ALPHA: usize = 3;

    /// A pixel coordinate on the worklist.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Point {
        pub x: u32,
        pub y: u32,
    }

    /// Strict matte: returns the error instead of falling back.
    pub fn try_matte(image: &RgbaImage, config: &SheetConfig) -> Result<RgbaImage> {
        ensure_non_empty(image)?;
        let (width, height) = image.dimensions();
        let threshold = config.white_threshold;

        let mut output = try_clone_rgba(image)?;
        let mut visited = try_filled(width as usize * height as usize, false)?;
        let border = (width as usize).saturating_add(height as usize).saturating_mul(2);
        let mut worklist: Vec<Point> = try_with_capacity(border)?;

        // --- Seeding ---
        for x in 0..width {
            push_if_white(image, threshold, &mut visited, &mut worklist, x, 0)?;
            push_if_white(image, threshold, &mut visited, &mut worklist, x, height - 1)?;
        }
        for y in 0..height {
            push_if_white(image, threshold, &mut visited, &mut worklist, 0, y)?;
            push_if_white(image, threshold, &mut visited, &mut worklist, width - 1, y)?;
        }

        // --- Growing ---
        let mut cleared = 0usize;
        while let Some(current) = worklist.pop() {
            output.get_pixel_mut(current.x, current.y).0[ALPHA] = TRANSPARENT;
            cleared += 1;

            // Check all 4 direct neighbors (not diagonals).
            for (dx, dy) in &[(0i64, 1i64), (0, -1), (1, 0), (-1, 0)] {
                let nx = current.x as i64 + dx;
                let ny = current.y as i64 + dy;

                if nx >= 0 && nx < width as i64 && ny >= 0 && ny < height as i64 {
                    let (nx, ny) = (nx as u32, ny as u32);
                    push_if_white(image, threshold, &mut visited, &mut worklist, nx, ny)?;
                }
            }
        }

        tracing::debug!(width, height, cleared, "matted background");
        Ok(output)
    }

    fn push_if_white(
        image: &RgbaImage,
        threshold: Channel,
        visited: &mut [bool],
        worklist: &mut Vec<Point>,
        x: u32,
        y: u32,
    ) -> Result<()> {
        let index = y as usize * image.width() as usize + x as usize;
        if visited[index] {
            return Ok(());
        }
        if is_background(image.get_pixel(x, y), threshold) {
            if worklist.len() == worklist.capacity() {
                try_grow(worklist, worklist.len().max(1))?;
            }
            visited[index] = true;
            worklist.push(Point { x, y });
        }
        Ok(())
    }

    /// Best-effort matte: any failure during the fill yields an unmodified copy of
    /// `image`. Callers that need to know must compare the result with the input.
    pub fn matte(image: &RgbaImage, config: &SheetConfig) -> RgbaImage {
        match try_matte(image, config) {
            Ok(matted) => matted,
            Err(err) => {
                tracing::warn!(
                    width = image.width(),
                    height = image.height(),
                    error = %err,
                    "matte failed, returning tile unchanged"
                );
                image.clone()
            }
        }
    }

    /// Decodes `bytes` and mattes the result. Decoding errors are returned.
    pub fn matte_encoded(bytes: &[u8], config: &SheetConfig) -> Result<RgbaImage> {
        let image = decode(bytes)?;
        Ok(matte(&image, config))
    }
}

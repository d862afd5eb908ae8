// THEORY:
// The `GridSlicer` turns one composite into its ordered set of tiles. It is the bridge
// between the raw model output and everything the caller hands to users, so a wrong cut
// here is visually catastrophic: every error propagates, nothing is papered over.
//
// Key architectural principles:
// 1.  **Crop first**: the grid is laid over the padded content box, not the raw canvas,
//     so uneven model margins do not shift the cuts.
// 2.  **No accumulated drift**: cell sizes are real-valued. Every cell origin is computed
//     from the box origin as `origin + index * cell_size` and floored, never derived
//     from the previous cell's edge, so rounding error stays below one pixel everywhere.
// 3.  **Uniform tiles**: every tile has the same floored size, and source coordinates
//     that land past the image edge are clamped onto the last row or column.
// 4.  **Row-major order**: index `i` maps to row `i / cols`, column `i % cols`, matching
//     the caller's label list.

use crate::config::SheetConfig;
use crate::core_modules::bounding_box::{BoundingBox, content_bounding_box};
use crate::core_modules::utils::image_helper::image_helper::{
    allocate_rgba, ensure_non_empty, try_with_capacity,
};
use crate::error::{Result, SheetError};
use image::RgbaImage;

/// How many rows and columns the composite is divided into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSpec {
    pub rows: u32,
    pub cols: u32,
}

impl GridSpec {
    /// The 4 x 6 layout of a 24-emoji sheet.
    pub const EMOJI_SHEET: GridSpec = GridSpec { rows: 4, cols: 6 };

    /// Builds a validated grid spec.
    pub fn new(rows: u32, cols: u32) -> Result<Self> {
        let grid = Self { rows, cols };
        grid.validate()?;
        Ok(grid)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows < 1 || self.cols < 1 {
            return Err(SheetError::InvalidDimensions { rows: self.rows, cols: self.cols });
        }
        Ok(())
    }

    /// Number of tiles the grid produces. A count that does not fit in `usize` can
    /// never be held in memory and is reported as an allocation failure.
    pub fn cell_count(&self) -> Result<usize> {
        (self.rows as usize)
            .checked_mul(self.cols as usize)
            .ok_or(SheetError::AllocationFailure { bytes: usize::MAX })
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::EMOJI_SHEET
    }
}

/// One cropped cell of the composite.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Row-major position in the output sequence.
    pub index: usize,
    pub row: u32,
    pub col: u32,
    /// The tile's own pixel buffer.
    pub image: RgbaImage,
}

/// Real-valued cell geometry over a bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellLayout {
    pub bounds: BoundingBox,
    pub grid: GridSpec,
    /// Width of one cell in source pixels, possibly fractional.
    pub cell_width: f64,
    /// Height of one cell in source pixels, possibly fractional.
    pub cell_height: f64,
}

impl CellLayout {
    pub fn new(bounds: BoundingBox, grid: GridSpec) -> Self {
        Self {
            bounds,
            grid,
            cell_width: bounds.w as f64 / grid.cols as f64,
            cell_height: bounds.h as f64 / grid.rows as f64,
        }
    }

    /// Pixel size shared by every tile. Never zero, even when there are more cells than
    /// pixels along an axis.
    pub fn tile_size(&self) -> (u32, u32) {
        let width = (self.cell_width.floor() as u32).max(1);
        let height = (self.cell_height.floor() as u32).max(1);
        (width, height)
    }

    /// Floored top-left source pixel of cell (`row`, `col`).
    pub fn source_origin(&self, row: u32, col: u32) -> (u32, u32) {
        let x = self.bounds.x as f64 + col as f64 * self.cell_width;
        let y = self.bounds.y as f64 + row as f64 * self.cell_height;
        (x.floor() as u32, y.floor() as u32)
    }

    /// Row and column of the `index`-th cell in row-major order.
    pub fn position(&self, index: usize) -> (u32, u32) {
        let cols = self.grid.cols as usize;
        ((index / cols) as u32, (index % cols) as u32)
    }
}

/// Copies one cell out of `source` into a new buffer.
pub fn crop_tile(source: &RgbaImage, layout: &CellLayout, index: usize) -> Result<Tile> {
    ensure_non_empty(source)?;
    let (row, col) = layout.position(index);
    let (start_x, start_y) = layout.source_origin(row, col);
    let (tile_width, tile_height) = layout.tile_size();
    let last_x = source.width() - 1;
    let last_y = source.height() - 1;

    let mut image = allocate_rgba(tile_width, tile_height)?;
    for offset_y in 0..tile_height {
        let source_y = start_y.saturating_add(offset_y).min(last_y);
        for offset_x in 0..tile_width {
            let source_x = start_x.saturating_add(offset_x).min(last_x);
            image.put_pixel(offset_x, offset_y, *source.get_pixel(source_x, source_y));
        }
    }

    Ok(Tile { index, row, col, image })
}

/// Checks the inputs and works out the cell geometry for `image`.
pub fn plan(image: &RgbaImage, grid: GridSpec, config: &SheetConfig) -> Result<CellLayout> {
    grid.validate()?;
    grid.cell_count()?;
    ensure_non_empty(image)?;

    let bounds = content_bounding_box(image, config);
    let layout = CellLayout::new(bounds, grid);
    tracing::debug!(
        rows = grid.rows,
        cols = grid.cols,
        cell_width = layout.cell_width,
        cell_height = layout.cell_height,
        "grid layout"
    );
    Ok(layout)
}

/// Slices `image` into `grid.rows * grid.cols` tiles in row-major order.
///
/// # Example
/// ```rust
/// use emoji_sheet::{GridSpec, SheetConfig, slice};
/// use image::{Rgba, RgbaImage};
///
/// let composite = RgbaImage::from_pixel(120, 80, Rgba([200, 30, 30, 255]));
/// let tiles = slice(&composite, GridSpec::EMOJI_SHEET, &SheetConfig::default()).unwrap();
/// assert_eq!(tiles.len(), 24);
/// assert_eq!(tiles[23].image.dimensions(), (20, 20));
/// ```
pub fn slice(image: &RgbaImage, grid: GridSpec, config: &SheetConfig) -> Result<Vec<Tile>> {
    let layout = plan(image, grid, config)?;

    let count = grid.cell_count()?;
    let mut tiles = try_with_capacity(count)?;
    for index in 0..count {
        tiles.push(crop_tile(image, &layout, index)?);
    }

    let (tile_width, tile_height) = layout.tile_size();
    tracing::info!(count = tiles.len(), tile_width, tile_height, "sliced composite");
    Ok(tiles)
}

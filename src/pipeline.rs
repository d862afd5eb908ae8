// THEORY:
// The `pipeline` module is the top-level synchronous API of the crate. It bundles the
// tunable constants and the grid layout into one value so callers configure once and
// then feed it composites and tiles. The two flows it exposes never share a buffer:
//
// - composite -> `slice` -> tiles handed out for preview and delivery
// - tile -> `matte` -> transparency variant, on request
//
// Slicing errors always surface. Matting degrades to the opaque tile.

use crate::config::SheetConfig;
use crate::core_modules::background_matte::background_matte;
use crate::core_modules::grid_slicer;
use crate::core_modules::utils::image_helper::image_helper::{decode, encode_png};
use crate::error::Result;
use image::RgbaImage;

pub use crate::core_modules::bounding_box::{BoundingBox, content_bounding_box, content_bounds};
pub use crate::core_modules::grid_slicer::{GridSpec, Tile};

/// Slices composites and mattes tiles with one shared configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SheetPipeline {
    config: SheetConfig,
    grid: GridSpec,
}

impl SheetPipeline {
    pub fn new(config: SheetConfig, grid: GridSpec) -> Result<Self> {
        grid.validate()?;
        Ok(Self { config, grid })
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn grid(&self) -> GridSpec {
        self.grid
    }

    /// Slices a decoded composite into row-major tiles.
    pub fn slice(&self, composite: &RgbaImage) -> Result<Vec<Tile>> {
        grid_slicer::slice(composite, self.grid, &self.config)
    }

    /// Decodes the model's raw output and slices it.
    pub fn slice_encoded(&self, bytes: &[u8]) -> Result<Vec<Tile>> {
        let composite = decode(bytes)?;
        self.slice(&composite)
    }

    /// Transparency variant of one tile. Falls back to the tile as-is on failure.
    pub fn matte(&self, tile: &RgbaImage) -> RgbaImage {
        background_matte::matte(tile, &self.config)
    }

    pub fn matte_encoded(&self, bytes: &[u8]) -> Result<RgbaImage> {
        background_matte::matte_encoded(bytes, &self.config)
    }

    /// PNG bytes for every tile, in tile order.
    pub fn encode_tiles(&self, tiles: &[Tile]) -> Result<Vec<Vec<u8>>> {
        tiles.iter().map(|tile| encode_png(&tile.image)).collect()
    }
}

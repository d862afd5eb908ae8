// THEORY:
// This file is the entry point for the `emoji_sheet` library crate. It exposes the two
// image operations behind an emoji sheet and nothing else:
//
// - `slice`: find the drawn grid inside a generated composite and cut it into equal,
//   row-major tiles.
// - `matte`: make the white canvas around a tile transparent while keeping white
//   details enclosed by the character's outline.
//
// `SheetPipeline` bundles the configuration for synchronous callers and
// `ParallelPipeline` fans the per-cell and per-tile work out over tokio's blocking
// pool. The building blocks live in `core_modules` for callers that need them directly
// (bounding box scan, cell geometry, the strict `try_matte`).

pub mod config;
pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;

pub use config::{DEFAULT_PADDING, SheetConfig};
pub use core_modules::background_matte::background_matte::{matte, matte_encoded, try_matte};
pub use core_modules::bounding_box::{BoundingBox, content_bounding_box, content_bounds};
pub use core_modules::grid_slicer::{CellLayout, GridSpec, Tile, slice};
pub use core_modules::pixel::pixel::{DEFAULT_WHITE_THRESHOLD, is_near_white};
pub use core_modules::utils::image_helper::image_helper::{decode, encode_png};
pub use error::{Result, SheetError};
pub use parallel_pipeline::ParallelPipeline;
pub use pipeline::SheetPipeline;

/// Decodes a composite and slices it.
pub fn slice_encoded(bytes: &[u8], grid: GridSpec, config: &SheetConfig) -> Result<Vec<Tile>> {
    let composite = decode(bytes)?;
    slice(&composite, grid, config)
}

// THEORY:
// The parallel pipeline spreads the two per-item workloads over blocking workers:
// cropping the cells of one composite, and matting every tile of a delivery batch.
// Neither needs locking. Cell crops only read the shared composite behind an `Arc` and
// write their own output buffer; each matte owns its visited map and worklist.
//
// The content box scan runs once, up front, as its own blocking job. Per-cell jobs follow
// on tokio's blocking pool with at most `max_in_flight` outstanding, and `buffered` hands
// results back in submission order, so tile `i` is always the `i`-th cell. The tile
// vector is reserved before any work starts, so an oversized grid fails immediately.
//
// There is no cancellation contract here. Callers that want a deadline wrap the
// returned future in `tokio::time::timeout`.

use crate::config::SheetConfig;
use crate::core_modules::background_matte::background_matte;
use crate::core_modules::grid_slicer::{CellLayout, GridSpec, Tile, crop_tile, plan};
use crate::core_modules::utils::image_helper::image_helper::try_with_capacity;
use crate::error::{Result, SheetError};
use futures::stream::{self, StreamExt, TryStreamExt};
use image::RgbaImage;
use std::sync::Arc;
use tokio::task::JoinError;

fn worker_error(err: JoinError) -> SheetError {
    SheetError::Worker(err.to_string())
}

pub struct ParallelPipeline {
    config: SheetConfig,
    grid: GridSpec,
    max_in_flight: usize,
}

impl ParallelPipeline {
    /// One in-flight job per logical CPU.
    pub fn new(config: SheetConfig, grid: GridSpec) -> Result<Self> {
        grid.validate()?;
        Ok(Self {
            config,
            grid,
            max_in_flight: num_cpus::get().max(1),
        })
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Scans `composite` for its content box on the blocking pool.
    pub async fn plan_layout(&self, composite: Arc<RgbaImage>) -> Result<CellLayout> {
        let grid = self.grid;
        let config = self.config;
        tokio::task::spawn_blocking(move || plan(&composite, grid, &config))
            .await
            .map_err(worker_error)?
    }

    /// Slices `composite` with one blocking job per cell.
    pub async fn slice(&self, composite: Arc<RgbaImage>) -> Result<Vec<Tile>> {
        let count = self.grid.cell_count()?;
        let tiles: Vec<Tile> = try_with_capacity(count)?;
        let layout = self.plan_layout(Arc::clone(&composite)).await?;

        let tiles = stream::iter(0..count)
            .map(|index| {
                let composite = Arc::clone(&composite);
                async move {
                    tokio::task::spawn_blocking(move || crop_tile(&composite, &layout, index))
                        .await
                        .map_err(worker_error)?
                }
            })
            .buffered(self.max_in_flight)
            .try_fold(tiles, |mut tiles, tile| async move {
                tiles.push(tile);
                Ok::<_, SheetError>(tiles)
            })
            .await?;

        tracing::info!(
            count = tiles.len(),
            workers = self.max_in_flight,
            "sliced composite in parallel"
        );
        Ok(tiles)
    }

    /// Mattes every image. A tile whose job fails comes back unchanged.
    pub async fn matte_batch(&self, images: Vec<RgbaImage>) -> Vec<RgbaImage> {
        let config = self.config;
        let total = images.len();

        let matted: Vec<RgbaImage> = stream::iter(images.into_iter().map(Arc::new))
            .map(|image| async move {
                let job_image = Arc::clone(&image);
                let job = move || background_matte::matte(&job_image, &config);
                match tokio::task::spawn_blocking(job).await {
                    Ok(matted) => matted,
                    Err(err) => {
                        tracing::warn!(
                            error = %err,
                            "matte worker failed, returning tile unchanged"
                        );
                        Arc::try_unwrap(image).unwrap_or_else(|shared| (*shared).clone())
                    }
                }
            })
            .buffered(self.max_in_flight)
            .collect()
            .await;

        tracing::info!(count = total, "matted tile batch");
        matted
    }

    /// Like `matte_batch`, keeping each tile's position.
    pub async fn matte_tiles(&self, tiles: Vec<Tile>) -> Vec<Tile> {
        let (positions, images): (Vec<_>, Vec<_>) = tiles
            .into_iter()
            .map(|tile| ((tile.index, tile.row, tile.col), tile.image))
            .unzip();

        self.matte_batch(images)
            .await
            .into_iter()
            .zip(positions)
            .map(|(image, (index, row, col))| Tile { index, row, col, image })
            .collect()
    }
}

//! Error types shared by the slicer, the matte and the parallel pipeline.

/// Everything that can go wrong while turning a composite into tiles.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    /// The grid spec asked for zero rows or zero columns.
    #[error("invalid grid dimensions: {rows} rows x {cols} cols (both must be >= 1)")]
    InvalidDimensions {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        cols: u32,
    },

    /// The image has no pixels to work with.
    #[error("image has a zero dimension ({width}x{height})")]
    EmptyImage {
        /// Width of the rejected image.
        width: u32,
        /// Height of the rejected image.
        height: u32,
    },

    /// The input bytes could not be interpreted as a raster image.
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// A tile could not be encoded as PNG.
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    /// A pixel buffer or visited map could not be reserved.
    #[error("failed to allocate {bytes} bytes")]
    AllocationFailure {
        /// Size of the reservation that failed.
        bytes: usize,
    },

    /// A blocking worker panicked or was cancelled.
    #[error("worker failed: {0}")]
    Worker(String),
}

impl SheetError {
    /// True for errors the caller cannot fix by changing its arguments.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SheetError::AllocationFailure { .. } | SheetError::Worker(_))
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, SheetError>;

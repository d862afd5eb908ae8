// Buffer plumbing shared by the slicer and the matte: decoding caller bytes,
// encoding finished tiles, and fallible allocation of pixel buffers so an oversized
// composite surfaces as `AllocationFailure` instead of aborting the process.

pub mod image_helper {
    use crate::error::{Result, SheetError};
    use image::{ImageEncoder, RgbaImage};

    pub const CHANNELS: usize = 4;

    /// Decodes any format the `image` crate understands into an owned RGBA buffer.
    pub fn decode(bytes: &[u8]) -> Result<RgbaImage> {
        let image = image::load_from_memory(bytes).map_err(SheetError::Decode)?;
        Ok(image.to_rgba8())
    }

    /// Encodes a tile as PNG, keeping the alpha channel.
    pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut output);
        encoder
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ExtendedColorType::Rgba8,
            )
            .map_err(SheetError::Encode)?;
        Ok(output)
    }

    /// Rejects images with a zero width or height.
    pub fn ensure_non_empty(image: &RgbaImage) -> Result<()> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(SheetError::EmptyImage { width, height });
        }
        Ok(())
    }

    /// Empty vector with room for `len` elements, reporting failure instead of aborting.
    pub fn try_with_capacity<T>(len: usize) -> Result<Vec<T>> {
        let mut buffer = Vec::new();
        try_grow(&mut buffer, len)?;
        Ok(buffer)
    }

    /// Makes room for `additional` more elements in `buffer`.
    pub fn try_grow<T>(buffer: &mut Vec<T>, additional: usize) -> Result<()> {
        buffer
            .try_reserve(additional)
            .map_err(|_| SheetError::AllocationFailure {
                bytes: buffer
                    .len()
                    .saturating_add(additional)
                    .saturating_mul(std::mem::size_of::<T>()),
            })
    }

    /// Reserves `len` elements up front, reporting failure instead of aborting.
    pub fn try_filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>> {
        let mut buffer = try_with_capacity(len)?;
        buffer.resize(len, value);
        Ok(buffer)
    }

    /// Allocates a fully transparent black RGBA buffer.
    pub fn allocate_rgba(width: u32, height: u32) -> Result<RgbaImage> {
        let bytes = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(CHANNELS))
            .ok_or(SheetError::AllocationFailure { bytes: usize::MAX })?;
        let raw = try_filled(bytes, 0u8)?;
        RgbaImage::from_raw(width, height, raw).ok_or(SheetError::AllocationFailure { bytes })
    }

    /// Copies `image` into a freshly allocated buffer the caller owns outright.
    pub fn try_clone_rgba(image: &RgbaImage) -> Result<RgbaImage> {
        let mut copy = allocate_rgba(image.width(), image.height())?;
        copy.copy_from_slice(image.as_raw());
        Ok(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::image_helper::*;
    use crate::error::SheetError;
    use image::{Rgba, RgbaImage};

    #[test]
    fn png_round_trip_keeps_alpha() {
        let mut tile = RgbaImage::from_pixel(3, 2, Rgba([255, 255, 255, 0]));
        tile.put_pixel(1, 1, Rgba([200, 10, 10, 255]));

        let bytes = encode_png(&tile).expect("Error encoding tile.");
        let decoded = decode(&bytes).expect("Error decoding tile.");

        assert_eq!(decoded, tile);
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let result = decode(b"definitely not an image");
        assert!(matches!(result, Err(SheetError::Decode(_))));
    }

    #[test]
    fn empty_images_are_rejected() {
        let image = RgbaImage::new(0, 7);
        assert!(matches!(
            ensure_non_empty(&image),
            Err(SheetError::EmptyImage { width: 0, height: 7 })
        ));
    }

    #[test]
    fn clone_is_an_independent_buffer() {
        let original = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 4]));
        let mut copy = try_clone_rgba(&original).expect("Error cloning.");
        copy.put_pixel(0, 0, Rgba([9, 9, 9, 9]));

        assert_eq!(original.get_pixel(0, 0), &Rgba([1, 2, 3, 4]));
        assert_eq!(copy.get_pixel(1, 1), &Rgba([1, 2, 3, 4]));
    }

    #[test]
    fn oversized_vectors_fail_to_allocate() {
        let result = try_with_capacity::<[u64; 8]>(usize::MAX / 8);
        assert!(matches!(result, Err(SheetError::AllocationFailure { .. })));

        let mut buffer = vec![0u32; 4];
        assert!(matches!(
            try_grow(&mut buffer, usize::MAX),
            Err(SheetError::AllocationFailure { .. })
        ));
        assert_eq!(buffer.len(), 4);
    }

    #[test]
    fn absurd_sizes_fail_to_allocate() {
        assert!(matches!(
            allocate_rgba(u32::MAX, u32::MAX),
            Err(SheetError::AllocationFailure { .. })
        ));
    }
}

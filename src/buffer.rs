//! Owned RGBA pixel buffer
//!
//! The extractor and recolor engine both operate on a row-major RGBA8 byte
//! buffer of exactly `width * height * 4` bytes. [`PixelBuffer`] enforces that
//! shape at construction so the scanning code can index without checks.

use crate::constants::CHANNELS;
use crate::{RecolorError, Result};

/// Row-major RGBA8 pixel buffer with validated dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes
    ///
    /// # Errors
    ///
    /// Returns `RecolorError::InvalidBuffer` if the length is not a multiple
    /// of 4 or does not equal `width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        validate_shape(width, height, &data)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a buffer filled with a single RGBA value
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * CHANNELS);
        for _ in 0..pixels {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Image width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels
    pub fn pixel_count(&self) -> usize {
        self.data.len() / CHANNELS
    }

    /// True if the image has zero area
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw RGBA bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw RGBA bytes; the length cannot change through this slice
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer and return the raw bytes
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// RGBA value of the pixel at linear index `index`
    pub fn pixel(&self, index: usize) -> Option<[u8; 4]> {
        let start = index.checked_mul(CHANNELS)?;
        let px = self.data.get(start..start + CHANNELS)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Iterate pixels as 4-byte slices in row-major order
    pub fn pixels(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(CHANNELS)
    }
}

/// Check a borrowed RGBA slice against declared dimensions
pub fn validate_shape(width: u32, height: u32, data: &[u8]) -> Result<()> {
    if data.len() % CHANNELS != 0 {
        return Err(RecolorError::invalid_buffer(format!(
            "length {} is not a multiple of {}",
            data.len(),
            CHANNELS
        )));
    }
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or_else(|| {
            RecolorError::invalid_buffer(format!("dimensions {}x{} overflow", width, height))
        })?;
    if data.len() != expected {
        return Err(RecolorError::invalid_buffer(format!(
            "length {} does not match {}x{} RGBA ({} bytes)",
            data.len(),
            width,
            height,
            expected
        )));
    }
    Ok(())
}

impl From<image::RgbaImage> for PixelBuffer {
    fn from(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

impl From<PixelBuffer> for image::RgbaImage {
    fn from(buffer: PixelBuffer) -> Self {
        let PixelBuffer {
            width,
            height,
            data,
        } = buffer;
        // Shape was validated on construction
        image::RgbaImage::from_raw(width, height, data)
            .unwrap_or_else(|| image::RgbaImage::new(width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_valid() {
        let buffer = PixelBuffer::from_raw(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 255]).unwrap();
        assert_eq!(buffer.pixel_count(), 2);
        assert_eq!(buffer.pixel(1), Some([0, 255, 0, 255]));
        assert_eq!(buffer.pixel(2), None);
    }

    #[test]
    fn test_length_not_multiple_of_four() {
        let err = PixelBuffer::from_raw(1, 1, vec![1, 2, 3]).unwrap_err();
        assert!(matches!(err, RecolorError::InvalidBuffer { .. }));
    }

    #[test]
    fn test_length_mismatch_with_dimensions() {
        let err = PixelBuffer::from_raw(2, 2, vec![0; 8]).unwrap_err();
        assert!(matches!(err, RecolorError::InvalidBuffer { .. }));
    }

    #[test]
    fn test_zero_area() {
        let buffer = PixelBuffer::from_raw(0, 5, Vec::new()).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.pixel_count(), 0);
    }

    #[test]
    fn test_filled() {
        let buffer = PixelBuffer::filled(3, 2, [1, 2, 3, 4]);
        assert_eq!(buffer.as_bytes().len(), 24);
        assert!(buffer.pixels().all(|p| p == [1, 2, 3, 4]));
    }

    #[test]
    fn test_image_conversion() {
        let img = image::RgbaImage::from_pixel(2, 3, image::Rgba([9, 8, 7, 6]));
        let buffer = PixelBuffer::from(img);
        assert_eq!((buffer.width(), buffer.height()), (2, 3));

        let back: image::RgbaImage = buffer.into();
        assert_eq!(back.get_pixel(1, 2).0, [9, 8, 7, 6]);
    }
}

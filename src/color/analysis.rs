//! Dominant color extraction
//!
//! Builds a ranked palette from an RGBA buffer:
//! - Samples every Nth pixel in linear order
//! - Drops sampled pixels that are mostly transparent
//! - Quantizes each channel to the nearest multiple of the bucket width
//! - Ranks buckets by frequency, earliest-seen bucket first on ties

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::buffer::{validate_shape, PixelBuffer};
use crate::color::Rgb;
use crate::config::ExtractionConfig;
use crate::constants::CHANNELS;
use crate::Result;

/// A quantized color and the number of sampled pixels that fell into it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorFrequency {
    pub color: Rgb,
    /// Always greater than zero
    pub count: usize,
}

/// Colors ordered by descending frequency
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedPalette {
    entries: Vec<ColorFrequency>,
}

impl RankedPalette {
    /// Number of colors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Color at rank `index` (0 = most frequent)
    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.entries.get(index).map(|e| e.color)
    }

    /// Colors in rank order
    pub fn colors(&self) -> Vec<Rgb> {
        self.entries.iter().map(|e| e.color).collect()
    }

    /// Colors with their sample counts, in rank order
    pub fn frequencies(&self) -> &[ColorFrequency] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColorFrequency> {
        self.entries.iter()
    }
}

/// Color extractor producing a ranked palette of dominant colors
#[derive(Debug, Clone, Default)]
pub struct ColorExtractor {
    config: ExtractionConfig,
}

impl ColorExtractor {
    /// Create an extractor with the reference parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with custom parameters
    ///
    /// # Errors
    ///
    /// Returns `RecolorError::InvalidParameter` if stride, bucket width or
    /// palette size is zero.
    pub fn with_config(config: ExtractionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Round a channel to the nearest bucket, halves rounding up
    ///
    /// Values that would round past 255 are clamped to 255.
    pub fn quantize(&self, channel: u8) -> u8 {
        let width = self.config.bucket_width as u32;
        let bucket = (channel as u32 + width / 2) / width * width;
        bucket.min(u8::MAX as u32) as u8
    }

    /// Extract the ranked palette from a validated buffer
    pub fn extract(&self, buffer: &PixelBuffer) -> RankedPalette {
        let mut entries = self.rank(buffer.as_bytes());
        entries.truncate(self.config.palette_size);
        RankedPalette { entries }
    }

    /// Extract the ranked palette from raw RGBA bytes
    ///
    /// # Errors
    ///
    /// Returns `RecolorError::InvalidBuffer` if `data` does not hold exactly
    /// `width * height` RGBA pixels.
    pub fn extract_from_raw(&self, width: u32, height: u32, data: &[u8]) -> Result<RankedPalette> {
        validate_shape(width, height, data)?;
        let mut entries = self.rank(data);
        entries.truncate(self.config.palette_size);
        Ok(RankedPalette { entries })
    }

    /// Every bucket seen during sampling, ranked, without the palette cap
    pub fn extract_frequencies(&self, buffer: &PixelBuffer) -> Vec<ColorFrequency> {
        self.rank(buffer.as_bytes())
    }

    fn rank(&self, data: &[u8]) -> Vec<ColorFrequency> {
        // Insertion order is kept in `entries`; `index` maps a bucket to its slot
        let mut index: HashMap<Rgb, usize> = HashMap::new();
        let mut entries: Vec<ColorFrequency> = Vec::new();
        let mut sampled = 0usize;

        for px in data.chunks_exact(CHANNELS).step_by(self.config.sample_stride) {
            if px[3] < self.config.min_alpha {
                continue;
            }
            sampled += 1;

            let color = Rgb::new(self.quantize(px[0]), self.quantize(px[1]), self.quantize(px[2]));
            match index.get(&color) {
                Some(&slot) => entries[slot].count += 1,
                None => {
                    index.insert(color, entries.len());
                    entries.push(ColorFrequency { color, count: 1 });
                }
            }
        }

        // Stable sort: ties keep first-seen order
        entries.sort_by(|a, b| b.count.cmp(&a.count));

        debug!(
            "Sampled {} opaque pixels of {} into {} buckets",
            sampled,
            data.len() / CHANNELS,
            entries.len()
        );
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_from_pixels(pixels: &[[u8; 4]]) -> PixelBuffer {
        let data = pixels.iter().flatten().copied().collect();
        PixelBuffer::from_raw(pixels.len() as u32, 1, data).unwrap()
    }

    #[test]
    fn test_quantize_rounding() {
        let extractor = ColorExtractor::new();
        assert_eq!(extractor.quantize(0), 0);
        assert_eq!(extractor.quantize(9), 0);
        assert_eq!(extractor.quantize(10), 20);
        assert_eq!(extractor.quantize(29), 20);
        assert_eq!(extractor.quantize(30), 40);
        assert_eq!(extractor.quantize(249), 240);
    }

    #[test]
    fn test_quantize_clamps_top_bucket() {
        let extractor = ColorExtractor::new();
        assert_eq!(extractor.quantize(250), 255);
        assert_eq!(extractor.quantize(255), 255);
    }

    #[test]
    fn test_uniform_image() {
        let buffer = PixelBuffer::filled(40, 30, [123, 45, 200, 255]);
        let palette = ColorExtractor::new().extract(&buffer);
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.get(0), Some(Rgb::new(120, 40, 200)));
        assert_eq!(palette.frequencies()[0].count, 120);
    }

    #[test]
    fn test_transparent_image_is_empty() {
        let buffer = PixelBuffer::filled(16, 16, [200, 10, 10, 0]);
        assert!(ColorExtractor::new().extract(&buffer).is_empty());
    }

    #[test]
    fn test_alpha_threshold() {
        // Only index 0 is sampled with the default stride
        let below = buffer_from_pixels(&[[200, 0, 0, 127]]);
        let at = buffer_from_pixels(&[[200, 0, 0, 128]]);
        let extractor = ColorExtractor::new();
        assert!(extractor.extract(&below).is_empty());
        assert_eq!(extractor.extract(&at).len(), 1);
    }

    #[test]
    fn test_small_image_samples_first_pixel() {
        let buffer = buffer_from_pixels(&[[0, 0, 255, 255], [255, 0, 0, 255], [255, 0, 0, 255]]);
        let palette = ColorExtractor::new().extract(&buffer);
        assert_eq!(palette.colors(), vec![Rgb::new(0, 0, 255)]);
    }

    #[test]
    fn test_stride_skips_pixels() {
        let mut pixels = vec![[0, 0, 0, 255]; 25];
        pixels[10] = [255, 255, 255, 255];
        pixels[5] = [100, 100, 100, 255]; // not sampled
        let palette = ColorExtractor::new().extract(&buffer_from_pixels(&pixels));
        assert_eq!(palette.len(), 2);
        assert!(!palette.colors().contains(&Rgb::new(100, 100, 100)));
    }

    #[test]
    fn test_ranking_by_frequency_with_stable_ties() {
        let config = ExtractionConfig {
            sample_stride: 1,
            ..ExtractionConfig::default()
        };
        let extractor = ColorExtractor::with_config(config).unwrap();
        let buffer = buffer_from_pixels(&[
            [0, 0, 200, 255],
            [200, 0, 0, 255],
            [0, 200, 0, 255],
            [0, 200, 0, 255],
            [200, 0, 0, 255],
            [0, 0, 200, 255],
            [0, 200, 0, 255],
        ]);
        let palette = extractor.extract(&buffer);
        // green 3, then blue and red tie at 2 with blue seen first
        assert_eq!(
            palette.colors(),
            vec![Rgb::new(0, 200, 0), Rgb::new(0, 0, 200), Rgb::new(200, 0, 0)]
        );
    }

    #[test]
    fn test_palette_capped() {
        let config = ExtractionConfig {
            sample_stride: 1,
            ..ExtractionConfig::default()
        };
        let extractor = ColorExtractor::with_config(config).unwrap();

        let mut pixels = Vec::new();
        for r in 0..6u8 {
            for g in 0..6u8 {
                pixels.push([r * 40, g * 40, 0, 255]);
            }
        }
        let buffer = buffer_from_pixels(&pixels);
        assert_eq!(extractor.extract_frequencies(&buffer).len(), 36);
        assert_eq!(extractor.extract(&buffer).len(), 20);
    }

    #[test]
    fn test_extract_from_raw_rejects_bad_shape() {
        let extractor = ColorExtractor::new();
        assert!(extractor.extract_from_raw(2, 2, &[0; 12]).is_err());
        assert!(extractor.extract_from_raw(0, 0, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_config() {
        let config = ExtractionConfig {
            bucket_width: 0,
            ..ExtractionConfig::default()
        };
        assert!(ColorExtractor::with_config(config).is_err());
    }
}

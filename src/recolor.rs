//! Tolerance-based recoloring
//!
//! Every visible pixel whose RGB distance to the reference color is within
//! `tolerance * tolerance_scale` is overwritten with one fixed target color.
//! Alpha is never modified and pixels below the alpha threshold are left
//! byte-for-byte unchanged.
//!
//! Running the engine again on its own output with the same reference will
//! generally match fewer pixels, since matched pixels changed color. Recolor
//! the original buffer to get repeatable results.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::color::{HsvColor, Rgb};
use crate::config::RecolorConfig;
use crate::constants::CHANNELS;
use crate::{RecolorError, Result};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Pixels per work unit when the `parallel` feature is enabled
#[cfg(feature = "parallel")]
const PARALLEL_CHUNK_PIXELS: usize = 16 * 1024;

/// Per-invocation recolor parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecolorParams {
    reference: Rgb,
    target: HsvColor,
    tolerance: f64,
}

impl RecolorParams {
    /// Validate and bundle recolor parameters
    ///
    /// # Errors
    ///
    /// Returns `RecolorError::InvalidParameter` if the tolerance is negative
    /// or not finite, or the target lies outside the HSV domain.
    pub fn new(reference: Rgb, target: HsvColor, tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(RecolorError::invalid_parameter("tolerance", tolerance));
        }
        let target = HsvColor::new(target.h, target.s, target.v)?;
        Ok(Self {
            reference,
            target,
            tolerance,
        })
    }

    pub fn reference(&self) -> Rgb {
        self.reference
    }

    pub fn target(&self) -> HsvColor {
        self.target
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

/// Counts gathered during one recolor pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecolorStats {
    pub total_pixels: usize,
    /// Pixels skipped because of the alpha threshold
    pub skipped_transparent: usize,
    /// Pixels overwritten with the target color
    pub matched: usize,
}

impl RecolorStats {
    /// Combine counts from two passes over disjoint pixel ranges
    pub fn merge(self, other: Self) -> Self {
        Self {
            total_pixels: self.total_pixels + other.total_pixels,
            skipped_transparent: self.skipped_transparent + other.skipped_transparent,
            matched: self.matched + other.matched,
        }
    }
}

/// Recolor engine
#[derive(Debug, Clone, Default)]
pub struct RecolorEngine {
    config: RecolorConfig,
}

impl RecolorEngine {
    /// Create an engine with the reference alpha threshold and scale
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom parameters
    pub fn with_config(config: RecolorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RecolorConfig {
        &self.config
    }

    /// RGB distance radius for a user tolerance
    pub fn match_radius(&self, tolerance: f64) -> f64 {
        tolerance * self.config.tolerance_scale
    }

    /// Recolor a buffer in place
    pub fn apply_in_place(&self, buffer: &mut PixelBuffer, params: &RecolorParams) -> RecolorStats {
        self.run(buffer.as_bytes_mut(), params)
    }

    /// Recolor a copy of `buffer`, leaving the input untouched
    pub fn apply(&self, buffer: &PixelBuffer, params: &RecolorParams) -> (PixelBuffer, RecolorStats) {
        let mut output = buffer.clone();
        let stats = self.apply_in_place(&mut output, params);
        (output, stats)
    }

    /// Recolor raw RGBA bytes in place
    ///
    /// # Errors
    ///
    /// Returns `RecolorError::InvalidBuffer` if the length is not a multiple
    /// of 4.
    pub fn apply_to_slice(&self, data: &mut [u8], params: &RecolorParams) -> Result<RecolorStats> {
        if data.len() % CHANNELS != 0 {
            return Err(RecolorError::invalid_buffer(format!(
                "length {} is not a multiple of {}",
                data.len(),
                CHANNELS
            )));
        }
        Ok(self.run(data, params))
    }

    fn run(&self, data: &mut [u8], params: &RecolorParams) -> RecolorStats {
        let replacement = params.target.to_rgb();
        let radius = self.match_radius(params.tolerance);

        let stats = self.scan(data, params.reference, replacement, radius);

        debug!(
            "Recolored {} of {} pixels ({} transparent) from {} to {} within {:.1}",
            stats.matched,
            stats.total_pixels,
            stats.skipped_transparent,
            params.reference,
            replacement,
            radius
        );
        stats
    }

    #[cfg(not(feature = "parallel"))]
    fn scan(&self, data: &mut [u8], reference: Rgb, replacement: Rgb, radius: f64) -> RecolorStats {
        recolor_pixels(data, self.config.min_alpha, reference, replacement, radius)
    }

    #[cfg(feature = "parallel")]
    fn scan(&self, data: &mut [u8], reference: Rgb, replacement: Rgb, radius: f64) -> RecolorStats {
        let min_alpha = self.config.min_alpha;
        data.par_chunks_mut(PARALLEL_CHUNK_PIXELS * CHANNELS)
            .map(|chunk| recolor_pixels(chunk, min_alpha, reference, replacement, radius))
            .reduce(RecolorStats::default, RecolorStats::merge)
    }
}

/// Sequential pass over a whole number of RGBA pixels
fn recolor_pixels(
    data: &mut [u8],
    min_alpha: u8,
    reference: Rgb,
    replacement: Rgb,
    radius: f64,
) -> RecolorStats {
    let mut stats = RecolorStats::default();

    for px in data.chunks_exact_mut(CHANNELS) {
        stats.total_pixels += 1;
        if px[3] < min_alpha {
            stats.skipped_transparent += 1;
            continue;
        }

        let color = Rgb::new(px[0], px[1], px[2]);
        if color.distance(reference) <= radius {
            px[0] = replacement.r;
            px[1] = replacement.g;
            px[2] = replacement.b;
            stats.matched += 1;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUE: HsvColor = HsvColor { h: 240.0, s: 100.0, v: 100.0 };

    fn params(reference: Rgb, tolerance: f64) -> RecolorParams {
        RecolorParams::new(reference, BLUE, tolerance).unwrap()
    }

    #[test]
    fn test_red_to_blue_scenario() {
        let mut buffer = PixelBuffer::from_raw(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 255]).unwrap();
        let stats = RecolorEngine::new().apply_in_place(&mut buffer, &params(Rgb::new(255, 0, 0), 10.0));

        assert_eq!(buffer.as_bytes(), &[0, 0, 255, 255, 0, 255, 0, 255]);
        assert_eq!(stats, RecolorStats { total_pixels: 2, skipped_transparent: 0, matched: 1 });
    }

    #[test]
    fn test_zero_tolerance_exact_match_only() {
        let mut buffer = PixelBuffer::from_raw(
            3,
            1,
            vec![100, 100, 100, 255, 101, 100, 100, 255, 100, 100, 100, 255],
        )
        .unwrap();
        let stats = RecolorEngine::new().apply_in_place(&mut buffer, &params(Rgb::new(100, 100, 100), 0.0));

        assert_eq!(stats.matched, 2);
        assert_eq!(buffer.pixel(1), Some([101, 100, 100, 255]));
        assert_eq!(buffer.pixel(0), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_radius_boundary_is_inclusive() {
        // distance 25 == 10 * 2.5
        let mut buffer = PixelBuffer::from_raw(2, 1, vec![25, 0, 0, 255, 26, 0, 0, 255]).unwrap();
        let stats = RecolorEngine::new().apply_in_place(&mut buffer, &params(Rgb::new(0, 0, 0), 10.0));
        assert_eq!(stats.matched, 1);
        assert_eq!(buffer.pixel(1), Some([26, 0, 0, 255]));
    }

    #[test]
    fn test_alpha_preserved_and_transparent_skipped() {
        let mut buffer = PixelBuffer::from_raw(
            3,
            1,
            vec![255, 0, 0, 9, 255, 0, 0, 10, 255, 0, 0, 77],
        )
        .unwrap();
        let stats = RecolorEngine::new().apply_in_place(&mut buffer, &params(Rgb::new(255, 0, 0), 5.0));

        assert_eq!(buffer.pixel(0), Some([255, 0, 0, 9]));
        assert_eq!(buffer.pixel(1), Some([0, 0, 255, 10]));
        assert_eq!(buffer.pixel(2), Some([0, 0, 255, 77]));
        assert_eq!(stats.skipped_transparent, 1);
    }

    #[test]
    fn test_apply_leaves_input_untouched() {
        let original = PixelBuffer::filled(4, 4, [10, 20, 30, 255]);
        let (output, stats) = RecolorEngine::new().apply(&original, &params(Rgb::new(10, 20, 30), 1.0));
        assert_eq!(stats.matched, 16);
        assert!(original.pixels().all(|p| p == [10, 20, 30, 255]));
        assert!(output.pixels().all(|p| p == [0, 0, 255, 255]));
    }

    #[test]
    fn test_not_idempotent_on_own_output() {
        let engine = RecolorEngine::new();
        let p = RecolorParams::new(Rgb::new(200, 0, 0), HsvColor { h: 120.0, s: 100.0, v: 100.0 }, 4.0).unwrap();
        let mut buffer = PixelBuffer::filled(2, 2, [200, 0, 0, 255]);

        assert_eq!(engine.apply_in_place(&mut buffer, &p).matched, 4);
        assert_eq!(engine.apply_in_place(&mut buffer, &p).matched, 0);
    }

    #[test]
    fn test_full_tolerance_matches_everything() {
        let mut buffer = PixelBuffer::from_raw(2, 1, vec![0, 0, 0, 255, 255, 255, 255, 255]).unwrap();
        let stats = RecolorEngine::new().apply_in_place(&mut buffer, &params(Rgb::new(0, 0, 0), 180.0));
        assert_eq!(stats.matched, 2);
    }

    #[test]
    fn test_custom_scale() {
        let engine = RecolorEngine::with_config(RecolorConfig { min_alpha: 0, tolerance_scale: 1.0 }).unwrap();
        assert_eq!(engine.match_radius(10.0), 10.0);

        let mut buffer = PixelBuffer::from_raw(1, 1, vec![20, 0, 0, 0]).unwrap();
        let stats = engine.apply_in_place(&mut buffer, &params(Rgb::new(0, 0, 0), 10.0));
        assert_eq!(stats.matched, 0);
        assert_eq!(stats.skipped_transparent, 0);
    }

    #[test]
    fn test_slice_shape_checked() {
        let engine = RecolorEngine::new();
        let mut data = vec![0u8; 7];
        assert!(engine.apply_to_slice(&mut data, &params(Rgb::new(0, 0, 0), 1.0)).is_err());
    }

    #[test]
    fn test_params_validation() {
        let red = Rgb::new(255, 0, 0);
        assert!(RecolorParams::new(red, BLUE, -0.5).is_err());
        assert!(RecolorParams::new(red, BLUE, f64::NAN).is_err());
        assert!(RecolorParams::new(red, HsvColor { h: 400.0, s: 50.0, v: 50.0 }, 10.0).is_err());
        assert!(RecolorParams::new(red, BLUE, 0.0).is_ok());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let width = 300u32;
        let height = 200u32;
        let data: Vec<u8> = (0..width * height)
            .flat_map(|i| {
                let v = (i % 251) as u8;
                [v, v.wrapping_mul(3), v.wrapping_add(40), (i % 17 * 15) as u8]
            })
            .collect();
        let buffer = PixelBuffer::from_raw(width, height, data).unwrap();
        let p = params(Rgb::new(120, 104, 160), 40.0);

        let (parallel, parallel_stats) = RecolorEngine::new().apply(&buffer, &p);

        let mut sequential = buffer.clone();
        let sequential_stats = recolor_pixels(
            sequential.as_bytes_mut(),
            10,
            p.reference(),
            p.target().to_rgb(),
            100.0,
        );

        assert_eq!(parallel, sequential);
        assert_eq!(parallel_stats, sequential_stats);
    }
}

//! # Swap Colors
//!
//! A Rust crate for finding the dominant colors of an image and replacing one
//! of them with a new hue, saturation and value.
//!
//! This library provides:
//! - RGB/HSV conversion with one-unit round-trip accuracy
//! - Ranked palette extraction from sampled, quantized pixels
//! - Tolerance-based recoloring of every pixel close to a reference color
//! - A caller-owned session tying the steps together
//!
//! ## Example
//!
//! ```rust
//! use swap_colors::{apply_recolor, extract_colors, HsvColor};
//!
//! // 2x1 image: one red pixel, one green pixel
//! let mut pixels = vec![255, 0, 0, 255, 0, 255, 0, 255];
//!
//! let palette = extract_colors(&pixels, 2, 1)?;
//! let blue = HsvColor::new(240.0, 100.0, 100.0)?;
//! apply_recolor(&mut pixels, palette.first().copied(), blue, 10.0)?;
//!
//! assert_eq!(&pixels[..4], &[0, 0, 255, 255]);
//! # Ok::<(), swap_colors::RecolorError>(())
//! ```

pub mod error;
pub mod constants;
pub mod config;
pub mod buffer;
pub mod color;
pub mod recolor;
pub mod session;
pub mod image_loader;

pub use buffer::PixelBuffer;
pub use color::{
    hsv_to_rgb, rgb_to_hsv, ColorExtractor, ColorFrequency, HsvColor, RankedPalette, Rgb,
};
pub use config::{EngineConfig, ExtractionConfig, RecolorConfig};
pub use error::{RecolorError, Result};
pub use recolor::{RecolorEngine, RecolorParams, RecolorStats};
pub use session::RecolorSession;

/// Extract up to 20 dominant colors from a raw RGBA buffer
///
/// Uses the reference sampling stride, bucket width and alpha threshold. The
/// result is ordered by descending frequency and is empty for fully
/// transparent or zero-area images.
///
/// # Errors
///
/// Returns `RecolorError::InvalidBuffer` if `pixels` is not exactly
/// `width * height * 4` bytes long.
pub fn extract_colors(pixels: &[u8], width: u32, height: u32) -> Result<Vec<Rgb>> {
    let palette = ColorExtractor::new().extract_from_raw(width, height, pixels)?;
    Ok(palette.colors())
}

/// Recolor a raw RGBA buffer in place
///
/// Every pixel with alpha of at least 10 whose RGB distance to `reference`
/// is at most `tolerance * 2.5` becomes the RGB equivalent of `target`.
///
/// # Errors
///
/// Returns `RecolorError::NoColorSelected` if `reference` is `None`,
/// `RecolorError::InvalidParameter` for a negative tolerance or out-of-range
/// target, and `RecolorError::InvalidBuffer` if the length is not a multiple
/// of 4.
pub fn apply_recolor(
    pixels: &mut [u8],
    reference: Option<Rgb>,
    target: HsvColor,
    tolerance: f64,
) -> Result<RecolorStats> {
    let reference = reference.ok_or(RecolorError::NoColorSelected)?;
    let params = RecolorParams::new(reference, target, tolerance)?;
    RecolorEngine::new().apply_to_slice(pixels, &params)
}

//! Color types, conversion and analysis
//!
//! This module handles RGB/HSV conversion and extraction of the dominant
//! colors of an image.

pub mod conversion;
pub mod analysis;

pub use conversion::{hsv_to_rgb, rgb_to_hsv, HsvColor, Rgb};
pub use analysis::{ColorExtractor, ColorFrequency, RankedPalette};

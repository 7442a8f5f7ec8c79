//! Behavioural constants for color extraction and recoloring
//!
//! These values are the defaults of [`crate::config::EngineConfig`]. Changing
//! them changes which buckets are reported and which pixels are matched, so
//! they are kept at their reference values.

/// Color extraction parameters
pub mod extraction {
    /// Only every Nth pixel (in linear order) is sampled
    pub const SAMPLE_STRIDE: usize = 10;

    /// Width of a quantization bucket per channel
    pub const BUCKET_WIDTH: u8 = 20;

    /// Maximum number of colors in a ranked palette
    pub const PALETTE_SIZE: usize = 20;

    /// Sampled pixels with alpha below this are ignored
    pub const MIN_ALPHA: u8 = 128;
}

/// Recolor parameters
pub mod recolor {
    /// Pixels with alpha below this are never modified
    pub const MIN_ALPHA: u8 = 10;

    /// Multiplier turning the user tolerance into an RGB distance radius
    pub const TOLERANCE_SCALE: f64 = 2.5;

    /// Tolerance used when a session has not been given one
    pub const DEFAULT_TOLERANCE: f64 = 30.0;
}

/// Domain bounds for user-facing parameters
pub mod bounds {
    /// Hue is an angle in degrees; 360 is accepted and wraps to 0
    pub const HUE_MAX: f64 = 360.0;

    /// Saturation and value are percentages
    pub const PERCENT_MAX: f64 = 100.0;
}

/// Number of bytes per RGBA pixel
pub const CHANNELS: usize = 4;

/// File name used when exporting a recolored image
pub const DEFAULT_EXPORT_NAME: &str = "recolored-image.png";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_values() {
        assert_eq!(extraction::SAMPLE_STRIDE, 10);
        assert_eq!(extraction::BUCKET_WIDTH, 20);
        assert_eq!(extraction::PALETTE_SIZE, 20);
        assert!((recolor::TOLERANCE_SCALE - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_alpha_thresholds() {
        // Recolor uses a looser visibility check than extraction
        assert!(recolor::MIN_ALPHA < extraction::MIN_ALPHA);
    }
}

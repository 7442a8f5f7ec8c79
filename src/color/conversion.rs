//! RGB and HSV color types and conversions
//!
//! Provides the conversion pair shared by the extractor and recolor engine:
//! - Byte RGB to HSV (hue in degrees, saturation and value in percent)
//! - HSV back to byte RGB, one 60° sector at a time
//! - Hex representation and interop with `palette` sRGB types
//!
//! `hsv_to_rgb(rgb_to_hsv(c))` reproduces any byte color within one unit per
//! channel.

use palette::Srgb;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::bounds::{HUE_MAX, PERCENT_MAX};
use crate::{RecolorError, Result};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSV color: hue in degrees [0, 360), saturation and value in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HsvColor {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to HSV
    pub fn to_hsv(self) -> HsvColor {
        rgb_to_hsv(self.r, self.g, self.b)
    }

    /// Hexadecimal color string (e.g., "#FF0000")
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Parse a hexadecimal color string, with or without the leading `#`
    ///
    /// # Errors
    ///
    /// Returns `RecolorError::ColorConversionError` if the string is not a
    /// valid hex color.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let srgb: Srgb<u8> = hex.trim().parse().map_err(|e| RecolorError::ColorConversionError {
            message: format!("Invalid hex color {:?}: {}", hex, e),
        })?;
        Ok(srgb.into())
    }

    /// Euclidean distance in RGB space
    pub fn distance(self, other: Rgb) -> f64 {
        let dr = self.r as f64 - other.r as f64;
        let dg = self.g as f64 - other.g as f64;
        let db = self.b as f64 - other.b as f64;
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RGB({}, {}, {})", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

impl From<Srgb<u8>> for Rgb {
    fn from(c: Srgb<u8>) -> Self {
        Self::new(c.red, c.green, c.blue)
    }
}

impl From<Rgb> for Srgb<u8> {
    fn from(c: Rgb) -> Self {
        Srgb::new(c.r, c.g, c.b)
    }
}

impl HsvColor {
    /// Create an HSV color, rejecting values outside the domain
    ///
    /// Hue may be exactly 360 (equivalent to 0), matching the range of the
    /// hue control.
    pub fn new(h: f64, s: f64, v: f64) -> Result<Self> {
        if !h.is_finite() || !(0.0..=HUE_MAX).contains(&h) {
            return Err(RecolorError::invalid_parameter("hue", h));
        }
        if !s.is_finite() || !(0.0..=PERCENT_MAX).contains(&s) {
            return Err(RecolorError::invalid_parameter("saturation", s));
        }
        if !v.is_finite() || !(0.0..=PERCENT_MAX).contains(&v) {
            return Err(RecolorError::invalid_parameter("value", v));
        }
        Ok(Self { h, s, v })
    }

    /// Bring arbitrary values into the domain: hue wraps, s/v clamp
    pub fn clamped(h: f64, s: f64, v: f64) -> Self {
        Self {
            h: wrap_hue(h),
            s: clamp_percent(s),
            v: clamp_percent(v),
        }
    }

    /// Integer-rounded components, as shown on the target controls
    pub fn rounded(self) -> Self {
        Self {
            h: self.h.round(),
            s: self.s.round(),
            v: self.v.round(),
        }
    }

    /// Convert to byte RGB
    pub fn to_rgb(self) -> Rgb {
        hsv_to_rgb(self.h, self.s, self.v)
    }
}

impl fmt::Display for HsvColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HSV({:.1}°, {:.1}%, {:.1}%)", self.h, self.s, self.v)
    }
}

/// Convert byte RGB to HSV
///
/// Grayscale inputs (max == min) get hue 0 and saturation 0.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> HsvColor {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = max - min;

    let s = if max == 0.0 { 0.0 } else { diff / max * 100.0 };
    let v = max * 100.0;

    let mut h = if diff == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / diff) % 6.0)
    } else if max == g {
        60.0 * ((b - r) / diff + 2.0)
    } else {
        60.0 * ((r - g) / diff + 4.0)
    };

    if h < 0.0 {
        h += HUE_MAX;
    }
    if h >= HUE_MAX {
        h -= HUE_MAX;
    }

    HsvColor { h, s, v }
}

/// Convert HSV to byte RGB
///
/// Out-of-range input is brought into the domain first: hue wraps modulo
/// 360, saturation and value clamp to [0, 100], non-finite values become 0.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let h = wrap_hue(h);
    let s = clamp_percent(s) / 100.0;
    let v = clamp_percent(v) / 100.0;

    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    Rgb::new(to_byte(r + m), to_byte(g + m), to_byte(b + m))
}

fn to_byte(unit: f64) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

fn wrap_hue(h: f64) -> f64 {
    if !h.is_finite() {
        return 0.0;
    }
    let wrapped = h.rem_euclid(HUE_MAX);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= HUE_MAX {
        0.0
    } else {
        wrapped
    }
}

fn clamp_percent(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, PERCENT_MAX)
    }
}

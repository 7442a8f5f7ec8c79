//! Recolor session state
//!
//! Holds everything an interactive front end needs between user actions:
//! the original image, its palette, the chosen reference color and the
//! target controls. The session is owned by the caller; nothing here is
//! global.
//!
//! Recoloring always starts from the original image, so changing the target
//! or tolerance and applying again never compounds earlier edits.

use log::info;

use crate::buffer::PixelBuffer;
use crate::color::{ColorExtractor, HsvColor, RankedPalette, Rgb};
use crate::config::EngineConfig;
use crate::constants::recolor::DEFAULT_TOLERANCE;
use crate::recolor::{RecolorEngine, RecolorParams, RecolorStats};
use crate::{RecolorError, Result};

/// Caller-owned state for one image editing session
#[derive(Debug, Clone)]
pub struct RecolorSession {
    extractor: ColorExtractor,
    engine: RecolorEngine,
    original: Option<PixelBuffer>,
    palette: RankedPalette,
    selected: Option<Rgb>,
    target: HsvColor,
    tolerance: f64,
    result: Option<PixelBuffer>,
}

impl Default for RecolorSession {
    fn default() -> Self {
        Self::from_parts(ColorExtractor::new(), RecolorEngine::new())
    }
}

impl RecolorSession {
    /// Create a session with a custom configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        Ok(Self::from_parts(
            ColorExtractor::with_config(config.extraction)?,
            RecolorEngine::with_config(config.recolor)?,
        ))
    }

    fn from_parts(extractor: ColorExtractor, engine: RecolorEngine) -> Self {
        Self {
            extractor,
            engine,
            original: None,
            palette: RankedPalette::default(),
            selected: None,
            target: HsvColor::default(),
            tolerance: DEFAULT_TOLERANCE,
            result: None,
        }
    }

    /// Load a new image, replacing any previous one, and extract its palette
    ///
    /// Selection and previous results are discarded; target and tolerance
    /// keep their current values.
    pub fn load(&mut self, image: PixelBuffer) -> &RankedPalette {
        self.palette = self.extractor.extract(&image);
        info!(
            "Loaded {}x{} image with {} palette colors",
            image.width(),
            image.height(),
            self.palette.len()
        );
        self.original = Some(image);
        self.selected = None;
        self.result = None;
        &self.palette
    }

    pub fn palette(&self) -> &RankedPalette {
        &self.palette
    }

    pub fn original(&self) -> Option<&PixelBuffer> {
        self.original.as_ref()
    }

    /// The most recent recolor output
    pub fn result(&self) -> Option<&PixelBuffer> {
        self.result.as_ref()
    }

    pub fn selected(&self) -> Option<Rgb> {
        self.selected
    }

    pub fn target(&self) -> HsvColor {
        self.target
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Select a palette entry as the reference color
    ///
    /// The target is reset to the rounded HSV of the selected color, so an
    /// immediate apply leaves the image visually unchanged.
    pub fn select(&mut self, index: usize) -> Result<Rgb> {
        let color = self
            .palette
            .get(index)
            .ok_or(RecolorError::ColorIndexOutOfRange {
                index,
                len: self.palette.len(),
            })?;
        self.select_color(color);
        Ok(color)
    }

    /// Use an arbitrary color as the reference
    pub fn select_color(&mut self, color: Rgb) {
        self.selected = Some(color);
        self.target = color.to_hsv().rounded();
        info!("Selected {} ({}), target {}", color, color.to_hex(), self.target);
    }

    /// Set the replacement color
    pub fn set_target(&mut self, target: HsvColor) -> Result<()> {
        self.target = HsvColor::new(target.h, target.s, target.v)?;
        Ok(())
    }

    /// Set the match tolerance
    pub fn set_tolerance(&mut self, tolerance: f64) -> Result<()> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(RecolorError::invalid_parameter("tolerance", tolerance));
        }
        self.tolerance = tolerance;
        Ok(())
    }

    /// Recolor a copy of the original image with the current settings
    ///
    /// # Errors
    ///
    /// Returns `RecolorError::NoImageLoaded` or `RecolorError::NoColorSelected`
    /// if the corresponding step has not happened yet.
    pub fn apply(&mut self) -> Result<(&PixelBuffer, RecolorStats)> {
        let original = self.original.as_ref().ok_or(RecolorError::NoImageLoaded)?;
        let reference = self.selected.ok_or(RecolorError::NoColorSelected)?;
        let params = RecolorParams::new(reference, self.target, self.tolerance)?;

        let (output, stats) = self.engine.apply(original, &params);
        info!(
            "Recolored {} pixels to {} (tolerance {})",
            stats.matched, self.target, self.tolerance
        );
        let output = self.result.insert(output);
        Ok((output, stats))
    }

    /// Forget the image, palette, selection and result
    ///
    /// Target and tolerance are left as they are; the next `select` reseeds
    /// the target anyway.
    pub fn reset(&mut self) {
        self.original = None;
        self.palette = RankedPalette::default();
        self.selected = None;
        self.result = None;
        info!("Session reset");
    }
}

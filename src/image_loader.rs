//! Image decoding and PNG export
//!
//! This module is the file boundary around the core: it decodes image files
//! into [`PixelBuffer`]s and writes recolored buffers back out as PNG. The
//! extractor and recolor engine never touch the filesystem themselves.
//!
//! ## Supported Formats
//!
//! Decoding via the `image` crate:
//! - JPEG, PNG, GIF (first frame), WebP, TIFF, BMP, ICO, TGA, PNM, QOI
//!
//! Export is always PNG so recolored pixels and alpha survive unchanged.

use image::{ExtendedColorType, ImageEncoder};
use log::debug;
use std::path::Path;

use crate::buffer::PixelBuffer;
use crate::{RecolorError, Result};

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG image
    Jpeg,
    /// PNG image
    Png,
    /// GIF image (first frame only)
    Gif,
    /// WebP image
    WebP,
    /// TIFF image
    Tiff,
    /// BMP image
    Bmp,
    /// ICO image
    Ico,
    /// TGA image
    Tga,
    /// PNM image (PBM, PGM, PPM)
    Pnm,
    /// QOI image
    Qoi,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            "tiff" | "tif" => Some(ImageFormat::Tiff),
            "bmp" => Some(ImageFormat::Bmp),
            "ico" => Some(ImageFormat::Ico),
            "tga" => Some(ImageFormat::Tga),
            "pbm" | "pgm" | "ppm" | "pnm" => Some(ImageFormat::Pnm),
            "qoi" => Some(ImageFormat::Qoi),
            _ => None,
        }
    }

    fn to_image_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::WebP => image::ImageFormat::WebP,
            ImageFormat::Tiff => image::ImageFormat::Tiff,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
            ImageFormat::Ico => image::ImageFormat::Ico,
            ImageFormat::Tga => image::ImageFormat::Tga,
            ImageFormat::Pnm => image::ImageFormat::Pnm,
            ImageFormat::Qoi => image::ImageFormat::Qoi,
        }
    }
}

/// Load an image from disk as an RGBA buffer
///
/// # Errors
///
/// Returns `RecolorError::ImageLoadError` if:
/// - The extension is not a supported format
/// - File cannot be opened
/// - Decoding fails
///
/// # Example
///
/// ```rust,no_run
/// use swap_colors::image_loader::load_image;
/// use std::path::Path;
///
/// let buffer = load_image(Path::new("photo.png"))?;
/// println!("Loaded image: {}x{}", buffer.width(), buffer.height());
/// # Ok::<(), swap_colors::RecolorError>(())
/// ```
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    let format = ImageFormat::from_extension(path).ok_or_else(|| RecolorError::ImageLoadError {
        message: format!("Unknown image format for file: {}", path.display()),
        source: None,
    })?;

    let mut reader = image::ImageReader::open(path).map_err(|e| {
        RecolorError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })?;
    reader.set_format(format.to_image_format());

    let img = reader.decode().map_err(|e| {
        RecolorError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })?;

    let buffer = PixelBuffer::from(img.to_rgba8());
    debug!(
        "Decoded {} as {:?} ({}x{})",
        path.display(),
        format,
        buffer.width(),
        buffer.height()
    );
    Ok(buffer)
}

/// Decode an in-memory image, guessing the format from its contents
pub fn load_image_from_memory(bytes: &[u8]) -> Result<PixelBuffer> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| RecolorError::image_load("Failed to decode image data", e))?;
    Ok(PixelBuffer::from(img.to_rgba8()))
}

/// Encode a buffer as PNG bytes
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(
            buffer.as_bytes(),
            buffer.width(),
            buffer.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| RecolorError::image_save("Failed to encode PNG", e))?;
    Ok(out)
}

/// Write a buffer to disk as PNG
pub fn save_png(buffer: &PixelBuffer, path: &Path) -> Result<()> {
    image::save_buffer_with_format(
        path,
        buffer.as_bytes(),
        buffer.width(),
        buffer.height(),
        ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| RecolorError::image_save(format!("Failed to write {}", path.display()), e))?;
    debug!("Saved {}x{} PNG to {}", buffer.width(), buffer.height(), path.display());
    Ok(())
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &[
        "jpg", "jpeg", "png", "gif", "webp", "tiff", "tif", "bmp", "ico", "tga", "pbm", "pgm",
        "ppm", "pnm", "qoi",
    ]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}

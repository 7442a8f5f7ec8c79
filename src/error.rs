//! Error types for the swap_colors library

use thiserror::Error;

/// Result type alias for swap_colors operations
pub type Result<T> = std::result::Result<T, RecolorError>;

/// Error types for color extraction and recoloring operations
#[derive(Error, Debug)]
pub enum RecolorError {
    /// Pixel buffer shape does not match its declared dimensions
    #[error("Invalid pixel buffer: {reason}")]
    InvalidBuffer { reason: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Recolor requested before a reference color was chosen
    #[error("No reference color selected")]
    NoColorSelected,

    /// Session operation requested before an image was loaded
    #[error("No image loaded")]
    NoImageLoaded,

    /// Palette selection outside the extracted palette
    #[error("Palette index {index} out of range (palette has {len} colors)")]
    ColorIndexOutOfRange { index: usize, len: usize },

    /// Hex or other textual color representation could not be parsed
    #[error("Color conversion error: {message}")]
    ColorConversionError { message: String },

    /// Image file could not be loaded or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Image could not be encoded or written
    #[error("Failed to save image: {message}")]
    ImageSaveError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl RecolorError {
    /// Create an invalid buffer error
    pub fn invalid_buffer(reason: impl Into<String>) -> Self {
        Self::InvalidBuffer {
            reason: reason.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an image save error with context
    pub fn image_save<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageSaveError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Check if this error indicates a condition the caller can fix and retry
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RecolorError::NoColorSelected
                | RecolorError::NoImageLoaded
                | RecolorError::ColorIndexOutOfRange { .. }
                | RecolorError::InvalidParameter { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            RecolorError::ImageLoadError { .. } => {
                "Could not load the image. Please check the file format and try again.".to_string()
            }
            RecolorError::ImageSaveError { .. } => {
                "Could not save the recolored image.".to_string()
            }
            RecolorError::NoImageLoaded => "Please load an image first.".to_string(),
            RecolorError::NoColorSelected => {
                "Please pick a color from the palette before recoloring.".to_string()
            }
            RecolorError::ColorIndexOutOfRange { index, len } => format!(
                "Color #{} does not exist; the palette has {} colors.",
                index, len
            ),
            RecolorError::InvalidParameter { parameter, value } => {
                format!("Value {} is not valid for {}.", value, parameter)
            }
            _ => "Recoloring failed. Please try with a different image.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RecolorError::invalid_parameter("tolerance", -1.0);
        assert_eq!(err.to_string(), "Invalid parameter: tolerance = -1");

        let err = RecolorError::ColorIndexOutOfRange { index: 25, len: 3 };
        assert!(err.to_string().contains("25"));
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(RecolorError::NoColorSelected.is_recoverable());
        assert!(RecolorError::NoImageLoaded.is_recoverable());
        assert!(!RecolorError::invalid_buffer("length 7").is_recoverable());
    }

    #[test]
    fn test_image_load_keeps_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = RecolorError::image_load("Failed to open photo.png", io);
        assert!(err.source().is_some());
        assert!(err.user_message().contains("Could not load"));
    }
}

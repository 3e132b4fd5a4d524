//! Error types for the colorfinder library

use thiserror::Error;

/// Result type alias for colorfinder operations
pub type Result<T> = std::result::Result<T, ColorError>;

/// Error types for conversion, matching and extraction
#[derive(Error, Debug)]
pub enum ColorError {
    /// A color value does not have exactly three components
    #[error("Invalid color dimension: expected {expected} components, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    /// Unrecognized color mode string
    #[error("Invalid color mode '{0}': expected one of 'rgb', 'xyz' or 'lab'")]
    InvalidMode(String),

    /// Unrecognized source color space string
    #[error("Invalid color space '{0}': expected 'srgb' or 'adobe'")]
    InvalidColorSpace(String),

    /// Parallel color arrays of different lengths
    #[error("Shape mismatch: {left} colors compared against {right}")]
    ShapeMismatch { left: usize, right: usize },

    /// Reference palette has no entries to match against
    #[error("Reference palette is empty")]
    EmptyPalette,

    /// Reference palette could not be read or is malformed
    #[error("Invalid reference palette: {message}")]
    PaletteError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Image file could not be loaded or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The segmentation collaborator failed
    #[error("Segmentation failed: {message}")]
    SegmentationError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Segmentation ran past the configured deadline
    #[error("Segmentation took {elapsed_ms}ms (limit: {limit_ms}ms)")]
    SegmentationTimeout { elapsed_ms: u64, limit_ms: u64 },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Configuration file could not be read or written
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ColorError {
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

    /// Create a palette error with context
    pub fn palette<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::PaletteError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a segmentation error with context
    pub fn segmentation<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::SegmentationError {
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

    /// Check if this error indicates a recoverable condition
    ///
    /// Malformed palettes and configuration are fatal; a timed out
    /// segmentation may succeed on a smaller image or with a longer deadline.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ColorError::SegmentationTimeout { .. })
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            ColorError::ImageLoadError { .. } => {
                "Could not load the image. Please check the file format and try again.".to_string()
            }
            ColorError::PaletteError { .. } | ColorError::EmptyPalette => {
                "The reference palette is missing or malformed.".to_string()
            }
            ColorError::InvalidColorSpace(space) => {
                format!("Unsupported color space '{space}'. Use 'srgb' or 'adobe'.")
            }
            ColorError::SegmentationTimeout { limit_ms, .. } => {
                format!(
                    "Segmentation exceeded {limit_ms}ms. Try a smaller image or raise the limit."
                )
            }
            _ => "Color extraction failed. Please try with a different image.".to_string(),
        }
    }
}

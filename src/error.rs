//! Error types for the recycle_scan library

use thiserror::Error;

use crate::classification::ContainerType;
use crate::region::Rectangle;

/// Result type alias for recycle_scan operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Error types for container analysis operations
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The selected region has zero area, or no pixels were left to profile
    #[error("Empty region: {region} leaves no pixels to analyze")]
    EmptyRegion { region: Rectangle },

    /// A label was produced but its confidence is below the configured floor
    #[error("Confidence too low: {label} at {confidence:.3} (minimum {minimum:.3})")]
    LowConfidence {
        label: ContainerType,
        confidence: f32,
        minimum: f32,
    },

    /// Pixel buffer does not describe a usable 3-channel raster
    #[error("Invalid raster: {reason}")]
    InvalidRaster { reason: String },

    /// Image file could not be loaded or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
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

    /// Invalid configuration parameter
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },
}

impl AnalysisError {
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

    pub(crate) fn invalid_parameter(parameter: &str, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
        }
    }

    /// Check if this error only means "no detection" for the given input
    ///
    /// Recoverable errors are returned to the caller as an empty result;
    /// everything else is an input or configuration fault.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::EmptyRegion { .. } | AnalysisError::LowConfidence { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::EmptyRegion { .. } => {
                "The selected area of the photo is empty. Please frame the container in the middle of the picture.".to_string()
            }
            AnalysisError::LowConfidence { confidence, .. } => {
                format!(
                    "The container could not be identified reliably ({:.0}% confidence). Please try again with better lighting.",
                    confidence * 100.0
                )
            }
            AnalysisError::InvalidRaster { .. } | AnalysisError::ImageLoadError { .. } => {
                "Could not read the image. Please check the file format and try again.".to_string()
            }
            _ => "Container analysis failed. Please try with a different image.".to_string(),
        }
    }
}

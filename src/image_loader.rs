//! Image decoding into rasters
//!
//! Converts uploaded photographs into the 8-bit RGB [`Raster`] the pipeline
//! works on. Alpha channels are dropped and grayscale images are expanded.
//!
//! ## Supported Formats
//!
//! - JPEG
//! - PNG
//! - WebP
//!
//! EXIF orientation is not applied; the ROI heuristic assumes the photo is
//! stored the way it was taken.

use crate::error::{AnalysisError, Result};
use crate::raster::Raster;
use image::{DynamicImage, ImageReader};
use std::path::Path;
use tracing::debug;

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG image
    Jpeg,
    /// PNG image
    Png,
    /// WebP image
    WebP,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from the leading bytes of an encoded image
    pub fn from_bytes(bytes: &[u8]) -> Option<ImageFormat> {
        match image::guess_format(bytes).ok()? {
            image::ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
            image::ImageFormat::Png => Some(ImageFormat::Png),
            image::ImageFormat::WebP => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    fn as_image_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::WebP => image::ImageFormat::WebP,
        }
    }
}

/// Load an image file into a raster
///
/// # Errors
///
/// Returns `AnalysisError::ImageLoadError` if:
/// - The extension is not a supported format
/// - File cannot be opened
/// - Decoding fails
///
/// # Example
///
/// ```rust,no_run
/// use recycle_scan::image_loader::load_raster;
/// use std::path::Path;
///
/// let raster = load_raster(Path::new("bottle.jpg"))?;
/// println!("Loaded image: {}x{}", raster.width(), raster.height());
/// # Ok::<(), recycle_scan::AnalysisError>(())
/// ```
pub fn load_raster(path: &Path) -> Result<Raster> {
    let format = ImageFormat::from_extension(path).ok_or_else(|| AnalysisError::ImageLoadError {
        message: format!("Unsupported image format for file: {}", path.display()),
        source: None,
    })?;

    let mut reader = ImageReader::open(path).map_err(|e| {
        AnalysisError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })?;
    reader.set_format(format.as_image_format());

    let raster = reader
        .decode()
        .map_err(|e| {
            AnalysisError::image_load(format!("Failed to decode image: {}", path.display()), e)
        })
        .and_then(into_raster)?;

    debug!(
        path = %path.display(),
        ?format,
        width = raster.width(),
        height = raster.height(),
        "Decoded image file"
    );

    Ok(raster)
}

/// Decode an in-memory encoded image (e.g. an upload body) into a raster
///
/// # Errors
///
/// Returns `AnalysisError::ImageLoadError` if the bytes are not a supported
/// format or fail to decode
pub fn decode_raster(bytes: &[u8]) -> Result<Raster> {
    let format = ImageFormat::from_bytes(bytes).ok_or_else(|| AnalysisError::ImageLoadError {
        message: "Unrecognized or unsupported image data".into(),
        source: None,
    })?;

    let raster = image::load_from_memory_with_format(bytes, format.as_image_format())
        .map_err(|e| AnalysisError::image_load("Failed to decode image data", e))
        .and_then(into_raster)?;

    debug!(
        ?format,
        bytes = bytes.len(),
        width = raster.width(),
        height = raster.height(),
        "Decoded image data"
    );

    Ok(raster)
}

fn into_raster(img: DynamicImage) -> Result<Raster> {
    Raster::from_rgb_image(img.to_rgb8())
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &["jpg", "jpeg", "png", "webp"]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}

//! # Recycle Scan
//!
//! A Rust crate for classifying the material of beverage containers from a
//! single photograph, using color statistics only.
//!
//! The pipeline:
//! - Selects a region of interest from percentage geometry or a detector box
//! - Suppresses brown/beige background pixels (tiles, wood, hands)
//! - Profiles the region: mean RGB/HSV, brightness, spread and dominant color
//! - Applies ordered threshold rules to pick a container type and confidence
//!
//! Results below the configured confidence floor are reported as "no
//! detection" rather than as a low-confidence guess.
//!
//! ## Example
//!
//! ```rust,no_run
//! use recycle_scan::{analyze_container, AnalysisConfig};
//! use std::path::Path;
//!
//! let detection = analyze_container(Path::new("bottle.jpg"), &AnalysisConfig::default())?;
//! println!("{} ({:.0}%)", detection.label, detection.confidence * 100.0);
//! # Ok::<(), recycle_scan::AnalysisError>(())
//! ```

use std::path::Path;

pub mod classification;
pub mod color;
pub mod config;
pub mod constants;
pub mod detection;
pub mod error;
pub mod image_loader;
pub mod overlay;
pub mod pipeline;
pub mod raster;
pub mod region;

pub use classification::{Classification, ContainerType, MatchedRule};
pub use color::ColorProfile;
pub use config::AnalysisConfig;
pub use detection::{DetectedObject, Detection, ObjectClass, ObjectDetector};
pub use error::{AnalysisError, Result};
pub use pipeline::{AnalysisReport, ContainerAnalyzer};
pub use raster::Raster;
pub use region::{Rectangle, RoiOverride};

/// Classify the container in an image file
///
/// Loads the image, analyzes the configured region of interest and applies
/// the confidence floor. For repeated analyses build a [`ContainerAnalyzer`]
/// once and reuse it.
///
/// # Errors
///
/// Returns `AnalysisError` if:
/// - The configuration is invalid
/// - The image cannot be loaded or decoded
/// - The region of interest is empty
/// - The classification falls below the confidence floor
pub fn analyze_container(image_path: &Path, config: &AnalysisConfig) -> Result<Detection> {
    let analyzer = ContainerAnalyzer::new(config.clone())?;
    let raster = image_loader::load_raster(image_path)?;
    analyzer.analyze(&raster, None).into_result()
}

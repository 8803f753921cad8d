//! Color analysis and conversion module
//!
//! This module handles color space conversions, background suppression,
//! dominant color clustering and the aggregate color profile of a region.

pub mod analysis;
pub mod background;
pub mod clustering;
pub mod conversion;

pub use analysis::{ColorProfile, ColorProfiler};
pub use background::{BackgroundSuppressor, ForegroundSelection};
pub use clustering::{Clustering, DominantColorExtractor};
pub use conversion::{ColorConverter, Hsv8, HsvColor, RgbColor};

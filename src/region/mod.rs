//! Region of interest selection
//!
//! This module resolves the rectangle of the photo that is analyzed, either
//! from percentage geometry (configured defaults or a per-call override) or
//! from a pixel bounding box supplied by an object detector.

pub mod rectangle;
pub mod selector;

pub use rectangle::Rectangle;
pub use selector::{RegionSelector, RoiGeometry, RoiOverride};

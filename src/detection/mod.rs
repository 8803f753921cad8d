//! Detection records and the object detector contract
//!
//! A [`Detection`] is what the pipeline hands to recycling-instruction
//! lookups: a container label, its confidence and the pixel box it came from.

pub mod object;

use serde::{Deserialize, Serialize};

use crate::classification::ContainerType;
use crate::region::Rectangle;

pub use object::{DetectedObject, ObjectClass, ObjectDetector};

/// Classified container
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: ContainerType,
    /// Confidence in [0, 1]
    pub confidence: f32,
    /// Region the label was derived from
    pub bounding_box: Rectangle,
}

//! Object detector contract
//!
//! An external model may locate containers before color analysis. Its
//! output is only ever used as a source of bounding boxes and, for
//! specific classes, of labels.

use serde::{Deserialize, Serialize};

use crate::classification::ContainerType;
use crate::raster::Raster;
use crate::region::Rectangle;
use crate::Result;

/// Class reported by an object detector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectClass {
    /// Generic container (e.g. "bottle"); material decided by color
    GenericContainer,
    /// Detector already knows the container type
    Container(ContainerType),
    /// Anything else the detector found
    Other(String),
}

/// One object located by a detector, in pixel coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub class: ObjectClass,
    pub confidence: f32,
    pub bounding_box: Rectangle,
}

impl DetectedObject {
    pub fn new(class: ObjectClass, confidence: f32, bounding_box: Rectangle) -> Self {
        Self {
            class,
            confidence,
            bounding_box,
        }
    }
}

/// External object detector
///
/// Implementations may return boxes partially outside the raster; the
/// pipeline clamps them before use.
pub trait ObjectDetector {
    fn detect(&self, raster: &Raster) -> Result<Vec<DetectedObject>>;
}

impl<F> ObjectDetector for F
where
    F: Fn(&Raster) -> Result<Vec<DetectedObject>>,
{
    fn detect(&self, raster: &Raster) -> Result<Vec<DetectedObject>> {
        self(raster)
    }
}

//! Percentage-based region of interest selection
//!
//! Converts ROI geometry expressed as fractions of the image size into a
//! pixel rectangle that is guaranteed to lie inside the raster, however
//! extreme the fractions are.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RoiConfig;
use crate::error::{AnalysisError, Result};
use crate::raster::{Raster, RegionView};
use crate::region::Rectangle;

/// ROI geometry as fractions of the image width and height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiGeometry {
    pub x_percent: f32,
    pub y_percent: f32,
    pub width_percent: f32,
    pub height_percent: f32,
}

impl RoiGeometry {
    pub fn new(x_percent: f32, y_percent: f32, width_percent: f32, height_percent: f32) -> Self {
        Self {
            x_percent,
            y_percent,
            width_percent,
            height_percent,
        }
    }

    /// Convert to a pixel rectangle clamped to the raster
    ///
    /// Fractions are multiplied by the raster size and truncated toward zero.
    pub fn to_pixels(&self, raster_width: u32, raster_height: u32) -> Rectangle {
        let scale = |dimension: u32, fraction: f32| -> i64 {
            // `as` saturates on overflow and maps NaN to zero
            (f64::from(dimension) * f64::from(fraction)).trunc() as i64
        };

        Rectangle::clamped(
            scale(raster_width, self.x_percent),
            scale(raster_height, self.y_percent),
            scale(raster_width, self.width_percent),
            scale(raster_height, self.height_percent),
            raster_width,
            raster_height,
        )
    }
}

/// Per-call ROI override; each field independently falls back to the configured default
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RoiOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_percent: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_percent: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_percent: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_percent: Option<f32>,
}

impl RoiOverride {
    /// Override every field at once
    pub fn full(geometry: RoiGeometry) -> Self {
        Self {
            x_percent: Some(geometry.x_percent),
            y_percent: Some(geometry.y_percent),
            width_percent: Some(geometry.width_percent),
            height_percent: Some(geometry.height_percent),
        }
    }

    /// Merge over defaults, field by field
    pub fn merge(&self, defaults: &RoiGeometry) -> RoiGeometry {
        RoiGeometry {
            x_percent: self.x_percent.unwrap_or(defaults.x_percent),
            y_percent: self.y_percent.unwrap_or(defaults.y_percent),
            width_percent: self.width_percent.unwrap_or(defaults.width_percent),
            height_percent: self.height_percent.unwrap_or(defaults.height_percent),
        }
    }
}

/// Region selector bound to the configured ROI defaults
#[derive(Debug, Clone)]
pub struct RegionSelector {
    config: RoiConfig,
}

impl RegionSelector {
    pub fn new(config: RoiConfig) -> Self {
        Self { config }
    }

    /// Resolve the ROI rectangle for a raster of the given size
    ///
    /// With ROI selection disabled and no override, the whole raster is used.
    /// A supplied override re-enables percentage geometry for this call, even
    /// if none of its fields are set.
    pub fn resolve(
        &self,
        raster_width: u32,
        raster_height: u32,
        roi_override: Option<&RoiOverride>,
    ) -> Rectangle {
        if !self.config.enabled && roi_override.is_none() {
            return Rectangle::new(0, 0, raster_width, raster_height);
        }

        let geometry = match roi_override {
            Some(over) => over.merge(&self.config.geometry),
            None => self.config.geometry,
        };

        geometry.to_pixels(raster_width, raster_height)
    }

    /// Select the ROI of a raster
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::EmptyRegion` if the resolved rectangle has zero area.
    pub fn select<'a>(
        &self,
        raster: &'a Raster,
        roi_override: Option<&RoiOverride>,
    ) -> Result<(RegionView<'a>, Rectangle)> {
        let region = self.resolve(raster.width(), raster.height(), roi_override);

        debug!(
            x = region.x,
            y = region.y,
            width = region.width,
            height = region.height,
            image_width = raster.width(),
            image_height = raster.height(),
            coverage = region.area() as f64 / raster.bounds().area() as f64,
            "Resolved region of interest"
        );

        Self::checked_view(raster, region)
    }

    /// Select a pixel bounding box supplied by an object detector
    ///
    /// The box is clamped to the raster with the same rules as percentage
    /// geometry.
    pub fn select_box<'a>(
        raster: &'a Raster,
        bounding_box: Rectangle,
    ) -> Result<(RegionView<'a>, Rectangle)> {
        let region = Rectangle::clamped(
            i64::from(bounding_box.x),
            i64::from(bounding_box.y),
            i64::from(bounding_box.width),
            i64::from(bounding_box.height),
            raster.width(),
            raster.height(),
        );
        Self::checked_view(raster, region)
    }

    fn checked_view(raster: &Raster, region: Rectangle) -> Result<(RegionView<'_>, Rectangle)> {
        if region.is_empty() {
            return Err(AnalysisError::EmptyRegion { region });
        }
        Ok((raster.view(region), region))
    }
}

//! Integer pixel rectangles

use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned rectangle in pixel coordinates
///
/// Rectangles produced by [`crate::region::RegionSelector`] always satisfy
/// `x + width <= raster.width` and `y + height <= raster.height`; they may
/// still have zero area, which callers reject as an empty region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Clamp raw, possibly negative or oversized coordinates to a raster
    ///
    /// `x` is clamped to `[0, max_width - 1]` and `y` to `[0, max_height - 1]`;
    /// the extent is then cut to what remains of the raster, never below zero.
    /// Both dimensions of the raster must be non-zero.
    pub fn clamped(x: i64, y: i64, width: i64, height: i64, max_width: u32, max_height: u32) -> Self {
        let max_w = i64::from(max_width);
        let max_h = i64::from(max_height);

        let x = x.clamp(0, (max_w - 1).max(0));
        let y = y.clamp(0, (max_h - 1).max(0));
        let width = width.min(max_w - x).max(0);
        let height = height.min(max_h - y).max(0);

        Self::new(x as u32, y as u32, width as u32, height as u32)
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge, saturating at `u32::MAX`
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge, saturating at `u32::MAX`
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Intersection with a `max_width` x `max_height` raster anchored at the origin
    ///
    /// Rectangles lying entirely outside come back empty.
    pub fn clipped_to(&self, max_width: u32, max_height: u32) -> Self {
        let x = self.x.min(max_width);
        let y = self.y.min(max_height);
        Self::new(
            x,
            y,
            self.right().min(max_width) - x,
            self.bottom().min(max_height) - y,
        )
    }

    /// Check the containment invariant against raster dimensions
    pub fn fits_within(&self, max_width: u32, max_height: u32) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(max_width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(max_height)
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.width, self.height, self.x, self.y
        )
    }
}

//! Decoded 3-channel pixel grid
//!
//! A [`Raster`] is validated once at construction and never mutated
//! afterwards. Region selection and color profiling only borrow it.

use image::{Rgb, RgbImage};

use crate::error::{AnalysisError, Result};
use crate::region::Rectangle;

/// Number of channels per pixel
pub const CHANNELS: usize = 3;

/// Immutable RGB raster with 8-bit channels
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    image: RgbImage,
}

impl Raster {
    /// Build a raster from an interleaved RGB byte buffer
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidRaster` if either dimension is zero or
    /// the buffer length is not `width * height * 3`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(AnalysisError::InvalidRaster {
                reason: format!("zero dimension ({}x{})", width, height),
            });
        }

        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            let channels = data.len() as f64 / (width as f64 * height as f64);
            return Err(AnalysisError::InvalidRaster {
                reason: format!(
                    "buffer of {} bytes does not match {}x{}x{} ({:.2} channels per pixel)",
                    data.len(),
                    width,
                    height,
                    CHANNELS,
                    channels
                ),
            });
        }

        let image = RgbImage::from_raw(width, height, data).ok_or_else(|| {
            AnalysisError::InvalidRaster {
                reason: "buffer rejected by image container".into(),
            }
        })?;

        Ok(Self { image })
    }

    /// Wrap an already decoded RGB image
    pub fn from_rgb_image(image: RgbImage) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(AnalysisError::InvalidRaster {
                reason: format!("zero dimension ({}x{})", image.width(), image.height()),
            });
        }
        Ok(Self { image })
    }

    /// Raster filled with a single color
    pub fn uniform(width: u32, height: u32, rgb: [u8; 3]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(AnalysisError::InvalidRaster {
                reason: format!("zero dimension ({}x{})", width, height),
            });
        }
        Ok(Self {
            image: RgbImage::from_pixel(width, height, Rgb(rgb)),
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Rectangle covering the whole raster
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(0, 0, self.width(), self.height())
    }

    /// Pixel at `(x, y)`, or `None` outside the raster
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Borrow the underlying image buffer
    pub fn as_rgb_image(&self) -> &RgbImage {
        &self.image
    }

    /// Read-only view of a sub-rectangle
    ///
    /// The rectangle must already lie inside the raster; the region selector
    /// guarantees that for every rectangle it produces.
    pub fn view(&self, region: Rectangle) -> RegionView<'_> {
        debug_assert!(region.fits_within(self.width(), self.height()));
        RegionView {
            raster: self,
            region,
        }
    }
}

/// Borrowed rectangular window into a [`Raster`]
#[derive(Debug, Clone, Copy)]
pub struct RegionView<'a> {
    raster: &'a Raster,
    region: Rectangle,
}

impl<'a> RegionView<'a> {
    pub fn region(&self) -> Rectangle {
        self.region
    }

    /// Number of pixels in the view
    pub fn pixel_count(&self) -> usize {
        self.region.area() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    /// Iterate pixels row by row
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + 'a {
        let raster: &'a Raster = self.raster;
        let image = &raster.image;
        let Rectangle {
            x,
            y,
            width,
            height,
        } = self.region;
        (y..y + height)
            .flat_map(move |row| (x..x + width).map(move |col| image.get_pixel(col, row).0))
    }
}

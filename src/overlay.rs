//! ROI overlay rendering for debugging
//!
//! Draws the analyzed rectangle on a copy of the raster so a human can
//! check what the classifier actually looked at.

use image::{Rgb, RgbImage};

use crate::constants::overlay;
use crate::raster::Raster;
use crate::region::Rectangle;

/// Outline style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayStyle {
    pub color: [u8; 3],
    pub thickness: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: overlay::COLOR,
            thickness: overlay::THICKNESS,
        }
    }
}

/// Copy of the raster with the region outlined in green
pub fn render_roi_overlay(raster: &Raster, region: Rectangle) -> RgbImage {
    render_overlay_with_style(raster, region, OverlayStyle::default())
}

/// Copy of the raster with the region outlined
///
/// The outline is drawn inside the rectangle and clipped to the raster.
pub fn render_overlay_with_style(
    raster: &Raster,
    region: Rectangle,
    style: OverlayStyle,
) -> RgbImage {
    let mut image = raster.as_rgb_image().clone();
    let visible = region.clipped_to(image.width(), image.height());
    if visible.is_empty() || style.thickness == 0 {
        return image;
    }

    let t = style.thickness;
    for y in visible.y..visible.bottom() {
        for x in visible.x..visible.right() {
            let on_edge = x < region.x.saturating_add(t)
                || y < region.y.saturating_add(t)
                || x.saturating_add(t) >= region.right()
                || y.saturating_add(t) >= region.bottom();
            if on_edge {
                image.put_pixel(x, y, Rgb(style.color));
            }
        }
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_drawn_inside_region() {
        let raster = Raster::uniform(20, 20, [0, 0, 0]).unwrap();
        let image = render_roi_overlay(&raster, Rectangle::new(5, 5, 10, 10));

        let green = Rgb([0, 255, 0]);
        assert_eq!(*image.get_pixel(5, 5), green);
        assert_eq!(*image.get_pixel(7, 10), green);
        assert_eq!(*image.get_pixel(14, 14), green);
        assert_eq!(*image.get_pixel(12, 12), green);
        // Interior and exterior untouched
        assert_eq!(*image.get_pixel(10, 10), Rgb([0, 0, 0]));
        assert_eq!(*image.get_pixel(4, 4), Rgb([0, 0, 0]));
        assert_eq!(*image.get_pixel(15, 15), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_source_raster_is_not_modified() {
        let raster = Raster::uniform(6, 6, [9, 9, 9]).unwrap();
        let _ = render_roi_overlay(&raster, raster.bounds());
        assert_eq!(raster.pixel(0, 0), Some([9, 9, 9]));
    }

    #[test]
    fn test_region_outside_raster_leaves_image_untouched() {
        let raster = Raster::uniform(10, 10, [0, 0, 0]).unwrap();
        let image = render_roi_overlay(&raster, Rectangle::new(u32::MAX - 1, 0, 5, 5));
        assert_eq!(image.as_raw(), raster.as_rgb_image().as_raw());
    }

    #[test]
    fn test_region_overhanging_raster_is_clipped() {
        let raster = Raster::uniform(10, 10, [0, 0, 0]).unwrap();
        let image = render_roi_overlay(&raster, Rectangle::new(6, 6, 20, 20));
        assert_eq!(*image.get_pixel(6, 6), Rgb([0, 255, 0]));
        // Far edges lie beyond the raster, so the inner corner stays unpainted
        assert_eq!(*image.get_pixel(9, 9), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_small_region_is_filled() {
        let raster = Raster::uniform(8, 8, [0, 0, 0]).unwrap();
        let style = OverlayStyle {
            color: [255, 0, 0],
            thickness: 3,
        };
        let image = render_overlay_with_style(&raster, Rectangle::new(2, 2, 4, 4), style);
        for y in 2..6 {
            for x in 2..6 {
                assert_eq!(*image.get_pixel(x, y), Rgb([255, 0, 0]));
            }
        }
    }
}

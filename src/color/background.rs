//! Background pixel suppression
//!
//! Photos of containers usually include tiled walls, wooden tables or the
//! hand holding the bottle. Those surfaces share a brown/beige HSV signature
//! and would otherwise dominate the mean color of the region.

use tracing::{debug, warn};

use crate::color::conversion::{ColorConverter, HsvColor};
use crate::config::BackgroundConfig;

/// Outcome of background suppression over a pixel set
#[derive(Debug, Clone, PartialEq)]
pub struct ForegroundSelection {
    /// Per-pixel flag: true = keep for statistics
    pub keep: Vec<bool>,
    /// Pixels not matching the background signature
    pub foreground_pixels: usize,
    /// Total pixels considered
    pub total_pixels: usize,
    /// Whether the mask was actually applied (false when disabled or the safety valve fired)
    pub applied: bool,
}

impl ForegroundSelection {
    /// Selection keeping every pixel
    pub fn all(total_pixels: usize) -> Self {
        Self {
            keep: vec![true; total_pixels],
            foreground_pixels: total_pixels,
            total_pixels,
            applied: false,
        }
    }

    pub fn foreground_ratio(&self) -> f32 {
        if self.total_pixels == 0 {
            return 0.0;
        }
        self.foreground_pixels as f32 / self.total_pixels as f32
    }

    /// Number of pixels retained for statistics
    pub fn retained(&self) -> usize {
        self.keep.iter().filter(|&&k| k).count()
    }
}

/// Background suppressor matching pixels against a fixed HSV signature
#[derive(Debug, Clone)]
pub struct BackgroundSuppressor {
    config: BackgroundConfig,
    converter: ColorConverter,
}

impl BackgroundSuppressor {
    pub fn new(config: BackgroundConfig) -> Self {
        Self {
            config,
            converter: ColorConverter::new(),
        }
    }

    /// Check a single pixel against the background signature
    pub fn is_background(&self, hsv: HsvColor) -> bool {
        let hsv8 = self.converter.hsv_to_hsv8(hsv);
        self.config
            .signature
            .contains(hsv8.hue, hsv8.saturation, hsv8.value)
    }

    /// Build the foreground selection for a set of pixels
    ///
    /// When fewer than `min_foreground_ratio` of the pixels survive the mask,
    /// the mask is discarded and every pixel is kept.
    pub fn select(&self, hsv_pixels: &[HsvColor]) -> ForegroundSelection {
        let total = hsv_pixels.len();
        if !self.config.enabled {
            return ForegroundSelection::all(total);
        }

        let keep: Vec<bool> = hsv_pixels.iter().map(|&p| !self.is_background(p)).collect();
        let foreground = keep.iter().filter(|&&k| k).count();
        let mut selection = ForegroundSelection {
            keep,
            foreground_pixels: foreground,
            total_pixels: total,
            applied: true,
        };
        let ratio = selection.foreground_ratio();

        if ratio < self.config.min_foreground_ratio || foreground == 0 {
            warn!(
                foreground_ratio = ratio,
                minimum = self.config.min_foreground_ratio,
                total_pixels = total,
                "Too many pixels match the background signature, using all pixels"
            );
            selection.keep.fill(true);
            selection.applied = false;
            return selection;
        }

        debug!(
            removed = total - foreground,
            total_pixels = total,
            foreground_ratio = ratio,
            "Background pixels suppressed"
        );

        selection
    }
}

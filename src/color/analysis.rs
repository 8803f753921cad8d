//! Color profiling of a selected region
//!
//! Produces a [`ColorProfile`] from the pixels of a region:
//! - Background suppression with a safety valve
//! - Mean RGB and mean HSV over the retained pixels
//! - Brightness and pooled channel standard deviation
//! - Dominant color from k-means clustering

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::background::BackgroundSuppressor;
use crate::color::clustering::DominantColorExtractor;
use crate::color::conversion::{ColorConverter, HsvColor, RgbColor};
use crate::config::AnalysisConfig;
use crate::raster::RegionView;
use crate::{AnalysisError, Result};

/// Aggregate color statistics of a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorProfile {
    /// Mean color on the 0-255 channel scale
    pub mean_rgb: RgbColor,
    /// Mean of per-pixel HSV (hue degrees, saturation/value percent)
    pub mean_hsv: HsvColor,
    /// Mean of the three mean-RGB channels
    pub brightness: f32,
    /// Standard deviation over every channel value of the retained pixels
    pub color_variance: f32,
    /// Centroid of the largest color cluster
    pub dominant_rgb: RgbColor,
    /// Whether background pixels were actually excluded
    pub background_suppressed: bool,
    /// Pixels outside the background signature
    pub foreground_pixels: usize,
    /// Pixels the statistics were computed from (always >= 1)
    pub pixels_used: usize,
    /// Pixels in the region
    pub total_pixels: usize,
}

impl ColorProfile {
    pub fn hue(&self) -> f32 {
        self.mean_hsv.hue
    }

    pub fn saturation(&self) -> f32 {
        self.mean_hsv.saturation
    }
}

/// Color profiler bound to a pipeline configuration
#[derive(Debug, Clone)]
pub struct ColorProfiler {
    converter: ColorConverter,
    suppressor: BackgroundSuppressor,
    extractor: DominantColorExtractor,
}

impl ColorProfiler {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            converter: ColorConverter::new(),
            suppressor: BackgroundSuppressor::new(config.background),
            extractor: DominantColorExtractor::new(config.clustering),
        }
    }

    /// Profile the pixels of a region
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::EmptyRegion` if the region holds no pixels
    pub fn profile(&self, view: &RegionView<'_>) -> Result<ColorProfile> {
        let rgb: Vec<[u8; 3]> = view.pixels().collect();
        let hsv: Vec<HsvColor> = rgb.iter().map(|&p| self.converter.rgb_to_hsv(p)).collect();

        let selection = self.suppressor.select(&hsv);

        let retained_rgb: Vec<[u8; 3]> = rgb
            .iter()
            .zip(&selection.keep)
            .filter_map(|(&p, &keep)| keep.then_some(p))
            .collect();
        if retained_rgb.is_empty() {
            return Err(AnalysisError::EmptyRegion {
                region: view.region(),
            });
        }
        let retained_hsv: Vec<HsvColor> = hsv
            .iter()
            .zip(&selection.keep)
            .filter_map(|(&p, &keep)| keep.then_some(p))
            .collect();

        let mean_rgb = mean_rgb(&retained_rgb);
        let brightness = mean_rgb.brightness();
        let color_variance = pooled_std(&retained_rgb, brightness);
        let mean_hsv = mean_hsv(&retained_hsv);

        let dominant_rgb = self
            .extractor
            .dominant_color(&retained_rgb)
            .unwrap_or(mean_rgb);

        let profile = ColorProfile {
            mean_rgb,
            mean_hsv,
            brightness,
            color_variance,
            dominant_rgb,
            background_suppressed: selection.applied,
            foreground_pixels: selection.foreground_pixels,
            pixels_used: retained_rgb.len(),
            total_pixels: selection.total_pixels,
        };

        debug!(
            hue = profile.mean_hsv.hue,
            saturation = profile.mean_hsv.saturation,
            brightness = profile.brightness,
            variance = profile.color_variance,
            dominant = %self.converter.rgb_to_hex(profile.dominant_rgb),
            pixels_used = profile.pixels_used,
            "Computed color profile"
        );

        Ok(profile)
    }
}

fn mean_rgb(pixels: &[[u8; 3]]) -> RgbColor {
    let mut sums = [0u64; 3];
    for p in pixels {
        for c in 0..3 {
            sums[c] += u64::from(p[c]);
        }
    }
    let n = pixels.len() as f64;
    RgbColor::new(
        (sums[0] as f64 / n) as f32,
        (sums[1] as f64 / n) as f32,
        (sums[2] as f64 / n) as f32,
    )
}

/// Arithmetic mean of each HSV component; hue is not averaged circularly
fn mean_hsv(pixels: &[HsvColor]) -> HsvColor {
    let n = pixels.len() as f64;
    let (h, s, v) = pixels.iter().fold((0.0_f64, 0.0_f64, 0.0_f64), |acc, p| {
        (
            acc.0 + f64::from(p.hue),
            acc.1 + f64::from(p.saturation),
            acc.2 + f64::from(p.value),
        )
    });
    HsvColor {
        hue: (h / n) as f32,
        saturation: (s / n) as f32,
        value: (v / n) as f32,
    }
}

/// Standard deviation of all channel values pooled together
fn pooled_std(pixels: &[[u8; 3]], mean: f32) -> f32 {
    let mean = f64::from(mean);
    let sum_sq: f64 = pixels
        .iter()
        .flat_map(|p| p.iter())
        .map(|&c| (f64::from(c) - mean).powi(2))
        .sum();
    (sum_sq / (pixels.len() * 3) as f64).sqrt() as f32
}

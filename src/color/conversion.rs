//! Color space conversion utilities
//!
//! Provides the two HSV encodings used by the pipeline:
//! - Degrees/percent HSV for classification thresholds
//! - 8-bit HSV (hue 0-179, saturation/value 0-255) for background signatures
//!
//! plus small RGB helpers (brightness, hex representation).

use palette::{FromColor, Hsv, Srgb};
use serde::{Deserialize, Serialize};

/// RGB triple on the 0-255 channel scale, possibly fractional (means, centroids)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl RgbColor {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_pixel(pixel: [u8; 3]) -> Self {
        Self::new(f32::from(pixel[0]), f32::from(pixel[1]), f32::from(pixel[2]))
    }

    /// Mean of the three channels
    pub fn brightness(&self) -> f32 {
        (self.r + self.g + self.b) / 3.0
    }

    /// Nearest 8-bit pixel
    pub fn to_pixel(&self) -> [u8; 3] {
        let quantize = |c: f32| c.round().clamp(0.0, 255.0) as u8;
        [quantize(self.r), quantize(self.g), quantize(self.b)]
    }
}

/// HSV triple with hue in degrees [0, 360) and saturation/value in percent [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HsvColor {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

/// HSV in the 8-bit encoding: hue 0-179 (two degrees per step), saturation/value 0-255
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv8 {
    pub hue: u8,
    pub saturation: u8,
    pub value: u8,
}

/// Stateless color converter
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorConverter;

impl ColorConverter {
    pub fn new() -> Self {
        Self
    }

    /// Convert an 8-bit RGB pixel to degrees/percent HSV
    ///
    /// Achromatic pixels get hue 0.
    pub fn rgb_to_hsv(&self, pixel: [u8; 3]) -> HsvColor {
        let srgb = Srgb::new(
            f32::from(pixel[0]) / 255.0,
            f32::from(pixel[1]) / 255.0,
            f32::from(pixel[2]) / 255.0,
        );
        let hsv: Hsv = Hsv::from_color(srgb);

        let mut hue = hsv.hue.into_positive_degrees();
        if hue >= 360.0 {
            hue -= 360.0;
        }

        HsvColor {
            hue,
            saturation: hsv.saturation * 100.0,
            value: hsv.value * 100.0,
        }
    }

    /// Re-encode degrees/percent HSV as 8-bit HSV
    pub fn hsv_to_hsv8(&self, hsv: HsvColor) -> Hsv8 {
        let hue = (hsv.hue / 2.0).round() as u32 % 180;
        let scale = |percent: f32| (percent * 2.55).round().clamp(0.0, 255.0) as u8;

        Hsv8 {
            hue: hue as u8,
            saturation: scale(hsv.saturation),
            value: scale(hsv.value),
        }
    }

    /// Convert an RGB color to a hexadecimal string (e.g. "#3C8C28")
    pub fn rgb_to_hex(&self, color: RgbColor) -> String {
        let [r, g, b] = color.to_pixel();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }
}

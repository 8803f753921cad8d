//! Tuned default values for container classification
//!
//! These are the compiled-in defaults behind [`crate::config::AnalysisConfig`].
//! Every value here can be replaced at runtime through a configuration file,
//! so recalibration never requires a rebuild.

/// Default region of interest, as fractions of the image dimensions
pub mod roi {
    /// ROI selection is on by default
    pub const ENABLED: bool = true;

    /// ROI starts at 25% of the image width
    pub const X_PERCENT: f32 = 0.25;

    /// ROI starts at 20% of the image height
    pub const Y_PERCENT: f32 = 0.20;

    /// ROI spans 50% of the image width
    pub const WIDTH_PERCENT: f32 = 0.50;

    /// ROI spans 60% of the image height
    pub const HEIGHT_PERCENT: f32 = 0.60;
}

/// Background signature for brown/beige surfaces (tiles, wood, hands, tables)
///
/// Bounds are inclusive and expressed in the 8-bit HSV encoding:
/// hue 0-179 (two degrees per step), saturation and value 0-255.
pub mod background {
    pub const HUE_MIN: u8 = 10;
    pub const HUE_MAX: u8 = 35;
    pub const SATURATION_MIN: u8 = 40;
    pub const SATURATION_MAX: u8 = 140;
    pub const VALUE_MIN: u8 = 70;
    pub const VALUE_MAX: u8 = 170;

    /// Below this foreground fraction the mask is discarded and all pixels are used
    pub const MIN_FOREGROUND_RATIO: f32 = 0.15;
}

/// Dominant color clustering parameters
pub mod clustering {
    /// Number of clusters
    pub const CLUSTERS: usize = 3;

    /// Upper bound on pixels fed to the clustering step
    pub const MAX_SAMPLES: usize = 1000;

    /// Refinement iterations per attempt
    pub const MAX_ITERATIONS: usize = 10;

    /// Centroid movement (RGB units) below which refinement stops
    pub const EPSILON: f32 = 1.0;

    /// Independent clustering runs; the most compact one wins
    pub const ATTEMPTS: usize = 10;

    /// Seed for subsampling and centroid seeding
    pub const SEED: u64 = 0x5EED_C0DE;
}

/// Classifier thresholds (hue in degrees, saturation in percent, brightness 0-255)
pub mod classifier {
    /// Minimum confidence for a result to be reported
    pub const MIN_CONFIDENCE: f32 = 0.6;

    pub mod green {
        pub const HUE_MIN: f32 = 28.0;
        pub const HUE_MAX: f32 = 90.0;
        pub const MIN_SATURATION: f32 = 20.0;
        pub const SATURATION_WEIGHT: f32 = 0.6;
        pub const BASE: f32 = 0.4;
    }

    pub mod clear {
        pub const MAX_SATURATION: f32 = 35.0;
        pub const BRIGHTNESS_MIN: f32 = 60.0;
        pub const BRIGHTNESS_MAX: f32 = 230.0;
        pub const CLARITY_WEIGHT: f32 = 0.5;
        pub const BASE: f32 = 0.4;
    }

    pub mod brown {
        pub const HUE_MIN: f32 = 5.0;
        pub const HUE_MAX: f32 = 35.0;
        /// Hues above this wrap into the red/brown family
        pub const RED_HUE_MIN: f32 = 155.0;
        pub const MAX_BRIGHTNESS: f32 = 150.0;
        pub const MIN_SATURATION: f32 = 30.0;
        pub const DARKNESS_WEIGHT: f32 = 0.4;
        pub const SATURATION_WEIGHT: f32 = 0.4;
        pub const BASE: f32 = 0.3;
    }

    pub mod fallback {
        pub const GREEN_CONFIDENCE: f32 = 0.55;
        pub const BRIGHT_THRESHOLD: f32 = 180.0;
        pub const BRIGHT_CONFIDENCE: f32 = 0.50;
        pub const DARK_THRESHOLD: f32 = 100.0;
        pub const DARK_CONFIDENCE: f32 = 0.50;
        pub const DEFAULT_CONFIDENCE: f32 = 0.48;
    }

    /// Thresholds of the earlier prototype rule set
    pub mod prototype {
        pub const BROWN_MAX_BRIGHTNESS: f32 = 180.0;
        pub const BROWN_MIN_SATURATION: f32 = 12.0;
        pub const CLEAR_MAX_SATURATION: f32 = 20.0;
        pub const CLEAR_BRIGHTNESS_MIN: f32 = 80.0;
        pub const CLEAR_BRIGHTNESS_MAX: f32 = 200.0;
        pub const REUSABLE_MAX_SATURATION: f32 = 25.0;
        pub const REUSABLE_BRIGHTNESS_MIN: f32 = 60.0;
        pub const REUSABLE_BRIGHTNESS_MAX: f32 = 150.0;
        pub const REUSABLE_CONFIDENCE: f32 = 0.60;
        pub const BRIGHT_THRESHOLD: f32 = 160.0;
    }
}

/// Object detector integration
pub mod detector {
    /// Detections below this detector score are ignored
    pub const MIN_CONFIDENCE: f32 = 0.5;
}

/// ROI overlay rendering
pub mod overlay {
    /// Outline color
    pub const COLOR: [u8; 3] = [0, 255, 0];

    /// Outline thickness in pixels
    pub const THICKNESS: u32 = 3;
}

//! Configuration structures for the container analysis pipeline.
//!
//! This module defines all tunable parameters for container classification,
//! organized into logical groups for region selection, background
//! suppression, clustering and the classifier rules.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use recycle_scan::AnalysisConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = AnalysisConfig::from_json_file(Path::new("analysis.json"))?;
//!
//! // Or use the refined defaults
//! let config = AnalysisConfig::refined();
//! # Ok::<(), recycle_scan::AnalysisError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`RoiConfig`]: default region of interest
//! - [`BackgroundConfig`]: brown/beige background suppression
//! - [`ClusteringConfig`]: dominant color clustering
//! - [`ClassifierConfig`]: rule thresholds and confidence coefficients
//! - [`DetectorConfig`]: object detector integration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::classification::ContainerType;
use crate::constants::{background, classifier, clustering, detector, roi};
use crate::error::{AnalysisError, Result};
use crate::region::RoiGeometry;

/// Complete pipeline configuration.
///
/// Read-only for the lifetime of an analysis; the pipeline never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Region of interest defaults
    pub roi: RoiConfig,

    /// Background suppression
    pub background: BackgroundConfig,

    /// Dominant color clustering
    pub clustering: ClusteringConfig,

    /// Classification rules
    pub classifier: ClassifierConfig,

    /// Results below this confidence are reported as no detection
    pub min_confidence: f32,

    /// Object detector integration
    #[serde(default)]
    pub detector: DetectorConfig,
}

/// Default region of interest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiConfig {
    /// When false, the whole image is analyzed unless a call supplies an override
    pub enabled: bool,

    #[serde(flatten)]
    pub geometry: RoiGeometry,
}

/// Inclusive HSV bounds in the 8-bit encoding (hue 0-179, saturation/value 0-255).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange8 {
    pub hue: [u8; 2],
    pub saturation: [u8; 2],
    pub value: [u8; 2],
}

/// Background suppression parameters.
///
/// Pixels matching `signature` are treated as background (tiles, wood,
/// hands) and excluded from the color statistics, unless that would leave
/// less than `min_foreground_ratio` of the region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackgroundConfig {
    pub enabled: bool,
    pub signature: HsvRange8,
    pub min_foreground_ratio: f32,
}

/// Dominant color clustering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusteringConfig {
    pub clusters: usize,
    pub max_samples: usize,
    pub max_iterations: usize,
    pub epsilon: f32,
    pub attempts: usize,
    /// Fixed seed keeps repeated analyses of the same image bit-identical
    pub seed: u64,
}

/// Classifier rule parameters.
///
/// Hue is in degrees (0-360), saturation in percent (0-100) and brightness
/// on the 0-255 channel scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub green: GreenGlassRule,
    pub clear: ClearGlassRule,
    pub brown: BrownGlassRule,

    /// Evaluate the clear glass rule before the brown glass rule
    pub clear_before_brown: bool,

    /// Optional reusable glass rule, evaluated after green, clear and brown
    #[serde(default)]
    pub reusable: Option<ReusableGlassRule>,

    pub fallback: FallbackLadder,
}

/// Green glass: hue band with a saturation floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GreenGlassRule {
    pub hue_min: f32,
    pub hue_max: f32,
    pub min_saturation: f32,
    pub saturation_weight: f32,
    pub base: f32,
}

/// Clear (white) glass: low saturation inside an open brightness band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClearGlassRule {
    pub max_saturation: f32,
    pub brightness_min: f32,
    pub brightness_max: f32,
    pub clarity_weight: f32,
    pub base: f32,
}

/// Brown glass: orange or red hue, dark and saturated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrownGlassRule {
    pub hue_min: f32,
    pub hue_max: f32,
    pub red_hue_min: f32,
    pub max_brightness: f32,
    pub min_saturation: f32,
    pub darkness_weight: f32,
    pub saturation_weight: f32,
    pub base: f32,
}

/// Reusable glass: slightly darker than clear glass, fixed confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReusableGlassRule {
    pub max_saturation: f32,
    pub brightness_min: f32,
    pub brightness_max: f32,
    pub confidence: f32,
}

/// Fixed-confidence guesses used when no rule matched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallbackLadder {
    pub green_confidence: f32,
    pub bright_threshold: f32,
    pub bright_label: ContainerType,
    pub bright_confidence: f32,
    pub dark_threshold: f32,
    pub dark_confidence: f32,
    pub default_confidence: f32,
}

/// Object detector integration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Detector scores below this are ignored
    pub min_confidence: f32,
}

impl Default for RoiConfig {
    fn default() -> Self {
        Self {
            enabled: roi::ENABLED,
            geometry: RoiGeometry::new(
                roi::X_PERCENT,
                roi::Y_PERCENT,
                roi::WIDTH_PERCENT,
                roi::HEIGHT_PERCENT,
            ),
        }
    }
}

impl HsvRange8 {
    /// Check whether an 8-bit HSV triple lies inside all three bounds
    pub fn contains(&self, hue: u8, saturation: u8, value: u8) -> bool {
        (self.hue[0]..=self.hue[1]).contains(&hue)
            && (self.saturation[0]..=self.saturation[1]).contains(&saturation)
            && (self.value[0]..=self.value[1]).contains(&value)
    }
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            signature: HsvRange8 {
                hue: [background::HUE_MIN, background::HUE_MAX],
                saturation: [background::SATURATION_MIN, background::SATURATION_MAX],
                value: [background::VALUE_MIN, background::VALUE_MAX],
            },
            min_foreground_ratio: background::MIN_FOREGROUND_RATIO,
        }
    }
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            clusters: clustering::CLUSTERS,
            max_samples: clustering::MAX_SAMPLES,
            max_iterations: clustering::MAX_ITERATIONS,
            epsilon: clustering::EPSILON,
            attempts: clustering::ATTEMPTS,
            seed: clustering::SEED,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_confidence: detector::MIN_CONFIDENCE,
        }
    }
}

impl ClassifierConfig {
    /// Refined rule set: clear glass before brown glass, stricter brown glass
    pub fn refined() -> Self {
        use classifier::{brown, clear, fallback, green};

        Self {
            green: GreenGlassRule {
                hue_min: green::HUE_MIN,
                hue_max: green::HUE_MAX,
                min_saturation: green::MIN_SATURATION,
                saturation_weight: green::SATURATION_WEIGHT,
                base: green::BASE,
            },
            clear: ClearGlassRule {
                max_saturation: clear::MAX_SATURATION,
                brightness_min: clear::BRIGHTNESS_MIN,
                brightness_max: clear::BRIGHTNESS_MAX,
                clarity_weight: clear::CLARITY_WEIGHT,
                base: clear::BASE,
            },
            brown: BrownGlassRule {
                hue_min: brown::HUE_MIN,
                hue_max: brown::HUE_MAX,
                red_hue_min: brown::RED_HUE_MIN,
                max_brightness: brown::MAX_BRIGHTNESS,
                min_saturation: brown::MIN_SATURATION,
                darkness_weight: brown::DARKNESS_WEIGHT,
                saturation_weight: brown::SATURATION_WEIGHT,
                base: brown::BASE,
            },
            clear_before_brown: true,
            reusable: None,
            fallback: FallbackLadder {
                green_confidence: fallback::GREEN_CONFIDENCE,
                bright_threshold: fallback::BRIGHT_THRESHOLD,
                bright_label: ContainerType::ClearGlass,
                bright_confidence: fallback::BRIGHT_CONFIDENCE,
                dark_threshold: fallback::DARK_THRESHOLD,
                dark_confidence: fallback::DARK_CONFIDENCE,
                default_confidence: fallback::DEFAULT_CONFIDENCE,
            },
        }
    }

    /// Prototype rule set: brown glass before clear glass, looser brown
    /// thresholds, a reusable glass rule and a PET bottle bright fallback
    pub fn prototype() -> Self {
        use classifier::prototype;

        let refined = Self::refined();
        Self {
            clear: ClearGlassRule {
                max_saturation: prototype::CLEAR_MAX_SATURATION,
                brightness_min: prototype::CLEAR_BRIGHTNESS_MIN,
                brightness_max: prototype::CLEAR_BRIGHTNESS_MAX,
                ..refined.clear
            },
            brown: BrownGlassRule {
                max_brightness: prototype::BROWN_MAX_BRIGHTNESS,
                min_saturation: prototype::BROWN_MIN_SATURATION,
                ..refined.brown
            },
            clear_before_brown: false,
            reusable: Some(ReusableGlassRule {
                max_saturation: prototype::REUSABLE_MAX_SATURATION,
                brightness_min: prototype::REUSABLE_BRIGHTNESS_MIN,
                brightness_max: prototype::REUSABLE_BRIGHTNESS_MAX,
                confidence: prototype::REUSABLE_CONFIDENCE,
            }),
            fallback: FallbackLadder {
                bright_threshold: prototype::BRIGHT_THRESHOLD,
                bright_label: ContainerType::PetBottle,
                ..refined.fallback
            },
            ..refined
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::refined()
    }
}

impl AnalysisConfig {
    /// Refined configuration with background suppression (the default)
    pub fn refined() -> Self {
        Self {
            roi: RoiConfig::default(),
            background: BackgroundConfig::default(),
            clustering: ClusteringConfig::default(),
            classifier: ClassifierConfig::refined(),
            min_confidence: classifier::MIN_CONFIDENCE,
            detector: DetectorConfig::default(),
        }
    }

    /// Prototype configuration: no background suppression, prototype rules
    pub fn prototype() -> Self {
        Self {
            background: BackgroundConfig {
                enabled: false,
                ..BackgroundConfig::default()
            },
            classifier: ClassifierConfig::prototype(),
            ..Self::refined()
        }
    }

    /// Set the confidence floor
    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Enable or disable default ROI selection
    pub fn with_roi_enabled(mut self, enabled: bool) -> Self {
        self.roi.enabled = enabled;
        self
    }

    /// Validate configuration parameters
    ///
    /// ROI percentages are not checked here: the region selector clamps
    /// any value into the image.
    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, value: f32| -> Result<()> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(AnalysisError::invalid_parameter(name, value))
            }
        };

        unit("min_confidence", self.min_confidence)?;
        unit("detector.min_confidence", self.detector.min_confidence)?;
        unit(
            "background.min_foreground_ratio",
            self.background.min_foreground_ratio,
        )?;

        let sig = &self.background.signature;
        if sig.hue[0] > sig.hue[1] || sig.hue[1] >= 180 {
            return Err(AnalysisError::invalid_parameter(
                "background.signature.hue",
                format!("{:?}", sig.hue),
            ));
        }
        if sig.saturation[0] > sig.saturation[1] {
            return Err(AnalysisError::invalid_parameter(
                "background.signature.saturation",
                format!("{:?}", sig.saturation),
            ));
        }
        if sig.value[0] > sig.value[1] {
            return Err(AnalysisError::invalid_parameter(
                "background.signature.value",
                format!("{:?}", sig.value),
            ));
        }

        if self.clustering.clusters == 0 {
            return Err(AnalysisError::invalid_parameter("clustering.clusters", 0));
        }
        if self.clustering.max_samples < self.clustering.clusters {
            return Err(AnalysisError::invalid_parameter(
                "clustering.max_samples",
                self.clustering.max_samples,
            ));
        }
        if self.clustering.attempts == 0 {
            return Err(AnalysisError::invalid_parameter("clustering.attempts", 0));
        }
        if !(self.clustering.epsilon >= 0.0) {
            return Err(AnalysisError::invalid_parameter(
                "clustering.epsilon",
                self.clustering.epsilon,
            ));
        }

        let brown = &self.classifier.brown;
        if !(brown.max_brightness > 0.0) {
            return Err(AnalysisError::invalid_parameter(
                "classifier.brown.max_brightness",
                brown.max_brightness,
            ));
        }

        Ok(())
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AnalysisError::config("Failed to parse configuration", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::config(format!("Failed to read {}", path.display()), e)
        })?;
        Self::from_json_str(&content)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::config("Failed to serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            AnalysisError::config(format!("Failed to write {}", path.display()), e)
        })?;
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::refined()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refined_defaults() {
        let config = AnalysisConfig::default();
        assert!(config.roi.enabled);
        assert_eq!(config.roi.geometry.x_percent, 0.25);
        assert_eq!(config.roi.geometry.height_percent, 0.60);
        assert!(config.background.enabled);
        assert_eq!(config.min_confidence, 0.6);
        assert!(config.classifier.clear_before_brown);
        assert!(config.classifier.reusable.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_prototype_differs_only_where_tuned() {
        let refined = AnalysisConfig::refined();
        let proto = AnalysisConfig::prototype();

        assert!(!proto.background.enabled);
        assert!(!proto.classifier.clear_before_brown);
        assert_eq!(proto.classifier.brown.min_saturation, 12.0);
        assert_eq!(proto.classifier.brown.max_brightness, 180.0);
        assert_eq!(proto.classifier.clear.max_saturation, 20.0);
        assert_eq!(proto.classifier.fallback.bright_label, ContainerType::PetBottle);
        assert!(proto.classifier.reusable.is_some());

        assert_eq!(proto.classifier.green, refined.classifier.green);
        assert_eq!(proto.roi, refined.roi);
        assert_eq!(proto.clustering, refined.clustering);
        assert!(proto.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_preserves_tuning() {
        let config = AnalysisConfig::prototype().with_min_confidence(0.7);
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed = AnalysisConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_roi_fields_are_flattened() {
        let json = serde_json::to_value(AnalysisConfig::default()).unwrap();
        assert_eq!(json["roi"]["enabled"], true);
        assert!(json["roi"]["x_percent"].is_number());
        assert!(json["roi"].get("geometry").is_none());
    }

    #[test]
    fn test_validate_rejects_out_of_range_floor() {
        let config = AnalysisConfig::default().with_min_confidence(1.5);
        let err = config.validate().unwrap_err();
        match err {
            AnalysisError::InvalidParameter { parameter, .. } => {
                assert_eq!(parameter, "min_confidence")
            }
            other => panic!("Expected InvalidParameter, got: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_inverted_signature() {
        let mut config = AnalysisConfig::default();
        config.background.signature.value = [170, 70];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_str_reports_parse_errors() {
        let err = AnalysisConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, AnalysisError::ConfigError { .. }));
    }

    #[test]
    fn test_signature_contains_is_inclusive() {
        let sig = BackgroundConfig::default().signature;
        assert!(sig.contains(10, 40, 70));
        assert!(sig.contains(35, 140, 170));
        assert!(!sig.contains(9, 100, 100));
        assert!(!sig.contains(20, 141, 100));
        assert!(!sig.contains(20, 100, 171));
    }

    #[test]
    fn test_file_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "recycle_scan_config_{}.json",
            std::process::id()
        ));
        let config = AnalysisConfig::default().with_roi_enabled(false);
        config.to_json_file(&path).unwrap();
        let loaded = AnalysisConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }
}

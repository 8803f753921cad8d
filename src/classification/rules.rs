//! Ordered threshold rules turning a color profile into a container type
//!
//! Rules are evaluated first-match-wins:
//! 1. Green glass
//! 2. Clear glass (before or after brown glass, per configuration)
//! 3. Brown glass
//! 4. Reusable glass (optional)
//! 5. Fallback ladder with fixed low confidences
//!
//! Hue is in degrees, saturation in percent and brightness on the 0-255 scale.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classification::ContainerType;
use crate::color::ColorProfile;
use crate::config::{
    BrownGlassRule, ClassifierConfig, ClearGlassRule, GreenGlassRule, ReusableGlassRule,
};
use crate::{AnalysisError, Result};

/// Which rule produced a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedRule {
    GreenGlass,
    ClearGlass,
    BrownGlass,
    ReusableGlass,
    FallbackGreenHue,
    FallbackBright,
    FallbackDark,
    FallbackDefault,
}

impl MatchedRule {
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            MatchedRule::FallbackGreenHue
                | MatchedRule::FallbackBright
                | MatchedRule::FallbackDark
                | MatchedRule::FallbackDefault
        )
    }
}

/// Label and confidence chosen by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: ContainerType,
    pub confidence: f32,
    pub rule: MatchedRule,
}

/// The scalar summary the rules look at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSummary {
    pub hue: f32,
    pub saturation: f32,
    pub brightness: f32,
    /// Carried for diagnostics; no rule reads it
    pub variance: f32,
}

impl From<&ColorProfile> for ColorSummary {
    fn from(profile: &ColorProfile) -> Self {
        Self {
            hue: profile.mean_hsv.hue,
            saturation: profile.mean_hsv.saturation,
            brightness: profile.brightness,
            variance: profile.color_variance,
        }
    }
}

impl GreenGlassRule {
    fn hue_matches(&self, hue: f32) -> bool {
        (self.hue_min..=self.hue_max).contains(&hue)
    }

    fn evaluate(&self, s: &ColorSummary) -> Option<f32> {
        (self.hue_matches(s.hue) && s.saturation > self.min_saturation)
            .then(|| (s.saturation / 100.0 * self.saturation_weight + self.base).min(1.0))
    }
}

impl ClearGlassRule {
    fn evaluate(&self, s: &ColorSummary) -> Option<f32> {
        let matches = s.saturation < self.max_saturation
            && s.brightness > self.brightness_min
            && s.brightness < self.brightness_max;
        matches.then(|| {
            ((100.0 - s.saturation) / 100.0 * self.clarity_weight + self.base).min(1.0)
        })
    }
}

impl BrownGlassRule {
    fn evaluate(&self, s: &ColorSummary) -> Option<f32> {
        let hue_matches =
            (self.hue_min..=self.hue_max).contains(&s.hue) || s.hue > self.red_hue_min;
        let matches = hue_matches
            && s.brightness < self.max_brightness
            && s.saturation > self.min_saturation;

        matches.then(|| {
            let dark = (self.max_brightness - s.brightness) / self.max_brightness;
            let sat = s.saturation / 100.0;
            (dark * self.darkness_weight + sat * self.saturation_weight + self.base).min(1.0)
        })
    }
}

impl ReusableGlassRule {
    fn evaluate(&self, s: &ColorSummary) -> Option<f32> {
        let matches = s.saturation < self.max_saturation
            && s.brightness > self.brightness_min
            && s.brightness < self.brightness_max;
        matches.then_some(self.confidence)
    }
}

/// Rule-based container type classifier
#[derive(Debug, Clone)]
pub struct TypeClassifier {
    config: ClassifierConfig,
}

impl TypeClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classify a color profile
    pub fn classify(&self, profile: &ColorProfile) -> Classification {
        self.classify_summary(&ColorSummary::from(profile))
    }

    /// Classify from the scalar summary; always yields a label
    pub fn classify_summary(&self, summary: &ColorSummary) -> Classification {
        let classification = self
            .match_rules(summary)
            .unwrap_or_else(|| self.fallback(summary));

        debug!(
            hue = summary.hue,
            saturation = summary.saturation,
            brightness = summary.brightness,
            label = %classification.label,
            confidence = classification.confidence,
            rule = ?classification.rule,
            "Classified color summary"
        );

        classification
    }

    fn match_rules(&self, s: &ColorSummary) -> Option<Classification> {
        let cfg = &self.config;
        let hit = |label: ContainerType, rule: MatchedRule| {
            move |confidence: f32| Classification {
                label,
                confidence,
                rule,
            }
        };

        let green = || {
            cfg.green
                .evaluate(s)
                .map(hit(ContainerType::GreenGlass, MatchedRule::GreenGlass))
        };
        let clear = || {
            cfg.clear
                .evaluate(s)
                .map(hit(ContainerType::ClearGlass, MatchedRule::ClearGlass))
        };
        let brown = || {
            cfg.brown
                .evaluate(s)
                .map(hit(ContainerType::BrownGlass, MatchedRule::BrownGlass))
        };
        let reusable = || {
            cfg.reusable
                .as_ref()
                .and_then(|r| r.evaluate(s))
                .map(hit(ContainerType::ReusableGlass, MatchedRule::ReusableGlass))
        };

        let ordered = if cfg.clear_before_brown {
            green().or_else(clear).or_else(brown)
        } else {
            green().or_else(brown).or_else(clear)
        };
        ordered.or_else(reusable)
    }

    fn fallback(&self, s: &ColorSummary) -> Classification {
        let ladder = &self.config.fallback;

        let (label, confidence, rule) = if self.config.green.hue_matches(s.hue) {
            (
                ContainerType::GreenGlass,
                ladder.green_confidence,
                MatchedRule::FallbackGreenHue,
            )
        } else if s.brightness > ladder.bright_threshold {
            (
                ladder.bright_label,
                ladder.bright_confidence,
                MatchedRule::FallbackBright,
            )
        } else if s.brightness < ladder.dark_threshold {
            (
                ContainerType::BrownGlass,
                ladder.dark_confidence,
                MatchedRule::FallbackDark,
            )
        } else {
            (
                ContainerType::ClearGlass,
                ladder.default_confidence,
                MatchedRule::FallbackDefault,
            )
        };

        Classification {
            label,
            confidence,
            rule,
        }
    }
}

/// Enforce the confidence floor; the floor itself is accepted
///
/// # Errors
///
/// Returns `AnalysisError::LowConfidence` below the floor
pub fn apply_confidence_floor(
    classification: Classification,
    min_confidence: f32,
) -> Result<Classification> {
    if classification.confidence >= min_confidence {
        Ok(classification)
    } else {
        Err(AnalysisError::LowConfidence {
            label: classification.label,
            confidence: classification.confidence,
            minimum: min_confidence,
        })
    }
}

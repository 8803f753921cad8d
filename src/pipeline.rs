//! End-to-end container analysis
//!
//! [`ContainerAnalyzer`] wires the stages together:
//! raster -> region -> color profile -> label and confidence.
//!
//! The analyzer is built once from a validated configuration and then shared
//! by reference. It holds no mutable state, so concurrent calls need no
//! coordination.

use tracing::{debug, info, warn};

use crate::classification::{apply_confidence_floor, Classification, TypeClassifier};
use crate::color::{ColorProfile, ColorProfiler};
use crate::config::AnalysisConfig;
use crate::detection::{DetectedObject, Detection, ObjectClass, ObjectDetector};
use crate::raster::{Raster, RegionView};
use crate::region::{Rectangle, RegionSelector, RoiOverride};
use crate::{AnalysisError, Result};

/// Outcome of analyzing one region
#[derive(Debug)]
pub struct AnalysisReport {
    /// Region actually analyzed, reported even when classification failed
    pub region: Rectangle,
    /// Color profile, when one could be computed
    pub profile: Option<ColorProfile>,
    /// Classifier output before the confidence floor
    pub classification: Option<Classification>,
    /// Accepted detection, or why there is none
    pub result: Result<Detection>,
}

impl AnalysisReport {
    fn failed(region: Rectangle, error: AnalysisError) -> Self {
        Self {
            region,
            profile: None,
            classification: None,
            result: Err(error),
        }
    }

    /// Accepted detection, if any
    pub fn detection(&self) -> Option<&Detection> {
        self.result.as_ref().ok()
    }

    /// Consume the report, keeping only the outcome
    pub fn into_result(self) -> Result<Detection> {
        self.result
    }
}

/// Color-based container classifier
#[derive(Debug, Clone)]
pub struct ContainerAnalyzer {
    config: AnalysisConfig,
    selector: RegionSelector,
    profiler: ColorProfiler,
    classifier: TypeClassifier,
}

impl ContainerAnalyzer {
    /// Build an analyzer from a configuration
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidParameter` if the configuration fails validation
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            selector: RegionSelector::new(config.roi),
            profiler: ColorProfiler::new(&config),
            classifier: TypeClassifier::new(config.classifier),
            config,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze the configured region of interest (or the override)
    ///
    /// Never fails outright: every failure is carried in
    /// [`AnalysisReport::result`] next to the region that was tried.
    pub fn analyze(&self, raster: &Raster, roi_override: Option<&RoiOverride>) -> AnalysisReport {
        match self.selector.select(raster, roi_override) {
            Ok((view, region)) => self.analyze_view(&view, region),
            Err(err) => {
                let region = match &err {
                    AnalysisError::EmptyRegion { region } => *region,
                    _ => raster.bounds(),
                };
                debug!(%region, error = %err, "Region selection failed");
                AnalysisReport::failed(region, err)
            }
        }
    }

    /// Analyze an explicit pixel rectangle, clamped to the raster
    pub fn analyze_region(&self, raster: &Raster, bounding_box: Rectangle) -> AnalysisReport {
        match RegionSelector::select_box(raster, bounding_box) {
            Ok((view, region)) => self.analyze_view(&view, region),
            Err(err) => {
                let region = match &err {
                    AnalysisError::EmptyRegion { region } => *region,
                    _ => bounding_box.clipped_to(raster.width(), raster.height()),
                };
                debug!(%region, error = %err, "Bounding box rejected");
                AnalysisReport::failed(region, err)
            }
        }
    }

    /// Run an object detector and classify what it found
    ///
    /// Objects below the detector floor and non-container classes are
    /// skipped. Specific container classes pass through with the detector's
    /// confidence; generic containers are classified by color inside their
    /// box and must clear the regular confidence floor.
    ///
    /// # Errors
    ///
    /// Propagates detector failures. Per-object "no detection" outcomes are
    /// skipped, not returned.
    pub fn analyze_with_detector(
        &self,
        raster: &Raster,
        detector: &dyn ObjectDetector,
    ) -> Result<Vec<Detection>> {
        let objects = detector.detect(raster)?;
        debug!(objects = objects.len(), "Object detector finished");

        let mut detections = Vec::new();
        for object in objects {
            if let Some(detection) = self.resolve_object(raster, object)? {
                detections.push(detection);
            }
        }

        info!(detections = detections.len(), "Detector analysis finished");
        Ok(detections)
    }

    fn resolve_object(&self, raster: &Raster, object: DetectedObject) -> Result<Option<Detection>> {
        let floor = self.config.detector.min_confidence;
        if object.confidence < floor {
            debug!(
                class = ?object.class,
                confidence = object.confidence,
                minimum = floor,
                "Skipping low-scoring object"
            );
            return Ok(None);
        }

        match object.class {
            ObjectClass::Other(name) => {
                debug!(class = %name, "Skipping non-container object");
                Ok(None)
            }
            ObjectClass::Container(label) => {
                let region = raster.bounds();
                let bounding_box = Rectangle::clamped(
                    i64::from(object.bounding_box.x),
                    i64::from(object.bounding_box.y),
                    i64::from(object.bounding_box.width),
                    i64::from(object.bounding_box.height),
                    region.width,
                    region.height,
                );
                if bounding_box.is_empty() {
                    return Ok(None);
                }
                Ok(Some(Detection {
                    label,
                    confidence: object.confidence,
                    bounding_box,
                }))
            }
            ObjectClass::GenericContainer => {
                match self.analyze_region(raster, object.bounding_box).result {
                    Ok(detection) => Ok(Some(detection)),
                    Err(err) if err.is_recoverable() => Ok(None),
                    Err(err) => Err(err),
                }
            }
        }
    }

    fn analyze_view(&self, view: &RegionView<'_>, region: Rectangle) -> AnalysisReport {
        let profile = match self.profiler.profile(view) {
            Ok(profile) => profile,
            Err(err) => return AnalysisReport::failed(region, err),
        };

        let classification = self.classifier.classify(&profile);
        let result = apply_confidence_floor(classification, self.config.min_confidence).map(|c| {
            Detection {
                label: c.label,
                confidence: c.confidence,
                bounding_box: region,
            }
        });

        match &result {
            Ok(detection) => info!(
                label = %detection.label,
                confidence = detection.confidence,
                fallback = classification.rule.is_fallback(),
                %region,
                "Container classified"
            ),
            Err(err) => warn!(
                label = %classification.label,
                confidence = classification.confidence,
                fallback = classification.rule.is_fallback(),
                minimum = self.config.min_confidence,
                %region,
                error = %err,
                "Classification rejected"
            ),
        }

        AnalysisReport {
            region,
            profile: Some(profile),
            classification: Some(classification),
            result,
        }
    }
}

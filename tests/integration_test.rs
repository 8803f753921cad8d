//! Integration tests for the complete container analysis pipeline
//!
//! These tests validate the end-to-end workflow on synthetic rasters:
//! - Region selection and overrides
//! - Background suppression and its safety valve
//! - Rule ordering and band boundaries
//! - Confidence floor and error reporting
//! - Object detector integration

use approx::assert_abs_diff_eq;
use recycle_scan::region::RoiGeometry;
use recycle_scan::{
    AnalysisConfig, AnalysisError, ContainerAnalyzer, ContainerType, DetectedObject, MatchedRule,
    ObjectClass, ObjectDetector, Raster, Rectangle, Result, RoiOverride,
};

const BEIGE: [u8; 3] = [150, 110, 80];
const GREEN: [u8; 3] = [40, 160, 50];
const OLIVE_GREEN: [u8; 3] = [100, 140, 40];
/// Saturated light blue: matches no rule and lands on the 0.48 fallback
const PALE_BLUE: [u8; 3] = [120, 120, 220];

fn analyzer(config: AnalysisConfig) -> ContainerAnalyzer {
    ContainerAnalyzer::new(config).unwrap()
}

fn full_frame() -> AnalysisConfig {
    AnalysisConfig::default().with_roi_enabled(false)
}

/// Raster whose pixels are chosen per coordinate
fn raster_from_fn(width: u32, height: u32, pixel: impl Fn(u32, u32) -> [u8; 3]) -> Raster {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&pixel(x, y));
        }
    }
    Raster::from_raw(width, height, data).unwrap()
}

// ============================================================================
// End-to-End Scenarios
// ============================================================================

#[test]
fn test_uniform_green_bottle() {
    let raster = Raster::uniform(120, 160, OLIVE_GREEN).unwrap();
    let report = analyzer(AnalysisConfig::default()).analyze(&raster, None);

    // 25% / 20% / 50% / 60% of 120x160
    assert_eq!(report.region, Rectangle::new(30, 32, 60, 96));

    let detection = report.result.unwrap();
    assert_eq!(detection.label, ContainerType::GreenGlass);
    assert_abs_diff_eq!(detection.confidence, 0.8286, epsilon = 1e-3);
    assert_eq!(detection.bounding_box, Rectangle::new(30, 32, 60, 96));
}

#[test]
fn test_clear_glass_brightness_boundary() {
    let analyzer = analyzer(full_frame());

    let below = Raster::uniform(10, 10, [229, 229, 229]).unwrap();
    let detection = analyzer.analyze(&below, None).result.unwrap();
    assert_eq!(detection.label, ContainerType::ClearGlass);
    assert_abs_diff_eq!(detection.confidence, 0.9, epsilon = 1e-5);

    // The upper bound is exclusive: 230 falls through to the bright fallback
    let at_bound = Raster::uniform(10, 10, [230, 230, 230]).unwrap();
    let report = analyzer.analyze(&at_bound, None);
    assert_eq!(
        report.classification.map(|c| c.rule),
        Some(MatchedRule::FallbackBright)
    );
    match report.result {
        Err(AnalysisError::LowConfidence {
            label, confidence, ..
        }) => {
            assert_eq!(label, ContainerType::ClearGlass);
            assert_abs_diff_eq!(confidence, 0.5);
        }
        other => panic!("Expected LowConfidence, got: {:?}", other),
    }
}

#[test]
fn test_near_white_just_inside_clear_band() {
    // Saturation ~2.2%, brightness ~227.7
    let raster = Raster::uniform(10, 10, [230, 228, 225]).unwrap();
    let detection = analyzer(full_frame()).analyze(&raster, None).result.unwrap();
    assert_eq!(detection.label, ContainerType::ClearGlass);
    assert_abs_diff_eq!(detection.confidence, 0.889, epsilon = 1e-3);
}

#[test]
fn test_green_rule_precedes_brown_rule() {
    // Hue 30, saturation 60%, brightness 84: inside both the green and brown predicates
    let raster = Raster::uniform(16, 16, [120, 84, 48]).unwrap();
    let report = analyzer(full_frame()).analyze(&raster, None);

    let profile = report.profile.as_ref().unwrap();
    assert_abs_diff_eq!(profile.mean_hsv.hue, 30.0, epsilon = 0.05);
    assert!(profile.brightness < 150.0 && profile.mean_hsv.saturation > 30.0);

    let classification = report.classification.unwrap();
    assert_eq!(classification.rule, MatchedRule::GreenGlass);
    assert_eq!(report.result.unwrap().label, ContainerType::GreenGlass);
}

#[test]
fn test_roi_override_selects_subregion() {
    // Green left half, pale blue right half
    let raster = raster_from_fn(100, 60, |x, _| if x < 50 { OLIVE_GREEN } else { PALE_BLUE });
    let analyzer = analyzer(AnalysisConfig::default());

    let left = RoiOverride::full(RoiGeometry::new(0.0, 0.0, 0.4, 1.0));
    let report = analyzer.analyze(&raster, Some(&left));
    assert_eq!(report.region, Rectangle::new(0, 0, 40, 60));
    assert_eq!(report.result.unwrap().label, ContainerType::GreenGlass);

    let right = RoiOverride::full(RoiGeometry::new(0.6, 0.0, 0.4, 1.0));
    let report = analyzer.analyze(&raster, Some(&right));
    assert_eq!(report.region, Rectangle::new(60, 0, 40, 60));
    assert!(matches!(
        report.result,
        Err(AnalysisError::LowConfidence { .. })
    ));
}

#[test]
fn test_extreme_override_is_clamped() {
    let raster = Raster::uniform(64, 48, OLIVE_GREEN).unwrap();
    let over = RoiOverride::full(RoiGeometry::new(-2.0, 0.5, 10.0, f32::INFINITY));
    let report = analyzer(AnalysisConfig::default()).analyze(&raster, Some(&over));
    assert_eq!(report.region, Rectangle::new(0, 24, 64, 24));
    assert!(report.result.is_ok());
}

#[test]
fn test_zero_area_override_is_empty_region() {
    let raster = Raster::uniform(64, 48, OLIVE_GREEN).unwrap();
    let over = RoiOverride {
        x_percent: Some(1.0),
        width_percent: Some(0.0),
        ..RoiOverride::default()
    };
    let report = analyzer(AnalysisConfig::default()).analyze(&raster, Some(&over));
    // x clamps to the last column
    assert_eq!(report.region, Rectangle::new(63, 9, 0, 28));
    assert!(report.profile.is_none());
    assert!(matches!(
        report.result,
        Err(AnalysisError::EmptyRegion { .. })
    ));
}

// ============================================================================
// Background Suppression
// ============================================================================

#[test]
fn test_background_safety_valve_fires() {
    // 90% beige background, 10% green patch
    let raster = raster_from_fn(10, 10, |_, y| if y < 9 { BEIGE } else { GREEN });
    let report = analyzer(full_frame()).analyze(&raster, None);
    let profile = report.profile.unwrap();

    assert!(!profile.background_suppressed);
    assert_eq!(profile.foreground_pixels, 10);
    assert_eq!(profile.pixels_used, 100);
    assert_eq!(profile.total_pixels, 100);
    // The valve falls back to unfiltered pixels, so the background dominates
    assert_eq!(profile.dominant_rgb.to_pixel(), BEIGE);
}

#[test]
fn test_background_mask_applied() {
    // 70% beige background, 30% green patch
    let raster = raster_from_fn(10, 10, |x, _| if x < 7 { BEIGE } else { GREEN });
    let report = analyzer(full_frame()).analyze(&raster, None);
    let profile = report.profile.as_ref().unwrap();

    assert!(profile.background_suppressed);
    assert_eq!(profile.foreground_pixels, 30);
    assert_eq!(profile.pixels_used, 30);
    assert_eq!(profile.dominant_rgb.to_pixel(), GREEN);
    assert_eq!(profile.mean_rgb.to_pixel(), GREEN);
}

// ============================================================================
// Configuration Variants
// ============================================================================

#[test]
fn test_prototype_orders_brown_before_clear() {
    // Hue ~19, saturation ~18%, brightness ~126
    let raster = Raster::uniform(20, 20, [140, 123, 115]).unwrap();

    let refined = analyzer(full_frame()).analyze(&raster, None);
    assert_eq!(refined.result.unwrap().label, ContainerType::ClearGlass);

    let prototype = analyzer(AnalysisConfig::prototype().with_roi_enabled(false)).analyze(&raster, None);
    assert!(!prototype.profile.as_ref().unwrap().background_suppressed);
    assert_eq!(
        prototype.classification.map(|c| c.label),
        Some(ContainerType::BrownGlass)
    );
    // Pale brown is not confident enough
    assert!(matches!(
        prototype.result,
        Err(AnalysisError::LowConfidence { .. })
    ));
}

#[test]
fn test_lower_floor_accepts_fallback() {
    let raster = Raster::uniform(10, 10, PALE_BLUE).unwrap();

    let strict = analyzer(full_frame()).analyze(&raster, None);
    assert!(strict.result.is_err());

    let lenient = analyzer(full_frame().with_min_confidence(0.48)).analyze(&raster, None);
    let detection = lenient.result.unwrap();
    assert_eq!(detection.label, ContainerType::ClearGlass);
    assert_abs_diff_eq!(detection.confidence, 0.48);
}

#[test]
fn test_config_from_json_drives_pipeline() {
    let json = serde_json::to_string(&full_frame().with_min_confidence(0.9)).unwrap();
    let config = AnalysisConfig::from_json_str(&json).unwrap();

    // Green glass at ~0.83 no longer clears the raised floor
    let raster = Raster::uniform(10, 10, OLIVE_GREEN).unwrap();
    let err = analyzer(config).analyze(&raster, None).result.unwrap_err();
    match err {
        AnalysisError::LowConfidence { label, minimum, .. } => {
            assert_eq!(label, ContainerType::GreenGlass);
            assert_abs_diff_eq!(minimum, 0.9);
        }
        other => panic!("Expected LowConfidence, got: {:?}", other),
    }
}

// ============================================================================
// Determinism and Sharing
// ============================================================================

fn noisy_photo() -> Raster {
    raster_from_fn(200, 150, |x, y| {
        let noise = ((x * 37 + y * 11) % 41) as u8;
        if (60..140).contains(&x) {
            [90 + noise, 130 + noise, 30 + noise / 3]
        } else {
            [140 + noise / 2, 100 + noise / 2, 70 + noise / 4]
        }
    })
}

#[test]
fn test_analysis_is_idempotent() {
    let raster = noisy_photo();
    let analyzer = analyzer(full_frame());

    let first = analyzer.analyze(&raster, None);
    let second = analyzer.analyze(&raster, None);

    assert_eq!(first.profile, second.profile);
    assert_eq!(first.classification, second.classification);
    let (a, b) = (first.result.unwrap(), second.result.unwrap());
    assert_eq!(a.label, b.label);
    assert_eq!(a.confidence.to_bits(), b.confidence.to_bits());
}

#[test]
fn test_analyzer_shared_across_threads() {
    let raster = noisy_photo();
    let analyzer = analyzer(AnalysisConfig::default());
    let expected = analyzer.analyze(&raster, None).classification;

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| analyzer.analyze(&raster, None).classification))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

// ============================================================================
// Error Handling
// ============================================================================

#[test]
fn test_malformed_raster_rejected() {
    // 3x3 buffer with four channels per pixel
    let err = Raster::from_raw(3, 3, vec![0; 36]).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidRaster { .. }));
    assert!(!err.is_recoverable());

    let err = Raster::from_raw(0, 3, Vec::new()).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidRaster { .. }));
}

// ============================================================================
// Object Detector Integration
// ============================================================================

struct FixedDetector {
    objects: Vec<DetectedObject>,
}

impl ObjectDetector for FixedDetector {
    fn detect(&self, _raster: &Raster) -> Result<Vec<DetectedObject>> {
        Ok(self.objects.clone())
    }
}

#[test]
fn test_detector_variant() {
    // Green left half, pale blue right half
    let raster = raster_from_fn(100, 50, |x, _| if x < 50 { OLIVE_GREEN } else { PALE_BLUE });
    let detector = FixedDetector {
        objects: vec![
            DetectedObject::new(ObjectClass::GenericContainer, 0.9, Rectangle::new(0, 0, 50, 50)),
            DetectedObject::new(
                ObjectClass::Container(ContainerType::AluminiumCan),
                0.7,
                Rectangle::new(80, 10, 50, 50),
            ),
            DetectedObject::new(ObjectClass::Other("person".into()), 0.95, raster.bounds()),
            DetectedObject::new(ObjectClass::GenericContainer, 0.3, Rectangle::new(0, 0, 50, 50)),
            // Classified by color but below the classifier floor
            DetectedObject::new(ObjectClass::GenericContainer, 0.8, Rectangle::new(50, 0, 50, 50)),
        ],
    };

    let detections = analyzer(AnalysisConfig::default())
        .analyze_with_detector(&raster, &detector)
        .unwrap();

    assert_eq!(detections.len(), 2);

    assert_eq!(detections[0].label, ContainerType::GreenGlass);
    assert_eq!(detections[0].bounding_box, Rectangle::new(0, 0, 50, 50));
    assert_abs_diff_eq!(detections[0].confidence, 0.8286, epsilon = 1e-3);

    assert_eq!(detections[1].label, ContainerType::AluminiumCan);
    assert_eq!(detections[1].bounding_box, Rectangle::new(80, 10, 20, 40));
    assert_abs_diff_eq!(detections[1].confidence, 0.7);
}

#[test]
fn test_detector_failure_propagates() {
    let failing = |_: &Raster| -> Result<Vec<DetectedObject>> {
        Err(AnalysisError::InvalidParameter {
            parameter: "model".into(),
            value: "missing".into(),
        })
    };
    let raster = Raster::uniform(10, 10, OLIVE_GREEN).unwrap();
    let err = analyzer(AnalysisConfig::default())
        .analyze_with_detector(&raster, &failing)
        .unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidParameter { .. }));
}

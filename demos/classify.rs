//! Command-line interface for recycle_scan
//!
//! Basic CLI tool for classifying a container photo and inspecting the
//! region the classifier looked at.

use recycle_scan::image_loader::load_raster;
use recycle_scan::overlay::render_roi_overlay;
use recycle_scan::{AnalysisConfig, AnalysisReport, ContainerAnalyzer, RoiOverride};
use std::{
    env,
    path::{Path, PathBuf},
    process,
};
use tracing_subscriber::EnvFilter;

struct Options {
    image_path: PathBuf,
    config_path: Option<PathBuf>,
    prototype: bool,
    roi_enabled: bool,
    roi_override: RoiOverride,
    overlay_path: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);

    if !options.image_path.exists() {
        eprintln!("Error: File '{}' does not exist", options.image_path.display());
        process::exit(1);
    }

    let config = match &options.config_path {
        Some(path) => AnalysisConfig::from_json_file(path).unwrap_or_else(|e| fail(&e)),
        None if options.prototype => AnalysisConfig::prototype(),
        None => AnalysisConfig::refined(),
    }
    .with_roi_enabled(options.roi_enabled);

    let analyzer = ContainerAnalyzer::new(config).unwrap_or_else(|e| fail(&e));
    let raster = load_raster(&options.image_path).unwrap_or_else(|e| fail(&e));

    let roi_override = (options.roi_override != RoiOverride::default()).then_some(options.roi_override);
    let report = analyzer.analyze(&raster, roi_override.as_ref());

    if let Some(path) = &options.overlay_path {
        save_overlay(&raster, &report, path);
    }

    print_report(&report);

    if report.result.is_err() {
        process::exit(2);
    }
}

fn parse_args(args: &[String]) -> Options {
    let mut image_path_arg = None;
    let mut config_path = None;
    let mut prototype = false;
    let mut roi_enabled = true;
    let mut roi_override = RoiOverride::default();
    let mut overlay_path = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                config_path = Some(PathBuf::from(arg_value(args, i)));
                i += 1;
            }
            "--prototype" => prototype = true,
            "--full-frame" => roi_enabled = false,
            "--roi-x" => {
                roi_override.x_percent = arg_fraction(args, i);
                i += 1;
            }
            "--roi-y" => {
                roi_override.y_percent = arg_fraction(args, i);
                i += 1;
            }
            "--roi-width" => {
                roi_override.width_percent = arg_fraction(args, i);
                i += 1;
            }
            "--roi-height" => {
                roi_override.height_percent = arg_fraction(args, i);
                i += 1;
            }
            "--overlay" => {
                overlay_path = Some(PathBuf::from(arg_value(args, i)));
                i += 1;
            }
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => {
                if image_path_arg.is_none() {
                    image_path_arg = Some(PathBuf::from(arg));
                } else {
                    eprintln!("Error: Multiple image paths provided");
                    process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }

    let image_path = match image_path_arg {
        Some(path) => path,
        None => {
            print_help(&args[0]);
            process::exit(1);
        }
    };

    Options {
        image_path,
        config_path,
        prototype,
        roi_enabled,
        roi_override,
        overlay_path,
    }
}

fn arg_value(args: &[String], i: usize) -> &str {
    match args.get(i + 1) {
        Some(v) => v.as_str(),
        None => {
            eprintln!("Error: {} requires a value", args[i]);
            process::exit(1);
        }
    }
}

fn arg_fraction(args: &[String], i: usize) -> Option<f32> {
    let raw = arg_value(args, i);
    match raw.parse::<f32>() {
        Ok(v) => Some(v),
        Err(_) => {
            eprintln!("Error: {} expects a number, got '{}'", args[i], raw);
            process::exit(1);
        }
    }
}

fn fail(error: &recycle_scan::AnalysisError) -> ! {
    eprintln!("Analysis failed: {}", error);
    eprintln!("Suggestion: {}", error.user_message());
    process::exit(1);
}

fn print_help(program_name: &str) {
    eprintln!("Usage: {} [OPTIONS] <image_path>", program_name);
    eprintln!();
    eprintln!("Classify the material of a beverage container from a photo.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config FILE      Load analysis configuration from JSON");
    eprintln!("  --prototype        Use the prototype rule set (no background suppression)");
    eprintln!("  --full-frame       Analyze the whole image unless an ROI option is given");
    eprintln!("  --roi-x F          ROI left edge as a fraction of the width");
    eprintln!("  --roi-y F          ROI top edge as a fraction of the height");
    eprintln!("  --roi-width F      ROI width as a fraction of the width");
    eprintln!("  --roi-height F     ROI height as a fraction of the height");
    eprintln!("  --overlay FILE     Save a copy of the image with the ROI outlined");
    eprintln!("  --help, -h         Show this help message");
    eprintln!();
    eprintln!("Set RUST_LOG=recycle_scan=debug to trace every stage.");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} bottle.jpg", program_name);
    eprintln!("  {} --roi-x 0.38 --roi-y 0.40 --roi-width 0.24 --roi-height 0.30 bottle.jpg", program_name);
    eprintln!("  {} --overlay roi.png bottle.jpg", program_name);
}

fn save_overlay(raster: &recycle_scan::Raster, report: &AnalysisReport, path: &Path) {
    let image = render_roi_overlay(raster, report.region);
    match image.save(path) {
        Ok(()) => eprintln!("Saved ROI overlay to {}", path.display()),
        Err(e) => eprintln!("Warning: Failed to save overlay: {}", e),
    }
}

fn print_report(report: &AnalysisReport) {
    // JSON to stdout for programmatic use
    let json = serde_json::json!({
        "region": report.region,
        "profile": report.profile,
        "classification": report.classification,
        "detection": report.detection(),
        "error": report.result.as_ref().err().map(|e| e.to_string()),
    });
    match serde_json::to_string_pretty(&json) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error serializing report: {}", e),
    }

    // Summary to stderr for human reading
    eprintln!();
    eprintln!("Container Analysis Summary:");
    eprintln!("  Region: {}", report.region);
    if let Some(profile) = &report.profile {
        eprintln!(
            "  Mean HSV: h={:.1}, s={:.1}%, v={:.1}%",
            profile.mean_hsv.hue, profile.mean_hsv.saturation, profile.mean_hsv.value
        );
        eprintln!("  Brightness: {:.1}", profile.brightness);
        eprintln!(
            "  Pixels used: {} of {} (background suppressed: {})",
            profile.pixels_used, profile.total_pixels, profile.background_suppressed
        );
    }
    if let Some(classification) = &report.classification {
        let kind = if classification.rule.is_fallback() { "fallback" } else { "primary" };
        eprintln!("  Rule: {:?} ({})", classification.rule, kind);
    }
    match &report.result {
        Ok(detection) => eprintln!(
            "  Result: {} ({:.1}%)",
            detection.label.display_name(),
            detection.confidence * 100.0
        ),
        Err(error) => {
            eprintln!("  No detection: {}", error);
            if error.is_recoverable() {
                eprintln!("  Suggestion: {}", error.user_message());
            }
        }
    }
}

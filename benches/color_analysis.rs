use criterion::{black_box, criterion_group, criterion_main, Criterion};
use recycle_scan::color::ColorProfiler;
use recycle_scan::{AnalysisConfig, ContainerAnalyzer, Raster};

/// 640x480 photo stand-in: beige backdrop with a noisy green bottle in the middle
fn synthetic_photo() -> Raster {
    let (width, height) = (640u32, 480u32);
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            let in_bottle = (240..400).contains(&x) && (100..420).contains(&y);
            let noise = ((x * 31 + y * 17) % 23) as u8;
            let pixel = if in_bottle {
                [60 + noise, 140 + noise, 40 + noise / 2]
            } else {
                [150 + noise / 2, 110 + noise / 2, 80]
            };
            data.extend_from_slice(&pixel);
        }
    }
    Raster::from_raw(width, height, data).expect("valid synthetic raster")
}

fn benchmark_color_analysis(c: &mut Criterion) {
    let raster = synthetic_photo();
    let config = AnalysisConfig::default();

    let analyzer = ContainerAnalyzer::new(config.clone()).expect("default config is valid");
    c.bench_function("analyze_default_roi", |b| {
        b.iter(|| black_box(analyzer.analyze(black_box(&raster), None)))
    });

    let profiler = ColorProfiler::new(&config);
    let view = raster.view(raster.bounds());
    c.bench_function("profile_full_frame", |b| {
        b.iter(|| black_box(profiler.profile(black_box(&view))))
    });
}

criterion_group!(benches, benchmark_color_analysis);
criterion_main!(benches);

use hough_filters::binarization::{
    ErrorDiffusionDithering, OrderedDithering, OtsuThreshold, SisThreshold, Threshold,
    ThresholdWithCarry,
};
use hough_filters::config::dither::DitherToolConfig;
use hough_filters::config::{load_config, write_json_file};
use hough_filters::diagnostics::TimingBreakdown;
use hough_filters::image::gray::to_gray8;
use hough_filters::{BilateralSmoothing, ImageView, PixelBuffer};
use serde::Serialize;
use std::env;
use std::path::Path;
use std::time::Instant;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config: DitherToolConfig = load_config(Path::new(&config_path))?;
    let filters = &config.filters;
    let total = Instant::now();
    let mut timing = TimingBreakdown::default();

    let mut source = timing.measure("render", || config.gradient.render());
    if let Some(params) = filters.bilateral {
        let smoothing = BilateralSmoothing::new(params).map_err(|e| e.to_string())?;
        source = timing
            .measure("bilateral", || smoothing.apply(&source.as_view()))
            .map_err(|e| format!("Bilateral smoothing failed: {e}"))?;
    }
    let view = source.as_view();
    let gray = to_gray8(&view);
    let mut results = vec![FilterSummary::new("source", &gray, None)];

    let mut plain = gray.clone();
    timing
        .measure("threshold", || {
            Threshold::new(filters.threshold).apply_in_place(&mut plain)
        })
        .map_err(|e| e.to_string())?;
    results.push(FilterSummary::new("threshold", &plain, Some(filters.threshold)));

    let mut otsu = gray.clone();
    let level = timing
        .measure("otsu", || OtsuThreshold::new().apply_in_place(&mut otsu))
        .map_err(|e| e.to_string())?;
    results.push(FilterSummary::new("otsu", &otsu, Some(level)));

    let mut iterative = gray.clone();
    let level = timing
        .measure("iterative", || filters.iterative.apply_in_place(&mut iterative))
        .map_err(|e| e.to_string())?;
    results.push(FilterSummary::new("iterative", &iterative, Some(level)));

    let sis = SisThreshold::new();
    let (level, sis_out) = timing.measure("sis", || {
        (sis.calculate_threshold(&view), sis.apply(&view))
    });
    results.push(FilterSummary::new("sis", &sis_out, Some(level)));

    let carry = timing.measure("thresholdWithCarry", || {
        ThresholdWithCarry::new(filters.carry_threshold).apply(&view)
    });
    results.push(FilterSummary::new(
        "thresholdWithCarry",
        &carry,
        Some(filters.carry_threshold),
    ));

    let ordered = OrderedDithering::new(filters.ordered_matrix.clone());
    let dithered = timing.measure("ordered", || ordered.apply(&view));
    results.push(FilterSummary::new("ordered", &dithered, None));

    for &method in &filters.diffusion {
        let filter = ErrorDiffusionDithering::from(method);
        let out = timing.measure(method.name(), || filter.apply(&view));
        results.push(FilterSummary::new(method.name(), &out, None));
    }

    timing.total_ms = total.elapsed().as_secs_f64() * 1000.0;
    let report = DitherReport {
        width: source.width(),
        height: source.height(),
        format: source.format().name(),
        filters: results,
        timing,
    };
    write_json_file(&config.output.report_json, &report)?;

    println!("{:<20} {:>8} {:>8}", "filter", "mean", "white%");
    for f in &report.filters {
        println!(
            "{:<20} {:>8.2} {:>8.2}",
            f.name,
            f.mean,
            f.white_ratio * 100.0
        );
    }
    println!("Report written to {}", config.output.report_json.display());
    Ok(())
}

fn usage() -> String {
    "Usage: dither_demo <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FilterSummary {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    threshold: Option<u8>,
    /// Mean gray level; for binary outputs this is the ink coverage scaled to 255.
    mean: f64,
    white_ratio: f64,
}

impl FilterSummary {
    fn new(name: &str, img: &PixelBuffer, threshold: Option<u8>) -> Self {
        let mut sum = 0u64;
        let mut whites = 0usize;
        for row in img.rows() {
            for &v in row {
                sum += v as u64;
                whites += usize::from(v == 255);
            }
        }
        let n = (img.width() * img.height()).max(1) as f64;
        Self {
            name: name.to_string(),
            threshold,
            mean: sum as f64 / n,
            white_ratio: whites as f64 / n,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DitherReport {
    width: usize,
    height: usize,
    format: &'static str,
    filters: Vec<FilterSummary>,
    timing: TimingBreakdown,
}

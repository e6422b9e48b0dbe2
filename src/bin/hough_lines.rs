use hough_filters::config::hough::HoughToolConfig;
use hough_filters::config::{load_config, write_json_file};
use hough_filters::diagnostics::TimingBreakdown;
use hough_filters::{
    HoughCircle, HoughCircleTransform, HoughLine, HoughLineTransform, ImageView, Threshold,
};
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
    let config: HoughToolConfig = load_config(Path::new(&config_path))?;
    let total = Instant::now();
    let mut timing = TimingBreakdown::default();

    let mut edges = timing.measure("render", || config.scene.render());
    timing
        .measure("threshold", || {
            Threshold::new(config.threshold).apply_in_place(&mut edges)
        })
        .map_err(|e| format!("Threshold failed: {e}"))?;

    let mut lines_tf = HoughLineTransform::new(config.lines);
    timing
        .measure("houghLines", || lines_tf.process_image(&edges.as_view()))
        .map_err(|e| format!("Hough line transform failed: {e}"))?;
    let lines = select(
        lines_tf
            .lines_by_relative_intensity(config.report.min_relative_intensity)
            .map_err(|e| e.to_string())?,
        config.report.max_detections,
    );

    let circles = match config.circles {
        Some(params) => {
            let mut circles_tf = HoughCircleTransform::new(params);
            timing
                .measure("houghCircles", || circles_tf.process_image(&edges.as_view()))
                .map_err(|e| format!("Hough circle transform failed: {e}"))?;
            let found = circles_tf
                .circles_by_relative_intensity(config.report.min_relative_intensity)
                .map_err(|e| e.to_string())?;
            Some(select(found, config.report.max_detections))
        }
        None => None,
    };

    timing.total_ms = total.elapsed().as_secs_f64() * 1000.0;
    let report = HoughReport {
        width: edges.width(),
        height: edges.height(),
        max_line_intensity: lines_tf.max_intensity().map_err(|e| e.to_string())?,
        lines,
        circles,
        timing,
    };
    write_json_file(&config.output.report_json, &report)?;

    println!(
        "Detected {} lines{} in {:.2} ms",
        report.lines.len(),
        report
            .circles
            .as_ref()
            .map(|c| format!(" and {} circles", c.len()))
            .unwrap_or_default(),
        report.timing.total_ms
    );
    if let Some(strongest) = report.lines.first() {
        for line in report.lines.iter().take(5) {
            println!(
                "  theta={:>6.2} r={:>5} votes={:>4} rel={:.3} dtheta={:>5.2}",
                line.theta,
                line.radius,
                line.intensity,
                line.relative_intensity,
                line.angle_to(strongest)
            );
        }
    }
    println!("Report written to {}", config.output.report_json.display());
    Ok(())
}

fn select<T: Copy>(found: &[T], max: usize) -> Vec<T> {
    found.iter().take(max).copied().collect()
}

fn usage() -> String {
    "Usage: hough_lines <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HoughReport {
    width: usize,
    height: usize,
    max_line_intensity: u16,
    lines: Vec<HoughLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    circles: Option<Vec<HoughCircle>>,
    timing: TimingBreakdown,
}

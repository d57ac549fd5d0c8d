use lane_geometry::calibration::{LensUndistort, Passthrough, Undistort};
use lane_geometry::config::load_runtime_config;
use lane_geometry::image::io::{list_frames, load_frame, save_frame, save_mask, write_json_file};
use lane_geometry::rectify::RectifierParams;
use lane_geometry::FrameSequenceRunner;
use log::{info, warn};
use std::env;
use std::path::Path;
use std::sync::Arc;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_runtime_config(Path::new(&config_path))?;

    let paths = list_frames(&config.input_dir)?;
    let first = paths
        .first()
        .ok_or_else(|| format!("No frames found in {}", config.input_dir.display()))?;
    let probe = load_frame(first)?;
    let (width, height) = (probe.width(), probe.height());
    info!("{} frames of {}x{} in {}", paths.len(), width, height, config.input_dir.display());

    let mut pipeline = config.pipeline;
    if config.scale_rectifier && pipeline.rectifier == RectifierParams::default() {
        pipeline.rectifier = RectifierParams::scaled_to(width, height);
    }
    pipeline.runner.keep_masks |= config.mask_dir.is_some();
    let undistort: Arc<dyn Undistort> = match config.lens {
        Some(model) => Arc::new(LensUndistort::new(model).map_err(|e| e.to_string())?),
        None => Arc::new(Passthrough),
    };
    let mut runner =
        FrameSequenceRunner::new(undistort, pipeline, width, height).map_err(|e| e.to_string())?;

    // Indices follow the file listing so output names match input positions.
    for (index, path) in paths.iter().enumerate() {
        let frame = match load_frame(path) {
            Ok(frame) => frame,
            Err(err) => {
                warn!("skipping frame {index}: {err}");
                continue;
            }
        };
        let outcome = runner.process_frame(index, frame);
        let out = config.output_dir.join(format!("frame_{index:05}.png"));
        save_frame(&outcome.frame, &out)?;
        if let (Some(dir), Some(mask)) = (&config.mask_dir, &outcome.mask) {
            save_mask(mask, &dir.join(format!("mask_{index:05}.png")))?;
        }
    }

    let report = runner.report();
    info!(
        "{} of {} frames fitted ({:.1}%)",
        report.fitted,
        report.frames,
        100.0 * report.detection_rate()
    );
    for line in report.timing.summary_lines() {
        info!("{line}");
    }
    if let Some(factor) = report.processing_factor {
        info!("Processing Time Factor = x{factor:.1}");
    }
    if let Some(path) = &config.report_json {
        write_json_file(path, &report)?;
        info!("report written to {}", path.display());
    }
    Ok(())
}

fn usage() -> String {
    "Usage: lane_geometry <config.json>".to_string()
}

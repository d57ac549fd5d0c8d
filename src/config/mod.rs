//! JSON configuration for the pipeline and the demo binary.
//!
//! Every block is `#[serde(default)]`, so a document only needs to name the
//! values it overrides:
//!
//! ```json
//! { "fusion": { "kernel_size": 9 }, "runner": { "strategy": "reuse_previous" } }
//! ```

use crate::fusion::FusionParams;
use crate::lanes::LaneFitParams;
use crate::overlay::OverlayParams;
use crate::rectify::RectifierParams;
use crate::runner::RunnerParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub fusion: FusionParams,
    pub rectifier: RectifierParams,
    pub lanes: LaneFitParams,
    pub overlay: OverlayParams,
    pub runner: RunnerParams,
}

/// Demo binary settings: where frames come from and where results go.
#[derive(Debug, Deserialize)]
pub struct RuntimeConfig {
    /// Directory of PNG/JPEG frames, processed in file-name order.
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    #[serde(default)]
    pub report_json: Option<PathBuf>,
    /// Write each frame's fused camera-view mask here when set.
    #[serde(default)]
    pub mask_dir: Option<PathBuf>,
    /// Rescale the default plan-view points to the input resolution when no
    /// explicit points are given.
    #[serde(default = "default_true")]
    pub scale_rectifier: bool,
    /// Optional lens model; frames pass through untouched without one.
    #[serde(default)]
    pub lens: Option<crate::calibration::LensModel>,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

fn default_true() -> bool {
    true
}

pub fn load_config(path: &Path) -> Result<PipelineConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

pub fn load_runtime_config(path: &Path) -> Result<RuntimeConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::Inclusive;
    use crate::runner::FitStrategy;

    #[test]
    fn partial_document_keeps_defaults() {
        let cfg: PipelineConfig = serde_json::from_str(
            r#"{ "fusion": { "kernel_size": 9, "s_thresh": [170, 255] },
                 "runner": { "strategy": "reuse_previous" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.fusion.kernel_size, 9);
        assert_eq!(cfg.fusion.s_thresh, Inclusive(170, 255));
        assert_eq!(cfg.fusion.gx_thresh, Inclusive(50, 255));
        assert_eq!(cfg.runner.strategy, FitStrategy::ReusePrevious);
        assert_eq!(cfg.lanes, LaneFitParams::default());
        assert_eq!(cfg.rectifier, RectifierParams::default());
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_config(Path::new("/nonexistent/lane.json")).unwrap_err();
        assert!(err.contains("Failed to read config"));
    }

    #[test]
    fn runtime_config_defaults() {
        let cfg: RuntimeConfig =
            serde_json::from_str(r#"{ "input_dir": "in", "output_dir": "out" }"#).unwrap();
        assert!(cfg.scale_rectifier);
        assert!(cfg.lens.is_none());
        assert!(cfg.mask_dir.is_none());
        assert_eq!(cfg.pipeline, PipelineConfig::default());
    }
}

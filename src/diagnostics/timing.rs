use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pipeline stages timed per frame, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Undistort,
    Detect,
    Warp,
    Fit,
    Overlay,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Undistort,
        Stage::Detect,
        Stage::Warp,
        Stage::Fit,
        Stage::Overlay,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stage::Undistort => "Distortion Correction",
            Stage::Detect => "Edge Detection",
            Stage::Warp => "Perspective Transform",
            Stage::Fit => "Lane Fitting",
            Stage::Overlay => "Overlay Drawing",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Accumulated elapsed time of one stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
    /// Share of the run's wall-clock total, percent.
    pub percent: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64, total_ms: f64) -> Self {
        let percent = if total_ms > 0.0 {
            100.0 * elapsed_ms / total_ms
        } else {
            0.0
        };
        Self {
            label: label.into(),
            elapsed_ms,
            percent,
        }
    }
}

/// Timing summary of a run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub frames: usize,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn with_total(total_ms: f64) -> Self {
        Self {
            total_ms,
            frames: 0,
            stages: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages
            .push(StageTiming::new(label, elapsed_ms, self.total_ms));
    }

    /// Wall-clock time over source duration; `None` for an empty source.
    pub fn processing_factor(&self, source_secs: f64) -> Option<f64> {
        (source_secs > 0.0 && source_secs.is_finite()).then(|| self.total_ms / 1000.0 / source_secs)
    }

    /// Aligned, human-readable table: total first, then one line per stage.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.stages.len() + 1);
        lines.push(format!(
            "{:<30}: {:>10.1} ms ({} frames)",
            "Total Time", self.total_ms, self.frames
        ));
        for s in &self.stages {
            lines.push(format!(
                "{:<30}: {:>10.1} ms ({:5.1}%)",
                s.label, s.elapsed_ms, s.percent
            ));
        }
        lines
    }
}

/// Per-stage elapsed time accumulator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StageClock {
    elapsed: [Duration; 5],
}

impl StageClock {
    pub fn record(&mut self, stage: Stage, elapsed: Duration) {
        self.elapsed[stage.index()] += elapsed;
    }

    pub fn get(&self, stage: Stage) -> Duration {
        self.elapsed[stage.index()]
    }

    pub fn merge(&mut self, other: &StageClock) {
        for (a, b) in self.elapsed.iter_mut().zip(&other.elapsed) {
            *a += *b;
        }
    }

    /// Sum over all stages.
    pub fn busy(&self) -> Duration {
        self.elapsed.iter().sum()
    }

    pub fn breakdown(&self, wall: Duration, frames: usize) -> TimingBreakdown {
        let mut out = TimingBreakdown::with_total(wall.as_secs_f64() * 1000.0);
        out.frames = frames;
        for stage in Stage::ALL {
            out.push(stage.label(), self.get(stage).as_secs_f64() * 1000.0);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_are_relative_to_wall_time() {
        let mut clock = StageClock::default();
        clock.record(Stage::Detect, Duration::from_millis(30));
        clock.record(Stage::Fit, Duration::from_millis(10));
        clock.record(Stage::Detect, Duration::from_millis(10));
        let report = clock.breakdown(Duration::from_millis(100), 4);
        assert_eq!(report.stages.len(), 5);
        let detect = &report.stages[1];
        assert_eq!(detect.label, "Edge Detection");
        assert!((detect.percent - 40.0).abs() < 1e-9);
        assert!((report.stages[3].percent - 10.0).abs() < 1e-9);
        assert_eq!(report.summary_lines().len(), 6);
    }

    #[test]
    fn merge_adds_stage_times() {
        let mut a = StageClock::default();
        a.record(Stage::Warp, Duration::from_millis(5));
        let mut b = StageClock::default();
        b.record(Stage::Warp, Duration::from_millis(7));
        b.record(Stage::Overlay, Duration::from_millis(1));
        a.merge(&b);
        assert_eq!(a.get(Stage::Warp), Duration::from_millis(12));
        assert_eq!(a.busy(), Duration::from_millis(13));
    }

    #[test]
    fn processing_factor_needs_a_duration() {
        let t = TimingBreakdown::with_total(5000.0);
        assert_eq!(t.processing_factor(2.0), Some(2.5));
        assert_eq!(t.processing_factor(0.0), None);
        assert!(TimingBreakdown::default().summary_lines()[0].contains("0 frames"));
    }
}

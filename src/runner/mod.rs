//! Ordered per-frame pipeline.
//!
//! Each frame goes through undistort → detect → warp → fit → overlay and
//! yields a [`FrameOutcome`]. Outcomes are always returned in input order,
//! whether batches run sequentially or on the rayon pool. A frame that fails
//! produces an annotated copy of its best available image and never stops the
//! run.

mod cancel;
mod params;
mod stream;

pub use cancel::CancelToken;
pub use params::{FitStrategy, RunnerParams};
pub use stream::FrameStream;

use crate::calibration::Undistort;
use crate::config::PipelineConfig;
use crate::diagnostics::{RunReport, Stage, StageClock, TimingBreakdown};
use crate::error::{ensure_dims, LaneError, Result};
use crate::fusion::SignalFusionDetector;
use crate::image::{Frame, Mask};
use crate::lanes::LaneCurveFitter;
use crate::overlay::OverlayComposer;
use crate::rectify::PlanarRectifier;
use crate::types::LaneFitResult;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of processing one input frame.
#[derive(Clone, Debug)]
pub struct FrameOutcome {
    /// Position of the frame in the input sequence.
    pub index: usize,
    /// Overlay on success, annotated frame on failure.
    pub frame: Frame,
    pub fit: std::result::Result<LaneFitResult, LaneError>,
    /// Fused camera-view mask, when `keep_masks` is set and detection ran.
    pub mask: Option<Mask>,
}

impl FrameOutcome {
    pub fn is_fitted(&self) -> bool {
        self.fit.is_ok()
    }
}

pub struct FrameSequenceRunner {
    undistort: Arc<dyn Undistort>,
    detector: SignalFusionDetector,
    rectifier: PlanarRectifier,
    fitter: LaneCurveFitter,
    composer: OverlayComposer,
    params: RunnerParams,
    width: usize,
    height: usize,
    previous: Option<LaneFitResult>,
    clock: StageClock,
    wall: Duration,
    report: RunReport,
}

impl FrameSequenceRunner {
    /// Build every stage for `width × height` frames. All configuration
    /// errors surface here.
    pub fn new(
        undistort: Arc<dyn Undistort>,
        config: PipelineConfig,
        width: usize,
        height: usize,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LaneError::config(format!(
                "frame size must be positive, got {width}x{height}"
            )));
        }
        config.runner.validate()?;
        let detector = SignalFusionDetector::new(config.fusion)?;
        let rectifier = PlanarRectifier::new(&config.rectifier)?;
        let fitter = LaneCurveFitter::new(width, height, config.lanes)?;
        let composer = OverlayComposer::new(config.overlay)?;
        debug!(
            "FrameSequenceRunner::new {}x{} parallel={} strategy={:?}",
            width,
            height,
            config.runner.runs_parallel(),
            config.runner.strategy
        );
        Ok(Self {
            undistort,
            detector,
            rectifier,
            fitter,
            composer,
            params: config.runner,
            width,
            height,
            previous: None,
            clock: StageClock::default(),
            wall: Duration::ZERO,
            report: RunReport::default(),
        })
    }

    pub fn params(&self) -> &RunnerParams {
        &self.params
    }

    pub fn rectifier(&self) -> &PlanarRectifier {
        &self.rectifier
    }

    /// Process every frame in order.
    pub fn run<I>(&mut self, frames: I) -> Vec<FrameOutcome>
    where
        I: IntoIterator<Item = Frame>,
    {
        self.run_until(frames, &CancelToken::new())
    }

    /// Process frames in order until `cancel` is raised.
    ///
    /// The token is checked after every frame taken from the input. A frame
    /// pulled once the token is raised is dropped; frames pulled before it
    /// are always processed, including the rest of a parallel batch.
    pub fn run_until<I>(&mut self, frames: I, cancel: &CancelToken) -> Vec<FrameOutcome>
    where
        I: IntoIterator<Item = Frame>,
    {
        let start = Instant::now();
        let first = self.report.frames;
        let mut outcomes = Vec::new();
        let mut frames = frames.into_iter();
        if self.params.runs_parallel() {
            loop {
                let base = first + outcomes.len();
                let batch = take_batch(&mut frames, self.params.batch_size, cancel, base);
                if batch.is_empty() {
                    break;
                }
                for (outcome, clock) in self.process_batch(batch) {
                    self.record(&outcome, &clock);
                    outcomes.push(outcome);
                }
                if cancel.is_cancelled() {
                    break;
                }
            }
        } else {
            for frame in frames {
                if cancel.is_cancelled() {
                    break;
                }
                let index = first + outcomes.len();
                outcomes.push(self.process_sequential(index, frame));
            }
        }
        self.wall += start.elapsed();
        if cancel.is_cancelled() {
            info!("run cancelled after {} frames", outcomes.len());
        }
        self.log_summary();
        outcomes
    }

    /// Lazily process `frames`, one outcome per `next()`.
    pub fn stream<I>(&mut self, frames: I) -> FrameStream<'_, I::IntoIter>
    where
        I: IntoIterator<Item = Frame>,
    {
        FrameStream::new(self, frames.into_iter())
    }

    /// Process a single frame and fold it into the run statistics.
    pub fn process_frame(&mut self, index: usize, frame: Frame) -> FrameOutcome {
        let start = Instant::now();
        let outcome = self.process_sequential(index, frame);
        self.wall += start.elapsed();
        outcome
    }

    /// Accumulated timings over everything processed so far.
    pub fn timings(&self) -> TimingBreakdown {
        self.clock.breakdown(self.wall, self.report.frames)
    }

    pub fn report(&self) -> RunReport {
        let timing = self.timings();
        let processing_factor = self
            .params
            .source_fps
            .and_then(|fps| timing.processing_factor(self.report.frames as f64 / fps));
        RunReport {
            timing,
            processing_factor,
            ..self.report.clone()
        }
    }

    fn process_sequential(&mut self, index: usize, frame: Frame) -> FrameOutcome {
        let prior = match self.params.strategy {
            FitStrategy::ReusePrevious => self.previous.take(),
            FitStrategy::Independent => None,
        };
        let (outcome, clock) = self.process_one(index, frame, prior.as_ref());
        if self.params.strategy == FitStrategy::ReusePrevious {
            self.previous = outcome.fit.as_ref().ok().cloned();
        }
        self.record(&outcome, &clock);
        outcome
    }

    #[cfg(feature = "parallel")]
    fn process_batch(&self, batch: Vec<(usize, Frame)>) -> Vec<(FrameOutcome, StageClock)> {
        use rayon::prelude::*;
        batch
            .into_par_iter()
            .map(|(index, frame)| self.process_one(index, frame, None))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn process_batch(&self, batch: Vec<(usize, Frame)>) -> Vec<(FrameOutcome, StageClock)> {
        batch
            .into_iter()
            .map(|(index, frame)| self.process_one(index, frame, None))
            .collect()
    }

    fn record(&mut self, outcome: &FrameOutcome, clock: &StageClock) {
        self.clock.merge(clock);
        self.report.frames += 1;
        match &outcome.fit {
            Ok(_) => self.report.fitted += 1,
            Err(err) => {
                warn!("frame {}: {}", outcome.index, err);
                self.report.record_failure(outcome.index, err);
            }
        }
    }

    fn log_summary(&self) {
        info!(
            "processed {} frames, {} fitted, {} failed",
            self.report.frames,
            self.report.fitted,
            self.report.failed()
        );
        for line in self.timings().summary_lines() {
            info!("{line}");
        }
    }

    fn process_one(
        &self,
        index: usize,
        frame: Frame,
        prior: Option<&LaneFitResult>,
    ) -> (FrameOutcome, StageClock) {
        let mut clock = StageClock::default();
        let fail = |frame: &Frame, err: LaneError, mask: Option<Mask>| FrameOutcome {
            index,
            frame: self.composer.annotate_failure(frame, &err),
            fit: Err(err),
            mask,
        };

        if let Err(err) = ensure_dims((self.width, self.height), (frame.width(), frame.height())) {
            return (fail(&frame, err, None), clock);
        }
        let undistorted = match timed(&mut clock, Stage::Undistort, || self.undistort.undistort(&frame)) {
            Ok(f) => f,
            Err(err) => return (fail(&frame, err, None), clock),
        };
        if let Err(err) = ensure_dims(
            (self.width, self.height),
            (undistorted.width(), undistorted.height()),
        ) {
            return (fail(&frame, err, None), clock);
        }

        let mask = timed(&mut clock, Stage::Detect, || self.detector.detect(&undistorted));
        let plan = timed(&mut clock, Stage::Warp, || self.rectifier.warp(&mask));
        let fit = timed(&mut clock, Stage::Fit, || match prior {
            Some(prior) => self.fitter.fit_near(&plan, prior),
            None => self.fitter.fit(&plan),
        });
        let mask = self.params.keep_masks.then_some(mask);
        let fit = match fit {
            Ok(fit) => fit,
            Err(err) => return (fail(&undistorted, err, mask), clock),
        };
        let composed = timed(&mut clock, Stage::Overlay, || {
            self.composer.compose(&self.rectifier, &fit, &undistorted, &plan)
        });
        let outcome = match composed {
            Ok(out) => FrameOutcome {
                index,
                frame: out,
                fit: Ok(fit),
                mask,
            },
            Err(err) => fail(&undistorted, err, mask),
        };
        (outcome, clock)
    }
}

/// Pull up to `size` indexed frames, stopping at the first frame that arrives
/// after `cancel` was raised.
fn take_batch<I: Iterator<Item = Frame>>(
    frames: &mut I,
    size: usize,
    cancel: &CancelToken,
    base: usize,
) -> Vec<(usize, Frame)> {
    let mut batch = Vec::with_capacity(size);
    while batch.len() < size {
        let Some(frame) = frames.next() else { break };
        if cancel.is_cancelled() {
            break;
        }
        batch.push((base + batch.len(), frame));
    }
    batch
}

fn timed<T>(clock: &mut StageClock, stage: Stage, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    clock.record(stage, start.elapsed());
    out
}

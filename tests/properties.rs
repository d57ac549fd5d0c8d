mod common;

use common::synthetic_image::{noise_frame, parabola_mask};
use lane_geometry::calibration::{Passthrough, Undistort};
use lane_geometry::config::PipelineConfig;
use lane_geometry::edges::{threshold_u8, Inclusive};
use lane_geometry::error::{LaneError, Result};
use lane_geometry::fusion::SignalFusionDetector;
use lane_geometry::image::{Frame, GrayImageU8, Mask};
use lane_geometry::lanes::{LaneCurveFitter, LaneFitParams};
use lane_geometry::rectify::{PlanarRectifier, RectifierParams};
use lane_geometry::runner::{CancelToken, FrameSequenceRunner, RunnerParams};
use lane_geometry::types::Polynomial2;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn straight(x: f64) -> Polynomial2 {
    Polynomial2::new(0.0, 0.0, x)
}

fn tiny_runner(runner: RunnerParams, undistort: Arc<dyn Undistort>) -> FrameSequenceRunner {
    let config = PipelineConfig {
        rectifier: RectifierParams::scaled_to(160, 90),
        runner,
        ..Default::default()
    };
    FrameSequenceRunner::new(undistort, config, 160, 90).unwrap()
}

#[test]
fn detector_masks_match_input_size_and_are_binary() {
    init_logger();
    let detector = SignalFusionDetector::default();
    for (i, (w, h)) in [(64, 48), (33, 17), (128, 72)].into_iter().enumerate() {
        let frame = noise_frame(w, h, i as u64);
        let mask = detector.detect(&frame);
        assert_eq!((mask.width(), mask.height()), (w, h));
        assert!(mask.is_binary());
    }
}

#[test]
fn uniform_grey_frame_yields_empty_mask() {
    let mask = SignalFusionDetector::default().detect(&Frame::filled(96, 54, [128, 128, 128]));
    assert_eq!(mask.count_on(), 0);
}

#[test]
fn camera_points_survive_plan_view_round_trip() {
    let rect = PlanarRectifier::new(&RectifierParams::default()).unwrap();
    let pts: Vec<[f64; 2]> = (0..40)
        .flat_map(|i| (0..6).map(move |j| [40.0 + 30.0 * i as f64, 460.0 + 40.0 * j as f64]))
        .collect();
    let plan = rect.warp_points(&pts).unwrap();
    let back = rect.unwarp_points(&plan).unwrap();
    for (p, q) in pts.iter().zip(&back) {
        assert!((p[0] - q[0]).abs() < 1e-6 && (p[1] - q[1]).abs() < 1e-6, "{p:?} -> {q:?}");
        let err = rect.mapping().round_trip_error(*p).unwrap();
        assert!(err < 1e-6);
    }
}

#[test]
fn threshold_bounds_are_inclusive() {
    let gray = GrayImageU8::new(4, 1, vec![49, 50, 200, 201]);
    let mask = threshold_u8(&gray, Inclusive(50, 200));
    assert_eq!(mask.as_bytes(), &[0, 1, 1, 0]);
}

#[test]
fn straight_lines_have_near_infinite_radius() {
    let mask = parabola_mask(1280, 720, straight(300.0), straight(980.0), 3.0);
    let fit = LaneCurveFitter::new(1280, 720, LaneFitParams::default())
        .unwrap()
        .fit(&mask)
        .unwrap();
    let (l, r) = fit.curvature();
    assert!(l > 1e5 && r > 1e5, "radii {l} {r}");
}

#[test]
fn vehicle_offset_is_negative_when_vehicle_is_left_of_lane_center() {
    let fitter = LaneCurveFitter::new(1280, 720, LaneFitParams::default()).unwrap();
    // Lane center at 740: the camera (x = 640) sits left of it.
    let right_shift = parabola_mask(1280, 720, straight(440.0), straight(1040.0), 3.0);
    let offset = fitter.fit(&right_shift).unwrap().vehicle_offset();
    assert!(offset < 0.0);
    assert!((offset - (-100.0 * 3.7 / 700.0)).abs() < 1e-3);
    // Lane center at 540: the camera sits right of it.
    let left_shift = parabola_mask(1280, 720, straight(240.0), straight(840.0), 3.0);
    assert!(fitter.fit(&left_shift).unwrap().vehicle_offset() > 0.0);
}

#[test]
fn blank_frames_report_no_detection_and_keep_going() {
    init_logger();
    let mut runner = tiny_runner(RunnerParams::default(), Arc::new(Passthrough));
    let outcomes = runner.run(vec![Frame::filled(160, 90, [70, 70, 70]); 4]);
    assert_eq!(outcomes.len(), 4);
    for (i, outcome) in outcomes.iter().enumerate() {
        assert_eq!(outcome.index, i);
        let err = outcome.fit.as_ref().unwrap_err();
        assert!(err.is_no_detection());
        assert_eq!((outcome.frame.width(), outcome.frame.height()), (160, 90));
    }
    let report = runner.report();
    assert_eq!((report.frames, report.fitted, report.failed()), (4, 0, 4));
}

#[test]
fn wrong_sized_frame_fails_alone() {
    let mut runner = tiny_runner(
        RunnerParams {
            parallel: false,
            ..Default::default()
        },
        Arc::new(Passthrough),
    );
    let frames = vec![
        Frame::new(160, 90),
        Frame::new(80, 45),
        Frame::new(160, 90),
    ];
    let outcomes = runner.run(frames);
    assert_eq!(outcomes.len(), 3);
    assert!(matches!(
        outcomes[1].fit,
        Err(LaneError::DimensionMismatch { .. })
    ));
    assert_eq!(outcomes[1].frame.width(), 80);
    assert!(outcomes[2].fit.as_ref().unwrap_err().is_no_detection());
}

struct FailSecondCall(AtomicUsize);

impl Undistort for FailSecondCall {
    fn undistort(&self, frame: &Frame) -> Result<Frame> {
        if self.0.fetch_add(1, Ordering::SeqCst) == 1 {
            Err(LaneError::Undistort("calibration unavailable".into()))
        } else {
            Ok(frame.clone())
        }
    }
}

#[test]
fn undistort_failure_is_reported_per_frame() {
    let mut runner = tiny_runner(
        RunnerParams {
            parallel: false,
            ..Default::default()
        },
        Arc::new(FailSecondCall(AtomicUsize::new(0))),
    );
    let outcomes = runner.run(vec![Frame::new(160, 90); 3]);
    assert!(matches!(outcomes[1].fit, Err(LaneError::Undistort(_))));
    assert!(!matches!(outcomes[2].fit, Err(LaneError::Undistort(_))));
    assert_eq!(runner.report().failures[1].index, 1);
}

#[test]
fn cancelled_before_start_yields_nothing() {
    for parallel in [false, true] {
        let mut runner = tiny_runner(
            RunnerParams {
                parallel,
                batch_size: 2,
                ..Default::default()
            },
            Arc::new(Passthrough),
        );
        let token = CancelToken::new();
        token.cancel();
        assert!(runner.run_until(vec![Frame::new(160, 90); 5], &token).is_empty());
    }
}

#[test]
fn cancelling_after_frame_k_keeps_k_plus_one_outcomes() {
    let k = 2;
    // Batch sizes put the cancelling frame mid-batch and at a batch boundary.
    for (parallel, batch_size) in [(false, 8), (true, 2), (true, 4), (true, 8)] {
        let mut runner = tiny_runner(
            RunnerParams {
                parallel,
                batch_size,
                ..Default::default()
            },
            Arc::new(Passthrough),
        );
        let token = CancelToken::new();
        let trigger = token.clone();
        let pulled = Arc::new(AtomicUsize::new(0));
        let counter = pulled.clone();
        let frames = (0..6).map(move |i| {
            counter.fetch_add(1, Ordering::SeqCst);
            if i == k + 1 {
                trigger.cancel();
            }
            Frame::new(160, 90)
        });
        let outcomes = runner.run_until(frames, &token);
        let indices: Vec<usize> = outcomes.iter().map(|o| o.index).collect();
        assert_eq!(
            indices,
            (0..=k).collect::<Vec<_>>(),
            "parallel={parallel} batch_size={batch_size}"
        );
        assert_eq!(pulled.load(Ordering::SeqCst), k + 2);
        assert_eq!(runner.report().frames, k + 1);
    }
}

#[test]
fn stream_stops_when_its_token_is_raised() {
    for parallel in [false, true] {
        let mut runner = tiny_runner(
            RunnerParams {
                parallel,
                ..Default::default()
            },
            Arc::new(Passthrough),
        );
        let mut stream = runner.stream(vec![Frame::new(160, 90); 5]);
        let token = stream.cancel_token();
        assert_eq!(stream.next().map(|o| o.index), Some(0));
        assert_eq!(stream.next().map(|o| o.index), Some(1));
        token.cancel();
        assert!(stream.next().is_none());
        drop(stream);
        assert_eq!(runner.report().frames, 2);
    }
}

#[test]
fn masks_are_attached_only_on_request() {
    for keep_masks in [false, true] {
        let mut runner = tiny_runner(
            RunnerParams {
                keep_masks,
                ..Default::default()
            },
            Arc::new(Passthrough),
        );
        let outcomes = runner.run(vec![noise_frame(160, 90, 7), Frame::new(80, 45)]);
        assert_eq!(outcomes.len(), 2);
        match &outcomes[0].mask {
            Some(mask) => {
                assert!(keep_masks);
                assert_eq!((mask.width(), mask.height()), (160, 90));
                assert!(mask.is_binary());
            }
            None => assert!(!keep_masks),
        }
        // Size mismatch fails before detection.
        assert!(!outcomes[1].is_fitted());
        assert!(outcomes[1].mask.is_none());
    }
}

#[test]
fn parallel_batches_preserve_order() {
    let mut runner = tiny_runner(
        RunnerParams {
            parallel: true,
            batch_size: 3,
            ..Default::default()
        },
        Arc::new(Passthrough),
    );
    let frames: Vec<Frame> = (0..7).map(|i| noise_frame(160, 90, i)).collect();
    let outcomes = runner.run(frames);
    let indices: Vec<usize> = outcomes.iter().map(|o| o.index).collect();
    assert_eq!(indices, (0..7).collect::<Vec<_>>());
    assert_eq!(runner.timings().frames, 7);
}

#[test]
fn fitter_rejects_mask_of_wrong_size() {
    let fitter = LaneCurveFitter::new(160, 90, LaneFitParams::default()).unwrap();
    assert!(matches!(
        fitter.fit(&Mask::new(90, 160)),
        Err(LaneError::DimensionMismatch { .. })
    ));
}

#[test]
fn process_frame_keeps_caller_indices_across_gaps() {
    let mut runner = tiny_runner(RunnerParams::default(), Arc::new(Passthrough));
    let first = runner.process_frame(0, Frame::new(160, 90));
    // Index 1 is an unreadable input the caller skipped.
    let third = runner.process_frame(2, Frame::new(80, 45));
    assert_eq!((first.index, third.index), (0, 2));
    let report = runner.report();
    assert_eq!(report.frames, 2);
    assert_eq!(report.failures.last().map(|f| f.index), Some(2));
}

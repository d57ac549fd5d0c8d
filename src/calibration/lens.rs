use super::Undistort;
use crate::error::{LaneError, Result};
use crate::image::{Frame, Raster};
use crate::rectify::bilinear;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Pinhole intrinsics, pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

impl CameraIntrinsics {
    fn is_valid(&self) -> bool {
        [self.fx, self.fy, self.cx, self.cy].iter().all(|v| v.is_finite())
            && self.fx.abs() > 1e-12
            && self.fy.abs() > 1e-12
    }
}

/// Brown–Conrady coefficients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialTangential {
    pub k1: f64,
    pub k2: f64,
    pub p1: f64,
    pub p2: f64,
    pub k3: f64,
}

impl RadialTangential {
    fn distort(&self, [x, y]: [f64; 2]) -> [f64; 2] {
        let r2 = x * x + y * y;
        let radial = 1.0 + r2 * (self.k1 + r2 * (self.k2 + r2 * self.k3));
        let x_tan = 2.0 * self.p1 * x * y + self.p2 * (r2 + 2.0 * x * x);
        let y_tan = self.p1 * (r2 + 2.0 * y * y) + 2.0 * self.p2 * x * y;
        [x * radial + x_tan, y * radial + y_tan]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LensModel {
    pub intrinsics: CameraIntrinsics,
    #[serde(default)]
    pub distortion: RadialTangential,
}

impl LensModel {
    /// Distorted source pixel observed for undistorted pixel `p`.
    pub fn distort_pixel(&self, p: [f64; 2]) -> Option<[f64; 2]> {
        let k = &self.intrinsics;
        let n = [(p[0] - k.cx) / k.fx, (p[1] - k.cy) / k.fy];
        let d = self.distortion.distort(n);
        let out = [k.fx * d[0] + k.cx, k.fy * d[1] + k.cy];
        (out[0].is_finite() && out[1].is_finite()).then_some(out)
    }
}

/// Exact identity of a remap table: every model coefficient plus the frame
/// size. Coefficients compare by bit pattern so the key is `Eq + Hash`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalibrationKey {
    coefficients: [u64; 9],
    width: usize,
    height: usize,
}

impl CalibrationKey {
    pub fn new(model: &LensModel, width: usize, height: usize) -> Self {
        let k = &model.intrinsics;
        let d = &model.distortion;
        let values = [k.fx, k.fy, k.cx, k.cy, d.k1, d.k2, d.p1, d.p2, d.k3];
        Self {
            coefficients: values.map(f64::to_bits),
            width,
            height,
        }
    }
}

/// Per-pixel distorted source coordinates for one key.
struct RemapTable {
    key: CalibrationKey,
    coords: Vec<[f32; 2]>,
}

/// Undistorts frames with a fixed lens model by bilinear remapping.
///
/// The remap table is built lazily for the first frame size seen and rebuilt
/// only when the size changes.
pub struct LensUndistort {
    model: LensModel,
    cache: Mutex<Option<Arc<RemapTable>>>,
    builds: AtomicUsize,
}

impl std::fmt::Debug for LensUndistort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LensUndistort")
            .field("model", &self.model)
            .field("builds", &self.table_builds())
            .finish()
    }
}

impl LensUndistort {
    pub fn new(model: LensModel) -> Result<Self> {
        if !model.intrinsics.is_valid() {
            return Err(LaneError::config("camera intrinsics must be finite with non-zero focal lengths"));
        }
        let d = &model.distortion;
        if [d.k1, d.k2, d.p1, d.p2, d.k3].iter().any(|v| !v.is_finite()) {
            return Err(LaneError::config("distortion coefficients must be finite"));
        }
        Ok(Self {
            model,
            cache: Mutex::new(None),
            builds: AtomicUsize::new(0),
        })
    }

    pub fn model(&self) -> &LensModel {
        &self.model
    }

    /// Number of remap tables built so far.
    pub fn table_builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    fn table(&self, width: usize, height: usize) -> Result<Arc<RemapTable>> {
        let key = CalibrationKey::new(&self.model, width, height);
        let mut slot = self
            .cache
            .lock()
            .map_err(|_| LaneError::Undistort("remap cache lock poisoned".into()))?;
        if let Some(table) = slot.as_ref().filter(|t| t.key == key) {
            return Ok(Arc::clone(table));
        }
        let mut coords = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let [sx, sy] = self
                    .model
                    .distort_pixel([x as f64, y as f64])
                    .unwrap_or([f64::NAN, f64::NAN]);
                coords.push([sx as f32, sy as f32]);
            }
        }
        self.builds.fetch_add(1, Ordering::Relaxed);
        debug!("LensUndistort: built remap table for {width}x{height}");
        let table = Arc::new(RemapTable { key, coords });
        *slot = Some(Arc::clone(&table));
        Ok(table)
    }
}

impl Undistort for LensUndistort {
    fn undistort(&self, frame: &Frame) -> Result<Frame> {
        let (w, h) = (frame.width(), frame.height());
        let table = self.table(w, h)?;
        let mut data = vec![0u8; w * h * Frame::CHANNELS];
        let mut acc = [0.0f32; 3];
        for (i, &[sx, sy]) in table.coords.iter().enumerate() {
            if bilinear(frame, sx as f64, sy as f64, &mut acc) {
                for (dst, &v) in data[i * 3..i * 3 + 3].iter_mut().zip(&acc) {
                    *dst = Frame::quantize(v);
                }
            }
        }
        Ok(Frame::from_raw_parts(w, h, data))
    }
}

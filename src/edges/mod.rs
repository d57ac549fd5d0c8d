//! Edge processing utilities: image gradients and 8-bit cue thresholds.
//!
//! - Separable Sobel derivatives with a configurable aperture, returning
//!   `gx`, `gy` and magnitude buffers.
//! - Per-image rescaling of absolute responses to `0..=255` and inclusive
//!   range thresholding into binary masks.
//!
//! Borders use reflect-101 extrapolation.

pub mod grad;
pub mod threshold;

pub use grad::{sobel_gradients, sobel_kernels, Grad, MAX_KERNEL_SIZE};
pub use threshold::{rescale_abs_to_u8, scaled_binary, threshold_u8, Inclusive};

//! I/O helpers for frames, masks and JSON.
//!
//! - `load_frame`: read a PNG/JPEG/etc. into an owned RGB [`Frame`].
//! - `save_frame`: write a [`Frame`] to disk (format from the extension).
//! - `save_mask`: write a [`Mask`] as a black/white grayscale PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
//! - `list_frames`: image files of a directory in file-name order.
use super::{Frame, Mask, Raster};
use image::{GrayImage, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to 8-bit RGB.
pub fn load_frame(path: &Path) -> Result<Frame, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    Frame::from_rgb(width, height, img.into_raw())
        .ok_or_else(|| format!("Unexpected RGB buffer size for {}", path.display()))
}

/// Save an RGB frame, creating parent directories.
pub fn save_frame(frame: &Frame, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let image = RgbImage::from_raw(
        frame.width() as u32,
        frame.height() as u32,
        frame.raw().to_vec(),
    )
    .ok_or_else(|| "Failed to create image buffer".to_string())?;
    image
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save a binary mask as a grayscale PNG (`1 → 255`).
pub fn save_mask(mask: &Mask, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let data = mask.as_bytes().iter().map(|&v| v.saturating_mul(255)).collect();
    let image = GrayImage::from_raw(mask.width() as u32, mask.height() as u32, data)
        .ok_or_else(|| "Failed to create image buffer".to_string())?;
    image
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// PNG/JPEG files directly inside `dir`, sorted by file name.
pub fn list_frames(dir: &Path) -> Result<Vec<std::path::PathBuf>, String> {
    let entries =
        fs::read_dir(dir).map_err(|e| format!("Failed to read directory {}: {e}", dir.display()))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| format!("Failed to read directory {}: {e}", dir.display()))?
            .path();
        let is_frame = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| FRAME_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if is_frame && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

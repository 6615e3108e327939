use crate::error::Result;
use crate::models::{PreprocessedFrame, RawFrame};
use crate::utils::binarization::BLACK;
use std::path::Path;

/// Load an image file as a [`RawFrame`].
pub fn load_frame<P: AsRef<Path>>(path: P) -> Result<RawFrame> {
    let img = image::open(path)?;
    Ok(RawFrame::new(img.to_rgb8()))
}

/// Write a binarized frame as a grayscale PNG (or any format the extension names).
pub fn save_preprocessed<P: AsRef<Path>>(frame: &PreprocessedFrame, path: P) -> Result<()> {
    frame.as_gray().save(path)?;
    Ok(())
}

/// Summary statistics for grayscale data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrayStats {
    /// Minimum grayscale value.
    pub min: u8,
    /// Maximum grayscale value.
    pub max: u8,
    /// Average grayscale value.
    pub avg: u8,
}

/// Summary statistics for a binarized frame.
#[derive(Debug, Clone, Copy)]
pub struct BinaryStats {
    /// Count of black pixels.
    pub black_pixels: usize,
    /// Total pixels in the frame.
    pub total_pixels: usize,
    /// Ratio of black pixels to total pixels.
    pub black_ratio: f64,
}

/// Compute min/max/avg for grayscale values.
pub fn grayscale_stats(gray: &[u8]) -> GrayStats {
    if gray.is_empty() {
        return GrayStats { min: 0, max: 0, avg: 0 };
    }
    let (mut min, mut max, mut sum) = (u8::MAX, u8::MIN, 0u64);
    for &v in gray {
        min = min.min(v);
        max = max.max(v);
        sum += v as u64;
    }
    GrayStats {
        min,
        max,
        avg: (sum / gray.len() as u64) as u8,
    }
}

/// Compute black pixel stats for a binarized frame.
pub fn binary_stats(frame: &PreprocessedFrame) -> BinaryStats {
    let pixels = frame.as_gray().as_raw();
    let black = pixels.iter().filter(|&&v| v == BLACK).count();
    let total = pixels.len();
    let ratio = if total == 0 {
        0.0
    } else {
        black as f64 / total as f64
    };
    BinaryStats {
        black_pixels: black,
        total_pixels: total,
        black_ratio: ratio,
    }
}

//! Frame preprocessing for QR detection under poor lighting
//!
//! Pipeline, in order:
//! 1. Grayscale (luma weights)
//! 2. Linear contrast rescale (gain 1.5, offset 0, saturating)
//! 3. Bilateral smoothing (diameter 9, sigma color 75, sigma space 75)
//! 4. Gaussian adaptive threshold (block 11, constant 2)
//!
//! Global thresholds fail under uneven lighting, so the cutoff is local and
//! runs after denoising to keep module borders crisp.

use crate::models::{PreprocessedFrame, RawFrame};
use crate::utils::bilateral::bilateral_filter;
use crate::utils::binarization::adaptive_threshold_gaussian;
use crate::utils::contrast::scale_abs;
use crate::utils::grayscale::rgb_to_grayscale;
use image::GrayImage;

/// Tunable parameters of the preprocessing pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessConfig {
    /// Contrast gain applied to the grayscale image
    pub gain: f32,
    /// Brightness offset applied after the gain
    pub offset: f32,
    /// Bilateral neighborhood diameter
    pub bilateral_diameter: i32,
    /// Bilateral intensity sigma
    pub sigma_color: f32,
    /// Bilateral spatial sigma
    pub sigma_space: f32,
    /// Adaptive threshold neighborhood size (odd)
    pub block_size: usize,
    /// Constant subtracted from the local mean before comparing
    pub threshold_offset: f32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            gain: 1.5,
            offset: 0.0,
            bilateral_diameter: 9,
            sigma_color: 75.0,
            sigma_space: 75.0,
            block_size: 11,
            threshold_offset: 2.0,
        }
    }
}

/// Every intermediate image of one preprocessing run
#[derive(Debug, Clone)]
pub struct PreprocessStages {
    /// Luma of the raw frame
    pub gray: GrayImage,
    /// After the contrast rescale
    pub enhanced: GrayImage,
    /// After bilateral smoothing
    pub smoothed: GrayImage,
    /// Final binarized frame
    pub binary: PreprocessedFrame,
}

/// Deterministic raw-frame to binarized-frame transform
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    /// Create a preprocessor with the given parameters
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Parameters in use
    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Run the full pipeline on a frame
    pub fn preprocess(&self, frame: &RawFrame) -> PreprocessedFrame {
        let (width, height) = (frame.width() as usize, frame.height() as usize);
        let gray = rgb_to_grayscale(frame.as_rgb().as_raw(), width, height);
        let binary = self.enhance_and_binarize(&gray, width, height);
        PreprocessedFrame::new(to_gray_image(frame.width(), frame.height(), binary))
    }

    /// Run the pipeline and keep every intermediate image
    pub fn preprocess_stages(&self, frame: &RawFrame) -> PreprocessStages {
        let (w, h) = (frame.width(), frame.height());
        let (width, height) = (w as usize, h as usize);
        let c = &self.config;

        let gray = rgb_to_grayscale(frame.as_rgb().as_raw(), width, height);
        let enhanced = scale_abs(&gray, c.gain, c.offset);
        let smoothed = bilateral_filter(
            &enhanced,
            width,
            height,
            c.bilateral_diameter,
            c.sigma_color,
            c.sigma_space,
        );
        let binary =
            adaptive_threshold_gaussian(&smoothed, width, height, c.block_size, c.threshold_offset);

        PreprocessStages {
            gray: to_gray_image(w, h, gray),
            enhanced: to_gray_image(w, h, enhanced),
            smoothed: to_gray_image(w, h, smoothed),
            binary: PreprocessedFrame::new(to_gray_image(w, h, binary)),
        }
    }

    fn enhance_and_binarize(&self, gray: &[u8], width: usize, height: usize) -> Vec<u8> {
        let c = &self.config;
        let enhanced = scale_abs(gray, c.gain, c.offset);
        let smoothed = bilateral_filter(
            &enhanced,
            width,
            height,
            c.bilateral_diameter,
            c.sigma_color,
            c.sigma_space,
        );
        adaptive_threshold_gaussian(&smoothed, width, height, c.block_size, c.threshold_offset)
    }
}

/// Preprocess a frame with the default parameters
pub fn preprocess(frame: &RawFrame) -> PreprocessedFrame {
    Preprocessor::default().preprocess(frame)
}

fn to_gray_image(width: u32, height: u32, data: Vec<u8>) -> GrayImage {
    // Every stage returns exactly width * height bytes.
    GrayImage::from_raw(width, height, data).unwrap_or_else(|| GrayImage::new(width, height))
}

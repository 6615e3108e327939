//! Utility functions for image processing
//!
//! This module provides the pure image operations behind frame preprocessing:
//! - Grayscale conversion (RGB to luminance)
//! - Contrast rescale (linear gain/offset with saturation)
//! - Bilateral smoothing (edge-preserving denoise)
//! - Binarization (Gaussian adaptive threshold)
//!
//! All of them work on packed row-major byte slices and are deterministic.

pub mod bilateral;
pub mod binarization;
pub mod contrast;
pub mod grayscale;

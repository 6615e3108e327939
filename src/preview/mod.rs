//! Operator preview
//!
//! Each non-terminal scan iteration shows the raw frame and its binarized
//! counterpart side by side, then polls for a cancel request.

/// OpenCV `highgui` window
#[cfg(feature = "opencv")]
pub mod opencv;

use crate::camera::Resolution;
use crate::error::Result;
use crate::models::{PreprocessedFrame, RawFrame};
use image::RgbImage;
use image::imageops::{self, FilterType};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Display sink for composed preview images
pub trait Preview {
    /// Draw one composed image
    fn show(&mut self, image: &RgbImage) -> Result<()>;

    /// True once the operator asked to stop
    fn poll_cancel(&mut self) -> Result<bool>;

    /// Tear down any display resources. Calling it more than once is a no-op.
    fn close(&mut self);
}

/// Resize both frames to `viewport` and place them side by side.
///
/// The result is `2 * viewport.width` wide and `viewport.height` tall, raw
/// frame on the left.
pub fn compose_preview(
    raw: &RawFrame,
    preprocessed: &PreprocessedFrame,
    viewport: Resolution,
) -> RgbImage {
    let (w, h) = (viewport.width, viewport.height);
    let left = imageops::resize(raw.as_rgb(), w, h, FilterType::Triangle);
    let right = imageops::resize(&preprocessed.to_rgb(), w, h, FilterType::Triangle);

    let mut composed = RgbImage::new(w * 2, h);
    imageops::replace(&mut composed, &left, 0, 0);
    imageops::replace(&mut composed, &right, w as i64, 0);
    composed
}

/// Preview without a window; cancelled through a shared flag
#[derive(Debug, Clone, Default)]
pub struct HeadlessPreview {
    cancel: Arc<AtomicBool>,
    shown: usize,
    closed: bool,
}

impl HeadlessPreview {
    /// Create a preview with its own cancel flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a preview observing an existing cancel flag
    pub fn with_flag(cancel: Arc<AtomicBool>) -> Self {
        Self {
            cancel,
            ..Self::default()
        }
    }

    /// Flag that cancels the session when set
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Number of images passed to [`Preview::show`]
    pub fn frames_shown(&self) -> usize {
        self.shown
    }

    /// Whether [`Preview::close`] was called
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Preview for HeadlessPreview {
    fn show(&mut self, _image: &RgbImage) -> Result<()> {
        self.shown += 1;
        Ok(())
    }

    fn poll_cancel(&mut self) -> Result<bool> {
        Ok(self.cancel.load(Ordering::SeqCst))
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

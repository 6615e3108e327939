use super::Preview;
use crate::error::{Result, ScanError};
use image::RgbImage;
use opencv::{
    core::{self, Mat, Scalar},
    highgui, imgproc,
    prelude::*,
};

/// Resizable `highgui` window polled for a single cancel key.
///
/// The window is created on the first [`Preview::show`], so constructing the
/// preview never touches the display.
pub struct OpenCvPreview {
    window: String,
    cancel_key: char,
    open: bool,
}

impl OpenCvPreview {
    /// Preview for the window titled `window`
    pub fn new(window: impl Into<String>, cancel_key: char) -> Self {
        Self {
            window: window.into(),
            cancel_key,
            open: false,
        }
    }

    fn ensure_window(&mut self) -> Result<()> {
        if !self.open {
            highgui::named_window(&self.window, highgui::WINDOW_NORMAL)
                .map_err(|e| ScanError::Preview(e.to_string()))?;
            self.open = true;
        }
        Ok(())
    }
}

impl Preview for OpenCvPreview {
    fn show(&mut self, image: &RgbImage) -> Result<()> {
        self.ensure_window()?;
        let mut rgb = Mat::new_rows_cols_with_default(
            image.height() as i32,
            image.width() as i32,
            core::CV_8UC3,
            Scalar::all(0.0),
        )
        .map_err(|e| ScanError::Preview(e.to_string()))?;
        rgb.data_bytes_mut()
            .map_err(|e| ScanError::Preview(e.to_string()))?
            .copy_from_slice(image.as_raw());

        let mut bgr = Mat::default();
        imgproc::cvt_color(&rgb, &mut bgr, imgproc::COLOR_RGB2BGR, 0)
            .map_err(|e| ScanError::Preview(e.to_string()))?;
        highgui::imshow(&self.window, &bgr).map_err(|e| ScanError::Preview(e.to_string()))
    }

    fn poll_cancel(&mut self) -> Result<bool> {
        let key = highgui::wait_key(1).map_err(|e| ScanError::Preview(e.to_string()))?;
        Ok(key >= 0 && (key & 0xFF) as u32 == self.cancel_key as u32)
    }

    fn close(&mut self) {
        if !self.open {
            return;
        }
        if let Err(e) = highgui::destroy_all_windows() {
            log::warn!("Failed to close preview window: {}", e);
        }
        self.open = false;
    }
}

impl Drop for OpenCvPreview {
    fn drop(&mut self) {
        self.close();
    }
}

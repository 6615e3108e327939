use crate::error::{Result, ScanError};
use image::{GrayImage, RgbImage};

/// One color frame captured from the device (8-bit RGB, row-major)
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    image: RgbImage,
}

impl RawFrame {
    /// Wrap an already-built RGB image
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    /// Build a frame from packed RGB bytes (3 bytes per pixel)
    pub fn from_rgb(data: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(ScanError::FrameShape(format!(
                "{}x{} RGB needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        RgbImage::from_raw(width, height, data)
            .map(Self::new)
            .ok_or_else(|| {
                ScanError::FrameShape(format!("{}x{} RGB buffer rejected", width, height))
            })
    }

    /// Frame width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Frame height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// True when the frame carries no pixels (an empty read)
    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }

    /// Borrow the underlying RGB image
    pub fn as_rgb(&self) -> &RgbImage {
        &self.image
    }

    /// Take the underlying RGB image
    pub fn into_rgb(self) -> RgbImage {
        self.image
    }
}

/// Single-channel frame derived from a [`RawFrame`] by the preprocessor.
///
/// Same spatial dimensions as its source. After the full pipeline every pixel
/// is either 0 or 255.
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessedFrame {
    image: GrayImage,
}

impl PreprocessedFrame {
    /// Wrap a grayscale image
    pub fn new(image: GrayImage) -> Self {
        Self { image }
    }

    /// Frame width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Frame height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying grayscale image
    pub fn as_gray(&self) -> &GrayImage {
        &self.image
    }

    /// Check that the frame is strictly two-valued (0/255)
    pub fn is_binary(&self) -> bool {
        self.image.as_raw().iter().all(|&v| v == 0 || v == 255)
    }

    /// Render the single channel into three identical color channels
    pub fn to_rgb(&self) -> RgbImage {
        RgbImage::from_fn(self.image.width(), self.image.height(), |x, y| {
            let v = self.image.get_pixel(x, y)[0];
            image::Rgb([v, v, v])
        })
    }
}

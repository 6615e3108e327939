//! QR symbol decoding
//!
//! This module wraps the symbol decoder behind a small trait and fuses the
//! results of two decode passes per frame:
//! - the binarized frame from the preprocessor (helps in dim, uneven light)
//! - the luma of the raw frame (keeps fine modules that binarization may erase)

/// Dual-path decode and concatenation
pub mod fusion;

pub use fusion::decode_fused;

use image::GrayImage;
use rqrr::PreparedImage;

/// Locates and decodes QR symbols in a grayscale image
pub trait QrDecoder {
    /// Payload bytes of every symbol decoded in `image`, in detection order
    fn decode(&self, image: &GrayImage) -> Vec<Vec<u8>>;
}

/// Decoder backed by `rqrr`
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder;

impl RqrrDecoder {
    /// Create a decoder
    pub fn new() -> Self {
        Self
    }
}

impl QrDecoder for RqrrDecoder {
    fn decode(&self, image: &GrayImage) -> Vec<Vec<u8>> {
        let (width, height) = (image.width() as usize, image.height() as usize);
        if width == 0 || height == 0 {
            return Vec::new();
        }

        let mut prepared = PreparedImage::prepare_from_greyscale(width, height, |x, y| {
            image.get_pixel(x as u32, y as u32)[0]
        });
        let grids = prepared.detect_grids();

        let mut payloads = Vec::with_capacity(grids.len());
        for grid in grids {
            let mut payload = Vec::new();
            match grid.decode_to(&mut payload) {
                Ok(meta) => {
                    log::debug!(
                        "Decoded QR grid: {} bytes, ecc={}, mask={}",
                        payload.len(),
                        meta.ecc_level,
                        meta.mask
                    );
                    payloads.push(payload);
                }
                Err(e) => log::debug!("QR grid found but not decodable: {}", e),
            }
        }

        payloads
    }
}

impl<D: QrDecoder + ?Sized> QrDecoder for &D {
    fn decode(&self, image: &GrayImage) -> Vec<Vec<u8>> {
        (**self).decode(image)
    }
}

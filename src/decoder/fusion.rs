use super::QrDecoder;
use crate::models::{DecodeCandidate, DecodeSource, PreprocessedFrame, RawFrame};
use crate::utils::grayscale::rgb_to_grayscale;
use image::GrayImage;

/// Decode a frame along both paths and concatenate the results.
///
/// Preprocessed-path candidates come first, raw-path candidates second. The
/// same payload found on both paths is reported twice; callers take the first
/// candidate.
pub fn decode_fused<D: QrDecoder + ?Sized>(
    decoder: &D,
    raw: &RawFrame,
    preprocessed: &PreprocessedFrame,
) -> Vec<DecodeCandidate> {
    let mut fused: Vec<DecodeCandidate> = decoder
        .decode(preprocessed.as_gray())
        .into_iter()
        .map(|payload| DecodeCandidate::new(payload, DecodeSource::Preprocessed))
        .collect();

    let raw_luma = raw_luma(raw);
    fused.extend(
        decoder
            .decode(&raw_luma)
            .into_iter()
            .map(|payload| DecodeCandidate::new(payload, DecodeSource::Raw)),
    );

    fused
}

/// Unenhanced luma of the raw frame, what a symbol decoder sees of a color image
fn raw_luma(raw: &RawFrame) -> GrayImage {
    let (w, h) = (raw.width(), raw.height());
    let gray = rgb_to_grayscale(raw.as_rgb().as_raw(), w as usize, h as usize);
    GrayImage::from_raw(w, h, gray).unwrap_or_else(|| GrayImage::new(w, h))
}

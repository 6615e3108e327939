//! RGB to grayscale conversion
//!
//! Y = 0.299*R + 0.587*G + 0.114*B
//! Uses fixed-point arithmetic with 14 fractional bits, rounded to nearest:
//! Y = (4899*R + 9617*G + 1868*B + 8192) >> 14

/// Coefficients for grayscale conversion, scaled by 2^14 (they sum to 16384)
const COEF_R: u32 = 4899;
const COEF_G: u32 = 9617;
const COEF_B: u32 = 1868;
const SHIFT: u32 = 14;
const ROUND: u32 = 1 << (SHIFT - 1);

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let lum = (COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32 + ROUND) >> SHIFT;
    lum.min(255) as u8
}

/// Convert RGB image to grayscale
///
/// # Arguments
/// * `rgb` - Packed RGB bytes (3 bytes per pixel)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    rgb_to_grayscale_with_buffer(rgb, &mut gray);
    gray
}

/// Convert RGB to grayscale into a caller-owned buffer
///
/// Converts `min(rgb.len() / 3, output.len())` pixels and returns that count.
pub fn rgb_to_grayscale_with_buffer(rgb: &[u8], output: &mut [u8]) -> usize {
    let mut written = 0;
    for (px, out) in rgb.chunks_exact(3).zip(output.iter_mut()) {
        *out = luma(px[0], px[1], px[2]);
        written += 1;
    }
    written
}

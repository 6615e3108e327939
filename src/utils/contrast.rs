/// Linear contrast/brightness rescale with saturation
/// dst = saturate(round(|alpha * src + beta|))
///
/// Rounding is half-to-even, so the result for a given input is exact and
/// platform independent.
pub fn scale_abs(gray: &[u8], alpha: f32, beta: f32) -> Vec<u8> {
    let lut = scale_abs_lut(alpha, beta);
    gray.iter().map(|&v| lut[v as usize]).collect()
}

/// Lookup table mapping every input level to its rescaled value
pub fn scale_abs_lut(alpha: f32, beta: f32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (level, out) in lut.iter_mut().enumerate() {
        let scaled = (alpha * level as f32 + beta).abs().round_ties_even();
        *out = scaled.clamp(0.0, 255.0) as u8;
    }
    lut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_saturates() {
        let out = scale_abs(&[0, 100, 170, 171, 255], 1.5, 0.0);
        assert_eq!(out, vec![0, 150, 255, 255, 255]);
    }

    #[test]
    fn test_half_rounds_to_even() {
        // 1 * 1.5 = 1.5 -> 2, 3 * 1.5 = 4.5 -> 4
        let out = scale_abs(&[1, 3], 1.5, 0.0);
        assert_eq!(out, vec![2, 4]);
    }

    #[test]
    fn test_negative_result_takes_absolute_value() {
        let out = scale_abs(&[10], 1.0, -30.0);
        assert_eq!(out, vec![20]);
    }

    #[test]
    fn test_identity() {
        let input: Vec<u8> = (0..=255).collect();
        assert_eq!(scale_abs(&input, 1.0, 0.0), input);
    }
}

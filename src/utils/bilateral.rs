//! Edge-preserving bilateral smoothing for 8-bit grayscale images
//!
//! Each output pixel is a weighted mean over a circular neighborhood, where the
//! weight combines spatial distance and intensity difference:
//! w = exp(-d² / 2σs²) · exp(-Δ² / 2σc²)
//!
//! Flat areas get smoothed while sharp steps (QR module borders) survive,
//! because pixels across a step get near-zero intensity weight.

/// Neighborhood offset with its precomputed spatial weight
#[derive(Debug, Clone, Copy)]
struct SpatialTap {
    dx: isize,
    dy: isize,
    weight: f32,
}

/// Mirror an out-of-range coordinate back into `0..len` without repeating the edge pixel
/// (`dcb|abcd|cba`)
#[inline]
fn reflect_101(mut i: isize, len: usize) -> usize {
    let len = len as isize;
    if len == 1 {
        return 0;
    }
    while i < 0 || i >= len {
        if i < 0 {
            i = -i;
        } else {
            i = 2 * (len - 1) - i;
        }
    }
    i as usize
}

fn spatial_taps(radius: isize, sigma_space: f32) -> Vec<SpatialTap> {
    let coeff = -0.5 / (sigma_space * sigma_space);
    let mut taps = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let dist = ((dx * dx + dy * dy) as f32).sqrt();
            if dist > radius as f32 {
                continue;
            }
            taps.push(SpatialTap {
                dx,
                dy,
                weight: (dist * dist * coeff).exp(),
            });
        }
    }
    taps
}

fn color_weights(sigma_color: f32) -> [f32; 256] {
    let coeff = -0.5 / (sigma_color * sigma_color);
    let mut weights = [0f32; 256];
    for (diff, w) in weights.iter_mut().enumerate() {
        let d = diff as f32;
        *w = (d * d * coeff).exp();
    }
    weights
}

/// Apply a bilateral filter
///
/// # Arguments
/// * `gray` - Grayscale bytes (1 byte per pixel)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `diameter` - Neighborhood diameter; the radius is `diameter / 2` (at least 1).
///   A non-positive diameter derives the radius from `sigma_space`.
/// * `sigma_color` - Intensity sigma; non-positive values fall back to 1
/// * `sigma_space` - Spatial sigma; non-positive values fall back to 1
///
/// Borders are handled by reflection, so the output has the input's size.
pub fn bilateral_filter(
    gray: &[u8],
    width: usize,
    height: usize,
    diameter: i32,
    sigma_color: f32,
    sigma_space: f32,
) -> Vec<u8> {
    let pixel_count = width * height;
    if pixel_count == 0 {
        return Vec::new();
    }

    let sigma_color = if sigma_color <= 0.0 { 1.0 } else { sigma_color };
    let sigma_space = if sigma_space <= 0.0 { 1.0 } else { sigma_space };
    let radius = if diameter <= 0 {
        (sigma_space * 1.5).round() as isize
    } else {
        (diameter / 2) as isize
    }
    .max(1);

    let taps = spatial_taps(radius, sigma_space);
    let color = color_weights(sigma_color);
    let mut out = vec![0u8; pixel_count];

    for y in 0..height {
        for x in 0..width {
            let center = gray[y * width + x];
            let mut sum = 0f32;
            let mut wsum = 0f32;
            for tap in &taps {
                let sx = reflect_101(x as isize + tap.dx, width);
                let sy = reflect_101(y as isize + tap.dy, height);
                let v = gray[sy * width + sx];
                let w = tap.weight * color[v.abs_diff(center) as usize];
                sum += v as f32 * w;
                wsum += w;
            }
            // The center tap always contributes weight 1, so wsum > 0.
            out[y * width + x] = (sum / wsum).round_ties_even().clamp(0.0, 255.0) as u8;
        }
    }

    out
}

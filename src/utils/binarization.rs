/// Maximum output level of a binarized pixel
pub const WHITE: u8 = 255;
/// Minimum output level of a binarized pixel
pub const BLACK: u8 = 0;

/// Sigma of the Gaussian window for a given block size
/// (matches the usual `0.3 * ((ksize - 1) * 0.5 - 1) + 0.8` rule)
pub fn gaussian_sigma_for_block(block_size: usize) -> f32 {
    0.3 * ((block_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1D Gaussian kernel of length `2 * radius + 1`
fn gaussian_kernel(radius: usize, sigma: f32) -> Vec<f32> {
    let coeff = -0.5 / (sigma * sigma);
    let mut kernel: Vec<f32> = (0..=2 * radius)
        .map(|i| {
            let d = i as f32 - radius as f32;
            (d * d * coeff).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}

/// Gaussian-weighted local mean of every pixel, rounded to 8 bits
///
/// Separable horizontal + vertical pass; borders replicate the edge pixel.
pub fn gaussian_local_mean(gray: &[u8], width: usize, height: usize, block_size: usize) -> Vec<u8> {
    let pixel_count = width * height;
    if pixel_count == 0 {
        return Vec::new();
    }

    let radius = block_size / 2;
    let kernel = gaussian_kernel(radius, gaussian_sigma_for_block(2 * radius + 1));
    let clamp = |i: isize, len: usize| i.clamp(0, len as isize - 1) as usize;

    let mut horizontal = vec![0f32; pixel_count];
    for y in 0..height {
        let row = &gray[y * width..(y + 1) * width];
        for x in 0..width {
            let mut acc = 0f32;
            for (k, w) in kernel.iter().enumerate() {
                let sx = clamp(x as isize + k as isize - radius as isize, width);
                acc += row[sx] as f32 * w;
            }
            horizontal[y * width + x] = acc;
        }
    }

    let mut mean = vec![0u8; pixel_count];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0f32;
            for (k, w) in kernel.iter().enumerate() {
                let sy = clamp(y as isize + k as isize - radius as isize, height);
                acc += horizontal[sy * width + x] * w;
            }
            mean[y * width + x] = acc.round_ties_even().clamp(0.0, 255.0) as u8;
        }
    }

    mean
}

/// Local adaptive binarization with a Gaussian-weighted neighborhood
///
/// A pixel becomes [`WHITE`] when it is brighter than its local Gaussian mean
/// minus `c`, and [`BLACK`] otherwise. The output is strictly two-valued.
///
/// # Arguments
/// * `gray` - Grayscale bytes (1 byte per pixel)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `block_size` - Neighborhood size; even values are widened to the next odd size
/// * `c` - Constant subtracted from the local mean (rounded up to an integer)
pub fn adaptive_threshold_gaussian(
    gray: &[u8],
    width: usize,
    height: usize,
    block_size: usize,
    c: f32,
) -> Vec<u8> {
    let mean = gaussian_local_mean(gray, width, height, block_size);
    let delta = c.ceil() as i32;

    gray.iter()
        .zip(mean.iter())
        .map(|(&src, &m)| {
            if src as i32 - m as i32 > -delta {
                WHITE
            } else {
                BLACK
            }
        })
        .collect()
}

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgb, RgbImage};
use qr_scanner::decoder::{RqrrDecoder, decode_fused};
use qr_scanner::utils::bilateral::bilateral_filter;
use qr_scanner::utils::binarization::adaptive_threshold_gaussian;
use qr_scanner::utils::contrast::scale_abs;
use qr_scanner::utils::grayscale::rgb_to_grayscale;
use qr_scanner::{Preprocessor, RawFrame};

fn textured_gray(width: usize, height: usize) -> Vec<u8> {
    (0..width * height).map(|i| ((i * 31 + i / width * 17) % 256) as u8).collect()
}

fn textured_frame(width: u32, height: u32) -> RawFrame {
    RawFrame::new(RgbImage::from_fn(width, height, |x, y| {
        let v = ((x * 13 + y * 7) % 256) as u8;
        Rgb([v, v.wrapping_add(40), v.wrapping_mul(3)])
    }))
}

fn bench_grayscale_640x480(c: &mut Criterion) {
    let image = vec![128u8; 640 * 480 * 3];
    c.bench_function("rgb_to_grayscale_640x480", |b| {
        b.iter(|| rgb_to_grayscale(black_box(&image), black_box(640), black_box(480)))
    });
}

fn bench_scale_abs_640x480(c: &mut Criterion) {
    let gray = textured_gray(640, 480);
    c.bench_function("scale_abs_640x480", |b| {
        b.iter(|| scale_abs(black_box(&gray), black_box(1.5), black_box(0.0)))
    });
}

fn bench_bilateral_640x480(c: &mut Criterion) {
    let gray = textured_gray(640, 480);
    c.bench_function("bilateral_d9_640x480", |b| {
        b.iter(|| bilateral_filter(black_box(&gray), 640, 480, black_box(9), 75.0, 75.0))
    });
}

fn bench_adaptive_threshold_640x480(c: &mut Criterion) {
    let gray = textured_gray(640, 480);
    c.bench_function("adaptive_threshold_gaussian_640x480", |b| {
        b.iter(|| adaptive_threshold_gaussian(black_box(&gray), 640, 480, black_box(11), 2.0))
    });
}

fn bench_preprocess_640x480(c: &mut Criterion) {
    let frame = textured_frame(640, 480);
    let preprocessor = Preprocessor::default();
    c.bench_function("preprocess_640x480", |b| {
        b.iter(|| preprocessor.preprocess(black_box(&frame)))
    });
}

fn bench_preprocess_1280x720(c: &mut Criterion) {
    let frame = textured_frame(1280, 720);
    let preprocessor = Preprocessor::default();
    let mut group = c.benchmark_group("preprocess_hd");
    group.sample_size(10);
    group.bench_function("preprocess_1280x720", |b| {
        b.iter(|| preprocessor.preprocess(black_box(&frame)))
    });
    group.finish();
}

fn bench_fused_decode_640x480(c: &mut Criterion) {
    let frame = textured_frame(640, 480);
    let preprocessed = Preprocessor::default().preprocess(&frame);
    let decoder = RqrrDecoder::new();
    c.bench_function("decode_fused_640x480", |b| {
        b.iter(|| decode_fused(&decoder, black_box(&frame), black_box(&preprocessed)))
    });
}

criterion_group!(
    benches,
    bench_grayscale_640x480,
    bench_scale_abs_640x480,
    bench_bilateral_640x480,
    bench_adaptive_threshold_640x480,
    bench_preprocess_640x480,
    bench_preprocess_1280x720,
    bench_fused_decode_640x480
);
criterion_main!(benches);

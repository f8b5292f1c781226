use criterion::{black_box, criterion_group, criterion_main, Criterion};

use glic::bitio::BitWriter;
use glic::color::make_color;
use glic::planes::{Matrix, Planes, RefColor};
use glic::segment::make_segmentation;
use glic::wavelet::{Wavelet, WaveletTransform};
use glic::{Codec, CodecConfig, ColorSpace, TransformType, WaveletType};

fn gradient_pixels(w: u32, h: u32) -> Vec<u32> {
    (0..w * h)
        .map(|i| {
            let x = (i % w) as u8;
            let y = (i / w) as u8;
            make_color(x.wrapping_mul(7), y.wrapping_mul(11), 128, 255)
        })
        .collect()
}

fn bench_wavelet_2d(c: &mut Criterion) {
    let sym8 = Wavelet::for_type(WaveletType::Symlet8);
    let haar = Wavelet::for_type(WaveletType::Haar);

    let mut original = Matrix::new(16);
    for x in 0..16 {
        for y in 0..16 {
            original.set(x, y, ((x * 31 + y * 7) % 97) as f64 / 97.0);
        }
    }

    c.bench_function("fwt_sym8_forward_16x16", |b| {
        let tr = WaveletTransform::new(TransformType::Fwt, sym8);
        b.iter(|| {
            let mut m = original.clone();
            tr.forward(black_box(&mut m));
        });
    });

    c.bench_function("wpt_haar_forward_16x16", |b| {
        let tr = WaveletTransform::new(TransformType::Wpt, haar);
        b.iter(|| {
            let mut m = original.clone();
            tr.forward(black_box(&mut m));
        });
    });

    c.bench_function("fwt_sym8_roundtrip_16x16", |b| {
        let tr = WaveletTransform::new(TransformType::Fwt, sym8);
        b.iter(|| {
            let mut m = original.clone();
            tr.forward(&mut m);
            tr.inverse(black_box(&mut m));
        });
    });
}

fn bench_segmentation(c: &mut Criterion) {
    let pixels = gradient_pixels(64, 64);
    let planes = Planes::from_pixels(&pixels, 64, 64, ColorSpace::Rgb, RefColor::default());

    c.bench_function("segmentation_64x64", |b| {
        b.iter(|| {
            let mut w = BitWriter::new();
            let segs = make_segmentation(&mut w, black_box(&planes), 0, 2, 256, 15.0);
            black_box(segs.len());
        });
    });
}

fn bench_full_encode(c: &mut Criterion) {
    let pixels = gradient_pixels(64, 64);
    let codec = Codec::new(CodecConfig::default());

    c.bench_function("encode_defaults_64x64", |b| {
        b.iter(|| {
            let bytes = codec.encode(black_box(&pixels), 64, 64).unwrap();
            black_box(bytes.len());
        });
    });

    let encoded = codec.encode(&pixels, 64, 64).unwrap();
    c.bench_function("decode_defaults_64x64", |b| {
        b.iter(|| {
            let img = codec.decode(black_box(&encoded)).unwrap();
            black_box(img.pixels.len());
        });
    });
}

criterion_group!(benches, bench_wavelet_2d, bench_segmentation, bench_full_encode);
criterion_main!(benches);

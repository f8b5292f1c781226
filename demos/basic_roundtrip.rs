//! Basic encode/decode round trip.
//!
//! ```sh
//! cargo run --example basic_roundtrip
//! ```

#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use glic::color::make_color;
use glic::metrics;
use glic::{Codec, CodecConfig, ColorSpace, EncodingMethod, WaveletType};

fn main() {
    let width = 64u32;
    let height = 64u32;

    // synthetic gradient with a diagonal stripe
    let pixels: Vec<u32> = (0..width * height)
        .map(|i| {
            let x = i % width;
            let y = i / width;
            let stripe = if (x + y) % 16 < 4 { 60 } else { 0 };
            make_color(
                (x * 4) as u8,
                (y * 4).wrapping_add(stripe) as u8,
                140,
                255,
            )
        })
        .collect();

    // conservative settings: near-lossless round trip
    let mut config = CodecConfig {
        color_space: ColorSpace::Rgb,
        ..CodecConfig::default()
    };
    config.for_each_channel(|ch| {
        ch.wavelet_type = WaveletType::None;
        ch.quantization_value = 1;
        ch.encoding_method = EncodingMethod::Packed;
    });

    let codec = Codec::new(config);
    let encoded = codec.encode(&pixels, width, height).unwrap();
    let decoded = codec.decode(&encoded).unwrap();

    let raw_size = pixels.len() * 4;
    println!("Original:   {raw_size} bytes");
    println!("Compressed: {} bytes", encoded.len());
    println!("Ratio:      {:.2}x", raw_size as f64 / encoded.len() as f64);

    let mse = metrics::pixel_channel_mse(&pixels, &decoded.pixels).unwrap();
    println!("MSE (RGB):  {:.2} / {:.2} / {:.2}", mse[0], mse[1], mse[2]);

    // now the glitch dials: default HWB + Symlet8 wavelet at default scale
    let glitchy = Codec::new(CodecConfig::default());
    let encoded = glitchy.encode(&pixels, width, height).unwrap();
    let decoded = glitchy.decode(&encoded).unwrap();
    let mse = metrics::pixel_channel_mse(&pixels, &decoded.pixels).unwrap();
    println!();
    println!("Glitch defaults (HWB + SYMLET8 wavelet):");
    println!("Compressed: {} bytes", encoded.len());
    println!("MSE (RGB):  {:.2} / {:.2} / {:.2}", mse[0], mse[1], mse[2]);
}

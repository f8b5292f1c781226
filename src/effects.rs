//! Post-decode glitch effects.
//!
//! Purely cosmetic filters over a decoded pixel buffer. They never run
//! during encoding and never touch the bitstream; the codec is done by
//! the time these see the image. The randomized ones take an explicit
//! seed so a pipeline of effects reproduces exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::color::{alpha, blue, green, make_color, red, Color};

/// Which filter to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EffectType {
    None = 0,
    Pixelate = 1,
    Scanline = 2,
    ChromaticAberration = 3,
    Dither = 4,
    Posterize = 5,
    GlitchShift = 6,
    /// DCT-block corruption in the style of classic JPEG databending.
    DctCorrupt = 7,
    /// Interval pixel sorting.
    PixelSort = 8,
    /// Datamosh-style motion-vector leaking between blocks.
    PredictionLeak = 9,
}

impl EffectType {
    /// Canonical name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Pixelate => "PIXELATE",
            Self::Scanline => "SCANLINE",
            Self::ChromaticAberration => "CHROMATIC_ABERRATION",
            Self::Dither => "DITHER",
            Self::Posterize => "POSTERIZE",
            Self::GlitchShift => "GLITCH_SHIFT",
            Self::DctCorrupt => "DCT_CORRUPT",
            Self::PixelSort => "PIXEL_SORT",
            Self::PredictionLeak => "PREDICTION_LEAK",
        }
    }

    /// Parse a long or short name, falling back to `None`.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "PIXELATE" | "pixelate" => Self::Pixelate,
            "SCANLINE" | "scanline" => Self::Scanline,
            "CHROMATIC_ABERRATION" | "CHROMATIC" | "chromatic" => Self::ChromaticAberration,
            "DITHER" | "dither" => Self::Dither,
            "POSTERIZE" | "posterize" => Self::Posterize,
            "GLITCH_SHIFT" | "GLITCH" | "glitch" => Self::GlitchShift,
            "DCT_CORRUPT" | "DCT" | "dct" => Self::DctCorrupt,
            "PIXEL_SORT" | "SORT" | "sort" => Self::PixelSort,
            "PREDICTION_LEAK" | "LEAK" | "leak" => Self::PredictionLeak,
            _ => Self::None,
        }
    }
}

/// Sort key for [`EffectType::PixelSort`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PixelSortMode {
    Brightness = 0,
    Hue = 1,
    Saturation = 2,
    Red = 3,
    Green = 4,
    Blue = 5,
}

impl PixelSortMode {
    /// Parse a lowercase mode name, falling back to brightness.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "hue" => Self::Hue,
            "saturation" => Self::Saturation,
            "red" => Self::Red,
            "green" => Self::Green,
            "blue" => Self::Blue,
            _ => Self::Brightness,
        }
    }
}

/// One effect invocation with its parameters.
#[derive(Clone, Copy, Debug)]
pub struct EffectConfig {
    pub effect_type: EffectType,
    /// Strength 0..=100 for scanline, dither, DCT corruption.
    pub intensity: i32,
    /// Block side for pixelate, glitch shift, DCT corruption, leak.
    pub block_size: i32,
    /// Chromatic aberration offset.
    pub offset_x: i32,
    pub offset_y: i32,
    /// Posterize level count.
    pub levels: i32,
    /// Seed for the randomized effects.
    pub seed: u64,
    pub sort_mode: PixelSortMode,
    /// Interval detection threshold 0..=255 for pixel sorting.
    pub threshold: i32,
    pub sort_vertical: bool,
    /// Leak probability 0.0..=1.0.
    pub leak_amount: f32,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            effect_type: EffectType::None,
            intensity: 50,
            block_size: 8,
            offset_x: 2,
            offset_y: 0,
            levels: 4,
            seed: 12345,
            sort_mode: PixelSortMode::Brightness,
            threshold: 50,
            sort_vertical: false,
            leak_amount: 0.5,
        }
    }
}

/// Run one effect over the buffer.
pub fn apply_effect(pixels: &mut [Color], width: u32, height: u32, config: &EffectConfig) {
    let w = width as i32;
    let h = height as i32;
    match config.effect_type {
        EffectType::Pixelate => pixelate(pixels, w, h, config.block_size),
        EffectType::Scanline => scanline(pixels, w, h, config.intensity),
        EffectType::ChromaticAberration => {
            chromatic_aberration(pixels, w, h, config.offset_x, config.offset_y);
        }
        EffectType::Dither => dither(pixels, w, h, config.intensity),
        EffectType::Posterize => posterize(pixels, w, h, config.levels),
        EffectType::GlitchShift => glitch_shift(pixels, w, h, config.block_size, config.seed),
        EffectType::DctCorrupt => {
            dct_corrupt(pixels, w, h, config.block_size, config.intensity, config.seed);
        }
        EffectType::PixelSort => pixel_sort(
            pixels,
            w,
            h,
            config.sort_mode,
            config.threshold,
            config.sort_vertical,
        ),
        EffectType::PredictionLeak => {
            prediction_leak(pixels, w, h, config.block_size, config.leak_amount, config.seed);
        }
        EffectType::None => {}
    }
}

/// Run a sequence of effects in order.
pub fn apply_effects(pixels: &mut [Color], width: u32, height: u32, effects: &[EffectConfig]) {
    for effect in effects {
        apply_effect(pixels, width, height, effect);
    }
}

#[inline]
fn at(w: i32, x: i32, y: i32) -> usize {
    (y * w + x) as usize
}

fn pixelate(pixels: &mut [Color], w: i32, h: i32, block_size: i32) {
    if block_size < 2 {
        return;
    }

    for by in (0..h).step_by(block_size as usize) {
        for bx in (0..w).step_by(block_size as usize) {
            let mut sums = [0i64; 4];
            let mut count = 0i64;
            for y in by..(by + block_size).min(h) {
                for x in bx..(bx + block_size).min(w) {
                    let c = pixels[at(w, x, y)];
                    sums[0] += i64::from(red(c));
                    sums[1] += i64::from(green(c));
                    sums[2] += i64::from(blue(c));
                    sums[3] += i64::from(alpha(c));
                    count += 1;
                }
            }

            let avg = make_color(
                (sums[0] / count) as u8,
                (sums[1] / count) as u8,
                (sums[2] / count) as u8,
                (sums[3] / count) as u8,
            );
            for y in by..(by + block_size).min(h) {
                for x in bx..(bx + block_size).min(w) {
                    pixels[at(w, x, y)] = avg;
                }
            }
        }
    }
}

fn scanline(pixels: &mut [Color], w: i32, h: i32, intensity: i32) {
    let factor = 1.0 - (intensity as f32 / 100.0) * 0.5;

    for y in (1..h).step_by(2) {
        for x in 0..w {
            let c = pixels[at(w, x, y)];
            pixels[at(w, x, y)] = make_color(
                (f32::from(red(c)) * factor) as u8,
                (f32::from(green(c)) * factor) as u8,
                (f32::from(blue(c)) * factor) as u8,
                alpha(c),
            );
        }
    }
}

fn chromatic_aberration(pixels: &mut [Color], w: i32, h: i32, offset_x: i32, offset_y: i32) {
    let source = pixels.to_vec();

    for y in 0..h {
        for x in 0..w {
            let rx = (x - offset_x).clamp(0, w - 1);
            let ry = (y - offset_y).clamp(0, h - 1);
            let r = red(source[at(w, rx, ry)]);

            let g = green(source[at(w, x, y)]);

            let bx = (x + offset_x).clamp(0, w - 1);
            let by = (y + offset_y).clamp(0, h - 1);
            let b = blue(source[at(w, bx, by)]);

            pixels[at(w, x, y)] = make_color(r, g, b, alpha(source[at(w, x, y)]));
        }
    }
}

fn dither(pixels: &mut [Color], w: i32, h: i32, intensity: i32) {
    const BAYER: [[i32; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

    let scale = (intensity as f32 / 100.0) * 32.0;

    for y in 0..h {
        for x in 0..w {
            let c = pixels[at(w, x, y)];
            let threshold = (BAYER[(y % 4) as usize][(x % 4) as usize] - 8) as f32 * scale / 16.0;

            let r = (f32::from(red(c)) + threshold) as i32;
            let g = (f32::from(green(c)) + threshold) as i32;
            let b = (f32::from(blue(c)) + threshold) as i32;

            pixels[at(w, x, y)] = make_color(
                r.clamp(0, 255) as u8,
                g.clamp(0, 255) as u8,
                b.clamp(0, 255) as u8,
                alpha(c),
            );
        }
    }
}

fn posterize(pixels: &mut [Color], w: i32, h: i32, levels: i32) {
    let levels = levels.clamp(2, 256);
    let step = 255.0 / (levels - 1) as f32;

    for y in 0..h {
        for x in 0..w {
            let c = pixels[at(w, x, y)];
            let r = ((f32::from(red(c)) / step).round() * step) as i32;
            let g = ((f32::from(green(c)) / step).round() * step) as i32;
            let b = ((f32::from(blue(c)) / step).round() * step) as i32;
            pixels[at(w, x, y)] = make_color(
                r.clamp(0, 255) as u8,
                g.clamp(0, 255) as u8,
                b.clamp(0, 255) as u8,
                alpha(c),
            );
        }
    }
}

fn glitch_shift(pixels: &mut [Color], w: i32, h: i32, block_size: i32, seed: u64) {
    if block_size < 1 {
        return;
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let source = pixels.to_vec();

    for by in (0..h).step_by(block_size as usize) {
        if rng.gen_range(0..=100) < 30 {
            let shift = rng.gen_range(-block_size * 2..=block_size * 2);
            for y in by..(by + block_size).min(h) {
                for x in 0..w {
                    let src_x = (x - shift).rem_euclid(w);
                    pixels[at(w, x, y)] = source[at(w, src_x, y)];
                }
            }
        }
    }
}

fn dct_corrupt(pixels: &mut [Color], w: i32, h: i32, block_size: i32, intensity: i32, seed: u64) {
    let block_size = if block_size < 2 { 8 } else { block_size };
    let mut rng = StdRng::seed_from_u64(seed);
    let scale = intensity as f32 / 100.0;

    for by in (0..h).step_by(block_size as usize) {
        for bx in (0..w).step_by(block_size as usize) {
            if rng.gen_range(0..=100) > (scale * 50.0) as i32 {
                continue;
            }
            let corrupt_type = rng.gen_range(0..=5);

            let mut avg = [0i64; 3];
            let mut count = 0i64;
            for y in by..(by + block_size).min(h) {
                for x in bx..(bx + block_size).min(w) {
                    let c = pixels[at(w, x, y)];
                    avg[0] += i64::from(red(c));
                    avg[1] += i64::from(green(c));
                    avg[2] += i64::from(blue(c));
                    count += 1;
                }
            }
            if count > 0 {
                for a in &mut avg {
                    *a /= count;
                }
            }
            let (avg_r, avg_g, avg_b) = (avg[0] as i32, avg[1] as i32, avg[2] as i32);

            for y in by..(by + block_size).min(h) {
                for x in bx..(bx + block_size).min(w) {
                    let c = pixels[at(w, x, y)];
                    let mut r = i32::from(red(c));
                    let mut g = i32::from(green(c));
                    let mut b = i32::from(blue(c));

                    // simplified DCT basis pattern over block coordinates
                    let basis = (((x - bx) * (y - by)) as f32 * 0.5).cos();

                    match corrupt_type {
                        0 => {
                            r += (avg_r as f32 * 0.3 * scale) as i32;
                            g += (avg_g as f32 * 0.3 * scale) as i32;
                            b += (avg_b as f32 * 0.3 * scale) as i32;
                        }
                        1 => {
                            r += ((r - avg_r) as f32 * scale * basis) as i32;
                            g += ((g - avg_g) as f32 * scale * basis) as i32;
                            b += ((b - avg_b) as f32 * scale * basis) as i32;
                        }
                        2 => {
                            r = (r / 32) * 32;
                            g = (g / 32) * 32;
                            b = (b / 32) * 32;
                        }
                        3 => {
                            r = (r + (basis * 64.0 * scale) as i32).rem_euclid(256);
                            b = (b - (basis * 64.0 * scale) as i32).rem_euclid(256);
                        }
                        4 => {
                            let levels = 4 + (basis * 4.0) as i32;
                            let step = 255.0 / levels.max(1) as f32;
                            r = ((r as f32 / step).round() * step) as i32;
                            g = ((g as f32 / step).round() * step) as i32;
                            b = ((b as f32 / step).round() * step) as i32;
                        }
                        _ => {
                            r = avg_r;
                            g = avg_g;
                            b = avg_b;
                        }
                    }

                    pixels[at(w, x, y)] = make_color(
                        r.clamp(0, 255) as u8,
                        g.clamp(0, 255) as u8,
                        b.clamp(0, 255) as u8,
                        alpha(c),
                    );
                }
            }
        }
    }
}

fn brightness_of(c: Color) -> f32 {
    (f32::from(red(c)) * 0.299 + f32::from(green(c)) * 0.587 + f32::from(blue(c)) * 0.114) / 255.0
}

fn hue_of(c: Color) -> f32 {
    let r = f32::from(red(c)) / 255.0;
    let g = f32::from(green(c)) / 255.0;
    let b = f32::from(blue(c)) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    if delta < 1e-5 {
        return 0.0;
    }

    let mut hue = if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    if hue < 0.0 {
        hue += 360.0;
    }
    hue / 360.0
}

fn saturation_of(c: Color) -> f32 {
    let r = f32::from(red(c)) / 255.0;
    let g = f32::from(green(c)) / 255.0;
    let b = f32::from(blue(c)) / 255.0;

    let max = r.max(g).max(b);
    if max < 1e-5 {
        return 0.0;
    }
    (max - r.min(g).min(b)) / max
}

fn sort_value(c: Color, mode: PixelSortMode) -> f32 {
    match mode {
        PixelSortMode::Brightness => brightness_of(c),
        PixelSortMode::Hue => hue_of(c),
        PixelSortMode::Saturation => saturation_of(c),
        PixelSortMode::Red => f32::from(red(c)) / 255.0,
        PixelSortMode::Green => f32::from(green(c)) / 255.0,
        PixelSortMode::Blue => f32::from(blue(c)) / 255.0,
    }
}

fn sort_interval(line: &mut [Color], mode: PixelSortMode) {
    line.sort_by(|a, b| {
        sort_value(*a, mode)
            .partial_cmp(&sort_value(*b, mode))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

fn pixel_sort(
    pixels: &mut [Color],
    w: i32,
    h: i32,
    mode: PixelSortMode,
    threshold: i32,
    vertical: bool,
) {
    let lo = threshold as f32 / 255.0;
    let hi = 1.0 - lo * 0.5;

    if vertical {
        for x in 0..w {
            let mut sort_start = -1i32;
            for y in 0..=h {
                let in_interval = y < h && {
                    let v = brightness_of(pixels[at(w, x, y)]);
                    v > lo && v < hi
                };
                if in_interval && sort_start == -1 {
                    sort_start = y;
                } else if !in_interval && sort_start != -1 {
                    let mut interval: Vec<Color> =
                        (sort_start..y).map(|sy| pixels[at(w, x, sy)]).collect();
                    sort_interval(&mut interval, mode);
                    for (i, sy) in (sort_start..y).enumerate() {
                        pixels[at(w, x, sy)] = interval[i];
                    }
                    sort_start = -1;
                }
            }
        }
    } else {
        for y in 0..h {
            let mut sort_start = -1i32;
            for x in 0..=w {
                let in_interval = x < w && {
                    let v = brightness_of(pixels[at(w, x, y)]);
                    v > lo && v < hi
                };
                if in_interval && sort_start == -1 {
                    sort_start = x;
                } else if !in_interval && sort_start != -1 {
                    let row = &mut pixels[at(w, sort_start, y)..at(w, x, y)];
                    sort_interval(row, mode);
                    sort_start = -1;
                }
            }
        }
    }
}

fn prediction_leak(
    pixels: &mut [Color],
    w: i32,
    h: i32,
    block_size: i32,
    leak_amount: f32,
    seed: u64,
) {
    let block_size = if block_size < 2 { 16 } else { block_size };
    let mut rng = StdRng::seed_from_u64(seed);
    let source = pixels.to_vec();

    let blocks_x = (w + block_size - 1) / block_size;
    let blocks_y = (h + block_size - 1) / block_size;

    let motion: Vec<(i32, i32)> = (0..blocks_x * blocks_y)
        .map(|_| {
            (
                rng.gen_range(-block_size..=block_size),
                rng.gen_range(-block_size..=block_size),
            )
        })
        .collect();

    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let idx = (by * blocks_x + bx) as usize;
            let (mut mv_x, mut mv_y) = motion[idx];

            if rng.gen::<f32>() < leak_amount {
                let dir = (rng.gen::<f32>() * 4.0) as i32;
                let leak_source = match dir {
                    0 if bx > 0 => Some(idx - 1),
                    1 if bx < blocks_x - 1 => Some(idx + 1),
                    2 if by > 0 => Some(idx - blocks_x as usize),
                    3 if by < blocks_y - 1 => Some(idx + blocks_x as usize),
                    _ => None,
                };
                if let Some(src) = leak_source {
                    mv_x = motion[src].0;
                    mv_y = motion[src].1;
                }
            }

            for ly in 0..block_size {
                for lx in 0..block_size {
                    let dest_x = bx * block_size + lx;
                    let dest_y = by * block_size + ly;
                    if dest_x >= w || dest_y >= h {
                        continue;
                    }
                    let src_x = (dest_x + mv_x).clamp(0, w - 1);
                    let src_y = (dest_y + mv_y).clamp(0, h - 1);
                    pixels[at(w, dest_x, dest_y)] = source[at(w, src_x, src_y)];
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(w: u32, h: u32) -> Vec<Color> {
        (0..w * h)
            .map(|i| {
                let x = i % w;
                let y = i / w;
                if (x + y) % 2 == 0 {
                    make_color(250, 250, 250, 255)
                } else {
                    make_color(5, 5, 5, 255)
                }
            })
            .collect()
    }

    #[test]
    fn test_pixelate_averages_blocks() {
        let mut pixels = checker(8, 8);
        apply_effect(
            &mut pixels,
            8,
            8,
            &EffectConfig {
                effect_type: EffectType::Pixelate,
                block_size: 8,
                ..EffectConfig::default()
            },
        );
        // the whole image collapses to one average color
        assert!(pixels.iter().all(|&p| p == pixels[0]));
        let v = red(pixels[0]);
        assert!((120..=135).contains(&v));
    }

    #[test]
    fn test_pixelate_small_block_noop() {
        let mut pixels = checker(4, 4);
        let original = pixels.clone();
        apply_effect(
            &mut pixels,
            4,
            4,
            &EffectConfig {
                effect_type: EffectType::Pixelate,
                block_size: 1,
                ..EffectConfig::default()
            },
        );
        assert_eq!(pixels, original);
    }

    #[test]
    fn test_scanline_darkens_odd_rows_only() {
        let mut pixels = vec![make_color(200, 200, 200, 255); 16];
        apply_effect(
            &mut pixels,
            4,
            4,
            &EffectConfig {
                effect_type: EffectType::Scanline,
                intensity: 100,
                ..EffectConfig::default()
            },
        );
        assert_eq!(red(pixels[0]), 200); // row 0 untouched
        assert_eq!(red(pixels[4]), 100); // row 1 at half
        assert_eq!(red(pixels[8]), 200);
        assert_eq!(alpha(pixels[4]), 255);
    }

    #[test]
    fn test_chromatic_aberration_shifts_channels() {
        let mut pixels = vec![make_color(0, 0, 0, 255); 16];
        pixels[5] = make_color(255, 255, 255, 255); // (1, 1)
        apply_effect(
            &mut pixels,
            4,
            4,
            &EffectConfig {
                effect_type: EffectType::ChromaticAberration,
                offset_x: 1,
                offset_y: 0,
                ..EffectConfig::default()
            },
        );
        // red pulls from the left, so the white pixel's red lands at (2,1)
        assert_eq!(red(pixels[6]), 255);
        assert_eq!(green(pixels[6]), 0);
        // blue pulls from the right, landing at (0,1)
        assert_eq!(blue(pixels[4]), 255);
    }

    #[test]
    fn test_posterize_reduces_levels() {
        let mut pixels: Vec<Color> = (0..=255)
            .map(|v| make_color(v as u8, v as u8, v as u8, 255))
            .collect();
        apply_effect(
            &mut pixels,
            16,
            16,
            &EffectConfig {
                effect_type: EffectType::Posterize,
                levels: 4,
                ..EffectConfig::default()
            },
        );
        let mut distinct: Vec<u8> = pixels.iter().map(|&p| red(p)).collect();
        distinct.sort_unstable();
        distinct.dedup();
        assert!(distinct.len() <= 4, "got {} levels", distinct.len());
    }

    #[test]
    fn test_glitch_shift_is_seeded() {
        let mut a = checker(16, 16);
        let mut b = checker(16, 16);
        let cfg = EffectConfig {
            effect_type: EffectType::GlitchShift,
            block_size: 4,
            seed: 777,
            ..EffectConfig::default()
        };
        apply_effect(&mut a, 16, 16, &cfg);
        apply_effect(&mut b, 16, 16, &cfg);
        assert_eq!(a, b);
    }

    #[test]
    fn test_dct_corrupt_preserves_alpha() {
        let mut pixels = vec![make_color(100, 150, 200, 42); 64];
        apply_effect(
            &mut pixels,
            8,
            8,
            &EffectConfig {
                effect_type: EffectType::DctCorrupt,
                intensity: 100,
                block_size: 4,
                ..EffectConfig::default()
            },
        );
        assert!(pixels.iter().all(|&p| alpha(p) == 42));
    }

    #[test]
    fn test_pixel_sort_orders_interval() {
        // one row, mid-brightness values form a single sortable interval
        let mut pixels = vec![
            make_color(0, 0, 0, 255),   // below threshold, boundary
            make_color(180, 180, 180, 255),
            make_color(90, 90, 90, 255),
            make_color(140, 140, 140, 255),
            make_color(0, 0, 0, 255),   // boundary
        ];
        apply_effect(
            &mut pixels,
            5,
            1,
            &EffectConfig {
                effect_type: EffectType::PixelSort,
                threshold: 50,
                ..EffectConfig::default()
            },
        );
        assert_eq!(red(pixels[1]), 90);
        assert_eq!(red(pixels[2]), 140);
        assert_eq!(red(pixels[3]), 180);
    }

    #[test]
    fn test_prediction_leak_keeps_dimensions_and_content_pool() {
        let mut pixels = checker(16, 16);
        apply_effect(
            &mut pixels,
            16,
            16,
            &EffectConfig {
                effect_type: EffectType::PredictionLeak,
                block_size: 4,
                leak_amount: 1.0,
                seed: 3,
                ..EffectConfig::default()
            },
        );
        assert_eq!(pixels.len(), 256);
        // every output pixel is copied from the source pool
        assert!(pixels
            .iter()
            .all(|&p| red(p) == 250 || red(p) == 5));
    }

    #[test]
    fn test_apply_effects_chains_in_order() {
        let mut chained = checker(8, 8);
        apply_effects(
            &mut chained,
            8,
            8,
            &[
                EffectConfig {
                    effect_type: EffectType::Pixelate,
                    block_size: 8,
                    ..EffectConfig::default()
                },
                EffectConfig {
                    effect_type: EffectType::Posterize,
                    levels: 2,
                    ..EffectConfig::default()
                },
            ],
        );
        let mut manual = checker(8, 8);
        apply_effect(
            &mut manual,
            8,
            8,
            &EffectConfig {
                effect_type: EffectType::Pixelate,
                block_size: 8,
                ..EffectConfig::default()
            },
        );
        apply_effect(
            &mut manual,
            8,
            8,
            &EffectConfig {
                effect_type: EffectType::Posterize,
                levels: 2,
                ..EffectConfig::default()
            },
        );
        assert_eq!(chained, manual);
    }

    #[test]
    fn test_effect_names_roundtrip() {
        for e in [
            EffectType::Pixelate,
            EffectType::Scanline,
            EffectType::ChromaticAberration,
            EffectType::Dither,
            EffectType::Posterize,
            EffectType::GlitchShift,
            EffectType::DctCorrupt,
            EffectType::PixelSort,
            EffectType::PredictionLeak,
        ] {
            assert_eq!(EffectType::parse(e.name()), e);
        }
        assert_eq!(EffectType::parse("dct"), EffectType::DctCorrupt);
        assert_eq!(EffectType::parse("unknown"), EffectType::None);
    }
}

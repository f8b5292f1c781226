//! Quad-tree segmentation.
//!
//! The tree starts at the padded extent `max(ww, hh)` and splits while a
//! node is larger than the max block size, or larger than the min block
//! size with a sampled standard deviation above the channel threshold.
//! One decision bit is emitted per visited node; children visit in
//! TL, TR, BL, BR order. Nodes whose top-left corner falls outside the
//! image emit nothing, and the reader applies the same skip, so both ends
//! walk the identical tree.
//!
//! The deviation estimator draws random in-node samples from a PRNG with
//! a fixed seed. Seeding from entropy would desynchronize nothing (the
//! reader consumes decision bits, it never re-estimates) but would make
//! repeated encodes differ, so the seed is part of the contract.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bitio::{BitReader, BitWriter};
use crate::config::PredictionMethod;
use crate::planes::Planes;

/// PRNG seed for the standard-deviation sampler.
pub const STDDEV_SEED: u64 = 42;

/// One quad-tree leaf: the unit of prediction, transform and coding.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub x: i32,
    pub y: i32,
    /// Side length, a power of two (>= 1).
    pub size: i32,
    /// Predictor recorded for the decoder; `None` means the channel default.
    pub pred_type: PredictionMethod,
    /// Directional predictor angle in `[0, 1)`, `-1.0` until searched.
    pub angle: f32,
    /// Axis family for the directional predictor, `-1` until searched.
    pub ref_angle: i32,
    /// Reference offset, `i16::MAX` until searched.
    pub ref_x: i16,
    /// Reference offset, `i16::MAX` until searched.
    pub ref_y: i16,
}

impl Segment {
    /// Fresh leaf at `(x, y)` with side `size`.
    #[must_use]
    pub fn new(x: i32, y: i32, size: i32) -> Self {
        Self {
            x,
            y,
            size,
            pred_type: PredictionMethod::None,
            angle: -1.0,
            ref_angle: -1,
            ref_x: i16::MAX,
            ref_y: i16::MAX,
        }
    }
}

/// Decompose one channel, emitting split bits to `writer`.
///
/// Returns the leaves in traversal order; this order is the iteration
/// order of every later stage.
pub fn make_segmentation(
    writer: &mut BitWriter,
    planes: &Planes,
    channel: usize,
    min_size: i32,
    max_size: i32,
    threshold: f32,
) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rng = StdRng::seed_from_u64(STDDEV_SEED);

    let start_size = planes.padded_width().max(planes.padded_height());
    let min_size = min_size.max(1);
    let max_size = max_size.min(512);

    segment_recursive(
        writer,
        &mut segments,
        planes,
        channel,
        0,
        0,
        start_size,
        min_size,
        max_size,
        threshold,
        &mut rng,
    );

    segments
}

#[allow(clippy::too_many_arguments)]
fn segment_recursive(
    writer: &mut BitWriter,
    segments: &mut Vec<Segment>,
    planes: &Planes,
    channel: usize,
    x: i32,
    y: i32,
    size: i32,
    min_size: i32,
    max_size: i32,
    threshold: f32,
    rng: &mut StdRng,
) {
    if x >= planes.width() || y >= planes.height() {
        return;
    }

    let std_dev = calc_std_dev(planes, channel, x, y, size, rng);

    if size > max_size || (size > min_size && std_dev > threshold) {
        writer.write_bool(true);
        let mid = size / 2;
        segment_recursive(
            writer, segments, planes, channel, x, y, mid, min_size, max_size, threshold, rng,
        );
        segment_recursive(
            writer,
            segments,
            planes,
            channel,
            x + mid,
            y,
            mid,
            min_size,
            max_size,
            threshold,
            rng,
        );
        segment_recursive(
            writer,
            segments,
            planes,
            channel,
            x,
            y + mid,
            mid,
            min_size,
            max_size,
            threshold,
            rng,
        );
        segment_recursive(
            writer,
            segments,
            planes,
            channel,
            x + mid,
            y + mid,
            mid,
            min_size,
            max_size,
            threshold,
            rng,
        );
    } else {
        writer.write_bool(false);
        segments.push(Segment::new(x, y, size));
    }
}

/// Rebuild the leaf list from a split-bit stream.
///
/// A read past the end of the stream counts as "no split", which lets a
/// truncated stream still produce a (coarser) covering.
#[must_use]
pub fn read_segmentation(
    reader: &mut BitReader<'_>,
    padded_width: i32,
    padded_height: i32,
    width: i32,
    height: i32,
) -> Vec<Segment> {
    let mut segments = Vec::new();
    let start_size = padded_width.max(padded_height);
    read_segment_recursive(reader, &mut segments, 0, 0, start_size, width, height);
    segments
}

fn read_segment_recursive(
    reader: &mut BitReader<'_>,
    segments: &mut Vec<Segment>,
    x: i32,
    y: i32,
    size: i32,
    width: i32,
    height: i32,
) {
    if x >= width || y >= height {
        return;
    }

    let decision = reader.read_bool().unwrap_or(false);

    if decision && size > 2 {
        let mid = size / 2;
        read_segment_recursive(reader, segments, x, y, mid, width, height);
        read_segment_recursive(reader, segments, x + mid, y, mid, width, height);
        read_segment_recursive(reader, segments, x, y + mid, mid, width, height);
        read_segment_recursive(reader, segments, x + mid, y + mid, mid, width, height);
    } else {
        segments.push(Segment::new(x, y, size));
    }
}

/// Welford running deviation over random samples of the node's region.
///
/// Sample count is `max(0.1 * size^2, 4)`; out-of-image samples read the
/// reference color like every other plane access.
#[must_use]
pub fn calc_std_dev(
    planes: &Planes,
    channel: usize,
    x: i32,
    y: i32,
    size: i32,
    rng: &mut StdRng,
) -> f32 {
    let limit = ((0.1 * (size * size) as f32) as i32).max(4);

    let mut a = 0.0f32;
    let mut q = 0.0f32;

    for k in 1..=limit {
        let pos_x = rng.gen_range(0..size);
        let pos_y = rng.gen_range(0..size);

        let xk = planes.get(channel, x + pos_x, y + pos_y) as f32;

        let old_a = a;
        a += (xk - a) / k as f32;
        q += (xk - old_a) * (xk - a);
    }

    (q / (limit - 1) as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{make_color, ColorSpace};
    use crate::planes::RefColor;

    fn flat_planes(w: u32, h: u32, value: u8) -> Planes {
        let pixels = vec![make_color(value, value, value, 255); (w * h) as usize];
        Planes::from_pixels(&pixels, w, h, ColorSpace::Rgb, RefColor::default())
    }

    fn noisy_planes(w: u32, h: u32) -> Planes {
        let mut rng = StdRng::seed_from_u64(7);
        let pixels: Vec<u32> = (0..w * h)
            .map(|_| {
                let v: u8 = rng.gen();
                make_color(v, rng.gen(), rng.gen(), 255)
            })
            .collect();
        Planes::from_pixels(&pixels, w, h, ColorSpace::Rgb, RefColor::default())
    }

    #[test]
    fn test_flat_image_is_one_leaf() {
        let planes = flat_planes(8, 8, 100);
        let mut w = BitWriter::new();
        let segs = make_segmentation(&mut w, &planes, 0, 2, 256, 15.0);
        assert_eq!(segs.len(), 1);
        assert_eq!((segs[0].x, segs[0].y, segs[0].size), (0, 0, 8));
    }

    #[test]
    fn test_max_block_size_forces_split() {
        let planes = flat_planes(8, 8, 100);
        let mut w = BitWriter::new();
        let segs = make_segmentation(&mut w, &planes, 0, 2, 4, 15.0);
        assert_eq!(segs.len(), 4);
        assert!(segs.iter().all(|s| s.size == 4));
    }

    #[test]
    fn test_noise_splits_to_min_block_size() {
        let planes = noisy_planes(8, 8);
        let mut w = BitWriter::new();
        let segs = make_segmentation(&mut w, &planes, 0, 2, 256, 1.0);
        assert!(segs.iter().all(|s| s.size >= 2));
        assert!(segs.iter().any(|s| s.size == 2));
        // leaves tile the padded extent exactly
        let area: i64 = segs.iter().map(|s| i64::from(s.size) * i64::from(s.size)).sum();
        assert_eq!(area, 64);
    }

    #[test]
    fn test_traversal_order_is_z_order() {
        let planes = flat_planes(8, 8, 100);
        let mut w = BitWriter::new();
        let segs = make_segmentation(&mut w, &planes, 0, 2, 4, 15.0);
        let coords: Vec<(i32, i32)> = segs.iter().map(|s| (s.x, s.y)).collect();
        assert_eq!(coords, vec![(0, 0), (4, 0), (0, 4), (4, 4)]);
    }

    #[test]
    fn test_two_runs_are_identical() {
        let planes = noisy_planes(16, 16);
        let mut w1 = BitWriter::new();
        let segs1 = make_segmentation(&mut w1, &planes, 1, 2, 256, 10.0);
        let mut w2 = BitWriter::new();
        let segs2 = make_segmentation(&mut w2, &planes, 1, 2, 256, 10.0);
        w1.align();
        w2.align();
        assert_eq!(w1.data(), w2.data());
        assert_eq!(segs1, segs2);
    }

    #[test]
    fn test_reader_reproduces_leaves() {
        let planes = noisy_planes(16, 16);
        let mut w = BitWriter::new();
        let segs = make_segmentation(&mut w, &planes, 0, 2, 256, 10.0);
        w.align();

        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        let read = read_segmentation(
            &mut r,
            planes.padded_width(),
            planes.padded_height(),
            planes.width(),
            planes.height(),
        );
        assert_eq!(read, segs);
    }

    #[test]
    fn test_non_square_skip_rule() {
        // 5x3 pads to 8x4; the tree starts at 8 and skips nodes whose
        // corner is outside the 5x3 image in both writer and reader.
        let planes = noisy_planes(5, 3);
        let mut w = BitWriter::new();
        let segs = make_segmentation(&mut w, &planes, 0, 2, 256, 0.5);
        w.align();

        assert!(segs.iter().all(|s| s.x < 5 && s.y < 3));

        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        let read = read_segmentation(&mut r, 8, 4, 5, 3);
        assert_eq!(read, segs);
    }

    #[test]
    fn test_truncated_bits_fall_back_to_leaves() {
        let mut r = BitReader::new(&[]);
        let read = read_segmentation(&mut r, 8, 8, 8, 8);
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].size, 8);
    }

    #[test]
    fn test_std_dev_constant_region_is_zero() {
        let planes = flat_planes(8, 8, 77);
        let mut rng = StdRng::seed_from_u64(STDDEV_SEED);
        let sd = calc_std_dev(&planes, 0, 0, 0, 8, &mut rng);
        assert!(sd.abs() < 1e-6);
    }

    #[test]
    fn test_std_dev_noise_is_positive() {
        let planes = noisy_planes(8, 8);
        let mut rng = StdRng::seed_from_u64(STDDEV_SEED);
        let sd = calc_std_dev(&planes, 0, 0, 0, 8, &mut rng);
        assert!(sd > 10.0);
    }

    #[test]
    fn test_min_block_size_clamps_to_one() {
        let planes = noisy_planes(4, 4);
        let mut w = BitWriter::new();
        let segs = make_segmentation(&mut w, &planes, 0, 0, 256, 0.0);
        // min of 0 is treated as 1, so 1x1 leaves are reachable
        assert!(segs.iter().all(|s| s.size >= 1));
    }
}

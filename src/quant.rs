//! Uniform scalar quantization of residual segments.
//!
//! The channel knob is a byte; the effective divisor is half of it, and
//! divisors at or below 1 leave the plane untouched in both directions.

use crate::planes::Planes;
use crate::segment::Segment;

/// Effective divisor for a `quantization_value` byte.
#[inline]
#[must_use]
pub fn quant_value(v: u8) -> f32 {
    f32::from(v) / 2.0
}

/// Effective magnitude threshold for a `transform_compress` knob.
#[inline]
#[must_use]
pub fn transform_compress_threshold(v: f32) -> f64 {
    f64::from(50.0 * (v / 255.0) * (v / 255.0))
}

/// Scale a segment's plane values by `1/val` (forward) or `val` (inverse),
/// rounding to the nearest integer. A no-op when `val <= 1`.
pub fn quantize(planes: &mut Planes, channel: usize, segment: &Segment, val: f32, forward: bool) {
    if val <= 1.0 {
        return;
    }

    for x in 0..segment.size {
        for y in 0..segment.size {
            let col = planes.get(channel, x + segment.x, y + segment.y) as f32;
            let col = if forward { col / val } else { col * val };
            planes.set(channel, x + segment.x, y + segment.y, col.round() as i32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{make_color, ColorSpace};
    use crate::planes::RefColor;

    fn planes_with(values: &[i32]) -> Planes {
        let n = values.len();
        let side = (n as f32).sqrt() as u32;
        let pixels = vec![make_color(0, 0, 0, 255); n];
        let mut p = Planes::from_pixels(&pixels, side, side, ColorSpace::Rgb, RefColor::default());
        for (i, &v) in values.iter().enumerate() {
            p.set(0, (i as u32 % side) as i32, (i as u32 / side) as i32, v);
        }
        p
    }

    #[test]
    fn test_quant_value_is_half_the_byte() {
        assert!((quant_value(110) - 55.0).abs() < f32::EPSILON);
        assert!((quant_value(1) - 0.5).abs() < f32::EPSILON);
        assert!((quant_value(0)).abs() < f32::EPSILON);
    }

    #[test]
    fn test_compress_threshold_curve() {
        assert!(transform_compress_threshold(0.0).abs() < 1e-12);
        assert!((transform_compress_threshold(255.0) - 50.0).abs() < 1e-5);
        let mid = transform_compress_threshold(127.5);
        assert!((mid - 12.5).abs() < 1e-5);
    }

    #[test]
    fn test_forward_divides_and_rounds() {
        let mut p = planes_with(&[100, -100, 55, 3]);
        let s = Segment::new(0, 0, 2);
        quantize(&mut p, 0, &s, 10.0, true);
        assert_eq!(p.get(0, 0, 0), 10);
        assert_eq!(p.get(0, 1, 0), -10);
        assert_eq!(p.get(0, 0, 1), 6); // 5.5 rounds away from zero
        assert_eq!(p.get(0, 1, 1), 0);
    }

    #[test]
    fn test_roundtrip_error_bounded_by_half_step() {
        let values = [200, -130, 77, -3, 129, 64, -200, 55, 18];
        let mut p = planes_with(&values);
        let s = Segment::new(0, 0, 3);
        quantize(&mut p, 0, &s, 8.0, true);
        quantize(&mut p, 0, &s, 8.0, false);
        for (i, &v) in values.iter().enumerate() {
            let got = p.get(0, (i % 3) as i32, (i / 3) as i32);
            assert!(
                (got - v).abs() <= 4,
                "value {v} came back as {got}"
            );
        }
    }

    #[test]
    fn test_divisor_at_or_below_one_is_noop() {
        let mut p = planes_with(&[100, 50, 25, 12]);
        let s = Segment::new(0, 0, 2);
        quantize(&mut p, 0, &s, 1.0, true);
        assert_eq!(p.get(0, 0, 0), 100);
        quantize(&mut p, 0, &s, 0.5, true);
        assert_eq!(p.get(0, 1, 0), 50);
    }
}

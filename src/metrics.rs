//! Quality metrics for codec evaluation.
//!
//! MSE and PSNR over byte buffers, plus a per-channel MSE over packed
//! ARGB pixels for checking how far a decode drifted from its source.

use crate::color::{blue, green, red, Color};
use crate::error::GlicError;

/// Mean squared error between two byte buffers.
///
/// Returns `0.0` for empty buffers.
///
/// # Errors
///
/// Returns [`GlicError::InvalidBufferSize`] if the lengths differ.
#[inline]
pub fn mse(a: &[u8], b: &[u8]) -> Result<f64, GlicError> {
    if a.len() != b.len() {
        return Err(GlicError::InvalidBufferSize {
            expected: a.len(),
            got: b.len(),
        });
    }
    if a.is_empty() {
        return Ok(0.0);
    }
    let sum: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let diff = f64::from(x) - f64::from(y);
            diff * diff
        })
        .sum();
    Ok(sum / a.len() as f64)
}

/// Peak signal-to-noise ratio between two byte buffers, in dB.
///
/// Returns `f64::INFINITY` for identical or empty buffers.
///
/// # Errors
///
/// Returns [`GlicError::InvalidBufferSize`] if the lengths differ.
#[inline]
pub fn psnr(a: &[u8], b: &[u8]) -> Result<f64, GlicError> {
    let mse_val = mse(a, b)?;
    if mse_val == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * (255.0_f64 * 255.0 / mse_val).log10())
}

/// Per-channel (R, G, B) mean squared error between two pixel buffers.
///
/// # Errors
///
/// Returns [`GlicError::InvalidBufferSize`] if the lengths differ.
pub fn pixel_channel_mse(a: &[Color], b: &[Color]) -> Result<[f64; 3], GlicError> {
    if a.len() != b.len() {
        return Err(GlicError::InvalidBufferSize {
            expected: a.len(),
            got: b.len(),
        });
    }
    if a.is_empty() {
        return Ok([0.0; 3]);
    }

    let mut sums = [0.0f64; 3];
    for (&x, &y) in a.iter().zip(b.iter()) {
        let dr = f64::from(red(x)) - f64::from(red(y));
        let dg = f64::from(green(x)) - f64::from(green(y));
        let db = f64::from(blue(x)) - f64::from(blue(y));
        sums[0] += dr * dr;
        sums[1] += dg * dg;
        sums[2] += db * db;
    }
    let n = a.len() as f64;
    Ok([sums[0] / n, sums[1] / n, sums[2] / n])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::make_color;

    #[test]
    fn test_psnr_identical() {
        let buf = [10u8, 20, 30, 40];
        assert!(psnr(&buf, &buf).unwrap().is_infinite());
    }

    #[test]
    fn test_psnr_known_value() {
        // MSE = 1.0 -> PSNR = 10 * log10(65025) ~ 48.13
        let a = [100u8];
        let b = [101u8];
        let db = psnr(&a, &b).unwrap();
        assert!((db - 48.13).abs() < 0.1, "PSNR = {db}");
    }

    #[test]
    fn test_mse_known_value() {
        let a = [0u8, 0];
        let b = [3u8, 4];
        assert!((mse(&a, &b).unwrap() - 12.5).abs() < 1e-10);
    }

    #[test]
    fn test_mismatched_lengths() {
        assert!(psnr(&[1u8, 2, 3], &[1u8, 2]).is_err());
        assert!(pixel_channel_mse(&[0u32; 2], &[0u32; 3]).is_err());
    }

    #[test]
    fn test_pixel_channel_mse_separates_channels() {
        let a = [make_color(10, 20, 30, 255); 4];
        let b = [make_color(12, 20, 26, 255); 4];
        let m = pixel_channel_mse(&a, &b).unwrap();
        assert!((m[0] - 4.0).abs() < 1e-12);
        assert!(m[1].abs() < 1e-12);
        assert!((m[2] - 16.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_buffers() {
        assert!(psnr(&[], &[]).unwrap().is_infinite());
        assert_eq!(pixel_channel_mse(&[], &[]).unwrap(), [0.0; 3]);
    }
}

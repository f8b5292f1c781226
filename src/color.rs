//! Color spaces and packed-pixel helpers.
//!
//! Pixels are packed 32-bit ARGB. Every conversion maps one pixel into three
//! channel bytes (and back), clamps the result to 0..255, and carries the
//! alpha byte through untouched. There is no neighbor context.
//!
//! Two of the encodings are wrap-around difference codings (`YPbPr`,
//! `Rggbg`): they use mod-256 arithmetic so the difference channels invert
//! bit-for-bit. `Gs` projects to three equal luma bytes and its inverse
//! re-applies the projection, which makes it deliberately lossy.

use serde::{Deserialize, Serialize};

use crate::error::GlicError;

/// Packed ARGB pixel: alpha in bits 24..32, then red, green, blue.
pub type Color = u32;

/// Alpha component of a packed pixel.
#[inline]
#[must_use]
pub const fn alpha(c: Color) -> u8 {
    ((c >> 24) & 0xFF) as u8
}

/// Red component of a packed pixel.
#[inline]
#[must_use]
pub const fn red(c: Color) -> u8 {
    ((c >> 16) & 0xFF) as u8
}

/// Green component of a packed pixel.
#[inline]
#[must_use]
pub const fn green(c: Color) -> u8 {
    ((c >> 8) & 0xFF) as u8
}

/// Blue component of a packed pixel.
#[inline]
#[must_use]
pub const fn blue(c: Color) -> u8 {
    (c & 0xFF) as u8
}

/// Pack RGBA components into a pixel.
#[inline]
#[must_use]
pub const fn make_color(r: u8, g: u8, b: u8, a: u8) -> Color {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Replace the RGB of `c`, clamping each component to 0..255 and keeping
/// the alpha byte.
#[inline]
#[must_use]
pub fn blend_rgb(c: Color, r: i32, g: i32, b: i32) -> Color {
    let r = r.clamp(0, 255) as u32;
    let g = g.clamp(0, 255) as u32;
    let b = b.clamp(0, 255) as u32;
    (c & 0xFF00_0000) | (r << 16) | (g << 8) | b
}

/// BT.709 luma of a pixel, rounded and clamped to 0..255.
#[inline]
#[must_use]
pub fn luma(c: Color) -> i32 {
    let l = 0.2126 * f32::from(red(c)) + 0.7152 * f32::from(green(c)) + 0.0722 * f32::from(blue(c));
    (l.round() as i32).clamp(0, 255)
}

#[inline]
fn nr(c: Color) -> f32 {
    f32::from(red(c)) / 255.0
}

#[inline]
fn ng(c: Color) -> f32 {
    f32::from(green(c)) / 255.0
}

#[inline]
fn nb(c: Color) -> f32 {
    f32::from(blue(c)) / 255.0
}

/// The three-channel encodings a plane set can live in.
///
/// The discriminants are the wire values stored in the container header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ColorSpace {
    Ohta = 0,
    Rgb = 1,
    Cmy = 2,
    Hsb = 3,
    Xyz = 4,
    Yxy = 5,
    Hcl = 6,
    Luv = 7,
    Lab = 8,
    Hwb = 9,
    /// R-G / G / B-G difference coding, mod 256.
    Rggbg = 10,
    /// Luma plus mod-256 B-Y / R-Y differences.
    YPbPr = 11,
    YCbCr = 12,
    YDbDr = 13,
    /// Greyscale projection; not invertible.
    Gs = 14,
    Yuv = 15,
}

/// Number of color spaces (one past the highest wire value).
pub const COLOR_SPACE_COUNT: u8 = 16;

impl ColorSpace {
    /// Parse a wire byte.
    ///
    /// # Errors
    ///
    /// Returns [`GlicError::UnsupportedEnum`] for bytes outside `0..16`.
    pub fn from_u8(v: u8) -> Result<Self, GlicError> {
        Ok(match v {
            0 => Self::Ohta,
            1 => Self::Rgb,
            2 => Self::Cmy,
            3 => Self::Hsb,
            4 => Self::Xyz,
            5 => Self::Yxy,
            6 => Self::Hcl,
            7 => Self::Luv,
            8 => Self::Lab,
            9 => Self::Hwb,
            10 => Self::Rggbg,
            11 => Self::YPbPr,
            12 => Self::YCbCr,
            13 => Self::YDbDr,
            14 => Self::Gs,
            15 => Self::Yuv,
            _ => {
                return Err(GlicError::UnsupportedEnum {
                    what: "color space",
                    value: i32::from(v),
                })
            }
        })
    }

    /// Canonical display name, as accepted by [`ColorSpace::parse`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Ohta => "OHTA",
            Self::Rgb => "RGB",
            Self::Cmy => "CMY",
            Self::Hsb => "HSB",
            Self::Xyz => "XYZ",
            Self::Yxy => "YXY",
            Self::Hcl => "HCL",
            Self::Luv => "LUV",
            Self::Lab => "LAB",
            Self::Hwb => "HWB",
            Self::Rggbg => "R-GGB-G",
            Self::YPbPr => "YPbPr",
            Self::YCbCr => "YCbCr",
            Self::YDbDr => "YDbDr",
            Self::Gs => "Greyscale",
            Self::Yuv => "YUV",
        }
    }

    /// Parse a name, case-sensitively, falling back to RGB like the CLI
    /// always has.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "OHTA" => Self::Ohta,
            "CMY" => Self::Cmy,
            "HSB" => Self::Hsb,
            "XYZ" => Self::Xyz,
            "YXY" => Self::Yxy,
            "HCL" => Self::Hcl,
            "LUV" => Self::Luv,
            "LAB" => Self::Lab,
            "HWB" => Self::Hwb,
            "R-GGB-G" | "RGGBG" => Self::Rggbg,
            "YPbPr" => Self::YPbPr,
            "YCbCr" => Self::YCbCr,
            "YDbDr" => Self::YDbDr,
            "Greyscale" | "GS" => Self::Gs,
            "YUV" => Self::Yuv,
            _ => Self::Rgb,
        }
    }
}

/// Project an RGB pixel into `cs`.
#[must_use]
pub fn to_color_space(c: Color, cs: ColorSpace) -> Color {
    match cs {
        ColorSpace::Ohta => to_ohta(c),
        ColorSpace::Rgb => c,
        ColorSpace::Cmy => to_cmy(c),
        ColorSpace::Hsb => to_hsb(c),
        ColorSpace::Xyz => to_xyz(c),
        ColorSpace::Yxy => to_yxy(c),
        ColorSpace::Hcl => to_hcl(c),
        ColorSpace::Luv => to_luv(c),
        ColorSpace::Lab => to_lab(c),
        ColorSpace::Hwb => to_hwb(c),
        ColorSpace::Rggbg => to_rggbg(c),
        ColorSpace::YPbPr => to_ypbpr(c),
        ColorSpace::YCbCr => to_ycbcr(c),
        ColorSpace::YDbDr => to_ydbdr(c),
        ColorSpace::Gs => to_gs(c),
        ColorSpace::Yuv => to_yuv(c),
    }
}

/// Map a pixel in `cs` back to RGB.
#[must_use]
pub fn from_color_space(c: Color, cs: ColorSpace) -> Color {
    match cs {
        ColorSpace::Ohta => from_ohta(c),
        ColorSpace::Rgb => c,
        ColorSpace::Cmy => from_cmy(c),
        ColorSpace::Hsb => from_hsb(c),
        ColorSpace::Xyz => from_xyz(c),
        ColorSpace::Yxy => from_yxy(c),
        ColorSpace::Hcl => from_hcl(c),
        ColorSpace::Luv => from_luv(c),
        ColorSpace::Lab => from_lab(c),
        ColorSpace::Hwb => from_hwb(c),
        ColorSpace::Rggbg => from_rggbg(c),
        ColorSpace::YPbPr => from_ypbpr(c),
        ColorSpace::YCbCr => from_ycbcr(c),
        ColorSpace::YDbDr => from_ydbdr(c),
        ColorSpace::Gs => from_gs(c),
        ColorSpace::Yuv => from_yuv(c),
    }
}

// ── CIE machinery ──────────────────────────────────────────────

const D65X: f32 = 0.950456;
const D65Y: f32 = 1.0;
const D65Z: f32 = 1.088754;
const CIE_EPSILON: f32 = 216.0 / 24389.0;
const CIE_K: f32 = 24389.0 / 27.0;
const CIE_K2_EPSILON: f32 = CIE_K * CIE_EPSILON;
const D65FX_4: f32 = 4.0 * D65X / (D65X + 15.0 * D65Y + 3.0 * D65Z);
const D65FY_9: f32 = 9.0 * D65Y / (D65X + 15.0 * D65Y + 3.0 * D65Z);
const RANGE_X: f32 = 100.0 * (0.4124 + 0.3576 + 0.1805);
const RANGE_Y: f32 = 100.0;
const RANGE_Z: f32 = 100.0 * (0.0193 + 0.1192 + 0.9505);
const M_EPSILON: f32 = 1.0e-10;
const CORR_RATIO: f32 = 1.0 / 2.4;
const ONE_THIRD: f32 = 1.0 / 3.0;
const ONE_116TH: f32 = 1.0 / 116.0;
const U_MAX: f32 = 0.436 * 255.0;
const V_MAX: f32 = 0.615 * 255.0;

#[inline]
fn mapf(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    out_min + (value - in_min) * (out_max - out_min) / (in_max - in_min)
}

#[inline]
fn srgb_to_linear(n: f32) -> f32 {
    (if n > 0.04045 {
        ((n + 0.055) / 1.055).powf(2.4)
    } else {
        n / 12.92
    }) * 100.0
}

#[inline]
fn linear_to_srgb(n: f32) -> f32 {
    if n > 0.003_130_8 {
        1.055 * n.powf(CORR_RATIO) - 0.055
    } else {
        12.92 * n
    }
}

#[inline]
fn perceptible_reciprocal(x: f32) -> f32 {
    let sgn = if x < 0.0 { -1.0 } else { 1.0 };
    if sgn * x >= M_EPSILON {
        1.0 / x
    } else {
        sgn / M_EPSILON
    }
}

fn rgb_to_xyz_raw(rr: f32, gg: f32, bb: f32) -> (f32, f32, f32) {
    let r = srgb_to_linear(rr);
    let g = srgb_to_linear(gg);
    let b = srgb_to_linear(bb);
    (
        r * 0.4124 + g * 0.3576 + b * 0.1805,
        r * 0.2126 + g * 0.7152 + b * 0.0722,
        r * 0.0193 + g * 0.1192 + b * 0.9505,
    )
}

fn xyz_raw_to_rgb(c: Color, xx: f32, yy: f32, zz: f32) -> Color {
    let x = xx / 100.0;
    let y = yy / 100.0;
    let z = zz / 100.0;

    let r = (255.0 * linear_to_srgb(x * 3.2406 + y * -1.5372 + z * -0.4986)).round() as i32;
    let g = (255.0 * linear_to_srgb(x * -0.9689 + y * 1.8758 + z * 0.0415)).round() as i32;
    let b = (255.0 * linear_to_srgb(x * 0.0557 + y * -0.2040 + z * 1.0570)).round() as i32;

    blend_rgb(c, r, g, b)
}

// ── Projections ────────────────────────────────────────────────

fn to_gs(c: Color) -> Color {
    let l = luma(c);
    blend_rgb(c, l, l, l)
}

fn from_gs(c: Color) -> Color {
    to_gs(c)
}

fn to_yuv(c: Color) -> Color {
    let r = f32::from(red(c));
    let g = f32::from(green(c));
    let b = f32::from(blue(c));

    let y = (0.299 * r + 0.587 * g + 0.114 * b).round() as i32;
    let u = mapf(-0.14713 * r - 0.28886 * g + 0.436 * b, -U_MAX, U_MAX, 0.0, 255.0).round() as i32;
    let v = mapf(0.615 * r - 0.51499 * g - 0.10001 * b, -V_MAX, V_MAX, 0.0, 255.0).round() as i32;

    blend_rgb(c, y, u, v)
}

fn from_yuv(c: Color) -> Color {
    let y = f32::from(red(c));
    let u = mapf(f32::from(green(c)), 0.0, 255.0, -U_MAX, U_MAX);
    let v = mapf(f32::from(blue(c)), 0.0, 255.0, -V_MAX, V_MAX);

    let r = (y + 1.13983 * v).round() as i32;
    let g = (y - 0.39465 * u - 0.58060 * v).round() as i32;
    let b = (y + 2.03211 * u).round() as i32;

    blend_rgb(c, r, g, b)
}

fn to_ydbdr(c: Color) -> Color {
    let r = f32::from(red(c));
    let g = f32::from(green(c));
    let b = f32::from(blue(c));

    let y = (0.299 * r + 0.587 * g + 0.114 * b).round() as i32;
    let db = (127.5 + (-0.450 * r - 0.883 * g + 1.333 * b) / 2.666).round() as i32;
    let dr = (127.5 + (-1.333 * r + 1.116 * g + 0.217 * b) / 2.666).round() as i32;

    blend_rgb(c, y, db, dr)
}

fn from_ydbdr(c: Color) -> Color {
    let y = f32::from(red(c));
    let db = (f32::from(green(c)) - 127.5) * 2.666;
    let dr = (f32::from(blue(c)) - 127.5) * 2.666;

    let r = (y + 9.230_371_6e-5 * db - 0.525_912_63 * dr).round() as i32;
    let g = (y - 0.129_132_90 * db + 0.267_899_33 * dr).round() as i32;
    let b = (y + 0.664_679_06 * db - 7.920_254_4e-5 * dr).round() as i32;

    blend_rgb(c, r, g, b)
}

fn to_ycbcr(c: Color) -> Color {
    let r = f32::from(red(c));
    let g = f32::from(green(c));
    let b = f32::from(blue(c));

    let y = (0.298_839 * r + 0.586_811 * g + 0.114_350 * b).round() as i32;
    let cb = (-0.168_736 * r - 0.331_264 * g + 0.5 * b + 127.5).round() as i32;
    let cr = (0.5 * r - 0.418_688 * g - 0.081_312 * b + 127.5).round() as i32;

    blend_rgb(c, y, cb, cr)
}

fn from_ycbcr(c: Color) -> Color {
    let y = f32::from(red(c));
    let cb = f32::from(green(c)) - 127.5;
    let cr = f32::from(blue(c)) - 127.5;

    let r = (y + 1.402 * cr).round() as i32;
    let g = (y - 0.344_136 * cb - 0.714_136 * cr).round() as i32;
    let b = (y + 1.772 * cb).round() as i32;

    blend_rgb(c, r, g, b)
}

fn to_ypbpr(c: Color) -> Color {
    let r = i32::from(red(c));
    let b = i32::from(blue(c));

    let y = luma(c);
    let mut pb = b - y;
    let mut pr = r - y;
    if pb < 0 {
        pb += 256;
    }
    if pr < 0 {
        pr += 256;
    }
    blend_rgb(c, y, pb, pr)
}

fn from_ypbpr(c: Color) -> Color {
    let y = i32::from(red(c));
    let mut b = i32::from(green(c)) + y;
    let mut r = i32::from(blue(c)) + y;
    if r > 255 {
        r -= 256;
    }
    if b > 255 {
        b -= 256;
    }

    let g = ((y as f32 - 0.2126 * r as f32 - 0.0722 * b as f32) / 0.7152).round() as i32;

    blend_rgb(c, r, g, b)
}

fn to_rggbg(c: Color) -> Color {
    let g = i32::from(green(c));
    let mut r = i32::from(red(c)) - g;
    let mut b = i32::from(blue(c)) - g;
    if r < 0 {
        r += 256;
    }
    if b < 0 {
        b += 256;
    }
    blend_rgb(c, r, g, b)
}

fn from_rggbg(c: Color) -> Color {
    let g = i32::from(green(c));
    let mut r = i32::from(red(c)) + g;
    let mut b = i32::from(blue(c)) + g;
    if r > 255 {
        r -= 256;
    }
    if b > 255 {
        b -= 256;
    }
    blend_rgb(c, r, g, b)
}

fn to_hsb(c: Color) -> Color {
    let r = i32::from(red(c));
    let g = i32::from(green(c));
    let b = i32::from(blue(c));

    let min = r.min(g).min(b);
    let max = r.max(g).max(b);
    let delta = (max - min) as f32;
    let saturation = if max > 0 { delta / max as f32 } else { 0.0 };
    let brightness = max as f32 / 255.0;

    if delta == 0.0 {
        return blend_rgb(
            c,
            0,
            (saturation * 255.0).round() as i32,
            (brightness * 255.0).round() as i32,
        );
    }

    let mut hue = if r == max {
        (g - b) as f32 / delta
    } else if g == max {
        2.0 + (b - r) as f32 / delta
    } else {
        4.0 + (r - g) as f32 / delta
    };
    hue /= 6.0;
    if hue < 0.0 {
        hue += 1.0;
    }

    blend_rgb(
        c,
        (hue * 255.0).round() as i32,
        (saturation * 255.0).round() as i32,
        (brightness * 255.0).round() as i32,
    )
}

fn from_hsb(c: Color) -> Color {
    let s = ng(c);
    let v = nb(c);
    if s == 0.0 {
        let grey = (v * 255.0).round() as i32;
        return blend_rgb(c, grey, grey, grey);
    }

    let h = 6.0 * nr(c);
    let f = h - h.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match h as i32 {
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        5 => (v, p, q),
        _ => (v, t, p),
    };
    blend_rgb(
        c,
        (r * 255.0).round() as i32,
        (g * 255.0).round() as i32,
        (b * 255.0).round() as i32,
    )
}

fn to_hwb(c: Color) -> Color {
    let r = i32::from(red(c));
    let g = i32::from(green(c));
    let b = i32::from(blue(c));

    let w = r.min(g).min(b);
    let v = r.max(g).max(b);

    let hue = if v == w {
        255
    } else {
        let f = if r == w {
            (g - b) as f32
        } else if g == w {
            (b - r) as f32
        } else {
            (r - g) as f32
        };
        let p = if r == w {
            3.0
        } else if g == w {
            5.0
        } else {
            1.0
        };
        mapf((p - f / (v - w) as f32) / 6.0, 0.0, 1.0, 0.0, 254.0).round() as i32
    };
    blend_rgb(c, hue, w, 255 - v)
}

fn from_hwb(c: Color) -> Color {
    let h = i32::from(red(c));
    let v_int = 255 - i32::from(blue(c));
    if h == 255 {
        return blend_rgb(c, v_int, v_int, v_int);
    }

    let hue = mapf(h as f32, 0.0, 254.0, 0.0, 6.0);
    let v = v_int as f32 / 255.0;
    let whiteness = ng(c);
    let i = hue.floor() as i32;
    let mut f = hue - hue.floor();
    if i & 1 != 0 {
        f = 1.0 - f;
    }
    let n = whiteness + f * (v - whiteness);

    let (r, g, b) = match i {
        1 => (n, v, whiteness),
        2 => (whiteness, v, n),
        3 => (whiteness, n, v),
        4 => (n, whiteness, v),
        5 => (v, whiteness, n),
        _ => (v, n, whiteness),
    };
    blend_rgb(
        c,
        (r * 255.0).round() as i32,
        (g * 255.0).round() as i32,
        (b * 255.0).round() as i32,
    )
}

fn to_lab(c: Color) -> Color {
    let (mut x, mut y, mut z) = rgb_to_xyz_raw(nr(c), ng(c), nb(c));
    x /= 100.0;
    y /= 100.0;
    z /= 100.0;
    x /= D65X;
    y /= D65Y;
    z /= D65Z;

    let fx = if x > CIE_EPSILON {
        x.powf(ONE_THIRD)
    } else {
        (CIE_K * x + 16.0) * ONE_116TH
    };
    let fy = if y > CIE_EPSILON {
        y.powf(ONE_THIRD)
    } else {
        (CIE_K * y + 16.0) * ONE_116TH
    };
    let fz = if z > CIE_EPSILON {
        z.powf(ONE_THIRD)
    } else {
        (CIE_K * z + 16.0) * ONE_116TH
    };

    let l = 255.0 * (((116.0 * fy) - 16.0) * 0.01);
    let a = 255.0 * (0.5 * (fx - fy) + 0.5);
    let b = 255.0 * (0.5 * (fy - fz) + 0.5);

    blend_rgb(c, l.round() as i32, a.round() as i32, b.round() as i32)
}

fn from_lab(c: Color) -> Color {
    let l = 100.0 * nr(c);
    let a = ng(c) - 0.5;
    let b = nb(c) - 0.5;

    let fy = (l + 16.0) * ONE_116TH;
    let fx = fy + a;
    let fz = fy - b;

    let fx3 = fx * fx * fx;
    let x = if fx3 > CIE_EPSILON {
        fx3
    } else {
        (116.0 * fx - 16.0) / CIE_K
    };
    let fy3 = fy * fy * fy;
    let y = if fy3 > CIE_EPSILON { fy3 } else { l / CIE_K };
    let fz3 = fz * fz * fz;
    let z = if fz3 > CIE_EPSILON {
        fz3
    } else {
        (116.0 * fz - 16.0) / CIE_K
    };

    xyz_raw_to_rgb(c, RANGE_X * x, RANGE_Y * y, RANGE_Z * z)
}

fn to_luv(c: Color) -> Color {
    let (mut x, mut y, mut z) = rgb_to_xyz_raw(nr(c), ng(c), nb(c));
    x /= 100.0;
    y /= 100.0;
    z /= 100.0;

    let mut l = if y > CIE_EPSILON {
        116.0 * y.powf(ONE_THIRD) - 16.0
    } else {
        CIE_K * y
    };

    let alpha = perceptible_reciprocal(x + 15.0 * y + 3.0 * z);
    let l13 = 13.0 * l;
    let u = l13 * ((4.0 * alpha * x) - D65FX_4);
    let v = l13 * ((9.0 * alpha * y) - D65FY_9);

    l /= 100.0;
    let u = (u + 134.0) / 354.0;
    let v = (v + 140.0) / 262.0;

    blend_rgb(
        c,
        (l * 255.0).round() as i32,
        (u * 255.0).round() as i32,
        (v * 255.0).round() as i32,
    )
}

fn from_luv(c: Color) -> Color {
    let l = 100.0 * nr(c);
    let u = 354.0 * ng(c) - 134.0;
    let v = 262.0 * nb(c) - 140.0;

    let y = if l > CIE_K2_EPSILON {
        ((l + 16.0) * ONE_116TH).powf(3.0)
    } else {
        l / CIE_K
    };

    let l13 = 13.0 * l;
    let l52 = 52.0 * l;
    let y5 = 5.0 * y;
    let l13u = l52 / (u + l13 * D65FX_4);
    let x = ((y * ((39.0 * l / (v + l13 * D65FY_9)) - 5.0)) + y5) / (((l13u - 1.0) / 3.0) + ONE_THIRD);
    let z = (x * ((l13u - 1.0) / 3.0)) - y5;

    xyz_raw_to_rgb(c, 100.0 * x, 100.0 * y, 100.0 * z)
}

fn to_hcl(c: Color) -> Color {
    let r = nr(c);
    let g = ng(c);
    let b = nb(c);
    let max = r.max(g).max(b);
    let chr = max - r.min(g).min(b);

    let mut h = 0.0;
    if chr != 0.0 {
        if r == max {
            h = ((g - b) / chr + 6.0) % 6.0;
        } else if g == max {
            h = (b - r) / chr + 2.0;
        } else {
            h = (r - g) / chr + 4.0;
        }
    }

    blend_rgb(
        c,
        ((h / 6.0) * 255.0).round() as i32,
        (chr * 255.0).round() as i32,
        (255.0 * (0.298_839 * r + 0.586_811 * g + 0.114_350 * b)).round() as i32,
    )
}

fn from_hcl(c: Color) -> Color {
    let h = 6.0 * nr(c);
    let chr = ng(c);
    let l = nb(c);
    let x = chr * (1.0 - ((h % 2.0) - 1.0).abs());

    let (mut r, mut g, mut b) = (0.0f32, 0.0f32, 0.0f32);
    if (0.0..1.0).contains(&h) {
        r = chr;
        g = x;
    } else if (1.0..2.0).contains(&h) {
        r = x;
        g = chr;
    } else if (2.0..3.0).contains(&h) {
        g = chr;
        b = x;
    } else if (3.0..4.0).contains(&h) {
        g = x;
        b = chr;
    } else if (4.0..5.0).contains(&h) {
        r = x;
        b = chr;
    } else {
        r = chr;
        b = x;
    }

    let m = l - (0.298_839 * r + 0.586_811 * g + 0.114_350 * b);
    blend_rgb(
        c,
        (255.0 * (r + m)).round() as i32,
        (255.0 * (g + m)).round() as i32,
        (255.0 * (b + m)).round() as i32,
    )
}

fn to_yxy(c: Color) -> Color {
    let (xx, yy, zz) = rgb_to_xyz_raw(nr(c), ng(c), nb(c));
    let sum = xx + yy + zz;
    let x = if xx > 0.0 { xx / sum } else { 0.0 };
    let y = if yy > 0.0 { yy / sum } else { 0.0 };

    blend_rgb(
        c,
        mapf(yy, 0.0, RANGE_Y, 0.0, 255.0).round() as i32,
        mapf(x, 0.0, 1.0, 0.0, 255.0).round() as i32,
        mapf(y, 0.0, 1.0, 0.0, 255.0).round() as i32,
    )
}

fn from_yxy(c: Color) -> Color {
    let yy = mapf(f32::from(red(c)), 0.0, 255.0, 0.0, RANGE_Y);
    let x = mapf(f32::from(green(c)), 0.0, 255.0, 0.0, 1.0);
    let y = mapf(f32::from(blue(c)), 0.0, 255.0, 0.0, 1.0);
    let divy = yy / if y > 0.0 { y } else { 1.0e-6 };

    xyz_raw_to_rgb(c, x * divy, yy, (1.0 - x - y) * divy)
}

fn to_xyz(c: Color) -> Color {
    let (x, y, z) = rgb_to_xyz_raw(nr(c), ng(c), nb(c));
    blend_rgb(
        c,
        mapf(x, 0.0, RANGE_X, 0.0, 255.0).round() as i32,
        mapf(y, 0.0, RANGE_Y, 0.0, 255.0).round() as i32,
        mapf(z, 0.0, RANGE_Z, 0.0, 255.0).round() as i32,
    )
}

fn from_xyz(c: Color) -> Color {
    let x = mapf(f32::from(red(c)), 0.0, 255.0, 0.0, RANGE_X);
    let y = mapf(f32::from(green(c)), 0.0, 255.0, 0.0, RANGE_Y);
    let z = mapf(f32::from(blue(c)), 0.0, 255.0, 0.0, RANGE_Z);
    xyz_raw_to_rgb(c, x, y, z)
}

fn to_cmy(c: Color) -> Color {
    blend_rgb(
        c,
        255 - i32::from(red(c)),
        255 - i32::from(green(c)),
        255 - i32::from(blue(c)),
    )
}

fn from_cmy(c: Color) -> Color {
    to_cmy(c)
}

fn to_ohta(c: Color) -> Color {
    let r = f32::from(red(c));
    let g = f32::from(green(c));
    let b = f32::from(blue(c));

    let i1 = (0.33333 * r + 0.33334 * g + 0.33333 * b).round() as i32;
    let i2 = mapf(0.5 * (r - b), -127.5, 127.5, 0.0, 255.0).round() as i32;
    let i3 = mapf(-0.25 * r + 0.5 * g - 0.25 * b, -127.5, 127.5, 0.0, 255.0).round() as i32;

    blend_rgb(c, i1, i2, i3)
}

fn from_ohta(c: Color) -> Color {
    let i1 = f32::from(red(c));
    let i2 = mapf(f32::from(green(c)), 0.0, 255.0, -127.5, 127.5);
    let i3 = mapf(f32::from(blue(c)), 0.0, 255.0, -127.5, 127.5);

    let r = (i1 + 1.0 * i2 - 0.66668 * i3).round() as i32;
    let g = (i1 + 1.33333 * i3).round() as i32;
    let b = (i1 - 1.0 * i2 - 0.66668 * i3).round() as i32;

    blend_rgb(c, r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_SPACES: [ColorSpace; 16] = [
        ColorSpace::Ohta,
        ColorSpace::Rgb,
        ColorSpace::Cmy,
        ColorSpace::Hsb,
        ColorSpace::Xyz,
        ColorSpace::Yxy,
        ColorSpace::Hcl,
        ColorSpace::Luv,
        ColorSpace::Lab,
        ColorSpace::Hwb,
        ColorSpace::Rggbg,
        ColorSpace::YPbPr,
        ColorSpace::YCbCr,
        ColorSpace::YDbDr,
        ColorSpace::Gs,
        ColorSpace::Yuv,
    ];

    /// Moderately saturated sample set; the byte-quantized perceptual
    /// spaces (HSB, HWB, HCL) lose more than 2 levels only near full
    /// saturation.
    const SAMPLES: [(u8, u8, u8); 12] = [
        (64, 64, 64),
        (128, 128, 128),
        (192, 192, 192),
        (120, 80, 60),
        (200, 180, 160),
        (90, 110, 130),
        (160, 96, 128),
        (64, 128, 96),
        (96, 160, 192),
        (144, 176, 80),
        (180, 120, 150),
        (110, 140, 70),
    ];

    /// Bright, low-saturation samples for the CIE-derived spaces, whose
    /// byte-quantized intermediates get steep through the gamma curve in
    /// dark regions.
    const BRIGHT_SAMPLES: [(u8, u8, u8); 6] = [
        (192, 192, 192),
        (200, 180, 160),
        (160, 180, 200),
        (220, 200, 190),
        (170, 200, 180),
        (210, 190, 170),
    ];

    fn channel_diff(a: Color, b: Color) -> i32 {
        let dr = (i32::from(red(a)) - i32::from(red(b))).abs();
        let dg = (i32::from(green(a)) - i32::from(green(b))).abs();
        let db = (i32::from(blue(a)) - i32::from(blue(b))).abs();
        dr.max(dg).max(db)
    }

    #[test]
    fn test_pixel_accessors() {
        let c = make_color(1, 2, 3, 4);
        assert_eq!(red(c), 1);
        assert_eq!(green(c), 2);
        assert_eq!(blue(c), 3);
        assert_eq!(alpha(c), 4);
    }

    #[test]
    fn test_blend_clamps_and_keeps_alpha() {
        let c = make_color(0, 0, 0, 77);
        let out = blend_rgb(c, -10, 300, 128);
        assert_eq!(red(out), 0);
        assert_eq!(green(out), 255);
        assert_eq!(blue(out), 128);
        assert_eq!(alpha(out), 77);
    }

    #[test]
    fn test_rgb_is_identity() {
        let c = make_color(12, 34, 56, 200);
        assert_eq!(to_color_space(c, ColorSpace::Rgb), c);
        assert_eq!(from_color_space(c, ColorSpace::Rgb), c);
    }

    #[test]
    fn test_cmy_is_an_involution() {
        for &(r, g, b) in &SAMPLES {
            let c = make_color(r, g, b, 255);
            let there = to_color_space(c, ColorSpace::Cmy);
            assert_eq!(from_color_space(there, ColorSpace::Cmy), c);
        }
        let c = make_color(0, 255, 3, 9);
        assert_eq!(from_cmy(to_cmy(c)), c);
    }

    #[test]
    fn test_roundtrip_error_is_bounded() {
        for cs in ALL_SPACES {
            if cs == ColorSpace::Gs {
                continue; // projection, not a bijection
            }
            let cie = matches!(
                cs,
                ColorSpace::Xyz | ColorSpace::Yxy | ColorSpace::Lab | ColorSpace::Luv
            );
            let (samples, tolerance): (&[(u8, u8, u8)], i32) = if cie {
                (&BRIGHT_SAMPLES, 3)
            } else {
                (&SAMPLES, 2)
            };
            for &(r, g, b) in samples {
                let c = make_color(r, g, b, 255);
                let back = from_color_space(to_color_space(c, cs), cs);
                let diff = channel_diff(c, back);
                assert!(
                    diff <= tolerance,
                    "{} roundtrip error {diff} for ({r},{g},{b})",
                    cs.name()
                );
            }
        }
    }

    #[test]
    fn test_wraparound_codings_are_exact() {
        // YPbPr difference channels and R-GGB-G invert bit-for-bit even at
        // the extremes; G in YPbPr may move by one luma rounding step.
        let extremes = [
            (0u8, 0u8, 0u8),
            (255, 255, 255),
            (255, 0, 0),
            (0, 255, 0),
            (0, 0, 255),
            (1, 254, 128),
            (250, 3, 17),
        ];
        for &(r, g, b) in &extremes {
            let c = make_color(r, g, b, 255);

            let back = from_rggbg(to_rggbg(c));
            assert_eq!(back, c, "R-GGB-G must be exact for ({r},{g},{b})");

            let back = from_ypbpr(to_ypbpr(c));
            assert_eq!(red(back), r, "YPbPr R for ({r},{g},{b})");
            assert_eq!(blue(back), b, "YPbPr B for ({r},{g},{b})");
            assert!(
                (i32::from(green(back)) - i32::from(g)).abs() <= 1,
                "YPbPr G for ({r},{g},{b})"
            );
        }
    }

    #[test]
    fn test_gs_projection_is_idempotent() {
        for &(r, g, b) in &SAMPLES {
            let c = make_color(r, g, b, 255);
            let grey = to_color_space(c, ColorSpace::Gs);
            assert_eq!(red(grey), green(grey));
            assert_eq!(green(grey), blue(grey));
            // from_gs re-applies the projection rather than inverting it
            assert_eq!(from_color_space(grey, ColorSpace::Gs), grey);
        }
    }

    #[test]
    fn test_alpha_survives_every_projection() {
        let c = make_color(140, 90, 40, 33);
        for cs in ALL_SPACES {
            assert_eq!(alpha(to_color_space(c, cs)), 33, "{}", cs.name());
            assert_eq!(alpha(from_color_space(c, cs)), 33, "{}", cs.name());
        }
    }

    #[test]
    fn test_black_survives_the_cie_spaces() {
        // Degenerate luminance exercises the reciprocal guards.
        let black = make_color(0, 0, 0, 255);
        for cs in [ColorSpace::Luv, ColorSpace::Lab, ColorSpace::Yxy, ColorSpace::Xyz] {
            let back = from_color_space(to_color_space(black, cs), cs);
            assert!(
                channel_diff(black, back) <= 3,
                "{} black handling",
                cs.name()
            );
        }
    }

    #[test]
    fn test_wire_values_roundtrip() {
        for cs in ALL_SPACES {
            assert_eq!(ColorSpace::from_u8(cs as u8).unwrap(), cs);
        }
        assert!(ColorSpace::from_u8(16).is_err());
        assert!(ColorSpace::from_u8(255).is_err());
    }

    #[test]
    fn test_names_roundtrip() {
        for cs in ALL_SPACES {
            assert_eq!(ColorSpace::parse(cs.name()), cs);
        }
        assert_eq!(ColorSpace::parse("RGGBG"), ColorSpace::Rggbg);
        assert_eq!(ColorSpace::parse("GS"), ColorSpace::Gs);
        assert_eq!(ColorSpace::parse("nonsense"), ColorSpace::Rgb);
    }

    #[test]
    fn test_hsb_primary_is_exact() {
        let c = make_color(255, 0, 0, 255);
        let back = from_hsb(to_hsb(c));
        assert_eq!(back, c);
    }

    #[test]
    fn test_luma_weights() {
        assert_eq!(luma(make_color(255, 255, 255, 0)), 255);
        assert_eq!(luma(make_color(0, 0, 0, 0)), 0);
        // 0.7152 * 255 = 182.4
        assert_eq!(luma(make_color(0, 255, 0, 0)), 182);
    }
}

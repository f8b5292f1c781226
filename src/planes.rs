//! Channel planes: three integer 2-D arrays with a padded power-of-two
//! extent, plus the clamp policies that govern residual arithmetic.
//!
//! Out-of-range reads return the reference color for the channel (the
//! projected border color); out-of-range writes are silently dropped. The
//! same rules apply inside the padded-but-outside-image band, which is why
//! encoder and decoder agree about boundary segments without storing them.

use crate::color::{
    alpha, blue, from_color_space, green, make_color, red, to_color_space, Color, ColorSpace,
};
use crate::config::ClampMethod;
use crate::segment::Segment;

// ── Clamp policies ─────────────────────────────────────────────

/// Clamp applied when a residual enters the plane (after subtract).
#[inline]
#[must_use]
pub fn clamp_in(method: ClampMethod, x: i32) -> i32 {
    match method {
        ClampMethod::Mod256 => {
            if x < 0 {
                x + 256
            } else if x > 255 {
                x - 256
            } else {
                x
            }
        }
        ClampMethod::None => x,
    }
}

/// Clamp applied when a reconstructed value leaves the plane (after add).
#[inline]
#[must_use]
pub fn clamp_out(method: ClampMethod, x: i32) -> i32 {
    match method {
        ClampMethod::Mod256 => {
            if x < 0 {
                x + 256
            } else if x > 255 {
                x - 256
            } else {
                x
            }
        }
        ClampMethod::None => x.clamp(0, 255),
    }
}

/// Clamp applied to intermediate transform output written back to a plane.
#[inline]
#[must_use]
pub fn clamp_internal(method: ClampMethod, x: i32) -> i32 {
    match method {
        ClampMethod::Mod256 => x.clamp(0, 255),
        ClampMethod::None => x.clamp(-255, 255),
    }
}

// ── Segment-sized matrices ─────────────────────────────────────

/// Square `i32` matrix covering one segment, indexed `[x][y]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    size: usize,
    data: Vec<i32>,
}

impl Block {
    /// All-zero block of side `size`.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            data: vec![0; size * size],
        }
    }

    /// Block of side `size` filled with `value`.
    #[must_use]
    pub fn filled(size: usize, value: i32) -> Self {
        Self {
            size,
            data: vec![value; size * size],
        }
    }

    /// Side length.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> i32 {
        self.data[x * self.size + y]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: i32) {
        self.data[x * self.size + y] = value;
    }
}

/// Square `f64` matrix covering one segment, indexed `[x][y]`.
///
/// This is the wavelet working type; values are plane integers scaled
/// into `[0, 1]` by 255.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    size: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// All-zero matrix of side `size`.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            data: vec![0.0; size * size],
        }
    }

    /// Side length.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[x * self.size + y]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        self.data[x * self.size + y] = value;
    }

    /// Row `x` as a mutable slice (the `y` run is contiguous).
    #[inline]
    pub fn row_mut(&mut self, x: usize) -> &mut [f64] {
        let s = self.size;
        &mut self.data[x * s..(x + 1) * s]
    }

    /// Raw cell storage.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[f64] {
        &self.data
    }

    /// Raw mutable cell storage.
    #[inline]
    pub fn cells_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

// ── Reference color ────────────────────────────────────────────

/// Per-channel fallback values returned for reads outside the image.
///
/// Built once from the user's border RGB projected into the active color
/// space, then immutable for the whole codec invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefColor {
    pub c: [i32; 4],
}

impl RefColor {
    /// Decompose a packed pixel as-is.
    #[must_use]
    pub fn from_color(cc: Color) -> Self {
        Self {
            c: [
                i32::from(red(cc)),
                i32::from(green(cc)),
                i32::from(blue(cc)),
                i32::from(alpha(cc)),
            ],
        }
    }

    /// Project a packed RGB pixel into `cs` first.
    #[must_use]
    pub fn in_space(cc: Color, cs: ColorSpace) -> Self {
        Self::from_color(to_color_space(cc, cs))
    }
}

impl Default for RefColor {
    fn default() -> Self {
        Self {
            c: [128, 128, 128, 255],
        }
    }
}

// ── Planes ─────────────────────────────────────────────────────

/// Three integer channel planes over the image extent.
#[derive(Clone, Debug)]
pub struct Planes {
    w: i32,
    h: i32,
    ww: i32,
    hh: i32,
    cs: ColorSpace,
    ref_color: RefColor,
    channels: [Vec<i32>; 3],
}

impl Planes {
    /// Empty planes (every cell holds the reference color).
    #[must_use]
    pub fn new(w: u32, h: u32, cs: ColorSpace, ref_color: RefColor) -> Self {
        let n = (w as usize) * (h as usize);
        let channels = [
            vec![ref_color.c[0]; n],
            vec![ref_color.c[1]; n],
            vec![ref_color.c[2]; n],
        ];
        Self {
            w: w as i32,
            h: h as i32,
            ww: w.next_power_of_two() as i32,
            hh: h.next_power_of_two() as i32,
            cs,
            ref_color,
            channels,
        }
    }

    /// Build planes from packed pixels (row-major, `y * w + x`), projecting
    /// each through `cs`.
    #[must_use]
    pub fn from_pixels(pixels: &[Color], w: u32, h: u32, cs: ColorSpace, ref_color: RefColor) -> Self {
        let mut planes = Self::new(w, h, cs, ref_color);
        for x in 0..planes.w {
            for y in 0..planes.h {
                let c = to_color_space(pixels[(y * planes.w + x) as usize], cs);
                planes.set(0, x, y, i32::from(red(c)));
                planes.set(1, x, y, i32::from(green(c)));
                planes.set(2, x, y, i32::from(blue(c)));
            }
        }
        planes
    }

    /// Empty planes with identical geometry, color space and reference.
    #[must_use]
    pub fn clone_empty(&self) -> Self {
        Self::new(self.w as u32, self.h as u32, self.cs, self.ref_color)
    }

    /// Original width in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> i32 {
        self.w
    }

    /// Original height in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> i32 {
        self.h
    }

    /// Width padded up to a power of two.
    #[inline]
    #[must_use]
    pub fn padded_width(&self) -> i32 {
        self.ww
    }

    /// Height padded up to a power of two.
    #[inline]
    #[must_use]
    pub fn padded_height(&self) -> i32 {
        self.hh
    }

    /// Active color space.
    #[inline]
    #[must_use]
    pub fn color_space(&self) -> ColorSpace {
        self.cs
    }

    /// Out-of-bounds fallback values.
    #[inline]
    #[must_use]
    pub fn ref_color(&self) -> &RefColor {
        &self.ref_color
    }

    /// Read a cell; out-of-range coordinates yield the reference color.
    #[inline]
    #[must_use]
    pub fn get(&self, channel: usize, x: i32, y: i32) -> i32 {
        if x < 0 || x >= self.w || y < 0 || y >= self.h {
            return self.ref_color.c[channel];
        }
        self.channels[channel][(x * self.h + y) as usize]
    }

    /// Write a cell; out-of-range coordinates are ignored.
    #[inline]
    pub fn set(&mut self, channel: usize, x: i32, y: i32, value: i32) {
        if x >= 0 && x < self.w && y >= 0 && y < self.h {
            self.channels[channel][(x * self.h + y) as usize] = value;
        }
    }

    /// Segment contents as `f64` scaled into `[0, 1]` by 255.
    #[must_use]
    pub fn get_segment(&self, channel: usize, s: &Segment) -> Matrix {
        let size = s.size as usize;
        let mut m = Matrix::new(size);
        for x in 0..size {
            for y in 0..size {
                let v = self.get(channel, s.x + x as i32, s.y + y as i32);
                m.set(x, y, f64::from(v) / 255.0);
            }
        }
        m
    }

    /// Write a `[0, 1]`-scaled matrix back, rounding and applying the
    /// internal clamp.
    pub fn set_segment(&mut self, channel: usize, s: &Segment, values: &Matrix, method: ClampMethod) {
        let size = s.size as usize;
        for x in 0..size {
            for y in 0..size {
                let v = (values.get(x, y) * 255.0).round() as i32;
                self.set(
                    channel,
                    s.x + x as i32,
                    s.y + y as i32,
                    clamp_internal(method, v),
                );
            }
        }
    }

    /// `plane -= values` over a segment, clamping inward.
    pub fn subtract(&mut self, channel: usize, s: &Segment, values: &Block, method: ClampMethod) {
        let size = s.size as usize;
        for x in 0..size {
            for y in 0..size {
                let xx = s.x + x as i32;
                let yy = s.y + y as i32;
                let v = self.get(channel, xx, yy) - values.get(x, y);
                self.set(channel, xx, yy, clamp_in(method, v));
            }
        }
    }

    /// `plane += values` over a segment, clamping outward.
    pub fn add(&mut self, channel: usize, s: &Segment, values: &Block, method: ClampMethod) {
        let size = s.size as usize;
        for x in 0..size {
            for y in 0..size {
                let xx = s.x + x as i32;
                let yy = s.y + y as i32;
                let v = self.get(channel, xx, yy) + values.get(x, y);
                self.set(channel, xx, yy, clamp_out(method, v));
            }
        }
    }

    /// Pack the planes back into ARGB pixels through the inverse color
    /// space, taking alpha from `original` when given (255 otherwise).
    #[must_use]
    pub fn to_pixels(&self, original: Option<&[Color]>) -> Vec<Color> {
        let mut pixels = vec![0u32; (self.w * self.h) as usize];
        for x in 0..self.w {
            for y in 0..self.h {
                let off = (y * self.w + x) as usize;
                let a = original.map_or(255, |orig| alpha(orig[off]));
                let c = make_color(
                    self.get(0, x, y).clamp(0, 255) as u8,
                    self.get(1, x, y).clamp(0, 255) as u8,
                    self.get(2, x, y).clamp(0, 255) as u8,
                    a,
                );
                pixels[off] = from_color_space(c, self.cs);
            }
        }
        pixels
    }
}

/// Build the reference color for a codec run from its border RGB.
#[must_use]
pub fn border_ref(r: u8, g: u8, b: u8, cs: ColorSpace) -> RefColor {
    RefColor::in_space(make_color(r, g, b, 255), cs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x: i32, y: i32, size: i32) -> Segment {
        Segment::new(x, y, size)
    }

    #[test]
    fn test_padded_extent_is_next_pow2() {
        let p = Planes::new(5, 3, ColorSpace::Rgb, RefColor::default());
        assert_eq!(p.padded_width(), 8);
        assert_eq!(p.padded_height(), 4);

        let p = Planes::new(8, 8, ColorSpace::Rgb, RefColor::default());
        assert_eq!(p.padded_width(), 8);
        assert_eq!(p.padded_height(), 8);
    }

    #[test]
    fn test_out_of_range_reads_return_ref_color() {
        let mut rc = RefColor::default();
        rc.c = [1, 2, 3, 255];
        let p = Planes::new(4, 4, ColorSpace::Rgb, rc);
        assert_eq!(p.get(0, -1, 0), 1);
        assert_eq!(p.get(1, 0, -1), 2);
        assert_eq!(p.get(2, 4, 0), 3);
        assert_eq!(p.get(0, 0, 4), 1);
    }

    #[test]
    fn test_out_of_range_writes_are_ignored() {
        let mut p = Planes::new(2, 2, ColorSpace::Rgb, RefColor::default());
        p.set(0, -1, 0, 99);
        p.set(0, 2, 0, 99);
        p.set(0, 0, 2, 99);
        for x in 0..2 {
            for y in 0..2 {
                assert_eq!(p.get(0, x, y), 128);
            }
        }
    }

    #[test]
    fn test_from_pixels_projects_channels() {
        let pixels = vec![make_color(10, 20, 30, 255); 4];
        let p = Planes::from_pixels(&pixels, 2, 2, ColorSpace::Rgb, RefColor::default());
        assert_eq!(p.get(0, 1, 1), 10);
        assert_eq!(p.get(1, 0, 1), 20);
        assert_eq!(p.get(2, 1, 0), 30);
    }

    #[test]
    fn test_clone_empty_resets_to_ref() {
        let pixels = vec![make_color(10, 20, 30, 255); 4];
        let p = Planes::from_pixels(&pixels, 2, 2, ColorSpace::Rgb, RefColor::default());
        let q = p.clone_empty();
        assert_eq!(q.get(0, 0, 0), 128);
        assert_eq!(q.padded_width(), p.padded_width());
        assert_eq!(q.color_space(), p.color_space());
    }

    #[test]
    fn test_subtract_then_add_is_identity_mod_clamp() {
        let pixels = vec![make_color(200, 60, 140, 255); 16];
        let mut p = Planes::from_pixels(&pixels, 4, 4, ColorSpace::Rgb, RefColor::default());
        let s = seg(0, 0, 4);
        let pred = Block::filled(4, 50);

        p.subtract(0, &s, &pred, ClampMethod::None);
        assert_eq!(p.get(0, 1, 1), 150);
        p.add(0, &s, &pred, ClampMethod::None);
        assert_eq!(p.get(0, 1, 1), 200);
    }

    #[test]
    fn test_clamp_policies() {
        // NONE: residuals pass through inward, saturate outward
        assert_eq!(clamp_in(ClampMethod::None, -64), -64);
        assert_eq!(clamp_out(ClampMethod::None, -5), 0);
        assert_eq!(clamp_out(ClampMethod::None, 300), 255);
        assert_eq!(clamp_internal(ClampMethod::None, -300), -255);
        assert_eq!(clamp_internal(ClampMethod::None, 300), 255);

        // MOD256: single wrap both ways, saturating internal clamp
        assert_eq!(clamp_in(ClampMethod::Mod256, -56), 200);
        assert_eq!(clamp_in(ClampMethod::Mod256, 300), 44);
        assert_eq!(clamp_out(ClampMethod::Mod256, 280), 24);
        assert_eq!(clamp_out(ClampMethod::Mod256, -1), 255);
        assert_eq!(clamp_internal(ClampMethod::Mod256, -8), 0);
    }

    #[test]
    fn test_mod256_subtract_add_roundtrip() {
        let pixels = vec![make_color(20, 0, 0, 255); 4];
        let mut p = Planes::from_pixels(&pixels, 2, 2, ColorSpace::Rgb, RefColor::default());
        let s = seg(0, 0, 2);
        let pred = Block::filled(2, 200);

        p.subtract(0, &s, &pred, ClampMethod::Mod256);
        assert_eq!(p.get(0, 0, 0), 76); // 20 - 200 + 256
        p.add(0, &s, &pred, ClampMethod::Mod256);
        assert_eq!(p.get(0, 0, 0), 20); // 276 wraps back
    }

    #[test]
    fn test_segment_matrix_scaling() {
        let pixels = vec![make_color(255, 0, 51, 255); 4];
        let mut p = Planes::from_pixels(&pixels, 2, 2, ColorSpace::Rgb, RefColor::default());
        let s = seg(0, 0, 2);

        let m = p.get_segment(0, &s);
        assert!((m.get(0, 0) - 1.0).abs() < 1e-12);
        let m2 = p.get_segment(2, &s);
        assert!((m2.get(1, 1) - 0.2).abs() < 1e-12);

        let mut half = Matrix::new(2);
        for x in 0..2 {
            for y in 0..2 {
                half.set(x, y, 0.5);
            }
        }
        p.set_segment(1, &s, &half, ClampMethod::None);
        assert_eq!(p.get(1, 0, 1), 128); // round(0.5 * 255)
    }

    #[test]
    fn test_segment_reads_pull_ref_beyond_image() {
        let mut rc = RefColor::default();
        rc.c = [7, 8, 9, 255];
        let pixels = vec![make_color(100, 100, 100, 255); 9];
        let p = Planes::from_pixels(&pixels, 3, 3, ColorSpace::Rgb, rc);
        // 3x3 image padded to 4x4; a segment covering the padded extent
        // reads the ref color in the outside band
        let s = seg(0, 0, 4);
        let m = p.get_segment(0, &s);
        assert!((m.get(3, 3) - 7.0 / 255.0).abs() < 1e-12);
        assert!((m.get(0, 0) - 100.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn test_to_pixels_alpha_handling() {
        let pixels = vec![make_color(10, 20, 30, 90); 4];
        let p = Planes::from_pixels(&pixels, 2, 2, ColorSpace::Rgb, RefColor::default());

        let out = p.to_pixels(Some(&pixels));
        assert_eq!(alpha(out[0]), 90);
        assert_eq!(red(out[0]), 10);

        let out = p.to_pixels(None);
        assert_eq!(alpha(out[0]), 255);
    }

    #[test]
    fn test_border_ref_projects() {
        let rc = border_ref(128, 128, 128, ColorSpace::Cmy);
        assert_eq!(rc.c[0], 127); // 255 - 128
    }
}

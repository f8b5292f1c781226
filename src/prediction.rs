//! Spatial predictors.
//!
//! Each predictor maps the already-reconstructed context around a segment
//! (the row above, the column to the left, two pixels deep for some) into
//! a full segment-sized block. The search-based variants (`REF`, `ANGLE`,
//! `SAD`, `BSAD`) record their winning parameters in the segment so the
//! decoder can replay them; the generative tail of the catalog ignores
//! most context on purpose and exists for glitch output, not compression.
//!
//! `RANDOM` draws uniformly over the 24 concrete methods (`NONE..=EDGE`),
//! so it can reach `NONE` but never itself or the search variants. Its
//! PRNG seed is fixed; repeated encodes of one input stay byte-identical.

use std::f32::consts::PI;

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::{PredictionMethod, PREDICTION_COUNT};
use crate::planes::{Block, Planes};
use crate::segment::Segment;

/// PRNG seed for `REF` search and `RANDOM` selection.
pub const PREDICTOR_SEED: u64 = 12345;

/// Candidate positions tried by the `REF` search.
const REF_CANDIDATES: usize = 45;

/// Sum of absolute differences between a prediction and the plane.
#[must_use]
pub fn get_sad(pred: &Block, planes: &Planes, channel: usize, segment: &Segment) -> i32 {
    let size = segment.size as usize;
    let mut sum = 0;
    for x in 0..size {
        for y in 0..size {
            let v = planes.get(channel, segment.x + x as i32, segment.y + y as i32);
            sum += (v - pred.get(x, y)).abs();
        }
    }
    sum
}

/// Run `method` over `segment`, producing its prediction block.
///
/// Search methods update the segment's recorded parameters as a side
/// effect; `rng` feeds `REF` and `RANDOM`.
#[must_use]
pub fn predict(
    method: PredictionMethod,
    planes: &Planes,
    channel: usize,
    segment: &mut Segment,
    rng: &mut StdRng,
) -> Block {
    match method {
        PredictionMethod::Corner => pred_corner(planes, channel, segment),
        PredictionMethod::H => pred_h(planes, channel, segment),
        PredictionMethod::V => pred_v(planes, channel, segment),
        PredictionMethod::Dc => pred_dc(planes, channel, segment),
        PredictionMethod::DcMedian => pred_dc_median(planes, channel, segment),
        PredictionMethod::Median => pred_median(planes, channel, segment),
        PredictionMethod::Avg => pred_avg(planes, channel, segment),
        PredictionMethod::TrueMotion => pred_true_motion(planes, channel, segment),
        PredictionMethod::Paeth => pred_paeth(planes, channel, segment),
        PredictionMethod::LDiag => pred_ldiag(planes, channel, segment),
        PredictionMethod::Hv => pred_hv(planes, channel, segment),
        PredictionMethod::JpegLs => pred_jpegls(planes, channel, segment),
        PredictionMethod::Diff => pred_diff(planes, channel, segment),
        PredictionMethod::Ref => pred_ref(planes, channel, segment, rng),
        PredictionMethod::Angle => pred_angle(planes, channel, segment),
        PredictionMethod::Spiral => pred_spiral(planes, channel, segment),
        PredictionMethod::Noise => pred_noise(planes, channel, segment),
        PredictionMethod::Gradient => pred_gradient(planes, channel, segment),
        PredictionMethod::Mirror => pred_mirror(planes, channel, segment),
        PredictionMethod::Wave => pred_wave(planes, channel, segment),
        PredictionMethod::Checkerboard => pred_checkerboard(planes, channel, segment),
        PredictionMethod::Radial => pred_radial(planes, channel, segment),
        PredictionMethod::Edge => pred_edge(planes, channel, segment),
        PredictionMethod::Random => {
            let idx = rng.gen_range(0..PREDICTION_COUNT);
            let picked = PredictionMethod::from_index(idx).unwrap_or(PredictionMethod::None);
            predict(picked, planes, channel, segment, rng)
        }
        PredictionMethod::Sad => pred_search(planes, channel, segment, rng, true),
        PredictionMethod::Bsad => pred_search(planes, channel, segment, rng, false),
        PredictionMethod::None => Block::new(segment.size as usize),
    }
}

#[inline]
fn median3(a: i32, b: i32, c: i32) -> i32 {
    a.min(b).max(a.max(b).min(c))
}

fn dc_value(p: &Planes, ch: usize, s: &Segment) -> i32 {
    let mut v = 0;
    for i in 0..s.size {
        v += p.get(ch, s.x - 1, s.y + i);
        v += p.get(ch, s.x + i, s.y - 1);
    }
    v += p.get(ch, s.x - 1, s.y - 1);
    v / (s.size + s.size + 1)
}

// ── Context predictors ─────────────────────────────────────────

fn pred_corner(p: &Planes, ch: usize, s: &Segment) -> Block {
    Block::filled(s.size as usize, p.get(ch, s.x - 1, s.y - 1))
}

fn pred_h(p: &Planes, ch: usize, s: &Segment) -> Block {
    let size = s.size as usize;
    let mut res = Block::new(size);
    for y in 0..size {
        let v = p.get(ch, s.x - 1, s.y + y as i32);
        for x in 0..size {
            res.set(x, y, v);
        }
    }
    res
}

fn pred_v(p: &Planes, ch: usize, s: &Segment) -> Block {
    let size = s.size as usize;
    let mut res = Block::new(size);
    for x in 0..size {
        let v = p.get(ch, s.x + x as i32, s.y - 1);
        for y in 0..size {
            res.set(x, y, v);
        }
    }
    res
}

fn pred_dc(p: &Planes, ch: usize, s: &Segment) -> Block {
    Block::filled(s.size as usize, dc_value(p, ch, s))
}

fn pred_dc_median(p: &Planes, ch: usize, s: &Segment) -> Block {
    let size = s.size as usize;
    let mut res = Block::new(size);
    let c = dc_value(p, ch, s);
    for x in 0..size {
        let v1 = p.get(ch, s.x + x as i32, s.y - 1);
        for y in 0..size {
            let v2 = p.get(ch, s.x - 1, s.y + y as i32);
            res.set(x, y, median3(c, v1, v2));
        }
    }
    res
}

fn pred_median(p: &Planes, ch: usize, s: &Segment) -> Block {
    let size = s.size as usize;
    let mut res = Block::new(size);
    let c = p.get(ch, s.x - 1, s.y - 1);
    for x in 0..size {
        let v1 = p.get(ch, s.x + x as i32, s.y - 1);
        for y in 0..size {
            let v2 = p.get(ch, s.x - 1, s.y + y as i32);
            res.set(x, y, median3(c, v1, v2));
        }
    }
    res
}

fn pred_avg(p: &Planes, ch: usize, s: &Segment) -> Block {
    let size = s.size as usize;
    let mut res = Block::new(size);
    for x in 0..size {
        let v1 = p.get(ch, s.x + x as i32, s.y - 1);
        for y in 0..size {
            let v2 = p.get(ch, s.x - 1, s.y + y as i32);
            res.set(x, y, (v1 + v2) >> 1);
        }
    }
    res
}

fn pred_true_motion(p: &Planes, ch: usize, s: &Segment) -> Block {
    let size = s.size as usize;
    let mut res = Block::new(size);
    let c = p.get(ch, s.x - 1, s.y - 1);
    for x in 0..size {
        let v1 = p.get(ch, s.x + x as i32, s.y - 1);
        for y in 0..size {
            let v2 = p.get(ch, s.x - 1, s.y + y as i32);
            res.set(x, y, (v1 + v2 - c).clamp(0, 255));
        }
    }
    res
}

fn pred_paeth(p: &Planes, ch: usize, s: &Segment) -> Block {
    let size = s.size as usize;
    let mut res = Block::new(size);
    let c = p.get(ch, s.x - 1, s.y - 1);
    for x in 0..size {
        let v1 = p.get(ch, s.x + x as i32, s.y - 1);
        for y in 0..size {
            let v2 = p.get(ch, s.x - 1, s.y + y as i32);
            let pp = v1 + v2 - c;
            let pa = (pp - v2).abs();
            let pb = (pp - v1).abs();
            let pc = (pp - c).abs();
            let v = if pa <= pb && pa <= pc {
                v2
            } else if pb <= pc {
                v1
            } else {
                c
            };
            res.set(x, y, v.clamp(0, 255));
        }
    }
    res
}

fn pred_ldiag(p: &Planes, ch: usize, s: &Segment) -> Block {
    let size = s.size as usize;
    let mut res = Block::new(size);
    for x in 0..size {
        for y in 0..size {
            let ss = (x + y) as i32;
            let xi = if ss + 1 < s.size { ss + 1 } else { s.size - 1 };
            let yi = if ss < s.size { ss } else { s.size - 1 };
            let xx = p.get(ch, s.x + xi, s.y - 1);
            let yy = p.get(ch, s.x - 1, s.y + yi);
            let c = ((x as i32 + 1) * xx + (y as i32 + 1) * yy) / (x as i32 + y as i32 + 2);
            res.set(x, y, c);
        }
    }
    res
}

fn pred_hv(p: &Planes, ch: usize, s: &Segment) -> Block {
    let size = s.size as usize;
    let mut res = Block::new(size);
    for x in 0..size {
        for y in 0..size {
            let c = if x > y {
                p.get(ch, s.x + x as i32, s.y - 1)
            } else if y > x {
                p.get(ch, s.x - 1, s.y + y as i32)
            } else {
                (p.get(ch, s.x + x as i32, s.y - 1) + p.get(ch, s.x - 1, s.y + y as i32)) >> 1
            };
            res.set(x, y, c);
        }
    }
    res
}

fn pred_jpegls(p: &Planes, ch: usize, s: &Segment) -> Block {
    let size = s.size as usize;
    let mut res = Block::new(size);
    for x in 0..size {
        let c = p.get(ch, s.x + x as i32 - 1, s.y - 1);
        let a = p.get(ch, s.x + x as i32, s.y - 1);
        for y in 0..size {
            let b = p.get(ch, s.x - 1, s.y + y as i32);
            let v = if c >= a.max(b) {
                a.min(b)
            } else if c <= a.min(b) {
                a.max(b)
            } else {
                a + b - c
            };
            res.set(x, y, v);
        }
    }
    res
}

fn pred_diff(p: &Planes, ch: usize, s: &Segment) -> Block {
    let size = s.size as usize;
    let mut res = Block::new(size);
    for x in 0..size {
        let x1 = p.get(ch, s.x + x as i32, s.y - 1);
        let x2 = p.get(ch, s.x + x as i32, s.y - 2);
        for y in 0..size {
            let y1 = p.get(ch, s.x - 1, s.y + y as i32);
            let y2 = p.get(ch, s.x - 2, s.y + y as i32);
            let v = ((y2 + y2 - y1 + x2 + x2 - x1) >> 1).clamp(0, 255);
            res.set(x, y, v);
        }
    }
    res
}

// ── Search predictors ──────────────────────────────────────────

fn pred_ref(p: &Planes, ch: usize, s: &mut Segment, rng: &mut StdRng) -> Block {
    s.pred_type = PredictionMethod::Ref;
    let size = s.size as usize;

    if s.ref_x == i16::MAX || s.ref_y == i16::MAX {
        let mut curr_sad = i32::MAX;
        let mut curr_res = Block::new(size);

        for _ in 0..REF_CANDIDATES {
            let xx = rng.gen_range(-s.size..=s.x - 1);
            let yy = if xx < s.x - s.size {
                rng.gen_range(-s.size..=s.y - 1)
            } else {
                // the candidate column overlaps the segment horizontally,
                // so it must sit fully above it; degenerate on the top row
                let hi = s.y - s.size - 1;
                if hi < -s.size {
                    -s.size
                } else {
                    rng.gen_range(-s.size..=hi)
                }
            };

            let mut res = Block::new(size);
            for x in 0..size {
                for y in 0..size {
                    res.set(x, y, p.get(ch, xx + x as i32, yy + y as i32));
                }
            }

            let sad = get_sad(&res, p, ch, s);
            if sad < curr_sad {
                curr_res = res;
                curr_sad = sad;
                s.ref_x = xx as i16;
                s.ref_y = yy as i16;
            }
        }
        curr_res
    } else {
        let mut res = Block::new(size);
        for x in 0..size {
            for y in 0..size {
                res.set(
                    x,
                    y,
                    p.get(ch, i32::from(s.ref_x) + x as i32, i32::from(s.ref_y) + y as i32),
                );
            }
        }
        res
    }
}

/// Boundary source for the directional predictor: one axis family of
/// three, the segment-local target cell, the angle, and the block side.
fn angle_ref(i: i32, x: i32, y: i32, a: f32, w: i32) -> (f32, f32) {
    let (xf, yf, wf) = (x as f32, y as f32, w as f32);
    let (xx, yy);

    match i.rem_euclid(3) {
        0 => {
            let v = (wf - yf - 1.0) + xf * a;
            xx = (v - wf) / a;
            yy = wf - 1.0 - a - v;
        }
        1 => {
            let v = (wf - xf - 1.0) + yf * a;
            yy = (v - wf) / a;
            xx = wf - 1.0 - a - v;
        }
        _ => {
            let v = xf + yf * a;
            yy = -1.0;
            xx = v + a;
        }
    }

    if xx > yy {
        (xx.round(), -1.0)
    } else {
        (-1.0, yy.round())
    }
}

fn angle_block(p: &Planes, ch: usize, s: &Segment, ref_angle: i32, angle: f32) -> Block {
    let size = s.size as usize;
    let mut res = Block::new(size);
    for x in 0..size {
        for y in 0..size {
            let (ax, ay) = angle_ref(ref_angle, x as i32, y as i32, angle, s.size);
            let xx = if ax >= s.size as f32 { s.size - 1 } else { ax as i32 };
            res.set(x, y, p.get(ch, xx + s.x, ay as i32 + s.y));
        }
    }
    res
}

fn pred_angle(p: &Planes, ch: usize, s: &mut Segment) -> Block {
    s.pred_type = PredictionMethod::Angle;

    if s.angle < 0.0 || s.ref_angle < 0 {
        let step_a = 1.0 / s.size.min(16) as f32;
        let mut curr_sad = i32::MAX;
        let mut curr_res = Block::new(s.size as usize);

        for i in 0..3 {
            let mut a = 0.0f32;
            while a < 1.0 {
                // quantize to the wire resolution before predicting
                let aa = ((a * 0x8000 as f32) as i32) as f32 / 0x8000 as f32;
                let res = angle_block(p, ch, s, i, aa);
                let sad = get_sad(&res, p, ch, s);
                if sad < curr_sad {
                    curr_res = res;
                    curr_sad = sad;
                    s.angle = a;
                    s.ref_angle = i;
                }
                a += step_a;
            }
        }
        curr_res
    } else {
        angle_block(p, ch, s, s.ref_angle, s.angle)
    }
}

fn pred_search(
    p: &Planes,
    ch: usize,
    s: &mut Segment,
    rng: &mut StdRng,
    minimize: bool,
) -> Block {
    let mut curr_sad = if minimize { i32::MAX } else { i32::MIN };
    let mut curr_type = PredictionMethod::None;
    let mut curr_res = Block::new(s.size as usize);

    for i in 0..PREDICTION_COUNT {
        let method = PredictionMethod::from_index(i).unwrap_or(PredictionMethod::None);
        let res = predict(method, p, ch, s, rng);
        let sad = get_sad(&res, p, ch, s);

        if (minimize && sad < curr_sad) || (!minimize && sad > curr_sad) {
            curr_sad = sad;
            curr_type = method;
            curr_res = res;
        }
    }

    s.pred_type = curr_type;
    curr_res
}

// ── Generative predictors ──────────────────────────────────────

fn pred_spiral(p: &Planes, ch: usize, s: &Segment) -> Block {
    let size = s.size as usize;
    let mut res = Block::new(size);
    let cx = s.size / 2;
    let cy = s.size / 2;

    for x in 0..size {
        for y in 0..size {
            let dx = x as i32 - cx;
            let dy = y as i32 - cy;
            let layer = dx.abs().max(dy.abs());

            let v = if layer == 0 {
                p.get(ch, s.x - 1, s.y - 1)
            } else {
                let angle = (dy as f32).atan2(dx as f32);
                let norm = (angle + PI) / (2.0 * PI);
                let boundary_len = s.size * 2;
                let idx = ((norm * boundary_len as f32) as i32) % boundary_len;

                if idx < s.size {
                    p.get(ch, s.x + idx, s.y - 1)
                } else {
                    p.get(ch, s.x - 1, s.y + (idx - s.size))
                }
            };
            res.set(x, y, v);
        }
    }
    res
}

fn pred_noise(p: &Planes, ch: usize, s: &Segment) -> Block {
    let size = s.size as usize;
    let mut res = Block::new(size);
    let base = p.get(ch, s.x - 1, s.y - 1);

    for x in 0..size {
        for y in 0..size {
            let mut hash = ((s.x + x as i32) as u32).wrapping_mul(73_856_093)
                ^ ((s.y + y as i32) as u32).wrapping_mul(19_349_663);
            hash = ((hash >> 16) ^ hash).wrapping_mul(0x45d9_f3b);
            hash = ((hash >> 16) ^ hash).wrapping_mul(0x45d9_f3b);
            hash = (hash >> 16) ^ hash;

            let noise = ((hash & 0xFF) as i32 - 128) / 4;
            res.set(x, y, (base + noise).clamp(0, 255));
        }
    }
    res
}

fn pred_gradient(p: &Planes, ch: usize, s: &Segment) -> Block {
    let size = s.size as usize;
    let mut res = Block::new(size);

    let tl = p.get(ch, s.x - 1, s.y - 1);
    let tr = p.get(ch, s.x + s.size - 1, s.y - 1);
    let bl = p.get(ch, s.x - 1, s.y + s.size - 1);
    let br = (tr + bl) / 2;

    for x in 0..size {
        for y in 0..size {
            let fx = if s.size > 1 { x as f32 / (s.size - 1) as f32 } else { 0.0 };
            let fy = if s.size > 1 { y as f32 / (s.size - 1) as f32 } else { 0.0 };

            let top = tl as f32 + (tr - tl) as f32 * fx;
            let bot = bl as f32 + (br - bl) as f32 * fx;
            res.set(x, y, (top + (bot - top) * fy) as i32);
        }
    }
    res
}

fn pred_mirror(p: &Planes, ch: usize, s: &Segment) -> Block {
    let size = s.size as usize;
    let mut res = Block::new(size);
    for x in 0..size {
        for y in 0..size {
            let mirror_y = s.size - 1 - y as i32;
            res.set(x, y, p.get(ch, s.x - 1, s.y + mirror_y));
        }
    }
    res
}

fn pred_wave(p: &Planes, ch: usize, s: &Segment) -> Block {
    let size = s.size as usize;
    let mut res = Block::new(size);
    let freq = PI * 2.0 / s.size as f32;

    for x in 0..size {
        for y in 0..size {
            let wave = (x as f32 * freq).sin() + (y as f32 * freq).sin();
            let offset = (wave * 16.0) as i32;

            let base =
                (p.get(ch, s.x + x as i32, s.y - 1) + p.get(ch, s.x - 1, s.y + y as i32)) / 2;
            res.set(x, y, (base + offset).clamp(0, 255));
        }
    }
    res
}

fn pred_checkerboard(p: &Planes, ch: usize, s: &Segment) -> Block {
    let size = s.size as usize;
    let mut res = Block::new(size);
    for x in 0..size {
        for y in 0..size {
            let v = if (x + y) % 2 == 0 {
                p.get(ch, s.x + x as i32, s.y - 1)
            } else {
                p.get(ch, s.x - 1, s.y + y as i32)
            };
            res.set(x, y, v);
        }
    }
    res
}

fn pred_radial(p: &Planes, ch: usize, s: &Segment) -> Block {
    let size = s.size as usize;
    let mut res = Block::new(size);

    let cx = s.size / 2;
    let cy = s.size / 2;
    let max_dist = ((cx * cx + cy * cy) as f32).sqrt().max(1.0);

    let center = p.get(ch, s.x - 1, s.y - 1);
    let edge = (p.get(ch, s.x + s.size - 1, s.y - 1) + p.get(ch, s.x - 1, s.y + s.size - 1)) / 2;

    for x in 0..size {
        for y in 0..size {
            let dx = x as i32 - cx;
            let dy = y as i32 - cy;
            let dist = ((dx * dx + dy * dy) as f32).sqrt();
            let t = dist / max_dist;
            res.set(x, y, (center as f32 + (edge - center) as f32 * t) as i32);
        }
    }
    res
}

fn pred_edge(p: &Planes, ch: usize, s: &Segment) -> Block {
    let size = s.size as usize;
    let mut res = Block::new(size);
    for x in 0..size {
        for y in 0..size {
            let top = p.get(ch, s.x + x as i32, s.y - 1);
            let left = p.get(ch, s.x - 1, s.y + y as i32);
            let corner = p.get(ch, s.x - 1, s.y - 1);

            let gx = top - left;
            let gy = top - corner;

            let base = (top + left) / 2;
            let edge = gx.abs() + gy.abs();

            res.set(x, y, (base + edge / 8).clamp(0, 255));
        }
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{make_color, ColorSpace};
    use crate::planes::RefColor;
    use crate::segment::Segment;
    use rand::SeedableRng;

    /// 8x8 plane with channel 0 holding `10 * (x + y)`-ish ramp values.
    fn ramp_planes() -> Planes {
        let mut pixels = Vec::with_capacity(64);
        for y in 0..8 {
            for x in 0..8 {
                let v = (10 * (x + y)).min(255) as u8;
                pixels.push(make_color(v, v, v, 255));
            }
        }
        Planes::from_pixels(&pixels, 8, 8, ColorSpace::Rgb, RefColor::default())
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(PREDICTOR_SEED)
    }

    #[test]
    fn test_corner_uses_top_left_neighbor() {
        let p = ramp_planes();
        let mut s = Segment::new(2, 2, 2);
        let b = predict(PredictionMethod::Corner, &p, 0, &mut s, &mut rng());
        // neighbor (1, 1) holds 20
        assert_eq!(b.get(0, 0), 20);
        assert_eq!(b.get(1, 1), 20);
    }

    #[test]
    fn test_h_replicates_left_column() {
        let p = ramp_planes();
        let mut s = Segment::new(2, 2, 2);
        let b = predict(PredictionMethod::H, &p, 0, &mut s, &mut rng());
        // (1, 2) = 30 fills row y=0; (1, 3) = 40 fills row y=1
        assert_eq!(b.get(0, 0), 30);
        assert_eq!(b.get(1, 0), 30);
        assert_eq!(b.get(0, 1), 40);
    }

    #[test]
    fn test_v_replicates_top_row() {
        let p = ramp_planes();
        let mut s = Segment::new(2, 2, 2);
        let b = predict(PredictionMethod::V, &p, 0, &mut s, &mut rng());
        assert_eq!(b.get(0, 0), 30); // (2, 1)
        assert_eq!(b.get(0, 1), 30);
        assert_eq!(b.get(1, 0), 40); // (3, 1)
    }

    #[test]
    fn test_dc_averages_context() {
        let p = ramp_planes();
        let mut s = Segment::new(2, 2, 2);
        let b = predict(PredictionMethod::Dc, &p, 0, &mut s, &mut rng());
        // left column 30, 40; top row 30, 40; corner 20 -> 160 / 5 = 32
        assert_eq!(b.get(0, 0), 32);
        assert_eq!(b.get(1, 1), 32);
    }

    #[test]
    fn test_paeth_on_ramp_prefers_gradient() {
        let p = ramp_planes();
        let mut s = Segment::new(2, 2, 2);
        let b = predict(PredictionMethod::Paeth, &p, 0, &mut s, &mut rng());
        // pp = 30 + 30 - 20 = 40; ties between top and left resolve to the
        // left neighbor, which holds 30
        assert_eq!(b.get(0, 0), 30);
    }

    #[test]
    fn test_outside_image_predicts_ref_color() {
        let p = ramp_planes();
        let mut s = Segment::new(0, 0, 2);
        let b = predict(PredictionMethod::Corner, &p, 0, &mut s, &mut rng());
        assert_eq!(b.get(0, 0), 128);
    }

    #[test]
    fn test_get_sad_is_plain_l1() {
        let p = ramp_planes();
        let s = Segment::new(0, 0, 2);
        let pred = Block::filled(2, 0);
        // plane values 0, 10, 10, 20
        assert_eq!(get_sad(&pred, &p, 0, &s), 40);

        let exact = {
            let mut b = Block::new(2);
            b.set(0, 0, 0);
            b.set(1, 0, 10);
            b.set(0, 1, 10);
            b.set(1, 1, 20);
            b
        };
        assert_eq!(get_sad(&exact, &p, 0, &s), 0);
    }

    #[test]
    fn test_none_predicts_zeros() {
        let p = ramp_planes();
        let mut s = Segment::new(2, 2, 4);
        let b = predict(PredictionMethod::None, &p, 0, &mut s, &mut rng());
        for x in 0..4 {
            for y in 0..4 {
                assert_eq!(b.get(x, y), 0);
            }
        }
    }

    #[test]
    fn test_ref_search_records_offset_and_replays() {
        let p = ramp_planes();
        let mut s = Segment::new(4, 4, 2);
        let mut r = rng();
        let searched = predict(PredictionMethod::Ref, &p, 0, &mut s, &mut r);

        assert_eq!(s.pred_type, PredictionMethod::Ref);
        assert_ne!(s.ref_x, i16::MAX);
        assert_ne!(s.ref_y, i16::MAX);

        // replay with the recorded offset, no search
        let replayed = predict(PredictionMethod::Ref, &p, 0, &mut s, &mut rng());
        assert_eq!(searched, replayed);
    }

    #[test]
    fn test_ref_search_is_deterministic() {
        let p = ramp_planes();
        let mut s1 = Segment::new(4, 4, 2);
        let mut s2 = Segment::new(4, 4, 2);
        let b1 = predict(PredictionMethod::Ref, &p, 0, &mut s1, &mut rng());
        let b2 = predict(PredictionMethod::Ref, &p, 0, &mut s2, &mut rng());
        assert_eq!(b1, b2);
        assert_eq!((s1.ref_x, s1.ref_y), (s2.ref_x, s2.ref_y));
    }

    #[test]
    fn test_ref_on_top_row_does_not_panic() {
        let p = ramp_planes();
        let mut s = Segment::new(4, 0, 2);
        let _ = predict(PredictionMethod::Ref, &p, 0, &mut s, &mut rng());
        assert_ne!(s.ref_x, i16::MAX);
    }

    #[test]
    fn test_angle_search_records_parameters_and_replays() {
        let p = ramp_planes();
        let mut s = Segment::new(2, 2, 4);
        let searched = predict(PredictionMethod::Angle, &p, 0, &mut s, &mut rng());

        assert_eq!(s.pred_type, PredictionMethod::Angle);
        assert!((0..3).contains(&s.ref_angle));
        assert!((0.0..1.0).contains(&s.angle));

        // the replay path runs the recorded family and angle directly
        let replayed = predict(PredictionMethod::Angle, &p, 0, &mut s, &mut rng());
        let direct = angle_block(&p, 0, &s, s.ref_angle, s.angle);
        assert_eq!(replayed, direct);
        assert_eq!(replayed.size(), searched.size());
    }

    #[test]
    fn test_sad_search_picks_a_concrete_method() {
        let p = ramp_planes();
        let mut s = Segment::new(2, 2, 2);
        let best = predict(PredictionMethod::Sad, &p, 0, &mut s, &mut rng());
        assert_ne!(s.pred_type, PredictionMethod::Sad);
        let sad = get_sad(&best, &p, 0, &s);

        let mut s2 = Segment::new(2, 2, 2);
        let worst = predict(PredictionMethod::Bsad, &p, 0, &mut s2, &mut rng());
        let bsad = get_sad(&worst, &p, 0, &s2);
        assert!(bsad >= sad);
    }

    #[test]
    fn test_random_is_deterministic_under_seed() {
        let p = ramp_planes();
        let mut s1 = Segment::new(2, 2, 2);
        let mut s2 = Segment::new(2, 2, 2);
        let b1 = predict(PredictionMethod::Random, &p, 0, &mut s1, &mut rng());
        let b2 = predict(PredictionMethod::Random, &p, 0, &mut s2, &mut rng());
        assert_eq!(b1, b2);
    }

    #[test]
    fn test_generative_outputs_stay_in_byte_range() {
        let p = ramp_planes();
        let generative = [
            PredictionMethod::Spiral,
            PredictionMethod::Noise,
            PredictionMethod::Gradient,
            PredictionMethod::Mirror,
            PredictionMethod::Wave,
            PredictionMethod::Checkerboard,
            PredictionMethod::Radial,
            PredictionMethod::Edge,
        ];
        for m in generative {
            let mut s = Segment::new(2, 2, 4);
            let b = predict(m, &p, 0, &mut s, &mut rng());
            for x in 0..4 {
                for y in 0..4 {
                    let v = b.get(x, y);
                    assert!((0..=255).contains(&v), "{} out of range: {v}", m.name());
                }
            }
        }
    }

    #[test]
    fn test_checkerboard_alternates_sources() {
        let p = ramp_planes();
        let mut s = Segment::new(2, 2, 2);
        let b = predict(PredictionMethod::Checkerboard, &p, 0, &mut s, &mut rng());
        assert_eq!(b.get(0, 0), 30); // even parity: top neighbor (2,1)
        assert_eq!(b.get(1, 0), 30); // odd parity: left neighbor (1,2)
        assert_eq!(b.get(1, 1), 40); // even parity: top neighbor (3,1)
    }

    #[test]
    fn test_mirror_flips_left_column() {
        let p = ramp_planes();
        let mut s = Segment::new(2, 2, 2);
        let b = predict(PredictionMethod::Mirror, &p, 0, &mut s, &mut rng());
        // y=0 mirrors to left column at y=1: (1, 3) = 40
        assert_eq!(b.get(0, 0), 40);
        assert_eq!(b.get(0, 1), 30);
    }
}

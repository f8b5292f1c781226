//! Residual entropy coding.
//!
//! Six methods, all scanning the same way: segments in traversal order,
//! `x` outer, `y` inner. The PACKED field width depends on the channel
//! config: with a wavelet active it is `bits+1` where
//! `bits = ceil(log2(transform_scale))`; without one it is 9 bits for
//! clamp NONE and 8 for MOD256. Packed fields are sign-extended on read
//! so negative residuals and coefficients survive. Zigzag-coded fields
//! (DELTA, ZIGZAG) are non-negative by construction and read unsigned.
//!
//! Every decoder treats running out of bits as a soft stop: the values
//! decoded so far stay in the plane and the caller moves on. Truncated
//! streams are a supported way to glitch.

use crate::bitio::{BitReader, BitWriter};
use crate::config::{ChannelConfig, ClampMethod, EncodingMethod, WaveletType};
use crate::error::GlicError;
use crate::planes::Planes;
use crate::segment::Segment;

/// Longest run one RLE token can carry.
const RLE_MAX_RUN: i32 = 129;

/// `ceil(log2(scale))` for the packed field width; 0 for scales <= 1.
#[must_use]
pub fn calc_bits(scale: i32) -> u32 {
    if scale <= 1 {
        0
    } else {
        32 - (scale as u32 - 1).leading_zeros()
    }
}

/// Map a signed value to an unsigned one, small magnitudes staying small.
#[inline]
#[must_use]
pub fn zigzag_encode(n: i32) -> u32 {
    (n.wrapping_shl(1) ^ (n >> 31)) as u32
}

/// Inverse of [`zigzag_encode`].
#[inline]
#[must_use]
pub fn zigzag_decode(n: u32) -> i32 {
    ((n >> 1) as i32) ^ -((n & 1) as i32)
}

fn emit_packed(writer: &mut BitWriter, bits: u32, val: i32, config: &ChannelConfig) {
    if config.wavelet_type == WaveletType::None {
        match config.clamp_method {
            ClampMethod::None => writer.write_int(val, true, 9),
            ClampMethod::Mod256 => writer.write_int(val, true, 8),
        }
    } else {
        writer.write_int(val, true, bits + 1);
    }
}

fn read_packed(
    reader: &mut BitReader<'_>,
    bits: u32,
    config: &ChannelConfig,
) -> Result<i32, GlicError> {
    if config.wavelet_type == WaveletType::None {
        match config.clamp_method {
            ClampMethod::None => reader.read_int(true, 9),
            ClampMethod::Mod256 => reader.read_int(true, 8),
        }
    } else {
        reader.read_int(true, bits + 1)
    }
}

/// Serialize one channel's result plane with `method`.
pub fn encode_data(
    writer: &mut BitWriter,
    planes: &Planes,
    channel: usize,
    segments: &[Segment],
    method: EncodingMethod,
    config: &ChannelConfig,
) {
    match method {
        EncodingMethod::Packed => encode_packed(writer, planes, channel, segments, config),
        EncodingMethod::Rle => encode_rle(writer, planes, channel, segments, config),
        EncodingMethod::Delta => encode_delta(writer, planes, channel, segments, config),
        EncodingMethod::Xor => encode_xor(writer, planes, channel, segments, config),
        EncodingMethod::Zigzag => encode_zigzag(writer, planes, channel, segments, config),
        EncodingMethod::Raw => encode_raw(writer, planes, channel, segments),
    }
}

/// Parse one channel's residual blob back into the plane.
///
/// Runs to the end of the segment list or the end of the stream,
/// whichever comes first; a truncated stream is not an error.
pub fn decode_data(
    reader: &mut BitReader<'_>,
    planes: &mut Planes,
    channel: usize,
    segments: &[Segment],
    method: EncodingMethod,
    config: &ChannelConfig,
) {
    match method {
        EncodingMethod::Packed => decode_packed(reader, planes, channel, segments, config),
        EncodingMethod::Rle => decode_rle(reader, planes, channel, segments, config),
        EncodingMethod::Delta => decode_delta(reader, planes, channel, segments, config),
        EncodingMethod::Xor => decode_xor(reader, planes, channel, segments, config),
        EncodingMethod::Zigzag => decode_zigzag(reader, planes, channel, segments, config),
        EncodingMethod::Raw => decode_raw(reader, planes, channel, segments),
    }
}

// ── RAW ────────────────────────────────────────────────────────

fn encode_raw(writer: &mut BitWriter, planes: &Planes, channel: usize, segments: &[Segment]) {
    for seg in segments {
        for x in 0..seg.size {
            for y in 0..seg.size {
                let val = planes.get(channel, seg.x + x, seg.y + y);
                writer.write_bits(val as u32, 32);
            }
        }
    }
    writer.align();
}

fn decode_raw(
    reader: &mut BitReader<'_>,
    planes: &mut Planes,
    channel: usize,
    segments: &[Segment],
) {
    for seg in segments {
        for x in 0..seg.size {
            for y in 0..seg.size {
                match reader.read_bits(32) {
                    Ok(v) => planes.set(channel, seg.x + x, seg.y + y, v as i32),
                    Err(_) => return,
                }
            }
        }
    }
    reader.align();
}

// ── PACKED ─────────────────────────────────────────────────────

fn encode_packed(
    writer: &mut BitWriter,
    planes: &Planes,
    channel: usize,
    segments: &[Segment],
    config: &ChannelConfig,
) {
    let bits = calc_bits(config.transform_scale);

    for seg in segments {
        for x in 0..seg.size {
            for y in 0..seg.size {
                let val = planes.get(channel, seg.x + x, seg.y + y);
                emit_packed(writer, bits, val, config);
            }
        }
    }
    writer.align();
}

fn decode_packed(
    reader: &mut BitReader<'_>,
    planes: &mut Planes,
    channel: usize,
    segments: &[Segment],
    config: &ChannelConfig,
) {
    let bits = calc_bits(config.transform_scale);

    for seg in segments {
        for x in 0..seg.size {
            for y in 0..seg.size {
                match read_packed(reader, bits, config) {
                    Ok(v) => planes.set(channel, seg.x + x, seg.y + y, v),
                    Err(_) => return,
                }
            }
        }
    }
    reader.align();
}

// ── RLE ────────────────────────────────────────────────────────

fn flush_run(writer: &mut BitWriter, bits: u32, val: i32, count: i32, config: &ChannelConfig) {
    if count == 1 {
        writer.write_bool(false);
    } else {
        writer.write_bool(true);
        writer.write_int(count - 2, true, 7);
    }
    emit_packed(writer, bits, val, config);
}

fn encode_rle(
    writer: &mut BitWriter,
    planes: &Planes,
    channel: usize,
    segments: &[Segment],
    config: &ChannelConfig,
) {
    let bits = calc_bits(config.transform_scale);
    let mut current_val = 0;
    let mut current_cnt = 0;
    let mut first_val = true;

    for seg in segments {
        for x in 0..seg.size {
            for y in 0..seg.size {
                let val = planes.get(channel, seg.x + x, seg.y + y);

                if first_val {
                    current_val = val;
                    current_cnt = 1;
                    first_val = false;
                } else if current_val != val || current_cnt == RLE_MAX_RUN {
                    flush_run(writer, bits, current_val, current_cnt, config);
                    current_val = val;
                    current_cnt = 1;
                } else {
                    current_cnt += 1;
                }
            }
        }
    }

    if !first_val {
        flush_run(writer, bits, current_val, current_cnt, config);
    }

    writer.align();
}

fn decode_rle(
    reader: &mut BitReader<'_>,
    planes: &mut Planes,
    channel: usize,
    segments: &[Segment],
    config: &ChannelConfig,
) {
    let bits = calc_bits(config.transform_scale);
    let mut current_val = 0;
    let mut current_cnt = 0;
    let mut do_read_type = true;

    for seg in segments {
        for x in 0..seg.size {
            for y in 0..seg.size {
                if do_read_type {
                    match reader.read_bool() {
                        Ok(true) => match reader.read_int(true, 7) {
                            Ok(n) => {
                                current_cnt = n + 2;
                                do_read_type = false;
                            }
                            Err(_) => return,
                        },
                        Ok(false) => {}
                        Err(_) => return,
                    }
                    match read_packed(reader, bits, config) {
                        Ok(v) => current_val = v,
                        Err(_) => return,
                    }
                }
                planes.set(channel, seg.x + x, seg.y + y, current_val);
                current_cnt -= 1;
                if current_cnt <= 0 {
                    do_read_type = true;
                }
            }
        }
    }
    reader.align();
}

// ── DELTA ──────────────────────────────────────────────────────

fn encode_delta(
    writer: &mut BitWriter,
    planes: &Planes,
    channel: usize,
    segments: &[Segment],
    config: &ChannelConfig,
) {
    let bits = calc_bits(config.transform_scale);
    let mut prev = 0;

    for seg in segments {
        for x in 0..seg.size {
            for y in 0..seg.size {
                let val = planes.get(channel, seg.x + x, seg.y + y);
                let encoded = zigzag_encode(val - prev);
                writer.write_int(encoded as i32, false, bits + 2);
                prev = val;
            }
        }
    }
    writer.align();
}

fn decode_delta(
    reader: &mut BitReader<'_>,
    planes: &mut Planes,
    channel: usize,
    segments: &[Segment],
    config: &ChannelConfig,
) {
    let bits = calc_bits(config.transform_scale);
    let mut prev = 0;

    for seg in segments {
        for x in 0..seg.size {
            for y in 0..seg.size {
                match reader.read_int(false, bits + 2) {
                    Ok(encoded) => {
                        let val = prev + zigzag_decode(encoded as u32);
                        planes.set(channel, seg.x + x, seg.y + y, val);
                        prev = val;
                    }
                    Err(_) => return,
                }
            }
        }
    }
    reader.align();
}

// ── XOR ────────────────────────────────────────────────────────

fn encode_xor(
    writer: &mut BitWriter,
    planes: &Planes,
    channel: usize,
    segments: &[Segment],
    config: &ChannelConfig,
) {
    let bits = calc_bits(config.transform_scale);
    let mut prev = 0;

    for seg in segments {
        for x in 0..seg.size {
            for y in 0..seg.size {
                let val = planes.get(channel, seg.x + x, seg.y + y);
                emit_packed(writer, bits, val ^ prev, config);
                prev = val;
            }
        }
    }
    writer.align();
}

fn decode_xor(
    reader: &mut BitReader<'_>,
    planes: &mut Planes,
    channel: usize,
    segments: &[Segment],
    config: &ChannelConfig,
) {
    let bits = calc_bits(config.transform_scale);
    let mut prev = 0;

    for seg in segments {
        for x in 0..seg.size {
            for y in 0..seg.size {
                match read_packed(reader, bits, config) {
                    Ok(xor_val) => {
                        let val = xor_val ^ prev;
                        planes.set(channel, seg.x + x, seg.y + y, val);
                        prev = val;
                    }
                    Err(_) => return,
                }
            }
        }
    }
    reader.align();
}

// ── ZIGZAG ─────────────────────────────────────────────────────

fn encode_zigzag(
    writer: &mut BitWriter,
    planes: &Planes,
    channel: usize,
    segments: &[Segment],
    config: &ChannelConfig,
) {
    let bits = calc_bits(config.transform_scale);

    for seg in segments {
        for x in 0..seg.size {
            for y in 0..seg.size {
                let val = planes.get(channel, seg.x + x, seg.y + y);
                writer.write_int(zigzag_encode(val) as i32, false, bits + 1);
            }
        }
    }
    writer.align();
}

fn decode_zigzag(
    reader: &mut BitReader<'_>,
    planes: &mut Planes,
    channel: usize,
    segments: &[Segment],
    config: &ChannelConfig,
) {
    let bits = calc_bits(config.transform_scale);

    for seg in segments {
        for x in 0..seg.size {
            for y in 0..seg.size {
                match reader.read_int(false, bits + 1) {
                    Ok(encoded) => {
                        planes.set(channel, seg.x + x, seg.y + y, zigzag_decode(encoded as u32));
                    }
                    Err(_) => return,
                }
            }
        }
    }
    reader.align();
}

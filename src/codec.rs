//! The codec orchestrator and container format.
//!
//! ```text
//! encode: pixels -> color space -> per channel {
//!             segment -> [predict, subtract, quantize, wavelet,
//!                         snapshot, locally invert] -> metadata -> residuals
//!         } -> container
//! decode: container -> per channel { segmentation bits, metadata,
//!             residuals } -> per segment [wavelet⁻¹, quantize⁻¹,
//!             predict, add] -> inverse color space -> pixels
//! ```
//!
//! The encoder locally inverts every segment as soon as its integers are
//! snapshotted, so the working plane always holds what the decoder will
//! reconstruct, and later segments predict against that, not the source
//! image. The add-back reuses the block the subtract used; the decoder
//! arrives at the same block by replaying the recorded predictor (or the
//! channel default where the recorded type is NONE).
//!
//! Container layout (all integers big-endian):
//!
//! ```text
//! offset  size  field
//!   0      4    magic "GLC2"
//!   4      2    version = 1
//!   6      4    width            10     4    height
//!  14      1    color space      15     3    border R, G, B
//!  18     12    segmentation sizes, 3 x u32
//!  30     12    prediction sizes,   3 x u32
//!  42     12    residual sizes,     3 x u32
//!  54     10    zero padding
//!  64     96    3 x 32-byte channel config
//! 160      -    segmentation blobs, prediction blobs, residual blobs
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::bitio::{BitReader, BitWriter};
use crate::color::{Color, ColorSpace};
use crate::config::{
    ChannelConfig, ClampMethod, CodecConfig, EncodingMethod, PredictionMethod, TransformType,
    WaveletType,
};
use crate::encoding::{decode_data, encode_data};
use crate::error::GlicError;
use crate::planes::{border_ref, Matrix, Planes};
use crate::prediction::{predict, PREDICTOR_SEED};
use crate::quant::{quant_value, quantize, transform_compress_threshold};
use crate::segment::{make_segmentation, read_segmentation, Segment};
use crate::wavelet::{MagnitudeCompressor, Wavelet, WaveletTransform};

/// Container magic, "GLC2".
pub const GLIC_MAGIC: u32 = 0x474C_4332;
/// Container version this build reads and writes.
pub const GLIC_VERSION: u16 = 1;
/// Fixed header size in bytes.
pub const GLIC_HEADER_SIZE: usize = 64;
/// Per-channel config record size in bytes.
pub const GLIC_CHANNEL_HEADER_SIZE: usize = 32;

/// A decoded image: packed ARGB pixels plus dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    pub pixels: Vec<Color>,
    pub width: u32,
    pub height: u32,
}

/// The GLIC codec, parameterized by a [`CodecConfig`].
#[derive(Clone, Debug)]
pub struct Codec {
    config: CodecConfig,
}

/// Per-channel transform machinery derived from a [`ChannelConfig`].
struct ChannelStages {
    transform: Option<WaveletTransform>,
    compressor: Option<MagnitudeCompressor>,
    pq: f32,
}

impl ChannelStages {
    fn for_config(cfg: &ChannelConfig) -> Self {
        let transform = (cfg.wavelet_type != WaveletType::None).then(|| {
            WaveletTransform::new(cfg.transform_type, Wavelet::for_type(cfg.wavelet_type))
        });
        let compressor = (cfg.transform_compress > 0.0).then(|| {
            MagnitudeCompressor::new(transform_compress_threshold(cfg.transform_compress))
        });
        Self {
            transform,
            compressor,
            pq: quant_value(cfg.quantization_value),
        }
    }
}

impl Codec {
    /// Codec with an explicit configuration.
    #[must_use]
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Codec with the default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(CodecConfig::default())
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Mutable configuration access.
    pub fn config_mut(&mut self) -> &mut CodecConfig {
        &mut self.config
    }

    // ── Encode ─────────────────────────────────────────────────

    /// Encode packed ARGB pixels (row-major) into a GLIC container.
    ///
    /// # Errors
    ///
    /// Returns [`GlicError::InvalidBufferSize`] when `pixels` does not
    /// match `width * height`.
    pub fn encode(&self, pixels: &[Color], width: u32, height: u32) -> Result<Vec<u8>, GlicError> {
        let expected = (width as usize) * (height as usize);
        if pixels.len() != expected {
            return Err(GlicError::InvalidBufferSize {
                expected,
                got: pixels.len(),
            });
        }

        let cfg = &self.config;
        debug!(color_space = cfg.color_space.name(), width, height, "encoding started");

        let ref_color = border_ref(cfg.border_r, cfg.border_g, cfg.border_b, cfg.color_space);
        let mut planes = Planes::from_pixels(pixels, width, height, cfg.color_space, ref_color);

        let mut segmentation_data: [Vec<u8>; 3] = Default::default();
        let mut prediction_data: [Vec<u8>; 3] = Default::default();
        let mut image_data: [Vec<u8>; 3] = Default::default();

        for p in 0..3 {
            let ch = &cfg.channels[p];

            let mut seg_writer = BitWriter::new();
            let mut segments = make_segmentation(
                &mut seg_writer,
                &planes,
                p,
                ch.min_block_size,
                ch.max_block_size,
                ch.segmentation_precision,
            );
            segmentation_data[p] = seg_writer.into_bytes();

            let stages = ChannelStages::for_config(ch);
            debug!(
                channel = p,
                segments = segments.len(),
                wavelet = stages.transform.as_ref().map_or("NONE", |t| t.wavelet().name()),
                prediction = ch.prediction_method.name(),
                "channel pass"
            );

            let mut result_planes = planes.clone_empty();
            let mut rng = StdRng::seed_from_u64(PREDICTOR_SEED);

            for seg in &mut segments {
                let pred = predict(ch.prediction_method, &planes, p, seg, &mut rng);

                planes.subtract(p, seg, &pred, ch.clamp_method);
                quantize(&mut planes, p, seg, stages.pq, true);

                if let Some(transform) = &stages.transform {
                    let mut tr = planes.get_segment(p, seg);
                    transform.forward(&mut tr);
                    if let Some(compressor) = &stages.compressor {
                        compressor.compress(&mut tr);
                    }
                    store_coefficients(&mut planes, p, seg, &tr, ch.transform_scale);
                }

                for x in 0..seg.size {
                    for y in 0..seg.size {
                        let v = planes.get(p, seg.x + x, seg.y + y);
                        result_planes.set(p, seg.x + x, seg.y + y, v);
                    }
                }

                // local inversion: from here on the working plane matches
                // the decoder's view of this segment
                if let Some(transform) = &stages.transform {
                    let mut tr = load_coefficients(&planes, p, seg, ch.transform_scale);
                    transform.inverse(&mut tr);
                    planes.set_segment(p, seg, &tr, ch.clamp_method);
                }
                quantize(&mut planes, p, seg, stages.pq, false);
                planes.add(p, seg, &pred, ch.clamp_method);
            }

            let mut pred_writer = BitWriter::new();
            for seg in &segments {
                write_segment_metadata(&mut pred_writer, seg);
            }
            prediction_data[p] = pred_writer.into_bytes();

            let mut data_writer = BitWriter::new();
            encode_data(
                &mut data_writer,
                &result_planes,
                p,
                &segments,
                ch.encoding_method,
                ch,
            );
            image_data[p] = data_writer.into_bytes();
        }

        Ok(build_container(
            cfg,
            width,
            height,
            &segmentation_data,
            &prediction_data,
            &image_data,
        ))
    }

    // ── Decode ─────────────────────────────────────────────────

    /// Decode a GLIC container using the configs stored inside it.
    ///
    /// # Errors
    ///
    /// Fails on a bad magic, version, truncated header, or out-of-range
    /// enum in the stored configs. Truncated payload blobs are not
    /// errors: the decodable prefix is kept and the rest of the plane
    /// stays at the border color.
    pub fn decode(&self, data: &[u8]) -> Result<DecodedImage, GlicError> {
        self.decode_with_config(data, None)
    }

    /// Decode a GLIC container, optionally substituting a caller config
    /// for the stored color space, border and channel settings.
    ///
    /// Decoding with a config other than the encoder's is a supported
    /// way to produce glitch output.
    ///
    /// # Errors
    ///
    /// Same conditions as [`decode`](Self::decode).
    pub fn decode_with_config(
        &self,
        data: &[u8],
        override_config: Option<&CodecConfig>,
    ) -> Result<DecodedImage, GlicError> {
        let header = parse_header(data)?;

        let (color_space, border, channel_configs) = match override_config {
            Some(cfg) => (
                cfg.color_space,
                (cfg.border_r, cfg.border_g, cfg.border_b),
                cfg.channels,
            ),
            None => (header.color_space, header.border, header.channels),
        };

        let width = header.width;
        let height = header.height;
        if u64::from(width) * u64::from(height) > 1 << 31 {
            return Err(GlicError::DecodeFailure(format!(
                "implausible dimensions {width}x{height}"
            )));
        }
        debug!(color_space = color_space.name(), width, height, "decoding started");

        let ref_color = border_ref(border.0, border.1, border.2, color_space);
        let mut planes = Planes::new(width, height, color_space, ref_color);

        let ww = width.next_power_of_two() as i32;
        let hh = height.next_power_of_two() as i32;

        // segmentation blobs
        let mut pos = GLIC_HEADER_SIZE + 3 * GLIC_CHANNEL_HEADER_SIZE;
        let mut segments: [Vec<Segment>; 3] = Default::default();
        for p in 0..3 {
            let blob = bounded_slice(data, pos, header.segmentation_sizes[p]);
            let mut reader = BitReader::new(blob);
            segments[p] = read_segmentation(&mut reader, ww, hh, width as i32, height as i32);
            pos += header.segmentation_sizes[p];
            debug!(channel = p, segments = segments[p].len(), "segmentation read");
        }

        // per-segment prediction metadata
        for p in 0..3 {
            let blob = bounded_slice(data, pos, header.prediction_sizes[p]);
            let mut reader = BitReader::new(blob);
            for seg in &mut segments[p] {
                if read_segment_metadata(&mut reader, seg, &channel_configs[p]).is_err() {
                    break;
                }
            }
            pos += header.prediction_sizes[p];
        }

        // residual blobs
        for p in 0..3 {
            let blob = bounded_slice(data, pos, header.residual_sizes[p]);
            let mut reader = BitReader::new(blob);
            decode_data(
                &mut reader,
                &mut planes,
                p,
                &segments[p],
                channel_configs[p].encoding_method,
                &channel_configs[p],
            );
            pos += header.residual_sizes[p];
        }

        // reconstruction
        for p in 0..3 {
            let ch = &channel_configs[p];
            let stages = ChannelStages::for_config(ch);
            debug!(
                channel = p,
                wavelet = stages.transform.as_ref().map_or("NONE", |t| t.wavelet().name()),
                prediction = ch.prediction_method.name(),
                "reconstructing"
            );

            let mut rng = StdRng::seed_from_u64(PREDICTOR_SEED);
            for seg in &mut segments[p] {
                if let Some(transform) = &stages.transform {
                    let mut tr = load_coefficients(&planes, p, seg, ch.transform_scale);
                    transform.inverse(&mut tr);
                    planes.set_segment(p, seg, &tr, ch.clamp_method);
                }
                quantize(&mut planes, p, seg, stages.pq, false);

                let pred = predict(seg.pred_type, &planes, p, seg, &mut rng);
                planes.add(p, seg, &pred, ch.clamp_method);
            }
        }

        Ok(DecodedImage {
            pixels: planes.to_pixels(None),
            width,
            height,
        })
    }
}

// ── Transform scale bridge ─────────────────────────────────────

/// Round wavelet coefficients into plane integers at `scale / size`.
fn store_coefficients(planes: &mut Planes, channel: usize, seg: &Segment, tr: &Matrix, scale: i32) {
    for x in 0..seg.size {
        for y in 0..seg.size {
            let val = (tr.get(x as usize, y as usize) * f64::from(scale) / f64::from(seg.size))
                .round() as i32;
            planes.set(channel, seg.x + x, seg.y + y, val);
        }
    }
}

/// Scale plane integers back into wavelet coefficients at `size / scale`.
fn load_coefficients(planes: &Planes, channel: usize, seg: &Segment, scale: i32) -> Matrix {
    let size = seg.size as usize;
    let mut tr = Matrix::new(size);
    for x in 0..size {
        for y in 0..size {
            let v = planes.get(channel, seg.x + x as i32, seg.y + y as i32);
            tr.set(x, y, f64::from(seg.size * v) / f64::from(scale));
        }
    }
    tr
}

// ── Per-segment metadata ───────────────────────────────────────

fn write_segment_metadata(writer: &mut BitWriter, seg: &Segment) {
    writer.write_byte(seg.pred_type as i8 as u8);
    writer.write_bits(u32::from(seg.ref_x as u16), 16);
    writer.write_bits(u32::from(seg.ref_y as u16), 16);
    writer.write_byte((seg.ref_angle % 3) as u8);
    let angle_val = (0x7000 as f32 * seg.angle) as i16;
    writer.write_bits(u32::from(angle_val as u16), 16);
}

fn read_segment_metadata(
    reader: &mut BitReader<'_>,
    seg: &mut Segment,
    channel_config: &ChannelConfig,
) -> Result<(), GlicError> {
    let raw = reader.read_byte()? as i8;
    seg.pred_type = match PredictionMethod::from_i8(raw) {
        Ok(PredictionMethod::None) => channel_config.prediction_method,
        Ok(m) => m,
        // unknown bytes predict nothing rather than the channel default
        Err(_) => PredictionMethod::None,
    };
    seg.ref_x = reader.read_bits(16)? as u16 as i16;
    seg.ref_y = reader.read_bits(16)? as u16 as i16;
    seg.ref_angle = i32::from(reader.read_byte()? % 3);
    let angle_val = reader.read_bits(16)? as u16 as i16;
    seg.angle = f32::from(angle_val) / 0x7000 as f32;
    Ok(())
}

// ── Container ──────────────────────────────────────────────────

fn push_u32(buffer: &mut Vec<u8>, v: u32) {
    buffer.extend_from_slice(&v.to_be_bytes());
}

fn build_container(
    cfg: &CodecConfig,
    width: u32,
    height: u32,
    segmentation: &[Vec<u8>; 3],
    prediction: &[Vec<u8>; 3],
    image: &[Vec<u8>; 3],
) -> Vec<u8> {
    let payload: usize = segmentation.iter().map(Vec::len).sum::<usize>()
        + prediction.iter().map(Vec::len).sum::<usize>()
        + image.iter().map(Vec::len).sum::<usize>();
    let mut buffer =
        Vec::with_capacity(GLIC_HEADER_SIZE + 3 * GLIC_CHANNEL_HEADER_SIZE + payload);

    push_u32(&mut buffer, GLIC_MAGIC);
    buffer.extend_from_slice(&GLIC_VERSION.to_be_bytes());
    push_u32(&mut buffer, width);
    push_u32(&mut buffer, height);

    buffer.push(cfg.color_space as u8);
    buffer.push(cfg.border_r);
    buffer.push(cfg.border_g);
    buffer.push(cfg.border_b);

    for blob in segmentation {
        push_u32(&mut buffer, blob.len() as u32);
    }
    for blob in prediction {
        push_u32(&mut buffer, blob.len() as u32);
    }
    for blob in image {
        push_u32(&mut buffer, blob.len() as u32);
    }

    buffer.resize(GLIC_HEADER_SIZE, 0);

    for ch in &cfg.channels {
        let start = buffer.len();
        buffer.push(ch.prediction_method as i8 as u8);
        buffer.push(ch.quantization_value);
        buffer.push(ch.clamp_method as u8);
        buffer.push(ch.wavelet_type as u8);
        buffer.push(ch.transform_type as u8);
        buffer.extend_from_slice(&ch.transform_scale.to_be_bytes());
        buffer.push(ch.encoding_method as u8);
        buffer.resize(start + GLIC_CHANNEL_HEADER_SIZE, 0);
    }

    for blob in segmentation {
        buffer.extend_from_slice(blob);
    }
    for blob in prediction {
        buffer.extend_from_slice(blob);
    }
    for blob in image {
        buffer.extend_from_slice(blob);
    }

    buffer
}

struct Header {
    width: u32,
    height: u32,
    color_space: ColorSpace,
    border: (u8, u8, u8),
    segmentation_sizes: [usize; 3],
    prediction_sizes: [usize; 3],
    residual_sizes: [usize; 3],
    channels: [ChannelConfig; 3],
}

/// Parsed container metadata, without decoding any payload.
#[derive(Clone, Debug)]
pub struct ContainerInfo {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub border: (u8, u8, u8),
    pub segmentation_sizes: [usize; 3],
    pub prediction_sizes: [usize; 3],
    pub residual_sizes: [usize; 3],
    pub channels: [ChannelConfig; 3],
}

/// Read a container's header and channel configs.
///
/// # Errors
///
/// Same header conditions as [`Codec::decode`].
pub fn inspect(data: &[u8]) -> Result<ContainerInfo, GlicError> {
    let h = parse_header(data)?;
    Ok(ContainerInfo {
        width: h.width,
        height: h.height,
        color_space: h.color_space,
        border: h.border,
        segmentation_sizes: h.segmentation_sizes,
        prediction_sizes: h.prediction_sizes,
        residual_sizes: h.residual_sizes,
        channels: h.channels,
    })
}

fn read_u32(data: &[u8], pos: usize) -> u32 {
    u32::from_be_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
}

fn parse_header(data: &[u8]) -> Result<Header, GlicError> {
    if data.len() < GLIC_HEADER_SIZE + 3 * GLIC_CHANNEL_HEADER_SIZE {
        return Err(GlicError::TruncatedInput);
    }

    let magic = read_u32(data, 0);
    if magic != GLIC_MAGIC {
        return Err(GlicError::BadMagic { found: magic });
    }

    let version = u16::from_be_bytes([data[4], data[5]]);
    if version != GLIC_VERSION {
        return Err(GlicError::BadVersion { found: version });
    }

    let width = read_u32(data, 6);
    let height = read_u32(data, 10);
    let color_space = ColorSpace::from_u8(data[14])?;
    let border = (data[15], data[16], data[17]);

    let mut segmentation_sizes = [0usize; 3];
    let mut prediction_sizes = [0usize; 3];
    let mut residual_sizes = [0usize; 3];
    for p in 0..3 {
        segmentation_sizes[p] = read_u32(data, 18 + 4 * p) as usize;
        prediction_sizes[p] = read_u32(data, 30 + 4 * p) as usize;
        residual_sizes[p] = read_u32(data, 42 + 4 * p) as usize;
    }

    let mut channels = [ChannelConfig::default(); 3];
    for (p, ch) in channels.iter_mut().enumerate() {
        let base = GLIC_HEADER_SIZE + p * GLIC_CHANNEL_HEADER_SIZE;
        ch.prediction_method = PredictionMethod::from_i8(data[base] as i8)?;
        ch.quantization_value = data[base + 1];
        ch.clamp_method = ClampMethod::from_u8(data[base + 2])?;
        ch.wavelet_type = WaveletType::from_u8(data[base + 3])?;
        ch.transform_type = TransformType::from_u8(data[base + 4])?;
        ch.transform_scale = read_u32(data, base + 5) as i32;
        ch.encoding_method = EncodingMethod::from_u8(data[base + 9])?;
    }

    Ok(Header {
        width,
        height,
        color_space,
        border,
        segmentation_sizes,
        prediction_sizes,
        residual_sizes,
        channels,
    })
}

/// Slice `len` bytes at `pos`, shrinking to whatever actually exists.
fn bounded_slice(data: &[u8], pos: usize, len: usize) -> &[u8] {
    let start = pos.min(data.len());
    let end = pos.saturating_add(len).min(data.len());
    &data[start..end]
}

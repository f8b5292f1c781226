//! Codec configuration: the wire enums and per-channel settings.
//!
//! Every enum here is an identity that also appears in the bitstream, so
//! the discriminants are contractual. `from_u8`/`from_i8` reject bytes a
//! conforming container can never carry; name tables serve the CLI and
//! preset files.

use serde::{Deserialize, Serialize};

use crate::color::ColorSpace;
use crate::error::GlicError;

// ── Prediction ─────────────────────────────────────────────────

/// Spatial predictors. Non-negative values appear in per-segment metadata;
/// the negative ones are search strategies that resolve to a concrete
/// predictor during encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i8)]
pub enum PredictionMethod {
    /// Minimum-SAD search over the whole catalog.
    Sad = -1,
    /// Maximum-SAD search (anti-prediction, for glitch output).
    Bsad = -2,
    /// Uniformly random concrete predictor per segment.
    Random = -3,
    /// All-zero prediction; on the wire it means "use the channel default".
    None = 0,
    Corner = 1,
    H = 2,
    V = 3,
    Dc = 4,
    DcMedian = 5,
    Median = 6,
    Avg = 7,
    TrueMotion = 8,
    Paeth = 9,
    LDiag = 10,
    Hv = 11,
    JpegLs = 12,
    Diff = 13,
    /// Copies from a searched offset in the already-coded region.
    Ref = 14,
    /// Directional extrapolation along a searched angle.
    Angle = 15,
    Spiral = 16,
    Noise = 17,
    Gradient = 18,
    Mirror = 19,
    Wave = 20,
    Checkerboard = 21,
    Radial = 22,
    Edge = 23,
}

/// Number of concrete predictors (`None..=Edge`).
pub const PREDICTION_COUNT: i32 = 24;

impl PredictionMethod {
    /// Parse a metadata/config byte.
    ///
    /// # Errors
    ///
    /// Returns [`GlicError::UnsupportedEnum`] outside `-3..=23`.
    pub fn from_i8(v: i8) -> Result<Self, GlicError> {
        Self::from_index(i32::from(v)).ok_or(GlicError::UnsupportedEnum {
            what: "prediction method",
            value: i32::from(v),
        })
    }

    /// Map an index in `-3..24` to a method, `None` otherwise.
    #[must_use]
    pub fn from_index(v: i32) -> Option<Self> {
        Some(match v {
            -1 => Self::Sad,
            -2 => Self::Bsad,
            -3 => Self::Random,
            0 => Self::None,
            1 => Self::Corner,
            2 => Self::H,
            3 => Self::V,
            4 => Self::Dc,
            5 => Self::DcMedian,
            6 => Self::Median,
            7 => Self::Avg,
            8 => Self::TrueMotion,
            9 => Self::Paeth,
            10 => Self::LDiag,
            11 => Self::Hv,
            12 => Self::JpegLs,
            13 => Self::Diff,
            14 => Self::Ref,
            15 => Self::Angle,
            16 => Self::Spiral,
            17 => Self::Noise,
            18 => Self::Gradient,
            19 => Self::Mirror,
            20 => Self::Wave,
            21 => Self::Checkerboard,
            22 => Self::Radial,
            23 => Self::Edge,
            _ => return None,
        })
    }

    /// Canonical name, as accepted by [`PredictionMethod::parse`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sad => "SAD",
            Self::Bsad => "BSAD",
            Self::Random => "RANDOM",
            Self::None => "NONE",
            Self::Corner => "CORNER",
            Self::H => "H",
            Self::V => "V",
            Self::Dc => "DC",
            Self::DcMedian => "DCMEDIAN",
            Self::Median => "MEDIAN",
            Self::Avg => "AVG",
            Self::TrueMotion => "TRUEMOTION",
            Self::Paeth => "PAETH",
            Self::LDiag => "LDIAG",
            Self::Hv => "HV",
            Self::JpegLs => "JPEGLS",
            Self::Diff => "DIFF",
            Self::Ref => "REF",
            Self::Angle => "ANGLE",
            Self::Spiral => "SPIRAL",
            Self::Noise => "NOISE",
            Self::Gradient => "GRADIENT",
            Self::Mirror => "MIRROR",
            Self::Wave => "WAVE",
            Self::Checkerboard => "CHECKERBOARD",
            Self::Radial => "RADIAL",
            Self::Edge => "EDGE",
        }
    }

    /// Parse a name, falling back to `None`.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "SAD" => Self::Sad,
            "BSAD" => Self::Bsad,
            "RANDOM" => Self::Random,
            "CORNER" => Self::Corner,
            "H" => Self::H,
            "V" => Self::V,
            "DC" => Self::Dc,
            "DCMEDIAN" => Self::DcMedian,
            "MEDIAN" => Self::Median,
            "AVG" => Self::Avg,
            "TRUEMOTION" => Self::TrueMotion,
            "PAETH" => Self::Paeth,
            "LDIAG" => Self::LDiag,
            "HV" => Self::Hv,
            "JPEGLS" => Self::JpegLs,
            "DIFF" => Self::Diff,
            "REF" => Self::Ref,
            "ANGLE" => Self::Angle,
            "SPIRAL" => Self::Spiral,
            "NOISE" => Self::Noise,
            "GRADIENT" => Self::Gradient,
            "MIRROR" => Self::Mirror,
            "WAVE" => Self::Wave,
            "CHECKERBOARD" => Self::Checkerboard,
            "RADIAL" => Self::Radial,
            "EDGE" => Self::Edge,
            _ => Self::None,
        }
    }
}

// ── Clamp ──────────────────────────────────────────────────────

/// How out-of-range channel values fold back into 0..255.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ClampMethod {
    /// Saturate on the way out of the plane; residuals pass unchanged in.
    None = 0,
    /// Wrap mod 256 in both directions.
    Mod256 = 1,
}

impl ClampMethod {
    /// Parse a wire byte.
    ///
    /// # Errors
    ///
    /// Returns [`GlicError::UnsupportedEnum`] outside `0..=1`.
    pub fn from_u8(v: u8) -> Result<Self, GlicError> {
        match v {
            0 => Ok(Self::None),
            1 => Ok(Self::Mod256),
            _ => Err(GlicError::UnsupportedEnum {
                what: "clamp method",
                value: i32::from(v),
            }),
        }
    }
}

// ── Transform ──────────────────────────────────────────────────

/// Which 2-D decomposition runs over a segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TransformType {
    /// Mallat cascade: only the low band recurses.
    Fwt = 0,
    /// Packet transform: both bands recurse.
    Wpt = 1,
    /// Historical wire value; behaves as FWT.
    Random = 255,
}

impl TransformType {
    /// Parse a wire byte.
    ///
    /// # Errors
    ///
    /// Returns [`GlicError::UnsupportedEnum`] for anything but 0, 1, 255.
    pub fn from_u8(v: u8) -> Result<Self, GlicError> {
        match v {
            0 => Ok(Self::Fwt),
            1 => Ok(Self::Wpt),
            255 => Ok(Self::Random),
            _ => Err(GlicError::UnsupportedEnum {
                what: "transform type",
                value: i32::from(v),
            }),
        }
    }

    /// Canonical name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Fwt | Self::Random => "FWT",
            Self::Wpt => "WPT",
        }
    }
}

// ── Wavelet ────────────────────────────────────────────────────

/// Wavelet identity on the wire.
///
/// Many named variants alias a smaller set of filter banks; the alias
/// table lives in [`crate::wavelet`] and is frozen because both ends of
/// the stream must agree on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum WaveletType {
    None = 0,
    HaarOrthogonal = 1,
    Biorthogonal11 = 2,
    Biorthogonal13 = 3,
    Biorthogonal15 = 4,
    Biorthogonal22 = 5,
    Biorthogonal24 = 6,
    Biorthogonal26 = 7,
    Biorthogonal28 = 8,
    Biorthogonal31 = 9,
    Biorthogonal33 = 10,
    Biorthogonal35 = 11,
    Biorthogonal37 = 12,
    Biorthogonal39 = 13,
    Biorthogonal44 = 14,
    Biorthogonal55 = 15,
    Biorthogonal68 = 16,
    Coiflet1 = 17,
    Coiflet2 = 18,
    Coiflet3 = 19,
    Coiflet4 = 20,
    Coiflet5 = 21,
    Symlet2 = 22,
    Symlet3 = 23,
    Symlet4 = 24,
    Symlet5 = 25,
    Symlet6 = 26,
    Symlet7 = 27,
    Symlet8 = 28,
    Symlet9 = 29,
    Symlet10 = 30,
    Daubechies2 = 31,
    Daubechies3 = 32,
    Daubechies4 = 33,
    Daubechies5 = 34,
    Daubechies6 = 35,
    Daubechies7 = 36,
    Daubechies8 = 37,
    Daubechies9 = 38,
    Daubechies10 = 39,
    Haar = 40,
    /// Historical wire value; resolves like any unmapped name (Haar).
    Random = 255,
}

impl WaveletType {
    /// Parse a wire byte.
    ///
    /// # Errors
    ///
    /// Returns [`GlicError::UnsupportedEnum`] outside `0..=40` and 255.
    pub fn from_u8(v: u8) -> Result<Self, GlicError> {
        Ok(match v {
            0 => Self::None,
            1 => Self::HaarOrthogonal,
            2 => Self::Biorthogonal11,
            3 => Self::Biorthogonal13,
            4 => Self::Biorthogonal15,
            5 => Self::Biorthogonal22,
            6 => Self::Biorthogonal24,
            7 => Self::Biorthogonal26,
            8 => Self::Biorthogonal28,
            9 => Self::Biorthogonal31,
            10 => Self::Biorthogonal33,
            11 => Self::Biorthogonal35,
            12 => Self::Biorthogonal37,
            13 => Self::Biorthogonal39,
            14 => Self::Biorthogonal44,
            15 => Self::Biorthogonal55,
            16 => Self::Biorthogonal68,
            17 => Self::Coiflet1,
            18 => Self::Coiflet2,
            19 => Self::Coiflet3,
            20 => Self::Coiflet4,
            21 => Self::Coiflet5,
            22 => Self::Symlet2,
            23 => Self::Symlet3,
            24 => Self::Symlet4,
            25 => Self::Symlet5,
            26 => Self::Symlet6,
            27 => Self::Symlet7,
            28 => Self::Symlet8,
            29 => Self::Symlet9,
            30 => Self::Symlet10,
            31 => Self::Daubechies2,
            32 => Self::Daubechies3,
            33 => Self::Daubechies4,
            34 => Self::Daubechies5,
            35 => Self::Daubechies6,
            36 => Self::Daubechies7,
            37 => Self::Daubechies8,
            38 => Self::Daubechies9,
            39 => Self::Daubechies10,
            40 => Self::Haar,
            255 => Self::Random,
            _ => {
                return Err(GlicError::UnsupportedEnum {
                    what: "wavelet type",
                    value: i32::from(v),
                })
            }
        })
    }

    /// Canonical name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::HaarOrthogonal => "HAAR_ORTHOGONAL",
            Self::Biorthogonal11 => "BIOR1.1",
            Self::Biorthogonal13 => "BIOR1.3",
            Self::Biorthogonal15 => "BIOR1.5",
            Self::Biorthogonal22 => "BIOR2.2",
            Self::Biorthogonal24 => "BIOR2.4",
            Self::Biorthogonal26 => "BIOR2.6",
            Self::Biorthogonal28 => "BIOR2.8",
            Self::Biorthogonal31 => "BIOR3.1",
            Self::Biorthogonal33 => "BIOR3.3",
            Self::Biorthogonal35 => "BIOR3.5",
            Self::Biorthogonal37 => "BIOR3.7",
            Self::Biorthogonal39 => "BIOR3.9",
            Self::Biorthogonal44 => "BIOR4.4",
            Self::Biorthogonal55 => "BIOR5.5",
            Self::Biorthogonal68 => "BIOR6.8",
            Self::Coiflet1 => "COIFLET1",
            Self::Coiflet2 => "COIFLET2",
            Self::Coiflet3 => "COIFLET3",
            Self::Coiflet4 => "COIFLET4",
            Self::Coiflet5 => "COIFLET5",
            Self::Symlet2 => "SYMLET2",
            Self::Symlet3 => "SYMLET3",
            Self::Symlet4 => "SYMLET4",
            Self::Symlet5 => "SYMLET5",
            Self::Symlet6 => "SYMLET6",
            Self::Symlet7 => "SYMLET7",
            Self::Symlet8 => "SYMLET8",
            Self::Symlet9 => "SYMLET9",
            Self::Symlet10 => "SYMLET10",
            Self::Daubechies2 => "DAUBECHIES2",
            Self::Daubechies3 => "DAUBECHIES3",
            Self::Daubechies4 => "DAUBECHIES4",
            Self::Daubechies5 => "DAUBECHIES5",
            Self::Daubechies6 => "DAUBECHIES6",
            Self::Daubechies7 => "DAUBECHIES7",
            Self::Daubechies8 => "DAUBECHIES8",
            Self::Daubechies9 => "DAUBECHIES9",
            Self::Daubechies10 => "DAUBECHIES10",
            Self::Haar => "HAAR",
            Self::Random => "RANDOM",
        }
    }

    /// Parse a name (long or short form), falling back to `None`.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "HAAR" => Self::Haar,
            "HAAR_ORTHOGONAL" => Self::HaarOrthogonal,
            "DAUBECHIES2" | "DB2" => Self::Daubechies2,
            "DAUBECHIES3" | "DB3" => Self::Daubechies3,
            "DAUBECHIES4" | "DB4" => Self::Daubechies4,
            "DAUBECHIES5" | "DB5" => Self::Daubechies5,
            "DAUBECHIES6" | "DB6" => Self::Daubechies6,
            "DAUBECHIES7" | "DB7" => Self::Daubechies7,
            "DAUBECHIES8" | "DB8" => Self::Daubechies8,
            "DAUBECHIES9" | "DB9" => Self::Daubechies9,
            "DAUBECHIES10" | "DB10" => Self::Daubechies10,
            "SYMLET2" | "SYM2" => Self::Symlet2,
            "SYMLET3" | "SYM3" => Self::Symlet3,
            "SYMLET4" | "SYM4" => Self::Symlet4,
            "SYMLET5" | "SYM5" => Self::Symlet5,
            "SYMLET6" | "SYM6" => Self::Symlet6,
            "SYMLET7" | "SYM7" => Self::Symlet7,
            "SYMLET8" | "SYM8" => Self::Symlet8,
            "SYMLET9" | "SYM9" => Self::Symlet9,
            "SYMLET10" | "SYM10" => Self::Symlet10,
            "COIFLET1" | "COIF1" => Self::Coiflet1,
            "COIFLET2" | "COIF2" => Self::Coiflet2,
            "COIFLET3" | "COIF3" => Self::Coiflet3,
            "COIFLET4" | "COIF4" => Self::Coiflet4,
            "COIFLET5" | "COIF5" => Self::Coiflet5,
            _ => Self::None,
        }
    }
}

// ── Encoding ───────────────────────────────────────────────────

/// Residual entropy coding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum EncodingMethod {
    Raw = 0,
    Packed = 1,
    Rle = 2,
    Delta = 3,
    Xor = 4,
    Zigzag = 5,
}

impl EncodingMethod {
    /// Parse a wire byte.
    ///
    /// # Errors
    ///
    /// Returns [`GlicError::UnsupportedEnum`] outside `0..=5`.
    pub fn from_u8(v: u8) -> Result<Self, GlicError> {
        Ok(match v {
            0 => Self::Raw,
            1 => Self::Packed,
            2 => Self::Rle,
            3 => Self::Delta,
            4 => Self::Xor,
            5 => Self::Zigzag,
            _ => {
                return Err(GlicError::UnsupportedEnum {
                    what: "encoding method",
                    value: i32::from(v),
                })
            }
        })
    }

    /// Canonical name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Raw => "RAW",
            Self::Packed => "PACKED",
            Self::Rle => "RLE",
            Self::Delta => "DELTA",
            Self::Xor => "XOR",
            Self::Zigzag => "ZIGZAG",
        }
    }

    /// Parse a name, falling back to `Raw`.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "PACKED" => Self::Packed,
            "RLE" => Self::Rle,
            "DELTA" => Self::Delta,
            "XOR" => Self::Xor,
            "ZIGZAG" => Self::Zigzag,
            _ => Self::Raw,
        }
    }
}

// ── Channel & codec config ─────────────────────────────────────

/// Per-channel settings, immutable for one codec invocation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Quad-tree leaves never shrink below this side length.
    pub min_block_size: i32,
    /// Nodes wider than this always split.
    pub max_block_size: i32,
    /// Sampled standard deviation above which a node splits.
    pub segmentation_precision: f32,
    pub prediction_method: PredictionMethod,
    /// 0..=255; the effective divisor is half this value.
    pub quantization_value: u8,
    pub clamp_method: ClampMethod,
    pub transform_type: TransformType,
    pub wavelet_type: WaveletType,
    /// 0..=255 knob; the effective threshold is `50 * (v/255)^2`.
    pub transform_compress: f32,
    /// Fixed-point scale between wavelet coefficients and stored integers.
    pub transform_scale: i32,
    pub encoding_method: EncodingMethod,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            min_block_size: 2,
            max_block_size: 256,
            segmentation_precision: 15.0,
            prediction_method: PredictionMethod::Paeth,
            quantization_value: 110,
            clamp_method: ClampMethod::None,
            transform_type: TransformType::Fwt,
            wavelet_type: WaveletType::Symlet8,
            transform_compress: 0.0,
            transform_scale: 20,
            encoding_method: EncodingMethod::Packed,
        }
    }
}

/// Full codec configuration: color space, border color, three channels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub color_space: ColorSpace,
    pub border_r: u8,
    pub border_g: u8,
    pub border_b: u8,
    pub channels: [ChannelConfig; 3],
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            color_space: ColorSpace::Hwb,
            border_r: 128,
            border_g: 128,
            border_b: 128,
            channels: [ChannelConfig::default(); 3],
        }
    }
}

impl CodecConfig {
    /// Apply one closure to all three channel configs.
    pub fn for_each_channel(&mut self, f: impl Fn(&mut ChannelConfig)) {
        for ch in &mut self.channels {
            f(ch);
        }
    }
}

//! GLIC: the GLitch Image Codec.
//!
//! A lossy, block-adaptive image codec whose every compression dial is
//! deliberately exposed: tuned conservatively it round-trips images with
//! bounded error, mis-tuned it produces controlled glitch artifacts.
//!
//! # Architecture
//!
//! ```text
//! ARGB pixels -> color space -> per channel:
//!     quad-tree segmentation -> spatial prediction -> residuals
//!     -> quantization -> 2-D wavelet (optional) -> residual coding
//! -> container ("GLC2")
//! ```
//!
//! The encoder reconstructs each segment locally right after coding it,
//! so later segments predict against exactly what the decoder will see.
//! All randomness (deviation sampling, reference search, the RANDOM
//! predictor) comes from fixed-seed PRNGs; encoding the same input twice
//! yields byte-identical output.
//!
//! # Example
//!
//! ```
//! use glic::{Codec, CodecConfig};
//!
//! let pixels = vec![0xFF80_4020u32; 64]; // 8x8 solid, alpha 0xFF
//! let codec = Codec::new(CodecConfig::default());
//! let bytes = codec.encode(&pixels, 8, 8).unwrap();
//! let decoded = codec.decode(&bytes).unwrap();
//! assert_eq!(decoded.width, 8);
//! ```

pub mod bitio;
pub mod codec;
pub mod color;
pub mod config;
pub mod effects;
pub mod encoding;
pub mod error;
pub mod metrics;
pub mod planes;
pub mod prediction;
pub mod preset;
pub mod quant;
pub mod segment;
pub mod wavelet;

// Re-exports
pub use codec::{Codec, DecodedImage, GLIC_MAGIC, GLIC_VERSION};
pub use color::{Color, ColorSpace};
pub use config::{
    ChannelConfig, ClampMethod, CodecConfig, EncodingMethod, PredictionMethod, TransformType,
    WaveletType,
};
pub use effects::{EffectConfig, EffectType, PixelSortMode};
pub use error::GlicError;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

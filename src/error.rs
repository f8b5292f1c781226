//! Error types for the GLIC codec.
//!
//! All public APIs that can fail return `Result<T, GlicError>`.

use core::fmt;

/// Errors that can occur during encoding, decoding, or bitstream parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GlicError {
    /// The bit reader ran past the end of its input.
    TruncatedInput,
    /// The first four bytes of the container did not spell "GLC2".
    BadMagic { found: u32 },
    /// The container version is not the one this build understands.
    BadVersion { found: u16 },
    /// An enum byte in the header or a channel config is out of range.
    UnsupportedEnum { what: &'static str, value: i32 },
    /// Input buffer size does not match the declared dimensions.
    InvalidBufferSize { expected: usize, got: usize },
    /// A decode stage could not complete.
    DecodeFailure(String),
}

impl fmt::Display for GlicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedInput => write!(f, "unexpected end of input"),
            Self::BadMagic { found } => {
                write!(f, "bad magic: 0x{found:08X} (expected GLC2)")
            }
            Self::BadVersion { found } => {
                write!(f, "unsupported container version: {found} (expected 1)")
            }
            Self::UnsupportedEnum { what, value } => {
                write!(f, "out-of-range {what} value: {value}")
            }
            Self::InvalidBufferSize { expected, got } => {
                write!(f, "buffer size mismatch: expected {expected}, got {got}")
            }
            Self::DecodeFailure(msg) => write!(f, "decode failed: {msg}"),
        }
    }
}

impl std::error::Error for GlicError {}

//! Preset files: named, fully-populated codec configurations.
//!
//! A preset is a JSON rendition of [`CodecConfig`]; absent fields take
//! their defaults, so a preset can pin only the dials it cares about:
//!
//! ```json
//! {
//!   "color_space": "Hsb",
//!   "channels": [
//!     { "prediction_method": "Spiral", "quantization_value": 180 },
//!     {},
//!     { "encoding_method": "Rle" }
//!   ]
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::CodecConfig;

/// Error loading or parsing a preset file.
#[derive(Debug)]
pub enum PresetError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl std::fmt::Display for PresetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "preset I/O error: {e}"),
            Self::Parse(e) => write!(f, "preset parse error: {e}"),
        }
    }
}

impl std::error::Error for PresetError {}

impl From<io::Error> for PresetError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for PresetError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Load a preset file into a full configuration.
///
/// # Errors
///
/// Returns [`PresetError`] when the file cannot be read or parsed.
pub fn load_preset(path: &Path) -> Result<CodecConfig, PresetError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Load a preset by bare name from a presets directory.
///
/// # Errors
///
/// Returns [`PresetError`] when the file cannot be read or parsed.
pub fn load_preset_by_name(dir: &Path, name: &str) -> Result<CodecConfig, PresetError> {
    load_preset(&dir.join(format!("{name}.json")))
}

/// Bare names of the presets in a directory, sorted.
#[must_use]
pub fn list_presets(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .map(|e| PathBuf::from(e.file_name()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .collect();
    names.sort();
    names
}

/// Serialize a configuration as pretty JSON for saving as a preset.
///
/// # Errors
///
/// Returns [`PresetError::Parse`] if serialization fails.
pub fn to_preset_json(config: &CodecConfig) -> Result<String, PresetError> {
    Ok(serde_json::to_string_pretty(config)?)
}

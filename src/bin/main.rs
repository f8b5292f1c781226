//! CLI for the GLIC codec.
//!
//! ```bash
//! glic encode photo.png glitched.glic --colorspace HWB --prediction SPIRAL
//! glic decode glitched.glic result.png --effect scanline --effect chromatic
//! glic info glitched.glic
//! glic list-presets --presets-dir ./presets
//! ```

#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};

use glic::codec;
use glic::effects::{apply_effects, EffectConfig, EffectType, PixelSortMode};
use glic::preset;
use glic::{
    ClampMethod, Codec, CodecConfig, Color, ColorSpace, EncodingMethod, PredictionMethod,
    TransformType, WaveletType,
};

#[derive(Parser)]
#[command(name = "glic", version, about = "GLIC: GLitch Image Codec")]
struct Cli {
    /// Verbose progress logging (or set RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a raster image into a .glic container
    Encode {
        /// Input image (PNG, JPEG, BMP, ...)
        input: PathBuf,
        /// Output file (.glic)
        output: PathBuf,
        #[command(flatten)]
        opts: EncodeOpts,
    },
    /// Decode a .glic container back to a raster image
    Decode {
        /// Input file (.glic)
        input: PathBuf,
        /// Output image (PNG)
        output: PathBuf,
        #[command(flatten)]
        effects: EffectOpts,
    },
    /// Show metadata of a .glic container
    Info {
        /// Input file (.glic)
        input: PathBuf,
    },
    /// List available presets
    ListPresets {
        /// Directory containing presets
        #[arg(long, default_value = "presets")]
        presets_dir: PathBuf,
    },
}

#[derive(Args)]
struct EncodeOpts {
    /// Load a preset by name before applying other flags
    #[arg(long)]
    preset: Option<String>,
    /// Directory containing presets
    #[arg(long, default_value = "presets")]
    presets_dir: PathBuf,
    /// Color space: RGB, HSB, HWB, OHTA, CMY, XYZ, YXY, LAB, LUV, HCL,
    /// YUV, YPbPr, YCbCr, YDbDr, GS, R-GGB-G
    #[arg(long)]
    colorspace: Option<String>,
    /// Min block size
    #[arg(long)]
    min_block: Option<i32>,
    /// Max block size
    #[arg(long)]
    max_block: Option<i32>,
    /// Segmentation threshold
    #[arg(long)]
    threshold: Option<f32>,
    /// Prediction method (PAETH, SAD, REF, ANGLE, SPIRAL, ...)
    #[arg(long)]
    prediction: Option<String>,
    /// Quantization value 0-255
    #[arg(long)]
    quantization: Option<u8>,
    /// Clamp method: none, mod256
    #[arg(long)]
    clamp: Option<String>,
    /// Wavelet (NONE, HAAR, DB2-DB10, SYM2-SYM10, COIF1-COIF5)
    #[arg(long)]
    wavelet: Option<String>,
    /// Transform type: fwt, wpt
    #[arg(long)]
    transform: Option<String>,
    /// Transform scale
    #[arg(long)]
    scale: Option<i32>,
    /// Transform compression knob 0-255
    #[arg(long)]
    compress: Option<f32>,
    /// Encoding method: raw, packed, rle, delta, xor, zigzag
    #[arg(long)]
    encoding: Option<String>,
    /// Border color as r,g,b
    #[arg(long)]
    border: Option<String>,
}

#[derive(Args)]
struct EffectOpts {
    /// Apply a post effect (repeatable): pixelate, scanline, chromatic,
    /// dither, posterize, glitch, dct, sort, leak
    #[arg(long = "effect")]
    effects: Vec<String>,
    /// Effect intensity 0-100
    #[arg(long, default_value_t = 50)]
    effect_intensity: i32,
    /// Block size for pixelate/glitch/dct/leak
    #[arg(long, default_value_t = 8)]
    effect_blocksize: i32,
    /// Chromatic aberration offset as x,y
    #[arg(long, default_value = "2,0")]
    effect_offset: String,
    /// Posterize levels
    #[arg(long, default_value_t = 4)]
    effect_levels: i32,
    /// Pixel sort threshold 0-255
    #[arg(long, default_value_t = 50)]
    effect_threshold: i32,
    /// Sort mode: brightness, hue, saturation, red, green, blue
    #[arg(long, default_value = "brightness")]
    effect_sortmode: String,
    /// Sort vertically instead of horizontally
    #[arg(long)]
    effect_vertical: bool,
    /// Prediction leak amount 0.0-1.0
    #[arg(long, default_value_t = 0.5)]
    effect_leak: f32,
    /// Seed for randomized effects
    #[arg(long, default_value_t = 12345)]
    effect_seed: u64,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "glic=debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "glic=warn".to_string())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Encode {
            input,
            output,
            opts,
        } => cmd_encode(&input, &output, &opts),
        Commands::Decode {
            input,
            output,
            effects,
        } => cmd_decode(&input, &output, &effects),
        Commands::Info { input } => cmd_info(&input),
        Commands::ListPresets { presets_dir } => cmd_list_presets(&presets_dir),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn parse_rgb(s: &str) -> Result<(u8, u8, u8), String> {
    let parts: Vec<i32> = s
        .split(',')
        .map(|p| p.trim().parse::<i32>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("bad RGB triple '{s}': {e}"))?;
    if parts.len() != 3 {
        return Err(format!("bad RGB triple '{s}': expected r,g,b"));
    }
    Ok((
        parts[0].clamp(0, 255) as u8,
        parts[1].clamp(0, 255) as u8,
        parts[2].clamp(0, 255) as u8,
    ))
}

fn parse_xy(s: &str) -> Result<(i32, i32), String> {
    let parts: Vec<i32> = s
        .split(',')
        .map(|p| p.trim().parse::<i32>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("bad offset '{s}': {e}"))?;
    match parts.as_slice() {
        [x] => Ok((*x, 0)),
        [x, y] => Ok((*x, *y)),
        _ => Err(format!("bad offset '{s}': expected x,y")),
    }
}

fn build_config(opts: &EncodeOpts) -> Result<CodecConfig, String> {
    let mut config = match &opts.preset {
        Some(name) => preset::load_preset_by_name(&opts.presets_dir, name)
            .map_err(|e| format!("preset '{name}': {e}"))?,
        None => CodecConfig::default(),
    };

    if let Some(cs) = &opts.colorspace {
        config.color_space = ColorSpace::parse(cs);
    }
    if let Some(v) = opts.min_block {
        config.for_each_channel(|ch| ch.min_block_size = v);
    }
    if let Some(v) = opts.max_block {
        config.for_each_channel(|ch| ch.max_block_size = v);
    }
    if let Some(v) = opts.threshold {
        config.for_each_channel(|ch| ch.segmentation_precision = v);
    }
    if let Some(name) = &opts.prediction {
        let method = PredictionMethod::parse(name);
        config.for_each_channel(|ch| ch.prediction_method = method);
    }
    if let Some(v) = opts.quantization {
        config.for_each_channel(|ch| ch.quantization_value = v);
    }
    if let Some(name) = &opts.clamp {
        let method = if name == "mod256" {
            ClampMethod::Mod256
        } else {
            ClampMethod::None
        };
        config.for_each_channel(|ch| ch.clamp_method = method);
    }
    if let Some(name) = &opts.wavelet {
        let wavelet = WaveletType::parse(name);
        config.for_each_channel(|ch| ch.wavelet_type = wavelet);
    }
    if let Some(name) = &opts.transform {
        let tt = if name == "wpt" {
            TransformType::Wpt
        } else {
            TransformType::Fwt
        };
        config.for_each_channel(|ch| ch.transform_type = tt);
    }
    if let Some(v) = opts.scale {
        config.for_each_channel(|ch| ch.transform_scale = v);
    }
    if let Some(v) = opts.compress {
        config.for_each_channel(|ch| ch.transform_compress = v);
    }
    if let Some(name) = &opts.encoding {
        let method = EncodingMethod::parse(&name.to_uppercase());
        config.for_each_channel(|ch| ch.encoding_method = method);
    }
    if let Some(border) = &opts.border {
        let (r, g, b) = parse_rgb(border)?;
        config.border_r = r;
        config.border_g = g;
        config.border_b = b;
    }

    Ok(config)
}

fn build_effects(opts: &EffectOpts) -> Result<Vec<EffectConfig>, String> {
    let (offset_x, offset_y) = parse_xy(&opts.effect_offset)?;
    let template = EffectConfig {
        effect_type: EffectType::None,
        intensity: opts.effect_intensity,
        block_size: opts.effect_blocksize,
        offset_x,
        offset_y,
        levels: opts.effect_levels,
        seed: opts.effect_seed,
        sort_mode: PixelSortMode::parse(&opts.effect_sortmode),
        threshold: opts.effect_threshold.clamp(0, 255),
        sort_vertical: opts.effect_vertical,
        leak_amount: opts.effect_leak.clamp(0.0, 1.0),
    };

    Ok(opts
        .effects
        .iter()
        .map(|name| EffectConfig {
            effect_type: EffectType::parse(name),
            ..template
        })
        .filter(|e| e.effect_type != EffectType::None)
        .collect())
}

fn load_image(path: &Path) -> Result<(Vec<Color>, u32, u32), String> {
    let img = image::open(path).map_err(|e| format!("load {}: {e}", path.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let pixels = rgba
        .pixels()
        .map(|p| glic::color::make_color(p[0], p[1], p[2], p[3]))
        .collect();
    Ok((pixels, width, height))
}

fn save_image(path: &Path, pixels: &[Color], width: u32, height: u32) -> Result<(), String> {
    let mut raw = Vec::with_capacity(pixels.len() * 4);
    for &p in pixels {
        raw.push(glic::color::red(p));
        raw.push(glic::color::green(p));
        raw.push(glic::color::blue(p));
        raw.push(glic::color::alpha(p));
    }
    let img = image::RgbaImage::from_raw(width, height, raw)
        .ok_or_else(|| "pixel buffer does not match dimensions".to_string())?;
    img.save(path).map_err(|e| format!("save {}: {e}", path.display()))
}

fn cmd_encode(input: &Path, output: &Path, opts: &EncodeOpts) -> Result<(), String> {
    let config = build_config(opts)?;
    let (pixels, width, height) = load_image(input)?;

    let codec = Codec::new(config);
    let bytes = codec
        .encode(&pixels, width, height)
        .map_err(|e| e.to_string())?;

    fs::write(output, &bytes).map_err(|e| format!("write {}: {e}", output.display()))?;

    let raw_size = pixels.len() * 4;
    let ratio = if raw_size == 0 {
        0.0
    } else {
        bytes.len() as f64 / raw_size as f64
    };
    eprintln!(
        "encoded {width}x{height} ({raw_size} bytes raw) -> {} bytes ({:.1}%)",
        bytes.len(),
        ratio * 100.0,
    );

    Ok(())
}

fn cmd_decode(input: &Path, output: &Path, effect_opts: &EffectOpts) -> Result<(), String> {
    let data = fs::read(input).map_err(|e| format!("read {}: {e}", input.display()))?;

    let codec = Codec::with_defaults();
    let mut decoded = codec.decode(&data).map_err(|e| e.to_string())?;

    let effects = build_effects(effect_opts)?;
    if !effects.is_empty() {
        eprintln!("applying {} post effect(s)", effects.len());
        apply_effects(&mut decoded.pixels, decoded.width, decoded.height, &effects);
    }

    save_image(output, &decoded.pixels, decoded.width, decoded.height)?;
    eprintln!(
        "decoded {} -> {} ({}x{})",
        input.display(),
        output.display(),
        decoded.width,
        decoded.height,
    );

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), String> {
    let data = fs::read(input).map_err(|e| format!("read {}: {e}", input.display()))?;
    let info = codec::inspect(&data).map_err(|e| e.to_string())?;

    println!("GLIC container");
    println!("  File:        {}", input.display());
    println!("  File size:   {} bytes", data.len());
    println!("  Width:       {}", info.width);
    println!("  Height:      {}", info.height);
    println!("  Color space: {}", info.color_space.name());
    println!(
        "  Border:      {},{},{}",
        info.border.0, info.border.1, info.border.2
    );
    for (p, ch) in info.channels.iter().enumerate() {
        println!(
            "  Channel {p}:   pred={} quant={} clamp={:?} wavelet={} transform={} scale={} encoding={}",
            ch.prediction_method.name(),
            ch.quantization_value,
            ch.clamp_method,
            ch.wavelet_type.name(),
            ch.transform_type.name(),
            ch.transform_scale,
            ch.encoding_method.name(),
        );
        println!(
            "               blobs: segmentation={} prediction={} residual={} bytes",
            info.segmentation_sizes[p], info.prediction_sizes[p], info.residual_sizes[p],
        );
    }

    Ok(())
}

fn cmd_list_presets(dir: &Path) -> Result<(), String> {
    let presets = preset::list_presets(dir);
    if presets.is_empty() {
        println!("no presets found in {}", dir.display());
        return Ok(());
    }
    println!("available presets ({}):", presets.len());
    for p in presets {
        println!("  {p}");
    }
    Ok(())
}

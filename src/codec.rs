//! The image-encoding capability the dispatcher drives.
//!
//! [`Encoder`] is the seam between scheduling and pixels: the queue only ever
//! talks to it through `encode(source, target, params)`. [`ImageEncoder`] is the
//! production implementation backed by `image` and `oxipng`.

use crate::constants::{
    AVIF_EFFORT, AVIF_QUALITY, JPEG_QUALITY, MAX_EFFORT, OXIPNG_MAX_PRESET, WEBP_EFFORT,
    WEBP_QUALITY,
};
use crate::error::{Result, SqueezeError};
use crate::formats::OutputFormat;
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageReader};
use oxipng::Options;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Format-specific tuning handed to an [`Encoder`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EncodeParams {
    Png {
        lossless: bool,
        /// oxipng preset, 0 (fast) to 6 (maximum effort)
        effort: u8,
        adaptive_filtering: bool,
    },
    Jpeg {
        quality: u8,
    },
    WebP {
        quality: f32,
        /// 0 (fast) to 6 (slowest, smallest). Only consulted by lossy WebP encoders.
        effort: u8,
        animated: bool,
    },
    Avif {
        quality: u8,
        /// 0 (fast) to 9 (slowest, smallest)
        effort: u8,
        /// 4:2:0 when set, full 4:4:4 otherwise
        subsample_chroma: bool,
    },
}

impl EncodeParams {
    pub fn for_format(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Png => EncodeParams::Png {
                lossless: true,
                effort: OXIPNG_MAX_PRESET,
                adaptive_filtering: true,
            },
            OutputFormat::Jpeg => EncodeParams::Jpeg {
                quality: JPEG_QUALITY,
            },
            OutputFormat::WebP => EncodeParams::WebP {
                quality: WEBP_QUALITY,
                effort: WEBP_EFFORT,
                animated: false,
            },
            OutputFormat::Avif => EncodeParams::Avif {
                quality: AVIF_QUALITY,
                effort: AVIF_EFFORT,
                subsample_chroma: true,
            },
        }
    }

    pub fn format(&self) -> OutputFormat {
        match self {
            EncodeParams::Png { .. } => OutputFormat::Png,
            EncodeParams::Jpeg { .. } => OutputFormat::Jpeg,
            EncodeParams::WebP { .. } => OutputFormat::WebP,
            EncodeParams::Avif { .. } => OutputFormat::Avif,
        }
    }
}

/// Encodes one source image into one target file.
///
/// Implementations are shared by every worker of a queue, hence `Sync`.
pub trait Encoder: Sync {
    fn encode(&self, source: &Path, target: &Path, params: &EncodeParams) -> Result<()>;
}

/// Production encoder built on the `image` crate family.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageEncoder;

impl ImageEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder for ImageEncoder {
    fn encode(&self, source: &Path, target: &Path, params: &EncodeParams) -> Result<()> {
        let img = load_image(source)?;

        let bytes = match *params {
            EncodeParams::Png {
                lossless,
                effort,
                adaptive_filtering,
            } => encode_png(&img, lossless, effort, adaptive_filtering)?,
            EncodeParams::Jpeg { quality } => encode_jpeg(&img, quality)?,
            EncodeParams::WebP {
                quality,
                effort,
                animated,
            } => {
                debug!(
                    quality,
                    effort,
                    animated,
                    "lossless WebP encoder: quality and effort not applied, first frame only"
                );
                encode_webp(&img)?
            }
            EncodeParams::Avif {
                quality,
                effort,
                subsample_chroma,
            } => {
                debug!(subsample_chroma, "AVIF chroma subsampling is left to the encoder");
                encode_avif(&img, quality, effort)?
            }
        };

        let mut writer = BufWriter::new(File::create(target)?);
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }
}

/// Decodes the first frame of `source`, trusting its content over its extension.
fn load_image(source: &Path) -> Result<DynamicImage> {
    let img = ImageReader::open(source)?.with_guessed_format()?.decode()?;
    Ok(img)
}

fn encode_png(
    img: &DynamicImage,
    lossless: bool,
    effort: u8,
    adaptive_filtering: bool,
) -> Result<Vec<u8>> {
    let filter = if adaptive_filtering {
        FilterType::Adaptive
    } else {
        FilterType::NoFilter
    };

    let mut raw = Vec::new();
    img.write_with_encoder(PngEncoder::new_with_quality(
        &mut raw,
        CompressionType::Best,
        filter,
    ))?;

    let mut options = Options::from_preset(effort.min(OXIPNG_MAX_PRESET));
    options.force = true;
    // Rewriting fully transparent pixels changes the decoded RGBA values.
    options.optimize_alpha = !lossless;

    oxipng::optimize_from_memory(&raw, &options)
        .map_err(|e| SqueezeError::PngOptimization(e.to_string()))
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

    let mut out = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, quality))?;
    Ok(out)
}

/// `image` only ships a lossless WebP encoder, so quality and effort do not apply here.
fn encode_webp(img: &DynamicImage) -> Result<Vec<u8>> {
    let rgba = img.to_rgba8();

    let mut out = Vec::new();
    WebPEncoder::new_lossless(&mut out).encode(
        rgba.as_raw(),
        rgba.width(),
        rgba.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(out)
}

fn encode_avif(img: &DynamicImage, quality: u8, effort: u8) -> Result<Vec<u8>> {
    let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
    let speed = avif_speed(effort);

    let mut out = Vec::new();
    rgba.write_with_encoder(AvifEncoder::new_with_speed_quality(&mut out, speed, quality))?;
    Ok(out)
}

/// Effort runs 0..=9 (slowest at 9); the AVIF encoder's speed runs 1..=10 (slowest at 1).
fn avif_speed(effort: u8) -> u8 {
    (10 - effort.min(MAX_EFFORT)).clamp(1, 10)
}

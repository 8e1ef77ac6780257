//! Type-safe output format handling.
//!
//! Format selection is driven purely by file extensions; no content sniffing
//! happens when deciding which encoder to run.

use crate::error::{Result, SqueezeError};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Formats the pipeline can encode to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Lossless PNG, re-optimized with oxipng
    Png,
    /// Lossy JPEG
    Jpeg,
    /// WebP (still images only)
    WebP,
    /// Lossy AVIF
    Avif,
}

impl OutputFormat {
    /// Maps a bare extension (no leading dot, any case) to a format.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "png" => Some(OutputFormat::Png),
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "webp" => Some(OutputFormat::WebP),
            "avif" => Some(OutputFormat::Avif),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::WebP => "webp",
            OutputFormat::Avif => "avif",
        }
    }

    /// Names accepted by `--format`.
    pub fn format_names() -> &'static [&'static str] {
        &["png", "jpg", "jpeg", "webp", "avif"]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Png => "PNG",
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::WebP => "WebP",
            OutputFormat::Avif => "AVIF",
        };
        write!(f, "{}", name)
    }
}

/// A run-wide output format that also remembers the extension spelling it was
/// requested with, so `jpeg` produces `.jpeg` files and `jpg` produces `.jpg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOverride {
    format: OutputFormat,
    extension: &'static str,
}

impl FormatOverride {
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn extension(&self) -> &'static str {
        self.extension
    }
}

impl From<OutputFormat> for FormatOverride {
    fn from(format: OutputFormat) -> Self {
        Self {
            format,
            extension: format.extension(),
        }
    }
}

impl FromStr for FormatOverride {
    type Err = SqueezeError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_start_matches('.');
        let extension = OutputFormat::format_names()
            .iter()
            .copied()
            .find(|name| name.eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SqueezeError::UnsupportedFormat(s.to_string()))?;
        let format = OutputFormat::from_extension(extension)
            .ok_or_else(|| SqueezeError::UnsupportedFormat(s.to_string()))?;

        Ok(Self { format, extension })
    }
}

impl fmt::Display for FormatOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension)
    }
}

//! Type-safe handling of the batch target format and of detected source formats.

use crate::constants::OUTPUT_DIR_PREFIX;
use crate::error::{ConvertError, Result};
use image::ImageFormat;
use std::fmt;
use std::str::FromStr;

/// The single output encoding applied to every file of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetFormat {
    /// Lossy, no alpha channel
    #[default]
    Jpeg,
    /// Lossless, alpha capable
    Png,
    /// Lossy, alpha capable
    WebP,
}

impl TargetFormat {
    /// File extension used for generated names.
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Jpeg => "jpg",
            TargetFormat::Png => "png",
            TargetFormat::WebP => "webp",
        }
    }

    pub fn supports_alpha(&self) -> bool {
        !matches!(self, TargetFormat::Jpeg)
    }

    /// PNG is lossless, so the quality setting has no meaning for it.
    pub fn uses_quality(&self) -> bool {
        !matches!(self, TargetFormat::Png)
    }

    /// Name of the output folder created inside the source directory when
    /// the caller does not pick one.
    pub fn default_output_dir_name(&self) -> String {
        format!("{}{}", OUTPUT_DIR_PREFIX, self.extension())
    }

    pub fn all_formats() -> Vec<TargetFormat> {
        vec![TargetFormat::Jpeg, TargetFormat::Png, TargetFormat::WebP]
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetFormat::Jpeg => "JPEG",
            TargetFormat::Png => "PNG",
            TargetFormat::WebP => "WEBP",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TargetFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(TargetFormat::Jpeg),
            "png" => Ok(TargetFormat::Png),
            "webp" => Ok(TargetFormat::WebP),
            _ => Err(ConvertError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Upper-case display name for a detected source container format.
pub fn source_format_name(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "JPEG".to_string(),
        ImageFormat::Png => "PNG".to_string(),
        ImageFormat::WebP => "WEBP".to_string(),
        ImageFormat::Gif => "GIF".to_string(),
        ImageFormat::Bmp => "BMP".to_string(),
        ImageFormat::Tiff => "TIFF".to_string(),
        other => format!("{:?}", other).to_uppercase(),
    }
}

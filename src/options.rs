use crate::constants::{
    DEFAULT_PREFIX, DEFAULT_QUALITY, DEFAULT_SEQUENCE_PADDING, MAX_QUALITY, MIN_QUALITY,
    QUALITY_BALANCED, QUALITY_HIGH, QUALITY_HIGH_COMPRESSION, QUALITY_MAX_COMPRESSION,
};
use crate::error::{ConvertError, Result};
use crate::formats::TargetFormat;
use std::path::{Path, PathBuf};

/// Named quality levels offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum QualityPreset {
    /// Quality 90, larger files
    High,
    /// Quality 85
    Balanced,
    /// Quality 75, smaller files
    HighCompression,
    /// Quality 50, smallest files
    MaxCompression,
}

impl QualityPreset {
    pub fn quality(&self) -> u8 {
        match self {
            QualityPreset::High => QUALITY_HIGH,
            QualityPreset::Balanced => QUALITY_BALANCED,
            QualityPreset::HighCompression => QUALITY_HIGH_COMPRESSION,
            QualityPreset::MaxCompression => QUALITY_MAX_COMPRESSION,
        }
    }
}

/// How output files are named. Both schemes are kept because callers
/// downstream may rely on either pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingScheme {
    /// `{i}.{ext}`, no prefix and no padding
    Sequential,
    /// `{prefix}_{i:0padding}.{ext}`
    Prefixed,
}

#[derive(Debug, Clone)]
pub struct ConversionOptions {
    pub quality: u8,
    pub target_format: TargetFormat,
    pub filename_prefix: String,
    pub sequence_padding: usize,
    pub naming: NamingScheme,
    pub output_dir: Option<PathBuf>,
}

impl ConversionOptions {
    /// General mode: any target format, prefixed zero-padded names.
    pub fn new(
        quality: Option<u8>,
        target_format: TargetFormat,
        prefix: Option<String>,
    ) -> Result<Self> {
        let quality = validate_quality(quality.unwrap_or(DEFAULT_QUALITY))?;
        let filename_prefix = match prefix {
            Some(p) if p.trim().is_empty() => DEFAULT_PREFIX.to_string(),
            Some(p) => validate_prefix(p.trim().to_string())?,
            None => DEFAULT_PREFIX.to_string(),
        };

        Ok(Self {
            quality,
            target_format,
            filename_prefix,
            sequence_padding: DEFAULT_SEQUENCE_PADDING,
            naming: NamingScheme::Prefixed,
            output_dir: None,
        })
    }

    /// Default mode: JPEG output named `1.jpg`, `2.jpg`, ...
    pub fn sequential_jpeg(quality: Option<u8>) -> Result<Self> {
        let mut options = Self::new(quality, TargetFormat::Jpeg, None)?;
        options.naming = NamingScheme::Sequential;
        Ok(options)
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    pub fn with_sequence_padding(mut self, padding: usize) -> Self {
        self.sequence_padding = padding;
        self
    }

    /// File name for the file at 1-based discovery position `sequence`.
    pub fn output_file_name(&self, sequence: usize) -> String {
        let ext = self.target_format.extension();
        match self.naming {
            NamingScheme::Sequential => format!("{}.{}", sequence, ext),
            NamingScheme::Prefixed => format!(
                "{}_{:0width$}.{}",
                self.filename_prefix,
                sequence,
                ext,
                width = self.sequence_padding
            ),
        }
    }

    /// Explicit output directory, or `compressed_<ext>` inside the input directory.
    pub fn resolve_output_dir(&self, input_dir: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => input_dir.join(self.target_format.default_output_dir_name()),
        }
    }
}

fn validate_quality(quality: u8) -> Result<u8> {
    if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
        return Err(ConvertError::InvalidQuality(quality));
    }
    Ok(quality)
}

fn validate_prefix(prefix: String) -> Result<String> {
    if prefix.contains(['/', '\\']) || prefix == "." || prefix == ".." {
        return Err(ConvertError::InvalidPrefix(prefix));
    }
    Ok(prefix)
}

//! Batch orchestration: discover, decode, normalize, encode, record.
//!
//! Files are processed one at a time in discovery order. The file at
//! position `i` (1-based) is always written under sequence number `i`; a file
//! that fails keeps its number and nothing is written for it, so names stay
//! tied to discovery position.

use crate::codec::{Codec, EncodeSettings, NativeCodec};
use crate::discovery::{discover_images, ImageFile};
use crate::encoder::{encode_to_file, ensure_output_dir};
use crate::error::{ConvertError, ErrorKind, Result};
use crate::normalize::normalize;
use crate::options::ConversionOptions;
use crate::stats::{compression_ratio, BatchSummary};
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span, warn};

/// Outcome for one discovered file.
#[derive(Debug)]
pub struct ConversionResult {
    pub source: ImageFile,
    /// 1-based discovery position
    pub sequence: usize,
    pub output_path: Option<PathBuf>,
    pub output_size: Option<u64>,
    pub error: Option<ConvertError>,
}

impl ConversionResult {
    fn success(source: ImageFile, sequence: usize, output_path: PathBuf, output_size: u64) -> Self {
        Self {
            source,
            sequence,
            output_path: Some(output_path),
            output_size: Some(output_size),
            error: None,
        }
    }

    fn failure(source: ImageFile, sequence: usize, error: ConvertError) -> Self {
        Self {
            source,
            sequence,
            output_path: None,
            output_size: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(ConvertError::kind)
    }

    pub fn output_file_name(&self) -> Option<String> {
        self.output_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
    }

    /// `None` for failures and for empty source files.
    pub fn ratio(&self) -> Option<f64> {
        self.output_size
            .and_then(|out| compression_ratio(self.source.byte_size, out))
    }
}

#[derive(Debug)]
pub struct BatchReport {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// One entry per discovered file, in discovery order
    pub results: Vec<ConversionResult>,
    pub summary: BatchSummary,
}

impl BatchReport {
    pub fn failures(&self) -> impl Iterator<Item = &ConversionResult> {
        self.results.iter().filter(|r| !r.is_success())
    }
}

#[derive(Debug)]
pub enum BatchOutcome {
    /// The directory holds no matching files; nothing was written.
    NoImagesFound,
    Completed(BatchReport),
}

impl BatchOutcome {
    pub fn report(&self) -> Option<&BatchReport> {
        match self {
            BatchOutcome::Completed(report) => Some(report),
            BatchOutcome::NoImagesFound => None,
        }
    }
}

pub struct ConversionPipeline<C: Codec = NativeCodec> {
    codec: C,
    options: ConversionOptions,
}

impl ConversionPipeline<NativeCodec> {
    pub fn new(options: ConversionOptions) -> Self {
        Self::with_codec(options, NativeCodec)
    }
}

impl<C: Codec> ConversionPipeline<C> {
    pub fn with_codec(options: ConversionOptions, codec: C) -> Self {
        Self { codec, options }
    }

    pub fn run(&self, input_dir: &Path) -> Result<BatchOutcome> {
        self.run_with_observer(input_dir, |_| {})
    }

    /// Converts every image in `input_dir`, calling `observer` with each
    /// result as soon as it is recorded.
    ///
    /// # Returns
    /// * `Ok(BatchOutcome::NoImagesFound)` - nothing to do, no output directory created
    /// * `Ok(BatchOutcome::Completed(report))` - every file visited once
    /// * `Err(ConvertError::DirectoryNotFound)` - nothing was touched
    /// * `Err(ConvertError::DirectoryCreationFailed)` - output directory unusable
    pub fn run_with_observer<F>(&self, input_dir: &Path, mut observer: F) -> Result<BatchOutcome>
    where
        F: FnMut(&ConversionResult),
    {
        let files = discover_images(input_dir)?;
        if files.is_empty() {
            info!(
                dir = %input_dir.display(),
                kind = %ErrorKind::NoImagesFound,
                "no image files found"
            );
            return Ok(BatchOutcome::NoImagesFound);
        }

        let output_dir = self.options.resolve_output_dir(input_dir);
        ensure_output_dir(&output_dir)?;
        info!(
            count = files.len(),
            format = %self.options.target_format,
            output = %output_dir.display(),
            "starting batch conversion"
        );

        let mut results = Vec::with_capacity(files.len());
        for (index, file) in files.into_iter().enumerate() {
            let result = self.convert_file(file, index + 1, &output_dir);
            observer(&result);
            results.push(result);
        }

        let summary = BatchSummary::from_results(&results);
        info!(
            converted = summary.file_count,
            failed = summary.failure_count,
            "batch conversion finished"
        );

        Ok(BatchOutcome::Completed(BatchReport {
            input_dir: input_dir.to_path_buf(),
            output_dir,
            results,
            summary,
        }))
    }

    fn convert_file(&self, source: ImageFile, sequence: usize, output_dir: &Path) -> ConversionResult {
        let _span = info_span!("convert", file = %source.file_name(), sequence).entered();

        match self.process(&source, sequence, output_dir) {
            Ok((output_path, output_size)) => {
                debug!(output = %output_path.display(), output_size, "converted");
                ConversionResult::success(source, sequence, output_path, output_size)
            }
            Err(error) => {
                warn!(path = %source.path.display(), "{}", error);
                ConversionResult::failure(source, sequence, error)
            }
        }
    }

    /// Decoded pixels live only for the duration of this call.
    fn process(&self, source: &ImageFile, sequence: usize, output_dir: &Path) -> Result<(PathBuf, u64)> {
        let decoded = self
            .codec
            .decode(&source.path)
            .map_err(|e| ConvertError::Decode {
                path: source.path.clone(),
                source: e,
            })?;
        debug!(mode = %decoded.pixel_mode(), "decoded");

        let normalized = normalize(decoded, self.options.target_format);

        let output_path = output_dir.join(self.options.output_file_name(sequence));
        let settings = EncodeSettings {
            format: self.options.target_format,
            quality: self.options.quality,
        };
        let output_size = encode_to_file(&self.codec, &normalized, &settings, &output_path)?;

        Ok((output_path, output_size))
    }
}

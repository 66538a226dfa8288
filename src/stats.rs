use crate::pipeline::ConversionResult;

/// Percentage size reduction from `original_size` to `compressed_size`.
///
/// Positive means the output is smaller, negative means it grew.
/// Returns `None` when `original_size` is zero.
pub fn compression_ratio(original_size: u64, compressed_size: u64) -> Option<f64> {
    if original_size == 0 {
        return None;
    }
    Some(((original_size as f64 - compressed_size as f64) / original_size as f64) * 100.0)
}

/// Running byte totals over successfully converted files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsAccumulator {
    total_input_bytes: u64,
    total_output_bytes: u64,
    files: usize,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, input_size: u64, output_size: u64) {
        self.total_input_bytes += input_size;
        self.total_output_bytes += output_size;
        self.files += 1;
    }

    pub fn total_input_bytes(&self) -> u64 {
        self.total_input_bytes
    }

    pub fn total_output_bytes(&self) -> u64 {
        self.total_output_bytes
    }

    pub fn files(&self) -> usize {
        self.files
    }

    /// Folder-level ratio over the totals.
    pub fn ratio(&self) -> Option<f64> {
        compression_ratio(self.total_input_bytes, self.total_output_bytes)
    }
}

/// Aggregate figures for one run, derived from its results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total_input_bytes: u64,
    pub total_output_bytes: u64,
    /// Successfully converted files
    pub file_count: usize,
    pub failure_count: usize,
}

impl BatchSummary {
    /// Byte totals include successful files only; failures are counted apart.
    pub fn from_results(results: &[ConversionResult]) -> Self {
        let mut stats = StatsAccumulator::new();
        let mut failure_count = 0;

        for result in results {
            match result.output_size {
                Some(output_size) if result.is_success() => {
                    stats.record(result.source.byte_size, output_size)
                }
                _ => failure_count += 1,
            }
        }

        Self {
            total_input_bytes: stats.total_input_bytes(),
            total_output_bytes: stats.total_output_bytes(),
            file_count: stats.files(),
            failure_count,
        }
    }

    pub fn ratio(&self) -> Option<f64> {
        compression_ratio(self.total_input_bytes, self.total_output_bytes)
    }

    pub fn total_files(&self) -> usize {
        self.file_count + self.failure_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::ImageFile;
    use crate::error::{CodecError, ConvertError};
    use std::path::PathBuf;

    fn source(name: &str, byte_size: u64) -> ImageFile {
        ImageFile {
            path: PathBuf::from(name),
            detected_format: "PNG".to_string(),
            byte_size,
        }
    }

    #[test]
    fn test_compression_ratio() {
        assert_eq!(compression_ratio(1024, 512), Some(50.0));
        assert_eq!(compression_ratio(1024, 0), Some(100.0));
        assert_eq!(compression_ratio(1000, 1200), Some(-20.0));
        assert_eq!(compression_ratio(1000, 1000), Some(0.0));
        assert_eq!(compression_ratio(0, 500), None);
        assert_eq!(compression_ratio(0, 0), None);
    }

    #[test]
    fn test_accumulator_totals() {
        let mut stats = StatsAccumulator::new();
        assert_eq!(stats.ratio(), None);

        stats.record(1000, 250);
        stats.record(3000, 750);

        assert_eq!(stats.total_input_bytes(), 4000);
        assert_eq!(stats.total_output_bytes(), 1000);
        assert_eq!(stats.files(), 2);
        assert_eq!(stats.ratio(), Some(75.0));
    }

    #[test]
    fn test_summary_excludes_failures_from_totals() {
        let results = vec![
            ConversionResult {
                source: source("a.png", 2048),
                sequence: 1,
                output_path: Some(PathBuf::from("out/1.jpg")),
                output_size: Some(1024),
                error: None,
            },
            ConversionResult {
                source: source("bad.png", 10),
                sequence: 2,
                output_path: None,
                output_size: None,
                error: Some(ConvertError::Decode {
                    path: PathBuf::from("bad.png"),
                    source: CodecError::MalformedPixels("truncated".to_string()),
                }),
            },
        ];

        let summary = BatchSummary::from_results(&results);
        assert_eq!(summary.total_input_bytes, 2048);
        assert_eq!(summary.total_output_bytes, 1024);
        assert_eq!(summary.file_count, 1);
        assert_eq!(summary.failure_count, 1);
        assert_eq!(summary.total_files(), 2);
        assert_eq!(summary.ratio(), Some(50.0));
    }

    #[test]
    fn test_empty_summary_has_no_ratio() {
        let summary = BatchSummary::from_results(&[]);
        assert_eq!(summary, BatchSummary::default());
        assert_eq!(summary.ratio(), None);
    }
}

//! Human-readable report lines for a batch run.
//!
//! Sizes and ratios are always printed with one decimal place.

use crate::pipeline::{BatchReport, ConversionResult};
use crate::stats::BatchSummary;

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

pub fn format_kb(bytes: u64) -> String {
    format!("{:.1}KB", bytes as f64 / KIB)
}

pub fn format_mb(bytes: u64) -> String {
    format!("{:.1}MB", bytes as f64 / MIB)
}

pub fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.1}%", r),
        None => "n/a".to_string(),
    }
}

/// One line per processed file.
pub fn file_line(result: &ConversionResult) -> String {
    let source = &result.source;
    match (&result.error, result.output_file_name(), result.output_size) {
        (None, Some(new_name), Some(output_size)) => format!(
            "✅ {} ({}) -> {}  {} -> {} ({})",
            source.file_name(),
            source.detected_format,
            new_name,
            format_kb(source.byte_size),
            format_kb(output_size),
            format_ratio(result.ratio()),
        ),
        (Some(error), _, _) => format!(
            "❌ {} ({}) #{} failed [{}]: {}",
            source.file_name(),
            source.detected_format,
            result.sequence,
            error.kind(),
            error
        ),
        _ => format!("⚠️  {} ({}) produced no output", source.file_name(), source.detected_format),
    }
}

pub fn summary_lines(summary: &BatchSummary) -> Vec<String> {
    let mut lines = vec![
        "📊 Batch Summary:".to_string(),
        format!(
            "  📁 Converted files: {}/{}",
            summary.file_count,
            summary.total_files()
        ),
        format!("  📊 Total original size: {}", format_mb(summary.total_input_bytes)),
        format!("  📈 Total compressed size: {}", format_mb(summary.total_output_bytes)),
        format!("  🎯 Overall compression ratio: {}", format_ratio(summary.ratio())),
    ];
    if summary.failure_count > 0 {
        lines.push(format!("  ⚠️  Failed files: {}", summary.failure_count));
    }
    lines
}

pub fn report_lines(report: &BatchReport) -> Vec<String> {
    let mut lines = summary_lines(&report.summary);
    lines.push(format!("  📁 Output: {}", report.output_dir.display()));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::ImageFile;
    use crate::error::{CodecError, ConvertError};
    use std::path::PathBuf;

    fn result(error: Option<ConvertError>, output_size: Option<u64>) -> ConversionResult {
        ConversionResult {
            source: ImageFile {
                path: PathBuf::from("/photos/cat.png"),
                detected_format: "PNG".to_string(),
                byte_size: 2048,
            },
            sequence: 3,
            output_path: output_size.map(|_| PathBuf::from("/out/3.jpg")),
            output_size,
            error,
        }
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_kb(1536), "1.5KB");
        assert_eq!(format_kb(0), "0.0KB");
        assert_eq!(format_mb(1024 * 1024 * 3 / 2), "1.5MB");
        assert_eq!(format_ratio(Some(50.0)), "50.0%");
        assert_eq!(format_ratio(Some(-12.34)), "-12.3%");
        assert_eq!(format_ratio(None), "n/a");
    }

    #[test]
    fn test_success_line() {
        let line = file_line(&result(None, Some(512)));
        assert_eq!(line, "✅ cat.png (PNG) -> 3.jpg  2.0KB -> 0.5KB (75.0%)");
    }

    #[test]
    fn test_failure_line_names_kind_and_cause() {
        let error = ConvertError::Decode {
            path: PathBuf::from("/photos/cat.png"),
            source: CodecError::MalformedPixels("truncated".to_string()),
        };
        let line = file_line(&result(Some(error), None));
        assert!(line.starts_with("❌ cat.png (PNG) #3 failed [DecodeError]"));
        assert!(line.contains("truncated"));
    }

    #[test]
    fn test_summary_lines() {
        let summary = BatchSummary {
            total_input_bytes: 4 * 1024 * 1024,
            total_output_bytes: 1024 * 1024,
            file_count: 3,
            failure_count: 1,
        };
        let lines = summary_lines(&summary);
        assert!(lines.contains(&"  📁 Converted files: 3/4".to_string()));
        assert!(lines.contains(&"  📊 Total original size: 4.0MB".to_string()));
        assert!(lines.contains(&"  📈 Total compressed size: 1.0MB".to_string()));
        assert!(lines.contains(&"  🎯 Overall compression ratio: 75.0%".to_string()));
        assert!(lines.contains(&"  ⚠️  Failed files: 1".to_string()));
    }

    #[test]
    fn test_summary_without_failures_omits_failure_line() {
        let lines = summary_lines(&BatchSummary::default());
        assert!(lines.iter().all(|l| !l.contains("Failed files")));
        assert!(lines.contains(&"  🎯 Overall compression ratio: n/a".to_string()));
    }
}

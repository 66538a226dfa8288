use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the image codec seam.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PNG decoding error: {0}")]
    PngDecoding(#[from] png::DecodingError),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("JPEG encoding error: {0}")]
    JpegEncoding(String),

    #[error("WebP encoding error: {0}")]
    WebPEncoding(String),

    #[error("Malformed pixel data: {0}")]
    MalformedPixels(String),
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to create output directory {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("Failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    InvalidQuality(u8),

    #[error("Invalid file name prefix: {0:?}")]
    InvalidPrefix(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Coarse classification used when reporting a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DirectoryNotFound,
    /// Informational only. An empty folder is reported as
    /// `BatchOutcome::NoImagesFound`, never as a `ConvertError`, so
    /// `ConvertError::kind` does not produce it.
    NoImagesFound,
    DecodeError,
    EncodeError,
    Configuration,
    Io,
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::DirectoryNotFound(_) => ErrorKind::DirectoryNotFound,
            ConvertError::Decode { .. } => ErrorKind::DecodeError,
            ConvertError::Encode { .. } => ErrorKind::EncodeError,
            ConvertError::InvalidQuality(_)
            | ConvertError::InvalidPrefix(_)
            | ConvertError::UnsupportedFormat(_) => ErrorKind::Configuration,
            ConvertError::DirectoryRead { .. } | ConvertError::DirectoryCreationFailed { .. } => {
                ErrorKind::Io
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::DirectoryNotFound => "DirectoryNotFound",
            ErrorKind::NoImagesFound => "NoImagesFound",
            ErrorKind::DecodeError => "DecodeError",
            ErrorKind::EncodeError => "EncodeError",
            ErrorKind::Configuration => "Configuration",
            ErrorKind::Io => "Io",
        };
        write!(f, "{}", name)
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

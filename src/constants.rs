pub const DEFAULT_QUALITY: u8 = 85;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

pub const QUALITY_HIGH: u8 = 90;
pub const QUALITY_BALANCED: u8 = 85;
pub const QUALITY_HIGH_COMPRESSION: u8 = 75;
pub const QUALITY_MAX_COMPRESSION: u8 = 50;

pub const DEFAULT_PREFIX: &str = "image";
pub const DEFAULT_SEQUENCE_PADDING: usize = 4;

/// Extensions picked up by folder discovery, compared case-insensitively.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] =
    &["jpg", "jpeg", "png", "bmp", "tiff", "webp", "gif"];

/// Highest oxipng preset; PNG output always uses maximal effort.
pub const OXIPNG_MAX_PRESET: u8 = 6;
/// libwebp `method`: 0 is fastest, 6 is slowest with the best compression.
pub const WEBP_MAX_METHOD: i32 = 6;

/// Canvas color used when flattening alpha for JPEG output.
pub const FLATTEN_BACKGROUND: [u8; 3] = [255, 255, 255];

pub const OUTPUT_DIR_PREFIX: &str = "compressed_";

pub const PROGRESS_SPINNER_TEMPLATE: &str = "{spinner:.green} {pos} files processed {msg}";

pub mod cli;
pub mod codec;
pub mod constants;
pub mod discovery;
pub mod encoder;
pub mod error;
pub mod formats;
pub mod logger;
pub mod normalize;
pub mod options;
pub mod pipeline;
pub mod report;
pub mod stats;

pub use codec::{Codec, DecodedImage, EncodeSettings, NativeCodec, PaletteImage, PixelMode};
pub use discovery::{discover_images, is_image_file, ImageFile};
pub use encoder::{encode_to_file, ensure_output_dir};
pub use error::{CodecError, ConvertError, ErrorKind, Result};
pub use formats::TargetFormat;
pub use normalize::normalize;
pub use options::{ConversionOptions, NamingScheme, QualityPreset};
pub use pipeline::{BatchOutcome, BatchReport, ConversionPipeline, ConversionResult};
pub use stats::{compression_ratio, BatchSummary, StatsAccumulator};

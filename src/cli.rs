use crate::error::Result;
use crate::formats::TargetFormat;
use crate::options::{ConversionOptions, QualityPreset};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(
    name = "img-batch",
    about = "Batch-convert a folder of images to JPEG, PNG or WebP with sequential names",
    long_about = "img-batch converts every image in a folder (jpg, jpeg, png, bmp, tiff, webp, gif) \
                  to a single target format, flattens or keeps transparency as the format allows, \
                  renames the results into a numbered sequence and reports the size savings.",
    version,
    after_help = "EXAMPLES:\n  \
    img-batch jpg ./photos -p high-compression\n  \
    img-batch convert ./photos -f webp -q 80 --prefix trip -o ./out"
)]
pub struct Args {
    #[arg(short = 'Q', long, global = true, help = "Only print errors")]
    pub quiet: bool,

    #[arg(short = 'v', long, global = true, help = "Print debug diagnostics")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct QualityArgs {
    #[arg(
        short = 'q',
        long,
        conflicts_with = "preset",
        help = "Compression quality (1-100, default: 85)",
        long_help = "Quality used by the JPEG and WebP encoders. Ignored for PNG, which is lossless."
    )]
    pub quality: Option<u8>,

    #[arg(
        short = 'p',
        long,
        value_enum,
        help = "Quality preset",
        long_help = "high = 90, balanced = 85, high-compression = 75, max-compression = 50"
    )]
    pub preset: Option<QualityPreset>,
}

impl QualityArgs {
    pub fn resolve(&self) -> Option<u8> {
        self.quality.or_else(|| self.preset.map(|p| p.quality()))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Convert a folder to JPEG named 1.jpg, 2.jpg, ...",
        long_about = "Default mode. Every image is converted to progressive JPEG; transparent \
                      areas are flattened onto white. Output names are bare sequence numbers."
    )]
    Jpg {
        #[arg(help = "Input directory")]
        input: PathBuf,

        #[arg(
            short = 'o',
            long,
            help = "Output directory (default: <INPUT>/compressed_jpg)"
        )]
        output: Option<PathBuf>,

        #[command(flatten)]
        quality: QualityArgs,
    },

    #[command(
        about = "Convert a folder to a chosen format named <prefix>_0001.<ext>, ...",
        long_about = "General mode. Choose JPEG, PNG or WebP output; names use a prefix and a \
                      zero-padded sequence number."
    )]
    Convert {
        #[arg(help = "Input directory")]
        input: PathBuf,

        #[arg(
            short = 'o',
            long,
            help = "Output directory (default: <INPUT>/compressed_<ext>)"
        )]
        output: Option<PathBuf>,

        #[command(flatten)]
        quality: QualityArgs,

        #[arg(
            short = 'f',
            long,
            default_value = "jpeg",
            help = "Output format (jpeg, png, webp)"
        )]
        format: String,

        #[arg(long, default_value = "image", help = "File name prefix")]
        prefix: String,

        #[arg(long, default_value_t = 4, help = "Digits in the sequence number")]
        padding: usize,
    },
}

impl Commands {
    pub fn input(&self) -> &PathBuf {
        match self {
            Commands::Jpg { input, .. } | Commands::Convert { input, .. } => input,
        }
    }

    /// Validated options for the selected mode.
    pub fn to_options(&self) -> Result<ConversionOptions> {
        let (options, output) = match self {
            Commands::Jpg {
                output, quality, ..
            } => (ConversionOptions::sequential_jpeg(quality.resolve())?, output),
            Commands::Convert {
                output,
                quality,
                format,
                prefix,
                padding,
                ..
            } => {
                let target = TargetFormat::from_str(format)?;
                let options = ConversionOptions::new(quality.resolve(), target, Some(prefix.clone()))?
                    .with_sequence_padding(*padding);
                (options, output)
            }
        };

        Ok(match output {
            Some(dir) => options.with_output_dir(dir.clone()),
            None => options,
        })
    }
}

//! Decoded image model and the codec seam used by the pipeline.
//!
//! The pipeline only talks to the [`Codec`] trait. [`NativeCodec`] is the
//! production implementation:
//! - decoding goes through the `image` crate, except indexed PNGs which are
//!   read with the `png` crate so palette and transparency survive untouched
//! - JPEG is written by mozjpeg (progressive scans, optimized Huffman tables)
//! - PNG is written by the `image` encoder and then optimized by oxipng
//! - WebP is written by libwebp in lossy mode at maximum effort

use crate::constants::{OXIPNG_MAX_PRESET, WEBP_MAX_METHOD};
use crate::error::CodecError;
use crate::formats::TargetFormat;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{
    DynamicImage, ExtendedColorType, GrayAlphaImage, ImageEncoder, ImageFormat, ImageReader,
    RgbImage, RgbaImage,
};
use mozjpeg::{ColorSpace, Compress};
use oxipng::{Options as OxipngOptions, StripChunks};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelMode {
    Rgb,
    Rgba,
    LumaAlpha,
    Palette,
    Other,
}

impl fmt::Display for PixelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelMode::Rgb => "RGB",
            PixelMode::Rgba => "RGBA",
            PixelMode::LumaAlpha => "LA",
            PixelMode::Palette => "P",
            PixelMode::Other => "OTHER",
        };
        write!(f, "{}", name)
    }
}

/// Palette-indexed pixels, one index byte per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteImage {
    pub width: u32,
    pub height: u32,
    pub indices: Vec<u8>,
    pub palette: Vec<[u8; 3]>,
    /// Per-index alpha; indices past the end of the table are opaque.
    pub transparency: Option<Vec<u8>>,
}

impl PaletteImage {
    pub fn color(&self, index: u8) -> [u8; 3] {
        self.palette
            .get(index as usize)
            .copied()
            .unwrap_or([0, 0, 0])
    }

    pub fn alpha(&self, index: u8) -> u8 {
        self.transparency
            .as_ref()
            .and_then(|table| table.get(index as usize).copied())
            .unwrap_or(u8::MAX)
    }

    /// Expands indices to RGBA, carrying the transparency table into alpha.
    pub fn to_rgba(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let index = self.index_at(x, y);
            let [r, g, b] = self.color(index);
            image::Rgba([r, g, b, self.alpha(index)])
        })
    }

    pub fn index_at(&self, x: u32, y: u32) -> u8 {
        self.indices
            .get((y as usize) * (self.width as usize) + x as usize)
            .copied()
            .unwrap_or(0)
    }
}

/// One decoded image, owned by the pipeline for the duration of one file.
#[derive(Debug, Clone)]
pub enum DecodedImage {
    Rgb(RgbImage),
    Rgba(RgbaImage),
    LumaAlpha(GrayAlphaImage),
    Palette(PaletteImage),
    /// Anything else (grayscale, 16-bit, float...), kept as decoded
    Other(DynamicImage),
}

impl DecodedImage {
    /// Classifies an `image` crate buffer. High bit-depth buffers that carry
    /// alpha are reduced to 8 bits so their alpha is handled like any other.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        match img {
            DynamicImage::ImageRgb8(buf) => DecodedImage::Rgb(buf),
            DynamicImage::ImageRgba8(buf) => DecodedImage::Rgba(buf),
            DynamicImage::ImageLumaA8(buf) => DecodedImage::LumaAlpha(buf),
            DynamicImage::ImageLumaA16(_) => DecodedImage::LumaAlpha(img.to_luma_alpha8()),
            DynamicImage::ImageRgba16(_) | DynamicImage::ImageRgba32F(_) => {
                DecodedImage::Rgba(img.to_rgba8())
            }
            other => DecodedImage::Other(other),
        }
    }

    pub fn pixel_mode(&self) -> PixelMode {
        match self {
            DecodedImage::Rgb(_) => PixelMode::Rgb,
            DecodedImage::Rgba(_) => PixelMode::Rgba,
            DecodedImage::LumaAlpha(_) => PixelMode::LumaAlpha,
            DecodedImage::Palette(_) => PixelMode::Palette,
            DecodedImage::Other(_) => PixelMode::Other,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            DecodedImage::Rgb(buf) => buf.dimensions(),
            DecodedImage::Rgba(buf) => buf.dimensions(),
            DecodedImage::LumaAlpha(buf) => buf.dimensions(),
            DecodedImage::Palette(p) => (p.width, p.height),
            DecodedImage::Other(img) => (img.width(), img.height()),
        }
    }

    pub fn has_alpha(&self) -> bool {
        match self {
            DecodedImage::Rgb(_) => false,
            DecodedImage::Rgba(_) | DecodedImage::LumaAlpha(_) => true,
            DecodedImage::Palette(p) => p.transparency.is_some(),
            DecodedImage::Other(img) => img.color().has_alpha(),
        }
    }
}

/// Per-run encoder parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSettings {
    pub format: TargetFormat,
    /// Ignored for PNG
    pub quality: u8,
}

/// The seam between the pipeline and an image codec.
pub trait Codec {
    fn decode(&self, path: &Path) -> Result<DecodedImage, CodecError>;

    fn encode(&self, image: &DecodedImage, settings: &EncodeSettings)
        -> Result<Vec<u8>, CodecError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCodec;

impl Codec for NativeCodec {
    fn decode(&self, path: &Path) -> Result<DecodedImage, CodecError> {
        let reader = ImageReader::open(path)?.with_guessed_format()?;

        if reader.format() == Some(ImageFormat::Png) {
            if let Some(palette) = decode_indexed_png(path)? {
                trace!(path = %path.display(), "decoded indexed PNG");
                return Ok(DecodedImage::Palette(palette));
            }
        }

        Ok(DecodedImage::from_dynamic(reader.decode()?))
    }

    fn encode(
        &self,
        image: &DecodedImage,
        settings: &EncodeSettings,
    ) -> Result<Vec<u8>, CodecError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(CodecError::MalformedPixels(format!(
                "empty image {}x{}",
                width, height
            )));
        }

        match settings.format {
            TargetFormat::Jpeg => encode_jpeg(image, settings.quality),
            TargetFormat::Png => encode_png(image),
            TargetFormat::WebP => encode_webp(image, settings.quality),
        }
    }
}

/// Reads an indexed PNG without expanding the palette.
///
/// Returns `Ok(None)` for any other PNG color type.
fn decode_indexed_png(path: &Path) -> Result<Option<PaletteImage>, CodecError> {
    let mut decoder = png::Decoder::new(BufReader::new(File::open(path)?));
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info()?;

    let info = reader.info();
    if info.color_type != png::ColorType::Indexed {
        return Ok(None);
    }
    let (width, height) = (info.width, info.height);
    let bit_depth = info.bit_depth as u8;
    let palette: Vec<[u8; 3]> = info
        .palette
        .as_ref()
        .map(|p| p.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect())
        .unwrap_or_default();
    let transparency = info.trns.as_ref().map(|t| t.to_vec());

    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf)?;
    let indices = unpack_indices(&buf, width, height, frame.line_size, bit_depth);

    Ok(Some(PaletteImage {
        width,
        height,
        indices,
        palette,
        transparency,
    }))
}

/// Unpacks 1/2/4/8-bit packed rows into one index byte per pixel.
fn unpack_indices(buf: &[u8], width: u32, height: u32, line_size: usize, bit_depth: u8) -> Vec<u8> {
    let (width, height) = (width as usize, height as usize);
    let depth = bit_depth as usize;
    let mask = ((1u16 << depth) - 1) as u8;
    let mut indices = Vec::with_capacity(width * height);

    for row in buf.chunks(line_size).take(height) {
        for x in 0..width {
            let bit = x * depth;
            let byte = row.get(bit / 8).copied().unwrap_or(0);
            let shift = 8 - depth - (bit % 8);
            indices.push((byte >> shift) & mask);
        }
    }
    indices
}

fn expect_mode(image: &DecodedImage, format: TargetFormat) -> CodecError {
    CodecError::MalformedPixels(format!(
        "{} encoder cannot take {} pixels",
        format,
        image.pixel_mode()
    ))
}

fn encode_jpeg(image: &DecodedImage, quality: u8) -> Result<Vec<u8>, CodecError> {
    let rgb = match image {
        DecodedImage::Rgb(buf) => buf,
        other => return Err(expect_mode(other, TargetFormat::Jpeg)),
    };
    let (width, height) = rgb.dimensions();

    let mut comp = Compress::new(ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(quality as f32);
    comp.set_progressive_mode();
    comp.set_optimize_coding(true);

    let mut started = comp
        .start_compress(Vec::new())
        .map_err(|e| CodecError::JpegEncoding(e.to_string()))?;
    started
        .write_scanlines(rgb.as_raw())
        .map_err(|e| CodecError::JpegEncoding(e.to_string()))?;
    started
        .finish()
        .map_err(|e| CodecError::JpegEncoding(e.to_string()))
}

fn encode_png(image: &DecodedImage) -> Result<Vec<u8>, CodecError> {
    let mut raw = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut raw, CompressionType::Best, FilterType::Adaptive);

    match image {
        DecodedImage::Rgb(buf) => {
            encoder.write_image(buf.as_raw(), buf.width(), buf.height(), ExtendedColorType::Rgb8)?
        }
        DecodedImage::Rgba(buf) => {
            encoder.write_image(buf.as_raw(), buf.width(), buf.height(), ExtendedColorType::Rgba8)?
        }
        DecodedImage::LumaAlpha(buf) => {
            encoder.write_image(buf.as_raw(), buf.width(), buf.height(), ExtendedColorType::La8)?
        }
        DecodedImage::Other(img) => img.write_with_encoder(encoder)?,
        DecodedImage::Palette(_) => return Err(expect_mode(image, TargetFormat::Png)),
    }

    let mut options = OxipngOptions::from_preset(OXIPNG_MAX_PRESET);
    options.strip = StripChunks::Safe;
    oxipng::optimize_from_memory(&raw, &options)
        .map_err(|e| CodecError::PngOptimization(e.to_string()))
}

fn encode_webp(image: &DecodedImage, quality: u8) -> Result<Vec<u8>, CodecError> {
    let mut config = webp::WebPConfig::new()
        .map_err(|_| CodecError::WebPEncoding("failed to initialise encoder config".to_string()))?;
    config.lossless = 0;
    config.quality = quality as f32;
    config.method = WEBP_MAX_METHOD;

    let encoded = match image {
        DecodedImage::Rgb(buf) => {
            webp::Encoder::from_rgb(buf.as_raw(), buf.width(), buf.height())
                .encode_advanced(&config)
        }
        DecodedImage::Rgba(buf) => {
            webp::Encoder::from_rgba(buf.as_raw(), buf.width(), buf.height())
                .encode_advanced(&config)
        }
        DecodedImage::LumaAlpha(buf) => {
            let rgba = DynamicImage::ImageLumaA8(buf.clone()).to_rgba8();
            webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
                .encode_advanced(&config)
        }
        DecodedImage::Other(img) if img.color().has_alpha() => {
            let rgba = img.to_rgba8();
            webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
                .encode_advanced(&config)
        }
        DecodedImage::Other(img) => {
            let rgb = img.to_rgb8();
            webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height())
                .encode_advanced(&config)
        }
        DecodedImage::Palette(_) => return Err(expect_mode(image, TargetFormat::WebP)),
    };

    encoded
        .map(|memory| memory.to_vec())
        .map_err(|e| CodecError::WebPEncoding(format!("{:?}", e)))
}

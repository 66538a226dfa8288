use crate::codec::{DecodedImage, PaletteImage};
use crate::constants::FLATTEN_BACKGROUND;
use crate::formats::TargetFormat;
use image::{DynamicImage, GrayAlphaImage, Rgb, RgbImage, RgbaImage};

/// Maps a decoded image to a pixel layout the target format can store.
///
/// - Formats without alpha (JPEG): RGBA, LA and palette images are composited
///   onto an opaque white canvas; any other non-RGB layout is converted
///   directly.
/// - Formats with alpha (PNG, WebP): palette images are expanded to RGBA so
///   their transparency table survives. Float buffers become 16-bit RGB for
///   PNG, which has no float color type. Everything else passes through.
pub fn normalize(image: DecodedImage, target: TargetFormat) -> DecodedImage {
    if !target.supports_alpha() {
        return flatten(image);
    }

    match image {
        DecodedImage::Palette(p) => DecodedImage::Rgba(p.to_rgba()),
        DecodedImage::Other(img) if target == TargetFormat::Png && is_float(&img) => {
            DecodedImage::Other(DynamicImage::ImageRgb16(img.to_rgb16()))
        }
        image => image,
    }
}

fn flatten(image: DecodedImage) -> DecodedImage {
    match image {
        DecodedImage::Rgb(buf) => DecodedImage::Rgb(buf),
        DecodedImage::Rgba(buf) => DecodedImage::Rgb(flatten_rgba(&buf)),
        DecodedImage::LumaAlpha(buf) => DecodedImage::Rgb(flatten_luma_alpha(&buf)),
        DecodedImage::Palette(p) => DecodedImage::Rgb(flatten_palette(&p)),
        DecodedImage::Other(img) => DecodedImage::Rgb(img.to_rgb8()),
    }
}

fn is_float(img: &DynamicImage) -> bool {
    matches!(img, DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_))
}

/// Alpha-weighted blend of one channel over the background.
fn blend(channel: u8, alpha: u8, background: u8) -> u8 {
    let (c, a, bg) = (channel as u32, alpha as u32, background as u32);
    ((c * a + bg * (255 - a) + 127) / 255) as u8
}

fn blend_pixel(rgb: [u8; 3], alpha: u8) -> Rgb<u8> {
    let [br, bg, bb] = FLATTEN_BACKGROUND;
    Rgb([
        blend(rgb[0], alpha, br),
        blend(rgb[1], alpha, bg),
        blend(rgb[2], alpha, bb),
    ])
}

fn flatten_rgba(buf: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(buf.width(), buf.height(), |x, y| {
        let [r, g, b, a] = buf.get_pixel(x, y).0;
        blend_pixel([r, g, b], a)
    })
}

fn flatten_luma_alpha(buf: &GrayAlphaImage) -> RgbImage {
    RgbImage::from_fn(buf.width(), buf.height(), |x, y| {
        let [l, a] = buf.get_pixel(x, y).0;
        blend_pixel([l, l, l], a)
    })
}

fn flatten_palette(p: &PaletteImage) -> RgbImage {
    RgbImage::from_fn(p.width, p.height, |x, y| {
        let index = p.index_at(x, y);
        blend_pixel(p.color(index), p.alpha(index))
    })
}

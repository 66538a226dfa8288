#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs::{self, File};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

/// RGBA PNG with a gradient and a transparent left half.
pub fn write_rgba_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_fn(width, height, |x, y| {
        let alpha = if x < width / 2 { 0 } else { 255 };
        Rgba([(x % 256) as u8, (y % 256) as u8, 90, alpha])
    })
    .save(&path)
    .unwrap();
    path
}

pub fn write_rgb_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 200]))
        .save(&path)
        .unwrap();
    path
}

/// A real PNG cut off halfway through its data.
pub fn write_truncated_png(dir: &Path, name: &str) -> PathBuf {
    let image = RgbaImage::from_fn(64, 64, |x, y| Rgba([x as u8, y as u8, 90, 255]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();

    let path = dir.join(name);
    fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
    path
}

/// 2x2 indexed PNG; index 0 is fully transparent red, index 1 is half
/// transparent blue.
pub fn write_indexed_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut encoder = png::Encoder::new(File::create(&path).unwrap(), 2, 2);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_palette(vec![255, 0, 0, 0, 0, 255]);
    encoder.set_trns(vec![0, 128]);
    let mut writer = encoder.write_header().unwrap();
    writer.write_image_data(&[0, 1, 1, 0]).unwrap();
    writer.finish().unwrap();
    path
}

pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

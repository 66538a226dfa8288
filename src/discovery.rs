use crate::constants::SUPPORTED_IMAGE_EXTENSIONS;
use crate::error::{ConvertError, Result};
use crate::formats::source_format_name;
use image::{ImageFormat, ImageReader};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// A candidate input file as seen at discovery time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub path: PathBuf,
    /// Upper-case container name, e.g. `PNG` or `JPEG`
    pub detected_format: String,
    pub byte_size: u64,
}

impl ImageFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext_lower = ext.to_lowercase();
            SUPPORTED_IMAGE_EXTENSIONS.contains(&ext_lower.as_str())
        })
        .unwrap_or(false)
}

/// Lists the image files directly inside `dir`, sorted by file name.
///
/// # Returns
/// * `Ok(files)` - possibly empty; an empty folder is not an error
/// * `Err(ConvertError::DirectoryNotFound)` - `dir` is missing or not a directory
pub fn discover_images(dir: &Path) -> Result<Vec<ImageFile>> {
    if !dir.is_dir() {
        return Err(ConvertError::DirectoryNotFound(dir.to_path_buf()));
    }

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()));

    let mut image_files: Vec<ImageFile> = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| ConvertError::DirectoryRead {
            path: dir.to_path_buf(),
            source,
        })?;

        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if !entry.file_type().is_file() || !is_image_file(entry.path()) {
            trace!(path = %entry.path().display(), "skipping non-image entry");
            continue;
        }

        let byte_size = entry
            .metadata()
            .map_err(|source| ConvertError::DirectoryRead {
                path: dir.to_path_buf(),
                source,
            })?
            .len();

        image_files.push(ImageFile {
            detected_format: detect_format(entry.path()),
            path: entry.into_path(),
            byte_size,
        });
    }

    debug!(dir = %dir.display(), count = image_files.len(), "discovered image files");
    Ok(image_files)
}

/// Sniffs the container from magic bytes, falling back to the extension.
fn detect_format(path: &Path) -> String {
    let sniffed = ImageReader::open(path)
        .ok()
        .and_then(|reader| reader.with_guessed_format().ok())
        .and_then(|reader| reader.format());

    sniffed
        .or_else(|| ImageFormat::from_path(path).ok())
        .map(source_format_name)
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str, contents: &[u8]) {
        File::create(dir.join(name))
            .unwrap()
            .write_all(contents)
            .unwrap();
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("test.jpg")));
        assert!(is_image_file(Path::new("test.jpeg")));
        assert!(is_image_file(Path::new("test.png")));
        assert!(is_image_file(Path::new("test.webp")));
        assert!(is_image_file(Path::new("test.bmp")));
        assert!(is_image_file(Path::new("test.tiff")));
        assert!(is_image_file(Path::new("test.gif")));

        assert!(!is_image_file(Path::new("test.txt")));
        assert!(!is_image_file(Path::new("test.avif")));
        assert!(!is_image_file(Path::new("test")));
    }

    #[test]
    fn test_is_image_file_case_insensitive() {
        assert!(is_image_file(Path::new("test.JPG")));
        assert!(is_image_file(Path::new("test.PnG")));
        assert!(is_image_file(Path::new("test.Tiff")));
    }

    #[test]
    fn test_discover_missing_directory() {
        let result = discover_images(Path::new("/nonexistent/folder"));
        assert!(matches!(result, Err(ConvertError::DirectoryNotFound(_))));
    }

    #[test]
    fn test_discover_file_instead_of_directory() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "photo.jpg", b"data");

        let result = discover_images(&temp_dir.path().join("photo.jpg"));
        assert!(matches!(result, Err(ConvertError::DirectoryNotFound(_))));
    }

    #[test]
    fn test_discover_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let files = discover_images(temp_dir.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_discover_sorted_and_filtered() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "c.gif", b"c");
        touch(temp_dir.path(), "B.JPG", b"bb");
        touch(temp_dir.path(), "a.png", b"aaa");
        touch(temp_dir.path(), "notes.txt", b"text");
        touch(temp_dir.path(), ".hidden.png", b"hidden");

        let files = discover_images(temp_dir.path()).unwrap();
        let names: Vec<String> = files.iter().map(|f| f.file_name()).collect();

        // Byte ordering puts upper case before lower case.
        assert_eq!(names, vec!["B.JPG", "a.png", "c.gif"]);
        assert_eq!(files[1].byte_size, 3);
    }

    #[test]
    fn test_discover_is_not_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("nested.png");
        fs::create_dir(&subdir).unwrap();
        touch(&subdir, "inner.png", b"inner");
        touch(temp_dir.path(), "top.png", b"top");

        let files = discover_images(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name(), "top.png");
    }

    #[test]
    fn test_detected_format_falls_back_to_extension() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "fake.gif", b"not really a gif");

        let files = discover_images(temp_dir.path()).unwrap();
        assert_eq!(files[0].detected_format, "GIF");
    }

    #[test]
    fn test_detected_format_prefers_magic_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mislabeled.jpg");
        image::RgbImage::new(2, 2)
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        let files = discover_images(temp_dir.path()).unwrap();
        assert_eq!(files[0].detected_format, "PNG");
    }
}

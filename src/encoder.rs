use crate::codec::{Codec, DecodedImage, EncodeSettings};
use crate::error::{CodecError, ConvertError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Creates the output directory; succeeds if it already exists.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| ConvertError::DirectoryCreationFailed {
        path: dir.to_path_buf(),
        source,
    })
}

/// Encodes a normalized image and writes it to `output_path`.
///
/// # Returns
/// * `Ok(size)` - size of the written file in bytes
/// * `Err(ConvertError::Encode)` - the codec rejected the pixels or the write failed
pub fn encode_to_file<C: Codec + ?Sized>(
    codec: &C,
    image: &DecodedImage,
    settings: &EncodeSettings,
    output_path: &Path,
) -> Result<u64> {
    let wrap = |source: CodecError| ConvertError::Encode {
        path: output_path.to_path_buf(),
        source,
    };

    let bytes = codec.encode(image, settings).map_err(wrap)?;
    if let Err(e) = fs::write(output_path, &bytes) {
        // Don't leave a truncated file behind under a sequence name.
        let _ = fs::remove_file(output_path);
        return Err(wrap(e.into()));
    }
    let written = fs::metadata(output_path).map_err(|e| wrap(e.into()))?.len();

    debug!(
        path = %output_path.display(),
        format = %settings.format,
        bytes = written,
        "wrote output file"
    );
    Ok(written)
}

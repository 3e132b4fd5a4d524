//! Image loading into 8-bit RGB buffers
//!
//! Decoding is delegated to the `image` crate. The format is guessed from
//! the file content first and the extension second, so a mislabeled file
//! still loads. Everything is flattened to `RgbImage` (alpha dropped,
//! 16-bit and float formats reduced to 8 bits). Unknown or undecodable
//! formats surface as `ColorError::ImageLoadError` and are not retried.

use std::path::Path;

use image::{ImageReader, RgbImage};

use crate::error::{ColorError, Result};

/// Load an image from disk as 8-bit RGB
///
/// # Errors
///
/// Returns `ColorError::ImageLoadError` if:
/// - File cannot be opened or read
/// - Neither content nor extension identify a decodable format
/// - Decoding fails
///
/// # Example
///
/// ```rust,no_run
/// use colorfinder::image_loader::load_image;
/// use std::path::Path;
///
/// let image = load_image(Path::new("photo.jpg"))?;
/// println!("Loaded image: {}x{}", image.width(), image.height());
/// # Ok::<(), colorfinder::ColorError>(())
/// ```
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| {
            ColorError::image_load(format!("Failed to open image file: {}", path.display()), e)
        })?;

    let image = reader.decode().map_err(|e| {
        ColorError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })?;

    tracing::debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "decoded image"
    );

    Ok(image.to_rgb8())
}

/// Decode an in-memory image as 8-bit RGB, guessing its format from content
pub fn load_image_from_memory(bytes: &[u8]) -> Result<RgbImage> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| ColorError::image_load("Failed to decode in-memory image", e))?;
    Ok(image.to_rgb8())
}

//! Inspection of downloaded image assets

use std::io::Cursor;

use image::{ImageError, ImageReader};

/// Pixel dimensions `(width, height)` of an encoded image, read from its header
pub fn image_dimensions(bytes: &[u8]) -> Result<(u32, u32), ImageError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(ImageError::IoError)?
        .into_dimensions()
}

/// Natural width of an encoded image
pub fn natural_width(bytes: &[u8]) -> Result<u32, ImageError> {
    image_dimensions(bytes).map(|(width, _)| width)
}

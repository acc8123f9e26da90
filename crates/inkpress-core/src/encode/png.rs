//! PNG encoding, used whenever transparency has to survive export.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{validate_rgba, EncodeError};

/// Encode RGBA pixel data to PNG bytes, alpha included.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    validate_rgba(pixels, width, height)?;

    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
    Ok(out)
}

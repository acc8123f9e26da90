//! Encode collaborator: RGBA raster in, JPEG or PNG bytes out.
//!
//! PNG keeps the alpha channel and is required for dark-pixel extraction
//! output. JPEG has no alpha, so transparent areas are composited onto
//! black first, the same way a canvas exports to JPEG.
//!
//! # Examples
//!
//! ```ignore
//! use inkpress_core::encode::encode_raster;
//! use inkpress_core::ImageFormat;
//!
//! let png = encode_raster(&processed, ImageFormat::Png, 92).unwrap();
//! ```

mod jpeg;
mod png;

use thiserror::Error;

use crate::raster::RasterBuffer;
use crate::ImageFormat;

pub use jpeg::encode_jpeg;
pub use png::encode_png;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The codec rejected the image
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode a raster in the given format.
///
/// `quality` (1-100) only affects JPEG.
pub fn encode_raster(
    raster: &RasterBuffer,
    format: ImageFormat,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    match format {
        ImageFormat::Jpeg => encode_jpeg(raster.pixels(), raster.width(), raster.height(), quality),
        ImageFormat::Png => encode_png(raster.pixels(), raster.width(), raster.height()),
    }
}

/// Shared input validation for the RGBA encoders.
fn validate_rgba(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 4;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

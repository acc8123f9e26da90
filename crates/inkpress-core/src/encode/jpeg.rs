//! JPEG encoding for export.
//!
//! This module provides JPEG encoding using the `image` crate's JPEG encoder.
//! Input is RGBA; alpha is flattened onto black before encoding.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{validate_rgba, EncodeError};

/// Encode RGBA pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (clamped to 1-100)
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    validate_rgba(pixels, width, height)?;

    let quality = quality.clamp(1, 100);
    let rgb = flatten_onto_black(pixels);

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Drop alpha by compositing each pixel over opaque black.
fn flatten_onto_black(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let alpha = u32::from(px[3]);
        for &channel in &px[..3] {
            // Rounded channel * alpha / 255
            rgb.push(((u32::from(channel) * alpha + 127) / 255) as u8);
        }
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_jpeg_basic() {
        let pixels = vec![128u8; 100 * 100 * 4];
        let jpeg = encode_jpeg(&pixels, 100, 100, 90).unwrap();

        // SOI and EOI markers
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_quality_clamping() {
        let pixels = vec![128u8; 10 * 10 * 4];
        assert!(encode_jpeg(&pixels, 10, 10, 0).is_ok());
        assert!(encode_jpeg(&pixels, 10, 10, 255).is_ok());
    }

    #[test]
    fn test_encode_jpeg_invalid_pixel_data() {
        let pixels = vec![128u8; 10 * 10 * 3];
        let result = encode_jpeg(&pixels, 10, 10, 90);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_encode_jpeg_zero_height() {
        let result = encode_jpeg(&[], 100, 0, 90);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_flatten_onto_black() {
        let rgba = [200, 100, 50, 255, 200, 100, 50, 0, 255, 255, 255, 128];
        assert_eq!(
            flatten_onto_black(&rgba),
            vec![200, 100, 50, 0, 0, 0, 128, 128, 128]
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

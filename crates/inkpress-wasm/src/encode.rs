//! Image encoding WASM bindings.
//!
//! # Functions
//!
//! - [`encode_jpeg`] - Encode RGBA pixel data to JPEG bytes
//! - [`encode_png`] - Encode RGBA pixel data to PNG bytes
//! - [`encode_image`] - Encode a RasterBuffer in a named format
//!
//! # Example
//!
//! ```typescript
//! import { encode_png, encode_image } from '@inkpress/wasm';
//!
//! const pngBytes = encode_png(imageData.data, imageData.width, imageData.height);
//! const jpegBytes = encode_image(raster, 'jpeg', 92);
//! ```

use crate::types::{to_js_error, JsRasterBuffer};
use inkpress_core::encode;
use inkpress_core::ImageFormat;
use wasm_bindgen::prelude::*;

/// Encode RGBA pixel data to JPEG bytes.
///
/// JPEG has no alpha channel, so transparent pixels come out black. Use
/// [`encode_png`] for extraction output.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100)
///
/// # Errors
///
/// Returns an error if the pixel data length doesn't match
/// width * height * 4, or width or height is zero.
#[wasm_bindgen]
pub fn encode_jpeg(pixels: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(pixels, width, height, quality).map_err(to_js_error)
}

/// Encode RGBA pixel data to PNG bytes, keeping transparency.
#[wasm_bindgen]
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
    encode::encode_png(pixels, width, height).map_err(to_js_error)
}

/// Encode a raster as `"png"` or `"jpeg"`.
///
/// `quality` is only used for JPEG.
#[wasm_bindgen]
pub fn encode_image(image: &JsRasterBuffer, format: &str, quality: u8) -> Result<Vec<u8>, JsValue> {
    let format = parse_format(format)
        .ok_or_else(|| JsValue::from_str(&format!("Unsupported format: {}", format)))?;
    encode::encode_raster(image.raster(), format, quality).map_err(to_js_error)
}

fn parse_format(name: &str) -> Option<ImageFormat> {
    match name.trim().to_ascii_lowercase().as_str() {
        "png" | "image/png" => Some(ImageFormat::Png),
        "jpg" | "jpeg" | "image/jpeg" => Some(ImageFormat::Jpeg),
        _ => None,
    }
}

//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, detect_format } from '@inkpress/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! if (detect_format(bytes) !== undefined) {
//!   const image = decode_image(bytes);
//!   console.log(`Decoded ${image.width}x${image.height}`);
//! }
//! ```

use crate::types::{to_js_error, JsRasterBuffer};
use inkpress_core::decode;
use wasm_bindgen::prelude::*;

/// Decode a PNG or JPEG file into an upright RGBA raster.
///
/// EXIF orientation is applied, so the result matches what an `<img>` tag
/// shows for the same file.
///
/// # Errors
///
/// Fails if the bytes are empty, not PNG/JPEG, or corrupt.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsRasterBuffer, JsValue> {
    decode::decode_image(bytes)
        .map(|decoded| JsRasterBuffer::from_raster(decoded.raster))
        .map_err(to_js_error)
}

/// MIME type of a decodable upload (`"image/png"` or `"image/jpeg"`), or
/// `undefined` when the bytes cannot be decoded.
#[wasm_bindgen]
pub fn detect_format(bytes: &[u8]) -> Option<String> {
    decode::decode_image(bytes)
        .ok()
        .map(|decoded| decoded.format.mime_type().to_string())
}

/// EXIF orientation tag (1-8) of a file, 1 when absent.
#[wasm_bindgen]
pub fn get_orientation(bytes: &[u8]) -> u8 {
    decode::get_orientation(bytes) as u8
}

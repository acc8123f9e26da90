//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core Inkpress
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use inkpress_core::RasterBuffer;
use wasm_bindgen::prelude::*;

/// An RGBA raster wrapper for JavaScript.
///
/// The pixel layout matches `ImageData.data`, so the bytes can be handed to
/// `new ImageData(new Uint8ClampedArray(buf.pixels()), buf.width)` directly.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy
/// is made to JavaScript memory as a `Uint8Array`.
///
/// The `free()` method can be called to explicitly release WASM memory, but
/// this is optional as wasm-bindgen's finalizer will handle cleanup
/// automatically.
#[wasm_bindgen(js_name = RasterBuffer)]
pub struct JsRasterBuffer {
    inner: RasterBuffer,
}

#[wasm_bindgen(js_class = RasterBuffer)]
impl JsRasterBuffer {
    /// Create a raster from dimensions and RGBA pixel data.
    ///
    /// # Errors
    ///
    /// Fails if `pixels.length != width * height * 4`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsRasterBuffer, JsValue> {
        RasterBuffer::new(width, height, pixels)
            .map(Self::from_raster)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.byte_size()
    }

    /// Returns RGBA pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels().to_vec()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsRasterBuffer {
    pub(crate) fn from_raster(inner: RasterBuffer) -> Self {
        Self { inner }
    }

    pub(crate) fn raster(&self) -> &RasterBuffer {
        &self.inner
    }
}

/// Convert any displayable error into the value thrown on the JS side.
pub(crate) fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_constructor_rejects_wrong_length() {
        assert!(JsRasterBuffer::new(2, 2, vec![0; 15]).is_err());
    }
}

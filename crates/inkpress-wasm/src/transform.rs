//! WASM bindings for crop and dark-pixel extraction.

use crate::types::{to_js_error, JsRasterBuffer};
use inkpress_core::extract::extract_dark as core_extract_dark;
use inkpress_core::transform::{apply_crop as core_crop, CropRect};
use inkpress_core::DEFAULT_BLACK_THRESHOLD;
use wasm_bindgen::prelude::*;

/// Crop an image to a pixel rectangle.
///
/// The rectangle is clamped to the image. If nothing is left after clamping
/// the image is returned unchanged.
///
/// # Example (TypeScript)
///
/// ```typescript
/// // Keep the top-left 200x100 region
/// const cropped = apply_crop(sourceImage, 0, 0, 200, 100);
/// ```
#[wasm_bindgen]
pub fn apply_crop(image: &JsRasterBuffer, x: i32, y: i32, width: i32, height: i32) -> JsRasterBuffer {
    let rect = CropRect::new(x, y, width, height);
    JsRasterBuffer::from_raster(core_crop(image.raster(), Some(&rect)))
}

/// Initial crop rectangle for an image, as `{ x, y, width, height }`.
///
/// Returns `undefined` for images too small to crop.
#[wasm_bindgen]
pub fn suggested_crop(image_width: u32, image_height: u32) -> Result<JsValue, JsValue> {
    match CropRect::suggested(image_width, image_height) {
        Some(rect) => serde_wasm_bindgen::to_value(&rect).map_err(to_js_error),
        None => Ok(JsValue::UNDEFINED),
    }
}

/// Keep dark pixels as opaque black and make everything else transparent.
///
/// A pixel is dark when `R + G + B < threshold` (450 when omitted).
#[wasm_bindgen]
pub fn extract_dark(image: &JsRasterBuffer, threshold: Option<u32>) -> JsRasterBuffer {
    let threshold = threshold.unwrap_or(DEFAULT_BLACK_THRESHOLD);
    JsRasterBuffer::from_raster(core_extract_dark(image.raster(), threshold))
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_suggested_crop() {
        let value = suggested_crop(400, 200).unwrap();
        let rect: CropRect = serde_wasm_bindgen::from_value(value).unwrap();
        assert_eq!(rect, CropRect::suggested(400, 200).unwrap());
    }

    #[wasm_bindgen_test]
    fn test_suggested_crop_empty_image() {
        assert!(suggested_crop(0, 0).unwrap().is_undefined());
    }
}

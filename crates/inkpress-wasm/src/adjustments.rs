//! Brightness/contrast WASM bindings.
//!
//! This module provides JavaScript bindings for the ToneParams type, allowing
//! slider values to be held and serialized from TypeScript.

use crate::types::{to_js_error, JsRasterBuffer};
use inkpress_core::adjustments::adjust_tone as core_adjust_tone;
use wasm_bindgen::prelude::*;

/// Brightness and contrast wrapper for JavaScript.
///
/// Both values are kept in -100..=100; setters clamp.
#[wasm_bindgen(js_name = ToneParams)]
pub struct JsToneParams {
    inner: inkpress_core::ToneParams,
}

#[wasm_bindgen(js_class = ToneParams)]
impl JsToneParams {
    /// Create tone settings, clamping both values into range
    #[wasm_bindgen(constructor)]
    pub fn new(brightness: i32, contrast: i32) -> Self {
        Self {
            inner: inkpress_core::ToneParams::new(brightness, contrast),
        }
    }

    /// Get brightness value
    #[wasm_bindgen(getter)]
    pub fn brightness(&self) -> i32 {
        self.inner.brightness
    }

    /// Set brightness value
    #[wasm_bindgen(setter)]
    pub fn set_brightness(&mut self, value: i32) {
        self.inner = inkpress_core::ToneParams::new(value, self.inner.contrast);
    }

    /// Get contrast value
    #[wasm_bindgen(getter)]
    pub fn contrast(&self) -> i32 {
        self.inner.contrast
    }

    /// Set contrast value
    #[wasm_bindgen(setter)]
    pub fn set_contrast(&mut self, value: i32) {
        self.inner = inkpress_core::ToneParams::new(self.inner.brightness, value);
    }

    /// Check if both values are zero
    pub fn is_neutral(&self) -> bool {
        self.inner.is_neutral()
    }

    /// Serialize to JSON for storage
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(to_js_error)
    }

    /// Deserialize from JSON
    pub fn from_json(value: JsValue) -> Result<JsToneParams, JsValue> {
        let inner: inkpress_core::ToneParams =
            serde_wasm_bindgen::from_value(value).map_err(to_js_error)?;
        Ok(Self {
            inner: inner.clamped(),
        })
    }
}

impl Default for JsToneParams {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl JsToneParams {
    pub(crate) fn inner(&self) -> inkpress_core::ToneParams {
        self.inner
    }
}

/// Apply brightness then contrast to an image.
///
/// Returns a new image; the source is not modified.
///
/// # Example (TypeScript)
/// ```typescript
/// const tone = new ToneParams(20, 35);
/// const adjusted = adjust_tone(sourceImage, tone);
/// ```
#[wasm_bindgen]
pub fn adjust_tone(image: &JsRasterBuffer, params: &JsToneParams) -> JsRasterBuffer {
    JsRasterBuffer::from_raster(core_adjust_tone(image.raster(), params.inner()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpress_core::RasterBuffer;

    fn image(pixels: Vec<u8>, width: u32) -> JsRasterBuffer {
        let height = (pixels.len() / 4) as u32 / width;
        JsRasterBuffer::from_raster(RasterBuffer::new(width, height, pixels).unwrap())
    }

    #[test]
    fn test_tone_params() {
        let mut tone = JsToneParams::default();
        assert!(tone.is_neutral());

        tone.set_brightness(40);
        assert_eq!(tone.brightness(), 40);
        assert!(!tone.is_neutral());

        tone.set_contrast(250);
        assert_eq!(tone.contrast(), 100);
        assert_eq!(tone.brightness(), 40);

        assert_eq!(JsToneParams::new(-300, 5).brightness(), -100);
    }

    #[test]
    fn test_adjust_tone_identity() {
        let pixels = vec![128, 64, 200, 255, 0, 255, 10, 7];
        let source = image(pixels.clone(), 2);

        let result = adjust_tone(&source, &JsToneParams::default());

        assert_eq!(result.width(), 2);
        assert_eq!(result.pixels(), pixels);
    }

    #[test]
    fn test_adjust_tone_brightness() {
        let source = image(vec![128, 128, 128, 200], 1);
        let result = adjust_tone(&source, &JsToneParams::new(50, 0));

        // 128 + 127.5 saturates; alpha is untouched
        assert_eq!(result.pixels(), vec![255, 255, 255, 200]);
    }

    #[test]
    fn test_adjust_tone_does_not_modify_original() {
        let pixels = vec![100, 100, 100, 255];
        let source = image(pixels.clone(), 1);

        let _result = adjust_tone(&source, &JsToneParams::new(-60, 80));

        assert_eq!(source.pixels(), pixels);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_json_round_trip() {
        let tone = JsToneParams::new(-15, 60);
        let restored = JsToneParams::from_json(tone.to_json().unwrap()).unwrap();
        assert_eq!(restored.brightness(), -15);
        assert_eq!(restored.contrast(), 60);
    }

    #[wasm_bindgen_test]
    fn test_from_json_clamps() {
        let value = serde_wasm_bindgen::to_value(&inkpress_core::ToneParams {
            brightness: 500,
            contrast: -500,
        })
        .unwrap();
        let tone = JsToneParams::from_json(value).unwrap();
        assert_eq!(tone.brightness(), 100);
        assert_eq!(tone.contrast(), -100);
    }
}

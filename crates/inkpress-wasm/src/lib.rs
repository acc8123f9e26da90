//! Inkpress WASM - WebAssembly bindings for Inkpress
//!
//! This crate exposes the inkpress-core pipeline to JavaScript/TypeScript
//! applications.
//!
//! # Module Structure
//!
//! - `session` - The editing workflow (upload, crop, tone, extract, export)
//! - `adjustments` - Brightness/contrast parameters and the tone stage
//! - `transform` - Crop and dark-pixel extraction stages
//! - `decode` - PNG/JPEG decoding
//! - `encode` - PNG/JPEG encoding
//! - `types` - WASM-compatible wrapper types for image data
//!
//! # Usage
//!
//! ```typescript
//! import init, { Session, set_log_level } from '@inkpress/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//! set_log_level('debug');
//!
//! const session = new Session();
//! const id = session.upload(new Uint8Array(await file.arrayBuffer()), file.name);
//! session.set_extract_black_pixels(id, true);
//! const artifact = session.export(id);
//! ```

use wasm_bindgen::prelude::*;

mod adjustments;
mod decode;
mod encode;
mod logger;
mod session;
mod transform;
mod types;

// Re-export public types
pub use adjustments::{adjust_tone, JsToneParams};
pub use decode::{decode_image, detect_format, get_orientation};
pub use encode::{encode_image, encode_jpeg, encode_png};
pub use session::{JsExportArtifact, JsExportReport, JsSession};
pub use transform::{apply_crop, extract_dark, suggested_crop};
pub use types::JsRasterBuffer;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(logger::DEFAULT_LEVEL);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Set how much is logged to the browser console.
///
/// Accepts `"off"`, `"error"`, `"warn"`, `"info"`, `"debug"` or `"trace"`.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = logger::parse_level(level)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown log level: {}", level)))?;
    log::set_max_level(filter);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}

//! Session bindings: the editing workflow as one stateful JS object.
//!
//! # Example
//!
//! ```typescript
//! import { Session } from '@inkpress/wasm';
//!
//! const session = Session.with_config({ debounce_ms: 250 });
//! const id = session.upload(bytes, file.name);
//! const outcomes = session.upload_batch(files.map(f => ({ name: f.name, bytes: f.buffer })));
//!
//! slider.oninput = () => session.set_tone(id, brightness, contrast, performance.now());
//! setInterval(() => {
//!   for (const { id, error } of session.tick(performance.now())) {
//!     error ? showError(id, error) : redraw(id);
//!   }
//! }, 50);
//! ```
//!
//! Timestamps are JS milliseconds (`performance.now()` or `Date.now()`).

use crate::adjustments::JsToneParams;
use crate::types::{to_js_error, JsRasterBuffer};
use inkpress_core::export::{ExportArtifact, ExportReport};
use inkpress_core::transform::CropRect;
use inkpress_core::{ImageEntry, ImageId, PipelineConfig, Session, ToneParams};
use serde::Serialize;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// A batch item that could be read, or its name and the reason it could not.
type UploadFile = Result<(String, Vec<u8>), (String, String)>;

/// Result of one file in a batch upload, as handed to JS.
#[derive(Debug, Serialize)]
struct UploadOutcome {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Result of one debounced recompute, as handed to JS.
#[derive(Debug, Serialize)]
struct TickOutcome {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct FailureView {
    id: String,
    reason: String,
}

/// A downloadable file.
#[wasm_bindgen(js_name = ExportArtifact)]
pub struct JsExportArtifact {
    inner: ExportArtifact,
}

#[wasm_bindgen(js_class = ExportArtifact)]
impl JsExportArtifact {
    #[wasm_bindgen(getter)]
    pub fn filename(&self) -> String {
        self.inner.filename.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type.clone()
    }

    /// File contents, ready for `new Blob([bytes], { type: mime_type })`.
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }
}

/// Outcome of exporting every image.
#[wasm_bindgen(js_name = ExportReport)]
pub struct JsExportReport {
    artifact: Option<ExportArtifact>,
    failures: Vec<FailureView>,
}

#[wasm_bindgen(js_class = ExportReport)]
impl JsExportReport {
    /// The file to download, or `undefined` when nothing could be exported.
    pub fn artifact(&self) -> Option<JsExportArtifact> {
        self.artifact
            .clone()
            .map(|inner| JsExportArtifact { inner })
    }

    /// Images left out, as `[{ id, reason }]`.
    pub fn failures(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.failures).map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl From<ExportReport> for JsExportReport {
    fn from(report: ExportReport) -> Self {
        Self {
            artifact: report.artifact,
            failures: report
                .failures
                .into_iter()
                .map(|f| FailureView {
                    id: f.id.to_string(),
                    reason: f.reason,
                })
                .collect(),
        }
    }
}

/// The image collection and its pipeline.
#[wasm_bindgen(js_name = Session)]
pub struct JsSession {
    inner: Session,
}

#[wasm_bindgen(js_class = Session)]
impl JsSession {
    /// Create a session with default configuration
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: Session::default(),
        }
    }

    /// Create a session from a plain config object; missing keys take their
    /// defaults and `undefined` means all defaults.
    pub fn with_config(config: JsValue) -> Result<JsSession, JsValue> {
        let config = parse_config(config)?;
        Ok(Self {
            inner: Session::new(config),
        })
    }

    /// Current configuration as a plain object
    pub fn config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.config()).map_err(to_js_error)
    }

    /// Replace the configuration
    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsValue> {
        let config = parse_config(config)?;
        self.inner.set_config(config);
        Ok(())
    }

    /// Decode and add one file, returning its id
    pub fn upload(&mut self, bytes: &[u8], name: &str) -> Result<String, JsValue> {
        self.inner
            .upload(bytes, name)
            .map(|id| id.to_string())
            .map_err(to_js_error)
    }

    /// Decode and add several files given as `[{ name, bytes }]`, where
    /// `bytes` is a `Uint8Array` or `ArrayBuffer`.
    ///
    /// Returns `[{ name, id?, error? }]` in input order. The first file that
    /// succeeds becomes selected.
    pub fn upload_batch(&mut self, files: js_sys::Array) -> Result<JsValue, JsValue> {
        let files: Vec<UploadFile> = files.iter().map(|item| read_upload_file(&item)).collect();
        serde_wasm_bindgen::to_value(&self.upload_files(files)).map_err(to_js_error)
    }

    pub fn set_crop(
        &mut self,
        id: &str,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<(), JsValue> {
        let crop = CropRect::new(x, y, width, height);
        self.inner
            .set_crop(&ImageId::from(id), Some(crop))
            .map_err(to_js_error)
    }

    pub fn clear_crop(&mut self, id: &str) -> Result<(), JsValue> {
        self.inner
            .set_crop(&ImageId::from(id), None)
            .map_err(to_js_error)
    }

    /// Queue a brightness/contrast change; applied by a later `tick`
    pub fn set_tone(
        &mut self,
        id: &str,
        brightness: i32,
        contrast: i32,
        now_ms: f64,
    ) -> Result<(), JsValue> {
        self.inner
            .set_tone(
                &ImageId::from(id),
                ToneParams::new(brightness, contrast),
                to_millis(now_ms),
            )
            .map_err(to_js_error)
    }

    /// Apply pending tone changes whose window has elapsed.
    ///
    /// Returns `[{ id, error? }]`, one item per recomputed image.
    pub fn tick(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        let outcomes: Vec<TickOutcome> = self
            .inner
            .tick(to_millis(now_ms))
            .into_iter()
            .map(|(id, result)| TickOutcome {
                id: id.to_string(),
                error: result.err().map(|e| e.to_string()),
            })
            .collect();
        serde_wasm_bindgen::to_value(&outcomes).map_err(to_js_error)
    }

    /// Tone change not yet applied, or `undefined`
    pub fn pending_tone(&self, id: &str) -> Option<JsToneParams> {
        self.inner
            .pending_tone(&ImageId::from(id))
            .map(|tone| JsToneParams::new(tone.brightness, tone.contrast))
    }

    /// When the next `tick` has work, or `undefined`
    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.inner.next_deadline_ms().map(|ms| ms as f64)
    }

    pub fn set_extract_black_pixels(&mut self, id: &str, enabled: bool) -> Result<(), JsValue> {
        self.inner
            .set_extract_black_pixels(&ImageId::from(id), enabled)
            .map_err(to_js_error)
    }

    /// Recompute now, including any pending tone change
    pub fn apply_changes(&mut self, id: &str) -> Result<(), JsValue> {
        self.inner
            .apply_changes(&ImageId::from(id))
            .map_err(to_js_error)
    }

    pub fn remove(&mut self, id: &str) -> Result<(), JsValue> {
        self.inner
            .remove(&ImageId::from(id))
            .map(drop)
            .map_err(to_js_error)
    }

    pub fn select(&mut self, id: &str) -> Result<(), JsValue> {
        self.inner
            .select(&ImageId::from(id))
            .map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn selected(&self) -> Option<String> {
        self.inner.store().selected().map(ImageId::to_string)
    }

    /// All image ids in upload order
    pub fn ids(&self) -> js_sys::Array {
        self.inner
            .ids()
            .iter()
            .map(|id| JsValue::from_str(id.as_str()))
            .collect()
    }

    #[wasm_bindgen(getter)]
    pub fn image_count(&self) -> usize {
        self.inner.store().len()
    }

    #[wasm_bindgen(getter)]
    pub fn has_unsaved_changes(&self) -> bool {
        self.inner.store().has_unsaved_changes()
    }

    pub fn name(&self, id: &str) -> Result<String, JsValue> {
        self.entry(id).map(|e| e.name().to_string())
    }

    /// The decoded upload
    pub fn original(&self, id: &str) -> Result<JsRasterBuffer, JsValue> {
        self.entry(id)
            .map(|e| JsRasterBuffer::from_raster(e.original().clone()))
    }

    /// The current pipeline result
    pub fn processed(&self, id: &str) -> Result<JsRasterBuffer, JsValue> {
        self.entry(id)
            .map(|e| JsRasterBuffer::from_raster(e.processed().clone()))
    }

    /// Settings behind the current result, as
    /// `{ crop, tone: { brightness, contrast }, extract_black_pixels }`
    pub fn settings(&self, id: &str) -> Result<JsValue, JsValue> {
        let entry = self.entry(id)?;
        serde_wasm_bindgen::to_value(entry.settings()).map_err(to_js_error)
    }

    /// `"idle"` or `"processing"`
    pub fn state(&self, id: &str) -> Result<String, JsValue> {
        let entry = self.entry(id)?;
        serde_wasm_bindgen::to_value(&entry.state())
            .map_err(to_js_error)?
            .as_string()
            .ok_or_else(|| JsValue::from_str("state is not a string"))
    }

    /// Encode one image for download
    pub fn export(&self, id: &str) -> Result<JsExportArtifact, JsValue> {
        self.inner
            .export(&ImageId::from(id))
            .map(|inner| JsExportArtifact { inner })
            .map_err(to_js_error)
    }

    /// Export every image; more than one is packaged into a ZIP archive
    pub fn export_all(&self, archive_name: Option<String>) -> Result<JsExportReport, JsValue> {
        self.inner
            .export_all(archive_name.as_deref())
            .map(JsExportReport::from)
            .map_err(to_js_error)
    }
}

impl Default for JsSession {
    fn default() -> Self {
        Self::new()
    }
}

impl JsSession {
    fn upload_files(&mut self, files: Vec<UploadFile>) -> Vec<UploadOutcome> {
        let mut uploaded = self
            .inner
            .upload_batch(
                files
                    .iter()
                    .filter_map(|file| file.as_ref().ok())
                    .map(|(name, bytes)| (name.as_str(), bytes.as_slice())),
            )
            .into_iter();

        files
            .into_iter()
            .map(|file| {
                let (name, result) = match file {
                    Ok((name, _)) => {
                        let result = match uploaded.next() {
                            Some(Ok(id)) => Ok(id.to_string()),
                            Some(Err(e)) => Err(e.to_string()),
                            None => Err("not uploaded".to_string()),
                        };
                        (name, result)
                    }
                    Err((name, reason)) => (name, Err(reason)),
                };
                UploadOutcome {
                    name,
                    id: result.as_ref().ok().cloned(),
                    error: result.err(),
                }
            })
            .collect()
    }

    fn entry(&self, id: &str) -> Result<Rc<ImageEntry>, JsValue> {
        let id = ImageId::from(id);
        self.inner
            .entry(&id)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown image: {}", id)))
    }
}

fn parse_config(value: JsValue) -> Result<PipelineConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(PipelineConfig::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(to_js_error)
}

fn read_upload_file(item: &JsValue) -> UploadFile {
    let field = |key: &str| js_sys::Reflect::get(item, &JsValue::from_str(key)).ok();
    let name = field("name")
        .and_then(|value| value.as_string())
        .unwrap_or_default();

    match field("bytes") {
        Some(bytes)
            if bytes.is_instance_of::<js_sys::Uint8Array>()
                || bytes.is_instance_of::<js_sys::ArrayBuffer>() =>
        {
            Ok((name, js_sys::Uint8Array::new(&bytes).to_vec()))
        }
        _ => Err((name, "bytes must be a Uint8Array or ArrayBuffer".to_string())),
    }
}

/// JS timestamps are fractional and may be negative for bogus clocks.
fn to_millis(now_ms: f64) -> u64 {
    if now_ms.is_finite() && now_ms > 0.0 {
        now_ms as u64
    } else {
        0
    }
}

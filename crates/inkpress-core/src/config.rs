//! Pipeline configuration.
//!
//! Every tunable lives here so tests and hosts can change thresholds and
//! limits without touching the stages. Missing fields deserialize to their
//! defaults, so a host can pass `{}` or just the keys it cares about.

use serde::{Deserialize, Serialize};

use crate::extract::DEFAULT_BLACK_THRESHOLD;

/// Largest drawing surface (width * height) browsers will allocate.
pub const DEFAULT_MAX_SURFACE_PIXELS: u64 = 268_435_456;

/// Tunables for the processing pipeline and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// R+G+B sum below which a pixel is kept by dark-pixel extraction.
    pub black_threshold: u32,
    /// Quiescence window for brightness/contrast changes, in milliseconds.
    pub debounce_ms: u64,
    /// JPEG quality for exported images (1-100).
    pub jpeg_quality: u8,
    /// Largest surface a stage may allocate; bigger requests fail instead.
    pub max_surface_pixels: u64,
    /// Prepended to every exported file name.
    pub export_prefix: String,
    /// Archive name used by batch export when the caller gives none.
    pub archive_name: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            black_threshold: DEFAULT_BLACK_THRESHOLD,
            debounce_ms: 300,
            jpeg_quality: 92,
            max_surface_pixels: DEFAULT_MAX_SURFACE_PIXELS,
            export_prefix: "processed-".to_string(),
            archive_name: "processed-images.zip".to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy with out-of-range values pulled back into range.
    pub fn normalized(mut self) -> Self {
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        if self.archive_name.trim().is_empty() {
            self.archive_name = Self::default().archive_name;
        }
        self
    }
}

//! Inkpress Core - client-side image pipeline
//!
//! This crate turns uploaded photos and scans into cleaned-up exports:
//! crop, brightness/contrast, and optional extraction of dark pixels onto a
//! transparent background. Every stage is a pure function over a
//! [`RasterBuffer`]; [`Session`] composes them and owns the per-image state.
//!
//! # Pipeline Order
//!
//! 1. Crop (when a rectangle is set)
//! 2. Brightness, then contrast (always, neutral values are an identity)
//! 3. Dark-pixel extraction (when enabled)
//!
//! Every recompute starts from the original decoded image, so edits never
//! compound.

pub mod adjustments;
pub mod config;
pub mod decode;
pub mod encode;
pub mod export;
pub mod extract;
pub mod pipeline;
pub mod raster;
pub mod transform;

use serde::{Deserialize, Serialize};

pub use adjustments::{adjust_tone, ToneLut};
pub use config::PipelineConfig;
pub use extract::{extract_dark, DEFAULT_BLACK_THRESHOLD};
pub use pipeline::{
    EditSettings, ImageEntry, ImageId, ImageStore, PipelineError, ProcessingState, Session,
};
pub use raster::RasterBuffer;
pub use transform::{apply_crop, CropRect};

/// Lower bound for brightness and contrast.
pub const TONE_MIN: i32 = -100;
/// Upper bound for brightness and contrast.
pub const TONE_MAX: i32 = 100;

/// Brightness and contrast settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToneParams {
    /// Brightness (-100 to 100)
    pub brightness: i32,
    /// Contrast (-100 to 100)
    pub contrast: i32,
}

impl ToneParams {
    /// Create tone settings, clamping both values into -100..=100.
    pub fn new(brightness: i32, contrast: i32) -> Self {
        Self {
            brightness,
            contrast,
        }
        .clamped()
    }

    /// Same settings with both values clamped into -100..=100.
    pub fn clamped(self) -> Self {
        Self {
            brightness: self.brightness.clamp(TONE_MIN, TONE_MAX),
            contrast: self.contrast.clamp(TONE_MIN, TONE_MAX),
        }
    }

    /// Check if both values are zero
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }
}

/// Container format of an upload or an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
        }
    }

    /// Whether the format can store an alpha channel.
    pub fn supports_alpha(self) -> bool {
        matches!(self, ImageFormat::Png)
    }
}

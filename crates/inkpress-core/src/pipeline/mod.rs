//! Pipeline orchestration: composing the stages and owning per-image state.
//!
//! # Recompute
//!
//! Every trigger (crop committed, tone change after debouncing, extraction
//! toggled, explicit apply) runs [`run_pipeline`] against the entry's
//! *original* raster:
//!
//! 1. Crop (if set)
//! 2. Brightness/contrast
//! 3. Dark-pixel extraction (if enabled)
//!
//! The entry moves `Idle -> Processing -> Idle`. On failure the previous
//! entry is put back untouched.

mod debounce;
mod error;
mod session;
mod store;

use serde::{Deserialize, Serialize};

use crate::adjustments::apply_tone_in_place;
use crate::config::PipelineConfig;
use crate::extract::extract_dark_in_place;
use crate::raster::RasterBuffer;
use crate::transform::{apply_crop, cropped_dimensions, CropRect};
use crate::{ImageFormat, ToneParams};

pub use debounce::Debouncer;
pub use error::PipelineError;
pub use session::Session;
pub use store::{ImageEntry, ImageId, ImageStore, ProcessingState};

/// Everything the user controls for one image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditSettings {
    pub crop: Option<CropRect>,
    pub tone: ToneParams,
    pub extract_black_pixels: bool,
}

impl EditSettings {
    /// Export format for an image uploaded as `source`.
    ///
    /// Extraction output needs transparency, so a source format without
    /// alpha is replaced by PNG.
    pub fn output_format(&self, source: ImageFormat) -> ImageFormat {
        if self.extract_black_pixels && !source.supports_alpha() {
            ImageFormat::Png
        } else {
            source
        }
    }
}

/// Run crop, tone and (optionally) extraction over `original`.
///
/// `original` is never modified. Fails with
/// [`PipelineError::RenderContextUnavailable`] when the output surface would
/// exceed `config.max_surface_pixels`.
pub fn run_pipeline(
    original: &RasterBuffer,
    settings: &EditSettings,
    config: &PipelineConfig,
) -> Result<RasterBuffer, PipelineError> {
    let crop = settings.crop.as_ref();
    let (width, height) = cropped_dimensions(original.width(), original.height(), crop);
    ensure_surface(width, height, config.max_surface_pixels)?;

    // The cropped copy is ours, so the remaining stages can work in place
    let cropped = apply_crop(original, crop);
    let mut pixels = cropped.into_pixels();

    apply_tone_in_place(&mut pixels, settings.tone);
    if settings.extract_black_pixels {
        extract_dark_in_place(&mut pixels, config.black_threshold);
    }

    Ok(RasterBuffer::from_parts(width, height, pixels))
}

fn ensure_surface(width: u32, height: u32, limit: u64) -> Result<(), PipelineError> {
    let area = u64::from(width) * u64::from(height);
    if width == 0 || height == 0 || area > limit {
        return Err(PipelineError::RenderContextUnavailable {
            width,
            height,
            limit,
        });
    }
    Ok(())
}

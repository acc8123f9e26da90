//! Geometric transforms applied before any tone work.
//!
//! # Coordinate System
//!
//! - Crop coordinates are integer source-image pixels
//! - Origin is top-left corner
//! - Out-of-range rectangles are intersected with the image, never rejected

mod crop;

pub use crop::{apply_crop, cropped_dimensions, CropRect, PixelRegion};

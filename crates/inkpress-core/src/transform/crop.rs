//! Rectangular crop extraction.
//!
//! Crop rectangles are in source-image pixel coordinates with the origin at
//! the top-left corner. A rectangle that leaves the image is intersected
//! with the image bounds; one that ends up empty means "no crop".
//!
//! # Example
//!
//! ```ignore
//! // Keep the top-left 2x2 block
//! let rect = CropRect::new(0, 0, 2, 2);
//! let cropped = apply_crop(&image, Some(&rect));
//! ```

use serde::{Deserialize, Serialize};

use crate::raster::{RasterBuffer, CHANNELS};

/// Share of the image width covered by [`CropRect::suggested`].
const SUGGESTED_WIDTH_RATIO: f64 = 0.75;

/// A crop rectangle in source pixel coordinates.
///
/// Values are not trusted: they may be negative or extend past the image.
/// [`CropRect::clamp_to`] resolves them against a concrete image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// A crop rectangle known to lie fully inside an image and to be non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Intersect the rectangle with `[0, image_width) x [0, image_height)`.
    ///
    /// Returns `None` when nothing of the rectangle remains, which callers
    /// treat as "no crop".
    pub fn clamp_to(&self, image_width: u32, image_height: u32) -> Option<PixelRegion> {
        if self.width <= 0 || self.height <= 0 {
            return None;
        }

        // i64 so x + width cannot overflow
        let left = i64::from(self.x).max(0);
        let top = i64::from(self.y).max(0);
        let right = (i64::from(self.x) + i64::from(self.width)).min(i64::from(image_width));
        let bottom = (i64::from(self.y) + i64::from(self.height)).min(i64::from(image_height));

        if right <= left || bottom <= top {
            return None;
        }

        Some(PixelRegion {
            x: left as u32,
            y: top as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }

    /// The rectangle a crop editor starts from: 75% of the image width,
    /// the image's own aspect ratio, centred.
    pub fn suggested(image_width: u32, image_height: u32) -> Option<Self> {
        if image_width == 0 || image_height == 0 {
            return None;
        }
        let w = f64::from(image_width);
        let h = f64::from(image_height);

        let crop_width = (w * SUGGESTED_WIDTH_RATIO).round();
        let crop_height = (crop_width / (w / h)).round();
        let x = ((w - crop_width) / 2.0).round();
        let y = ((h - crop_height) / 2.0).round();

        Some(Self::new(
            x as i32,
            y as i32,
            crop_width as i32,
            crop_height as i32,
        ))
    }
}

/// Extract a rectangle from an image.
///
/// # Behavior
///
/// - `None`, or a rectangle with nothing left after clamping, returns a copy
///   of the input (identity)
/// - Otherwise the rectangle is clamped to the image bounds and exactly those
///   pixels are copied row by row into a new buffer of the clamped size
pub fn apply_crop(image: &RasterBuffer, rect: Option<&CropRect>) -> RasterBuffer {
    match rect.and_then(|r| r.clamp_to(image.width(), image.height())) {
        Some(region) => extract_region(image, region),
        None => image.clone(),
    }
}

/// Output dimensions of [`apply_crop`] without doing the copy.
pub fn cropped_dimensions(width: u32, height: u32, rect: Option<&CropRect>) -> (u32, u32) {
    match rect.and_then(|r| r.clamp_to(width, height)) {
        Some(region) => (region.width, region.height),
        None => (width, height),
    }
}

fn extract_region(image: &RasterBuffer, region: PixelRegion) -> RasterBuffer {
    let start = region.x as usize * CHANNELS;
    let end = start + region.width as usize * CHANNELS;

    let mut output =
        Vec::with_capacity(region.width as usize * region.height as usize * CHANNELS);
    for y in region.y..region.y + region.height {
        output.extend_from_slice(&image.row(y)[start..end]);
    }

    RasterBuffer::from_parts(region.width, region.height, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test image where each pixel encodes its own position.
    fn test_image(width: u32, height: u32) -> RasterBuffer {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[x as u8, y as u8, ((x + y) % 256) as u8, 255]);
            }
        }
        RasterBuffer::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_no_rect_is_identity() {
        let img = test_image(10, 10);
        assert_eq!(apply_crop(&img, None), img);
    }

    #[test]
    fn test_inside_crop() {
        let img = test_image(10, 10);
        let result = apply_crop(&img, Some(&CropRect::new(2, 3, 4, 5)));

        assert_eq!(result.width(), 4);
        assert_eq!(result.height(), 5);
        assert_eq!(result.pixel(0, 0), Some([2, 3, 5, 255]));
        assert_eq!(result.pixel(3, 4), Some([5, 7, 12, 255]));
    }

    #[test]
    fn test_top_left_2x2_of_gray() {
        let img = RasterBuffer::filled(4, 4, [128, 128, 128, 255]);
        let result = apply_crop(&img, Some(&CropRect::new(0, 0, 2, 2)));

        assert_eq!(result, RasterBuffer::filled(2, 2, [128, 128, 128, 255]));
    }

    #[test]
    fn test_width_overflow_clamps() {
        let img = test_image(10, 10);
        let result = apply_crop(&img, Some(&CropRect::new(7, 0, 50, 4)));

        assert_eq!(result.width(), 3);
        assert_eq!(result.height(), 4);
        assert_eq!(result.pixel(2, 0), Some([9, 0, 9, 255]));
    }

    #[test]
    fn test_negative_origin_intersects() {
        let img = test_image(10, 10);
        let result = apply_crop(&img, Some(&CropRect::new(-2, -3, 5, 5)));

        assert_eq!(result.width(), 3);
        assert_eq!(result.height(), 2);
        assert_eq!(result.pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_zero_size_is_identity() {
        let img = test_image(6, 6);
        assert_eq!(apply_crop(&img, Some(&CropRect::new(1, 1, 0, 3))), img);
        assert_eq!(apply_crop(&img, Some(&CropRect::new(1, 1, 3, -1))), img);
    }

    #[test]
    fn test_fully_outside_is_identity() {
        let img = test_image(6, 6);
        assert_eq!(apply_crop(&img, Some(&CropRect::new(6, 0, 3, 3))), img);
        assert_eq!(apply_crop(&img, Some(&CropRect::new(-5, 0, 5, 3))), img);
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        let img = test_image(6, 6);
        let rect = CropRect::new(i32::MAX, i32::MAX, i32::MAX, i32::MAX);
        assert_eq!(apply_crop(&img, Some(&rect)), img);

        let rect = CropRect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert_eq!(apply_crop(&img, Some(&rect)), img);
    }

    #[test]
    fn test_crop_does_not_touch_input() {
        let img = test_image(8, 8);
        let before = img.clone();
        let _ = apply_crop(&img, Some(&CropRect::new(1, 1, 2, 2)));
        assert_eq!(img, before);
    }

    #[test]
    fn test_cropped_dimensions() {
        assert_eq!(cropped_dimensions(10, 10, None), (10, 10));
        assert_eq!(
            cropped_dimensions(10, 10, Some(&CropRect::new(8, 8, 5, 5))),
            (2, 2)
        );
        assert_eq!(
            cropped_dimensions(10, 10, Some(&CropRect::new(0, 0, 0, 5))),
            (10, 10)
        );
    }

    #[test]
    fn test_suggested_landscape() {
        // 75% of 400 = 300; 300 / (400/200) = 150; centred at (50, 25)
        assert_eq!(
            CropRect::suggested(400, 200),
            Some(CropRect::new(50, 25, 300, 150))
        );
    }

    #[test]
    fn test_suggested_stays_inside() {
        let rect = CropRect::suggested(33, 97).unwrap();
        let region = rect.clamp_to(33, 97).unwrap();
        assert_eq!(region.width as i32, rect.width);
        assert_eq!(region.height as i32, rect.height);
    }

    #[test]
    fn test_suggested_empty_image() {
        assert_eq!(CropRect::suggested(0, 10), None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

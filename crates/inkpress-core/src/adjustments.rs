//! Brightness and contrast remapping.
//!
//! ## Adjustment Order
//! 1. Brightness
//! 2. Contrast
//!
//! Each stage is stored back as an 8-bit value (clamped to 0..=255, halves
//! rounded to even) before the next stage reads it. Alpha is never touched.
//!
//! Because every color channel goes through the same function of its own
//! value, the two stages are folded into a 256-entry lookup table once per
//! call and then applied to the whole buffer.

use crate::raster::{RasterBuffer, CHANNELS};
use crate::ToneParams;

/// Pivot the contrast stage stretches around.
const MIDPOINT: f64 = 128.0;

// ============================================================================
// LUT Type
// ============================================================================

/// Pre-computed 256-entry lookup table: `lut[input] = output`.
#[derive(Debug, Clone)]
pub struct ToneLut {
    pub lut: [u8; 256],
}

impl ToneLut {
    /// Build the table for a brightness/contrast pair.
    ///
    /// Out-of-range parameters are clamped to -100..=100 first.
    pub fn new(params: ToneParams) -> Self {
        let params = params.clamped();
        if params.is_neutral() {
            return Self::identity();
        }

        let offset = brightness_offset(params.brightness);
        let contrast = ContrastStage::new(params.contrast);

        let mut lut = [0u8; 256];
        for (i, lut_value) in lut.iter_mut().enumerate() {
            let brightened = store_channel(i as f64 + offset);
            *lut_value = contrast.apply(brightened);
        }

        Self { lut }
    }

    /// Create identity LUT (no change).
    pub fn identity() -> Self {
        let mut lut = [0u8; 256];
        for (i, lut_value) in lut.iter_mut().enumerate() {
            *lut_value = i as u8;
        }
        Self { lut }
    }

    /// Check if this LUT is identity.
    pub fn is_identity(&self) -> bool {
        self.lut.iter().enumerate().all(|(i, &v)| v == i as u8)
    }
}

impl Default for ToneLut {
    fn default() -> Self {
        Self::identity()
    }
}

/// The contrast stage for one contrast setting.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ContrastStage {
    /// contrast == 0
    Identity,
    /// `factor * (v - 128) + 128`
    Scale(f64),
    /// contrast >= 100, where the factor formula divides by zero.
    /// Values below the midpoint go to 0, everything else to 255.
    Threshold,
}

impl ContrastStage {
    fn new(contrast: i32) -> Self {
        if contrast == 0 {
            return Self::Identity;
        }
        if contrast >= 100 {
            return Self::Threshold;
        }
        let c = f64::from(contrast) / 100.0;
        Self::Scale(259.0 * (c + 1.0) / (255.0 * (1.0 - c)))
    }

    #[inline]
    fn apply(self, value: u8) -> u8 {
        match self {
            Self::Identity => value,
            Self::Scale(factor) => store_channel(factor * (f64::from(value) - MIDPOINT) + MIDPOINT),
            Self::Threshold => {
                if f64::from(value) < MIDPOINT {
                    0
                } else {
                    255
                }
            }
        }
    }
}

/// Brightness in -100..=100 as an additive channel offset (-255..=255).
#[inline]
fn brightness_offset(brightness: i32) -> f64 {
    f64::from(brightness) / 100.0 * 255.0
}

/// Convert a computed channel value to a byte the way a clamped 8-bit
/// pixel array does: clamp to 0..=255, round half to even, NaN to 0.
#[inline]
fn store_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0).round_ties_even() as u8
}

// ============================================================================
// Application
// ============================================================================

/// Apply brightness/contrast to RGBA pixel data in place.
///
/// # Arguments
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `params` - Brightness and contrast, each -100..=100
pub fn apply_tone_in_place(pixels: &mut [u8], params: ToneParams) {
    let lut = ToneLut::new(params);
    // Early exit for identity
    if lut.is_identity() {
        return;
    }

    for chunk in pixels.chunks_exact_mut(CHANNELS) {
        chunk[0] = lut.lut[chunk[0] as usize];
        chunk[1] = lut.lut[chunk[1] as usize];
        chunk[2] = lut.lut[chunk[2] as usize];
    }
}

/// Apply brightness/contrast to a buffer, returning a new buffer.
///
/// `(0, 0)` returns a buffer equal to the input.
pub fn adjust_tone(buffer: &RasterBuffer, params: ToneParams) -> RasterBuffer {
    let mut pixels = buffer.pixels().to_vec();
    apply_tone_in_place(&mut pixels, params);
    RasterBuffer::from_parts(buffer.width(), buffer.height(), pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(r: u8, g: u8, b: u8, a: u8) -> RasterBuffer {
        RasterBuffer::new(1, 1, vec![r, g, b, a]).unwrap()
    }

    fn adjust(rgba: [u8; 4], brightness: i32, contrast: i32) -> [u8; 4] {
        let buf = pixel(rgba[0], rgba[1], rgba[2], rgba[3]);
        adjust_tone(&buf, ToneParams::new(brightness, contrast))
            .pixel(0, 0)
            .unwrap()
    }

    #[test]
    fn test_neutral_is_identity_for_every_value() {
        let pixels: Vec<u8> = (0..=255u8).flat_map(|v| [v, v, 255 - v, v]).collect();
        let buf = RasterBuffer::new(256, 1, pixels).unwrap();
        assert_eq!(adjust_tone(&buf, ToneParams::default()), buf);
    }

    #[test]
    fn test_neutral_lut_is_identity() {
        assert!(ToneLut::new(ToneParams::default()).is_identity());
        assert!(!ToneLut::new(ToneParams::new(1, 0)).is_identity());
    }

    #[test]
    fn test_brightness_max_saturates() {
        assert_eq!(adjust([0, 1, 200, 255], 100, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_brightness_min_floors() {
        assert_eq!(adjust([255, 254, 3, 255], -100, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_brightness_half_on_mid_gray() {
        // 128 + 0.5 * 255 = 255.5, clamped to 255
        assert_eq!(adjust([128, 128, 128, 255], 50, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_brightness_rounds_half_to_even() {
        // 10 + 127.5 = 137.5 -> 138, 11 + 127.5 = 138.5 -> 138
        assert_eq!(adjust([10, 11, 0, 255], 50, 0), [138, 138, 128, 255]);
    }

    #[test]
    fn test_contrast_positive() {
        // factor = 259 * 1.5 / (255 * 0.5) ~= 3.047
        let out = adjust([64, 140, 128, 255], 0, 50);
        assert_eq!(out, [0, 165, 128, 255]);
    }

    #[test]
    fn test_contrast_negative() {
        // factor = 259 * 0.5 / (255 * 1.5) ~= 0.3386
        let out = adjust([0, 255, 128, 255], 0, -50);
        assert_eq!(out, [85, 171, 128, 255]);
    }

    #[test]
    fn test_contrast_min_flattens_to_midpoint() {
        assert_eq!(adjust([0, 77, 255, 255], 0, -100), [128, 128, 128, 255]);
    }

    #[test]
    fn test_contrast_max_thresholds_at_midpoint() {
        assert_eq!(adjust([127, 128, 0, 255], 0, 100), [0, 255, 0, 255]);
        assert_eq!(adjust([255, 129, 1, 255], 0, 100), [255, 255, 0, 255]);
    }

    #[test]
    fn test_contrast_beyond_range_is_clamped() {
        assert_eq!(adjust([100, 200, 128, 255], 0, 1000), adjust([100, 200, 128, 255], 0, 100));
        assert_eq!(adjust([100, 200, 128, 255], -500, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_brightness_applied_before_contrast() {
        // brightness 20: 100 + 51 = 151; contrast 20: factor = 259*1.2/(255*0.8) ~= 1.5235
        // 1.5235 * 23 + 128 = 163.04 -> 163
        assert_eq!(adjust([100, 100, 100, 255], 20, 20), [163, 163, 163, 255]);
    }

    #[test]
    fn test_alpha_untouched() {
        assert_eq!(adjust([10, 20, 30, 77], 60, 40)[3], 77);
        assert_eq!(adjust([10, 20, 30, 0], -60, 100)[3], 0);
    }

    #[test]
    fn test_adjust_does_not_modify_input() {
        let buf = pixel(100, 100, 100, 255);
        let before = buf.clone();
        let _ = adjust_tone(&buf, ToneParams::new(50, 50));
        assert_eq!(buf, before);
    }

    #[test]
    fn test_incomplete_pixel_ignored() {
        let mut pixels = vec![10, 10, 10, 255, 10, 10];
        apply_tone_in_place(&mut pixels, ToneParams::new(100, 0));
        assert_eq!(pixels, vec![255, 255, 255, 255, 10, 10]);
    }

    #[test]
    fn test_store_channel() {
        assert_eq!(store_channel(f64::NAN), 0);
        assert_eq!(store_channel(f64::INFINITY), 255);
        assert_eq!(store_channel(f64::NEG_INFINITY), 0);
        assert_eq!(store_channel(0.5), 0);
        assert_eq!(store_channel(1.5), 2);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

//! Dark-pixel extraction onto a transparent background.
//!
//! Every pixel is classified by the sum of its color channels. Dark pixels
//! become opaque black, everything else becomes fully transparent, which
//! turns a scanned drawing or signature into a clean overlay.

use crate::raster::{RasterBuffer, CHANNELS};

/// R+G+B sum below which a pixel counts as dark.
pub const DEFAULT_BLACK_THRESHOLD: u32 = 450;

/// Whether a color is dark for the given threshold (`r + g + b < threshold`).
#[inline]
pub fn is_dark(r: u8, g: u8, b: u8, threshold: u32) -> bool {
    u32::from(r) + u32::from(g) + u32::from(b) < threshold
}

/// Binarise RGBA pixel data in place.
///
/// Dark pixels are written as `(0, 0, 0, 255)`. Other pixels only have their
/// alpha set to 0; their color channels are left as they were.
pub fn extract_dark_in_place(pixels: &mut [u8], threshold: u32) {
    for chunk in pixels.chunks_exact_mut(CHANNELS) {
        if is_dark(chunk[0], chunk[1], chunk[2], threshold) {
            chunk.copy_from_slice(&[0, 0, 0, 255]);
        } else {
            chunk[3] = 0;
        }
    }
}

/// Keep only the dark pixels of a buffer, returning a new buffer of the
/// same dimensions.
pub fn extract_dark(buffer: &RasterBuffer, threshold: u32) -> RasterBuffer {
    let mut pixels = buffer.pixels().to_vec();
    extract_dark_in_place(&mut pixels, threshold);
    RasterBuffer::from_parts(buffer.width(), buffer.height(), pixels)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

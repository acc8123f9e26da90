//! The RGBA raster buffer every pipeline stage reads and writes.
//!
//! A [`RasterBuffer`] is immutable once constructed: stages take a shared
//! reference and return a fresh buffer, so a caller holding a buffer never
//! observes it change underneath them.

use thiserror::Error;

/// Bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Pixel data did not match the declared dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
pub struct BufferSizeError {
    pub expected: usize,
    pub actual: usize,
}

/// An 8-bit RGBA image held in memory.
///
/// Invariant: `pixels.len() == width * height * 4`, channel order R, G, B, A,
/// rows stored top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterBuffer {
    /// Wrap RGBA pixel data, checking the length against the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, BufferSizeError> {
        let expected = byte_len(width, height);
        if pixels.len() != expected {
            return Err(BufferSizeError {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a buffer where every pixel has the same RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Constructor for stages that have already sized the data correctly.
    pub(crate) fn from_parts(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            byte_len(width, height),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a RasterBuffer from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes in row-major order.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Give up the buffer and take ownership of its bytes.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// RGBA value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        let px = &self.pixels[idx..idx + CHANNELS];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Bytes of one row.
    pub(crate) fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * CHANNELS;
        let start = y as usize * stride;
        &self.pixels[start..start + stride]
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }
}

fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_length() {
        assert!(RasterBuffer::new(2, 2, vec![0u8; 16]).is_ok());

        let err = RasterBuffer::new(2, 2, vec![0u8; 12]).unwrap_err();
        assert_eq!(
            err,
            BufferSizeError {
                expected: 16,
                actual: 12
            }
        );
    }

    #[test]
    fn test_filled() {
        let buf = RasterBuffer::filled(3, 2, [1, 2, 3, 4]);
        assert_eq!(buf.byte_size(), 24);
        assert_eq!(buf.pixel(2, 1), Some([1, 2, 3, 4]));
    }

    #[test]
    fn test_pixel_out_of_bounds() {
        let buf = RasterBuffer::filled(2, 2, [9, 9, 9, 255]);
        assert_eq!(buf.pixel(2, 0), None);
        assert_eq!(buf.pixel(0, 2), None);
    }

    #[test]
    fn test_row() {
        let pixels: Vec<u8> = (0..16).collect();
        let buf = RasterBuffer::new(2, 2, pixels).unwrap();
        assert_eq!(buf.row(1), &[8, 9, 10, 11, 12, 13, 14, 15]);
    }

    #[test]
    fn test_from_rgba_image() {
        let img = image::RgbaImage::from_pixel(4, 3, image::Rgba([10, 20, 30, 40]));
        assert_eq!(
            RasterBuffer::from_rgba_image(img),
            RasterBuffer::filled(4, 3, [10, 20, 30, 40])
        );
    }
}

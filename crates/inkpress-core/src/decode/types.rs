//! Core types for image decoding.

use thiserror::Error;

use crate::raster::RasterBuffer;
use crate::ImageFormat;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// No bytes were supplied.
    #[error("Empty image file")]
    Empty,

    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// An uploaded file after decoding.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Upright RGBA pixels at the image's natural size.
    pub raster: RasterBuffer,
    /// Container format the bytes were in.
    pub format: ImageFormat,
}

impl DecodedImage {
    /// Natural (width, height) after orientation correction.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.raster.width(), self.raster.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90CW);
        assert_eq!(Orientation::from(99), Orientation::Normal); // Invalid defaults to Normal
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::CorruptedFile("bad huffman table".to_string());
        assert_eq!(
            err.to_string(),
            "Corrupted or incomplete image file: bad huffman table"
        );
        assert_eq!(
            DecodeError::InvalidFormat.to_string(),
            "Invalid or unsupported image format"
        );
    }

    #[test]
    fn test_decoded_dimensions() {
        let decoded = DecodedImage {
            raster: RasterBuffer::filled(7, 3, [0, 0, 0, 255]),
            format: ImageFormat::Png,
        };
        assert_eq!(decoded.dimensions(), (7, 3));
    }
}

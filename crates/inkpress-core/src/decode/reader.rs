//! Decoding uploaded files into upright RGBA rasters.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, DecodedImage, Orientation};
use crate::raster::RasterBuffer;
use crate::ImageFormat;

/// Decode an uploaded image file.
///
/// The container format is sniffed from the bytes, not taken from a file
/// name. EXIF orientation is applied so the raster is upright, matching what
/// a browser shows when it draws the same file.
///
/// # Errors
///
/// Returns `DecodeError::Empty` for zero bytes,
/// `DecodeError::InvalidFormat` if the bytes are not a supported image, and
/// `DecodeError::CorruptedFile` if decoding fails part way.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let format = match reader.format() {
        Some(image::ImageFormat::Png) => ImageFormat::Png,
        Some(image::ImageFormat::Jpeg) => ImageFormat::Jpeg,
        _ => return Err(DecodeError::InvalidFormat),
    };

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let oriented = apply_orientation(img, get_orientation(bytes));
    Ok(DecodedImage {
        raster: RasterBuffer::from_rgba_image(oriented.into_rgba8()),
        format,
    })
}

/// Read the EXIF orientation tag.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    let Ok(exif) = Reader::new().read_from_container(&mut cursor) else {
        return Orientation::Normal;
    };
    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from)
        .unwrap_or_default()
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::jpeg::JpegEncoder;
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder};

    fn png_bytes(width: u32, height: u32, rgba: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(rgba, width, height, ExtendedColorType::Rgba8)
            .unwrap();
        out
    }

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let rgb = vec![200u8; (width * height * 3) as usize];
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, 90)
            .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
            .unwrap();
        out
    }

    #[test]
    fn test_decode_png_keeps_alpha() {
        let rgba = [10, 20, 30, 40, 50, 60, 70, 80];
        let decoded = decode_image(&png_bytes(2, 1, &rgba)).unwrap();

        assert_eq!(decoded.format, ImageFormat::Png);
        assert_eq!(decoded.dimensions(), (2, 1));
        assert_eq!(decoded.raster.pixels(), &rgba);
    }

    #[test]
    fn test_decode_jpeg_is_opaque() {
        let decoded = decode_image(&jpeg_bytes(8, 4)).unwrap();

        assert_eq!(decoded.format, ImageFormat::Jpeg);
        assert_eq!(decoded.dimensions(), (8, 4));
        assert!(decoded.raster.pixels().chunks_exact(4).all(|p| p[3] == 255));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(matches!(decode_image(&[]), Err(DecodeError::Empty)));
    }

    #[test]
    fn test_decode_garbage_is_invalid_format() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = png_bytes(4, 4, &[9u8; 64]);
        let result = decode_image(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_orientation_without_exif() {
        assert_eq!(get_orientation(&jpeg_bytes(2, 2)), Orientation::Normal);
        assert_eq!(get_orientation(&[0x00, 0x01, 0x02]), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_rotate90() {
        let img = DynamicImage::ImageRgba8(
            image::RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 255]).unwrap(),
        );
        let rotated = apply_orientation(img, Orientation::Rotate90CW).into_rgba8();

        assert_eq!(rotated.dimensions(), (1, 2));
        assert_eq!(rotated.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let img = DynamicImage::ImageRgba8(
            image::RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 255]).unwrap(),
        );
        let flipped = apply_orientation(img, Orientation::FlipHorizontal).into_rgba8();

        assert_eq!(flipped.get_pixel(0, 0).0, [0, 255, 0, 255]);
        assert_eq!(flipped.get_pixel(1, 0).0, [255, 0, 0, 255]);
    }
}

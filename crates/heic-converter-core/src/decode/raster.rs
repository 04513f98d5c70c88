//! Raster decoding with EXIF orientation handling.
//!
//! These are the operations the resizer needs on a converted buffer: sniff its
//! format, read its displayed dimensions cheaply, and decode it fully.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};

use super::{DecodeError, DecodedImage, Orientation};
use crate::settings::TargetFormat;

/// Identify a converted buffer by its magic bytes.
///
/// Returns `None` for anything other than JPEG or PNG.
pub fn detect_format(bytes: &[u8]) -> Option<TargetFormat> {
    match image::guess_format(bytes).ok()? {
        ImageFormat::Jpeg => Some(TargetFormat::Jpeg),
        ImageFormat::Png => Some(TargetFormat::Png),
        _ => None,
    }
}

/// Read the displayed width and height without decoding pixel data.
///
/// Only the container header and EXIF block are parsed. Orientations that
/// rotate by 90 or 270 degrees swap the stored dimensions, so the result
/// matches what [`decode_image`] would produce.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format is not recognized.
/// Returns `DecodeError::CorruptedFile` if the header cannot be parsed.
pub fn probe_dimensions(bytes: &[u8]) -> Result<(u32, u32), DecodeError> {
    let reader = open(bytes)?;
    let (width, height) = reader.into_dimensions().map_err(map_image_error)?;
    Ok(extract_orientation(bytes).apply_to_dimensions(width, height))
}

/// Decode an image from bytes, applying EXIF orientation correction.
///
/// # Returns
///
/// A `DecodedImage` with correct orientation applied. Sources with an alpha
/// channel decode to RGBA, everything else to RGB.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format is not recognized.
/// Returns `DecodeError::CorruptedFile` if the data is corrupted.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let orientation = extract_orientation(bytes);

    let img = open(bytes)?.decode().map_err(map_image_error)?;

    let img = apply_orientation(img, orientation);
    if img.color().has_alpha() {
        Ok(DecodedImage::from_rgba_image(img.into_rgba8()))
    } else {
        Ok(DecodedImage::from_rgb_image(img.into_rgb8()))
    }
}

fn open(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }
    Ok(reader)
}

fn map_image_error(err: ImageError) -> DecodeError {
    match err {
        ImageError::Unsupported(_) => DecodeError::InvalidFormat,
        other => DecodeError::CorruptedFile(other.to_string()),
    }
}

fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

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
    use crate::encode::encode_png;

    // Minimal valid JPEG bytes (1x1 pixel)
    const MINIMAL_JPEG: &[u8] = &[
        0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01, 0x01, 0x00, 0x00,
        0x01, 0x00, 0x01, 0x00, 0x00, 0xFF, 0xDB, 0x00, 0x43, 0x00, 0x08, 0x06, 0x06, 0x07, 0x06,
        0x05, 0x08, 0x07, 0x07, 0x07, 0x09, 0x09, 0x08, 0x0A, 0x0C, 0x14, 0x0D, 0x0C, 0x0B, 0x0B,
        0x0C, 0x19, 0x12, 0x13, 0x0F, 0x14, 0x1D, 0x1A, 0x1F, 0x1E, 0x1D, 0x1A, 0x1C, 0x1C, 0x20,
        0x24, 0x2E, 0x27, 0x20, 0x22, 0x2C, 0x23, 0x1C, 0x1C, 0x28, 0x37, 0x29, 0x2C, 0x30, 0x31,
        0x34, 0x34, 0x34, 0x1F, 0x27, 0x39, 0x3D, 0x38, 0x32, 0x3C, 0x2E, 0x33, 0x34, 0x32, 0xFF,
        0xC0, 0x00, 0x0B, 0x08, 0x00, 0x01, 0x00, 0x01, 0x01, 0x01, 0x11, 0x00, 0xFF, 0xC4, 0x00,
        0x1F, 0x00, 0x00, 0x01, 0x05, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B,
        0xFF, 0xC4, 0x00, 0xB5, 0x10, 0x00, 0x02, 0x01, 0x03, 0x03, 0x02, 0x04, 0x03, 0x05, 0x05,
        0x04, 0x04, 0x00, 0x00, 0x01, 0x7D, 0x01, 0x02, 0x03, 0x00, 0x04, 0x11, 0x05, 0x12, 0x21,
        0x31, 0x41, 0x06, 0x13, 0x51, 0x61, 0x07, 0x22, 0x71, 0x14, 0x32, 0x81, 0x91, 0xA1, 0x08,
        0x23, 0x42, 0xB1, 0xC1, 0x15, 0x52, 0xD1, 0xF0, 0x24, 0x33, 0x62, 0x72, 0x82, 0x09, 0x0A,
        0x16, 0x17, 0x18, 0x19, 0x1A, 0x25, 0x26, 0x27, 0x28, 0x29, 0x2A, 0x34, 0x35, 0x36, 0x37,
        0x38, 0x39, 0x3A, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49, 0x4A, 0x53, 0x54, 0x55, 0x56,
        0x57, 0x58, 0x59, 0x5A, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0x6A, 0x73, 0x74, 0x75,
        0x76, 0x77, 0x78, 0x79, 0x7A, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89, 0x8A, 0x92, 0x93,
        0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9A, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7, 0xA8, 0xA9,
        0xAA, 0xB2, 0xB3, 0xB4, 0xB5, 0xB6, 0xB7, 0xB8, 0xB9, 0xBA, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6,
        0xC7, 0xC8, 0xC9, 0xCA, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0xDA, 0xE1, 0xE2,
        0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0xEA, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7,
        0xF8, 0xF9, 0xFA, 0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00, 0xFB, 0xD5,
        0xDB, 0x20, 0xA8, 0xF1, 0x7E, 0xFF, 0xD9,
    ];

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let pixels = vec![90u8; (width * height * 3) as usize];
        encode_png(&pixels, width, height).unwrap()
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(MINIMAL_JPEG), Some(TargetFormat::Jpeg));
        assert_eq!(detect_format(&png_bytes(2, 2)), Some(TargetFormat::Png));
        assert_eq!(detect_format(b"GIF89a......"), None);
        assert_eq!(detect_format(&[]), None);
    }

    #[test]
    fn test_probe_dimensions_jpeg() {
        assert_eq!(probe_dimensions(MINIMAL_JPEG).unwrap(), (1, 1));
    }

    #[test]
    fn test_probe_dimensions_png() {
        assert_eq!(probe_dimensions(&png_bytes(40, 25)).unwrap(), (40, 25));
    }

    #[test]
    fn test_probe_dimensions_garbage() {
        assert!(matches!(
            probe_dimensions(&[0x00, 0x01, 0x02, 0x03]),
            Err(DecodeError::InvalidFormat)
        ));
    }

    #[test]
    fn test_probe_dimensions_truncated_header() {
        let truncated = &MINIMAL_JPEG[0..20];
        assert!(probe_dimensions(truncated).is_err());
    }

    #[test]
    fn test_decode_valid_jpeg() {
        let img = decode_image(MINIMAL_JPEG).unwrap();
        assert_eq!(img.width, 1);
        assert_eq!(img.height, 1);
        assert_eq!(img.pixels.len(), 3);
    }

    #[test]
    fn test_decode_png() {
        let img = decode_image(&png_bytes(8, 3)).unwrap();
        assert_eq!((img.width, img.height), (8, 3));
        assert_eq!(img.pixels[0], 90);
    }

    #[test]
    fn test_decode_transparent_png_keeps_alpha() {
        let png = crate::encode::encode_png_rgba(&[10, 20, 30, 0, 40, 50, 60, 128], 2, 1).unwrap();
        let img = decode_image(&png).unwrap();

        assert!(img.has_alpha());
        assert_eq!(img.pixels, vec![10, 20, 30, 0, 40, 50, 60, 128]);
    }

    #[test]
    fn test_decode_invalid_bytes() {
        match decode_image(&[0x00, 0x01, 0x02, 0x03]) {
            Err(DecodeError::InvalidFormat) => {}
            Err(e) => panic!("Expected InvalidFormat error, got: {:?}", e),
            Ok(_) => panic!("Expected error, got success"),
        }
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(decode_image(&[]).is_err());
    }

    #[test]
    fn test_decode_truncated_jpeg() {
        let truncated = &MINIMAL_JPEG[0..20];
        assert!(decode_image(truncated).is_err());
    }

    #[test]
    fn test_orientation_without_exif() {
        assert_eq!(extract_orientation(MINIMAL_JPEG), Orientation::Normal);
        assert_eq!(extract_orientation(&[0x00, 0x01, 0x02]), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_rotate90() {
        let pixels = vec![
            255, 0, 0, // Red (left)
            0, 255, 0, // Green (right)
        ];
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_raw(2, 1, pixels).unwrap());

        let result = apply_orientation(img, Orientation::Rotate90CW).into_rgb8();
        assert_eq!(result.dimensions(), (1, 2));
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let pixels = vec![
            255, 0, 0, // Red (left)
            0, 255, 0, // Green (right)
        ];
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_raw(2, 1, pixels).unwrap());

        let result = apply_orientation(img, Orientation::FlipHorizontal).into_rgb8();
        assert_eq!(result.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(result.get_pixel(1, 0).0, [255, 0, 0]);
    }
}

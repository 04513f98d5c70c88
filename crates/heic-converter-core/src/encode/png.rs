//! PNG encoding for converted output.

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::{validate_pixels, validate_rgb, EncodeError};
use crate::decode::PixelLayout;

/// Encode RGB pixel data to PNG bytes with the encoder's default compression.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    validate_rgb(pixels, width, height)?;
    write_png(pixels, width, height, ExtendedColorType::Rgb8)
}

/// Encode RGBA pixel data (straight alpha) to PNG bytes.
pub fn encode_png_rgba(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    validate_pixels(pixels, width, height, PixelLayout::Rgba)?;
    write_png(pixels, width, height, ExtendedColorType::Rgba8)
}

fn write_png(
    pixels: &[u8],
    width: u32,
    height: u32,
    color: ExtendedColorType,
) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, color)
        .map_err(|e| EncodeError::EncodingFailed {
            format: "PNG",
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_png_signature() {
        let png = encode_png(&[0u8; 4 * 4 * 3], 4, 4).unwrap();
        assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_encode_png_is_lossless() {
        let pixels: Vec<u8> = (0..6 * 5 * 3).map(|i| (i * 7 % 256) as u8).collect();
        let png = encode_png(&pixels, 6, 5).unwrap();

        let decoded = image::load_from_memory(&png).unwrap().into_rgb8();
        assert_eq!(decoded.into_raw(), pixels);
    }

    #[test]
    fn test_encode_png_rgba_keeps_alpha() {
        let pixels = [0u8, 0, 0, 0, 255, 255, 255, 255].repeat(4);
        let png = encode_png_rgba(&pixels, 4, 2).unwrap();

        let decoded = image::load_from_memory(&png).unwrap();
        assert!(decoded.color().has_alpha());
        assert_eq!(decoded.into_rgba8().into_raw(), pixels);
    }

    #[test]
    fn test_encode_png_invalid_input() {
        assert!(matches!(
            encode_png(&[0u8; 10], 2, 2),
            Err(EncodeError::InvalidPixelData { .. })
        ));
        assert!(matches!(
            encode_png(&[], 2, 0),
            Err(EncodeError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            encode_png_rgba(&[0u8; 12], 2, 2),
            Err(EncodeError::InvalidPixelData { expected: 16, actual: 12 })
        ));
    }
}

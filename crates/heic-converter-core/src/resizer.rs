//! Width-constrained downscaling of converted buffers.
//!
//! The resizer works on the codec's output, never on the source container.
//! It reads the header first and only pays for a full decode and re-encode
//! when the image is actually wider than the limit.

use std::num::NonZeroU32;

use log::debug;
use thiserror::Error;

use crate::decode::{
    constrained_dimensions, decode_image, detect_format, probe_dimensions, resize, DecodeError,
    FilterType,
};
use crate::encode::{encode, EncodeError};
use crate::settings::Quality;

/// Failures of [`Resizer::constrain`].
#[derive(Debug, Error)]
pub enum ResizeError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Downscales buffers that exceed a maximum width.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resizer {
    filter: FilterType,
}

impl Resizer {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }

    /// Constrain `buffer` to at most `max_width` pixels wide.
    ///
    /// When the displayed width is already `max_width` or less, the buffer is
    /// handed back untouched (no re-encode, no quality loss). Otherwise it is
    /// decoded, scaled uniformly to `max_width` x `round(H * max_width / W)`,
    /// and re-encoded at `quality` in the same format it arrived in.
    ///
    /// # Errors
    ///
    /// `ResizeError::Decode` if the buffer is not a readable JPEG or PNG,
    /// `ResizeError::Encode` if re-encoding fails.
    pub fn constrain(
        &self,
        buffer: Vec<u8>,
        max_width: NonZeroU32,
        quality: Quality,
    ) -> Result<Vec<u8>, ResizeError> {
        let format = detect_format(&buffer).ok_or(DecodeError::InvalidFormat)?;
        let (width, height) = probe_dimensions(&buffer)?;

        let Some((target_width, target_height)) =
            constrained_dimensions(width, height, max_width.get())
        else {
            return Ok(buffer);
        };

        debug!(
            "Resizing {}x{} to {}x{}",
            width, height, target_width, target_height
        );

        let surface = decode_image(&buffer)?;
        drop(buffer);
        let scaled = resize(surface, target_width, target_height, self.filter)?;

        Ok(encode(&scaled, format, quality)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{encode_jpeg, encode_png, encode_png_rgba};
    use crate::settings::TargetFormat;

    fn width(px: u32) -> NonZeroU32 {
        NonZeroU32::new(px).unwrap()
    }

    fn jpeg(w: u32, h: u32) -> Vec<u8> {
        encode_jpeg(&vec![100u8; (w * h * 3) as usize], w, h, 90).unwrap()
    }

    #[test]
    fn test_constrain_downscales_wide_image() {
        let out = Resizer::default()
            .constrain(jpeg(400, 300), width(200), Quality::DEFAULT)
            .unwrap();

        assert_eq!(detect_format(&out), Some(TargetFormat::Jpeg));
        assert_eq!(probe_dimensions(&out).unwrap(), (200, 150));
    }

    #[test]
    fn test_constrain_rounds_height() {
        // 333 * 100 / 250 = 133.2
        let out = Resizer::default()
            .constrain(jpeg(250, 333), width(100), Quality::DEFAULT)
            .unwrap();
        assert_eq!(probe_dimensions(&out).unwrap(), (100, 133));
    }

    #[test]
    fn test_constrain_keeps_png_as_png() {
        let png = encode_png(&vec![10u8; 64 * 32 * 3], 64, 32).unwrap();
        let out = Resizer::new(FilterType::Nearest)
            .constrain(png, width(16), Quality::DEFAULT)
            .unwrap();

        assert_eq!(detect_format(&out), Some(TargetFormat::Png));
        assert_eq!(probe_dimensions(&out).unwrap(), (16, 8));
    }

    #[test]
    fn test_constrain_transparent_png_keeps_alpha() {
        let png = encode_png_rgba(&[10, 20, 30, 0].repeat(64 * 32), 64, 32).unwrap();
        let out = Resizer::default()
            .constrain(png, width(16), Quality::DEFAULT)
            .unwrap();

        let decoded = image::load_from_memory(&out).unwrap();
        assert!(decoded.color().has_alpha());
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
        assert!(decoded.into_rgba8().pixels().all(|px| px.0[3] == 0));
    }

    #[test]
    fn test_constrain_narrow_image_returned_unchanged() {
        let input = jpeg(120, 80);
        let out = Resizer::default()
            .constrain(input.clone(), width(800), Quality::new(0.1).unwrap())
            .unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_constrain_exact_width_is_noop() {
        let input = jpeg(200, 100);
        let out = Resizer::default()
            .constrain(input.clone(), width(200), Quality::DEFAULT)
            .unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_constrain_is_idempotent() {
        let resizer = Resizer::default();
        let once = resizer
            .constrain(jpeg(300, 200), width(150), Quality::DEFAULT)
            .unwrap();
        let twice = resizer
            .constrain(once.clone(), width(150), Quality::DEFAULT)
            .unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_constrain_malformed_buffer_is_decode_error() {
        let result = Resizer::default().constrain(vec![1, 2, 3, 4], width(100), Quality::DEFAULT);
        assert!(matches!(result, Err(ResizeError::Decode(DecodeError::InvalidFormat))));
    }

    #[test]
    fn test_constrain_truncated_jpeg_is_decode_error() {
        let mut input = jpeg(400, 300);
        input.truncate(40);
        let result = Resizer::default().constrain(input, width(100), Quality::DEFAULT);
        assert!(matches!(result, Err(ResizeError::Decode(_))));
    }

    #[test]
    fn test_resize_error_display_is_transparent() {
        let err = ResizeError::from(DecodeError::InvalidFormat);
        assert_eq!(err.to_string(), "Invalid or unsupported image format");
    }
}

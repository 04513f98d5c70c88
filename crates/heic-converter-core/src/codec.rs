//! The codec adapter boundary.
//!
//! Decoding the source container format is delegated to an external
//! capability (a bundled library, a browser-side script, ...). The pipeline
//! only sees it through [`CodecAdapter`]: one readiness check per batch, then
//! one `decode_and_encode` call per item.

use thiserror::Error;

use crate::decode::decode_image;
use crate::encode::encode;
use crate::settings::{Quality, TargetFormat};

/// Failure reported by the codec for a single item.
///
/// The message is surfaced verbatim as the item's failure reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CodecError(pub String);

impl CodecError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The codec could not be made ready. Fatal to the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct AdapterInitError(pub String);

impl AdapterInitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Transcodes a source-format buffer into a target-format buffer.
pub trait CodecAdapter {
    /// Make the capability usable. Called once at the start of every batch,
    /// before any item is processed; implementations may cache success.
    fn ready(&mut self) -> Result<(), AdapterInitError>;

    /// Decode `source` and re-encode it as `target` at `quality`.
    fn decode_and_encode(
        &self,
        source: &[u8],
        quality: Quality,
        target: TargetFormat,
    ) -> Result<Vec<u8>, CodecError>;
}

impl<C: CodecAdapter + ?Sized> CodecAdapter for Box<C> {
    fn ready(&mut self) -> Result<(), AdapterInitError> {
        (**self).ready()
    }

    fn decode_and_encode(
        &self,
        source: &[u8],
        quality: Quality,
        target: TargetFormat,
    ) -> Result<Vec<u8>, CodecError> {
        (**self).decode_and_encode(source, quality, target)
    }
}

/// Codec backed by the `image` crate.
///
/// Handles any source the crate's enabled decoders understand (JPEG, PNG),
/// which covers pre-extracted HEIC previews and native testing. EXIF
/// orientation is baked into the output pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterCodec;

impl CodecAdapter for RasterCodec {
    fn ready(&mut self) -> Result<(), AdapterInitError> {
        Ok(())
    }

    fn decode_and_encode(
        &self,
        source: &[u8],
        quality: Quality,
        target: TargetFormat,
    ) -> Result<Vec<u8>, CodecError> {
        let decoded = decode_image(source).map_err(|e| CodecError(e.to_string()))?;
        encode(&decoded, target, quality).map_err(|e| CodecError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{detect_format, probe_dimensions};
    use crate::encode::encode_png;

    fn png_source(width: u32, height: u32) -> Vec<u8> {
        let pixels: Vec<u8> = (0..width * height * 3).map(|i| (i % 251) as u8).collect();
        encode_png(&pixels, width, height).unwrap()
    }

    #[test]
    fn test_raster_codec_transcodes_to_jpeg() {
        let mut codec = RasterCodec;
        codec.ready().unwrap();

        let out = codec
            .decode_and_encode(&png_source(32, 16), Quality::DEFAULT, TargetFormat::Jpeg)
            .unwrap();
        assert_eq!(detect_format(&out), Some(TargetFormat::Jpeg));
        assert_eq!(probe_dimensions(&out).unwrap(), (32, 16));
    }

    #[test]
    fn test_raster_codec_transcodes_to_png() {
        let out = RasterCodec
            .decode_and_encode(&png_source(5, 7), Quality::MAX, TargetFormat::Png)
            .unwrap();
        assert_eq!(detect_format(&out), Some(TargetFormat::Png));
    }

    #[test]
    fn test_raster_codec_reports_corrupt_input() {
        let err = RasterCodec
            .decode_and_encode(b"not an image", Quality::DEFAULT, TargetFormat::Jpeg)
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid or unsupported image format");
    }

    #[test]
    fn test_boxed_adapter_delegates() {
        let mut codec: Box<dyn CodecAdapter> = Box::new(RasterCodec);
        assert!(codec.ready().is_ok());
        assert!(codec
            .decode_and_encode(&png_source(2, 2), Quality::DEFAULT, TargetFormat::Jpeg)
            .is_ok());
    }

    #[test]
    fn test_error_messages_are_verbatim() {
        let err = CodecError::new("ERR_LIBHEIF format not supported");
        assert_eq!(err.to_string(), "ERR_LIBHEIF format not supported");

        let err = AdapterInitError::new("Failed to load converter");
        assert_eq!(err.to_string(), "Failed to load converter");
    }
}

//! Raster encoding for converted and resized images.
//!
//! This module provides functionality for:
//! - Encoding RGB pixel data to JPEG with configurable quality
//! - Encoding RGB or RGBA pixel data to PNG (lossless, quality is ignored)
//! - Dispatching on the batch's [`TargetFormat`]

mod jpeg;
mod png;

use thiserror::Error;

use crate::decode::{DecodedImage, PixelLayout};
use crate::settings::{Quality, TargetFormat};

pub use jpeg::encode_jpeg;
pub use png::{encode_png, encode_png_rgba};

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: &'static str,
        message: String,
    },
}

/// Encode a decoded surface into `target` at the given quality.
///
/// PNG keeps an alpha channel when the surface has one; JPEG drops it.
pub fn encode(
    image: &DecodedImage,
    target: TargetFormat,
    quality: Quality,
) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = (image.width, image.height);
    match (target, image.layout) {
        (TargetFormat::Jpeg, _) => {
            encode_jpeg(&image.rgb_pixels(), width, height, quality.as_percent())
        }
        (TargetFormat::Png, PixelLayout::Rgb) => encode_png(&image.pixels, width, height),
        (TargetFormat::Png, PixelLayout::Rgba) => encode_png_rgba(&image.pixels, width, height),
    }
}

/// Shared input validation for the RGB8 encoders.
fn validate_rgb(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    validate_pixels(pixels, width, height, PixelLayout::Rgb)
}

fn validate_pixels(
    pixels: &[u8],
    width: u32,
    height: u32,
    layout: PixelLayout,
) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * layout.channels();
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

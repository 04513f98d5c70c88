//! Width-constrained resizing of decoded surfaces.
//!
//! All functions return new `DecodedImage` instances without modifying the input.

use super::{DecodeError, DecodedImage, FilterType, PixelLayout};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if a target dimension is zero or
/// the source buffer does not match its declared size.
pub fn resize(
    image: DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    if image.width == width && image.height == height {
        return Ok(image);
    }

    let filter = filter.to_image_filter();
    match image.layout {
        PixelLayout::Rgb => {
            let rgb = image.into_rgb_image()?;
            let resized = image::imageops::resize(&rgb, width, height, filter);
            Ok(DecodedImage::from_rgb_image(resized))
        }
        PixelLayout::Rgba => {
            let rgba = image.into_rgba_image()?;
            let resized = image::imageops::resize(&rgba, width, height, filter);
            Ok(DecodedImage::from_rgba_image(resized))
        }
    }
}

/// Target dimensions for a width constraint, or `None` when the image
/// already fits.
///
/// The height is `round(height * max_width / width)`, never less than one pixel.
pub fn constrained_dimensions(width: u32, height: u32, max_width: u32) -> Option<(u32, u32)> {
    if width <= max_width || width == 0 {
        return None;
    }

    let ratio = max_width as f64 / width as f64;
    let new_height = (height as f64 * ratio).round() as u32;
    Some((max_width, new_height.max(1)))
}

//! Core types for raster decoding.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for raster decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not in a format this crate can read.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// Decoded buffer does not match its declared dimensions.
    #[error("Decoded image has invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    /// Flip horizontal + rotate 270 CW.
    Transpose = 5,
    Rotate90CW = 6,
    /// Flip horizontal + rotate 90 CW.
    Transverse = 7,
    Rotate270CW = 8,
}

impl Orientation {
    /// Returns true if this orientation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }

    /// Dimensions as displayed once this orientation is applied.
    pub fn apply_to_dimensions(self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }
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

/// Channel layout of a decoded surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelLayout {
    #[default]
    Rgb,
    /// Straight (non-premultiplied) alpha.
    Rgba,
}

impl PixelLayout {
    /// Bytes per pixel.
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
        }
    }
}

/// A decoded raster surface with RGB or RGBA pixel data.
///
/// Surfaces are only ever held as locals inside a single resize call, so their
/// memory is returned as soon as that call exits.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    pub layout: PixelLayout,
    /// Pixel data in row-major order, `layout.channels()` bytes per pixel.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Create an opaque RGB surface.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self::with_layout(width, height, PixelLayout::Rgb, pixels)
    }

    pub fn with_layout(width: u32, height: u32, layout: PixelLayout, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * layout.channels(),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            layout,
            pixels,
        }
    }

    /// Create a DecodedImage from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            layout: PixelLayout::Rgb,
            pixels: img.into_raw(),
        }
    }

    /// Create a DecodedImage from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            layout: PixelLayout::Rgba,
            pixels: img.into_raw(),
        }
    }

    pub fn has_alpha(&self) -> bool {
        self.layout == PixelLayout::Rgba
    }

    /// Consume into an image::RgbImage without copying the pixels.
    ///
    /// Fails for RGBA surfaces; see [`DecodedImage::into_rgba_image`].
    pub fn into_rgb_image(self) -> Result<image::RgbImage, DecodeError> {
        let (width, height) = (self.width, self.height);
        if self.layout != PixelLayout::Rgb {
            return Err(DecodeError::InvalidDimensions { width, height });
        }
        image::RgbImage::from_raw(width, height, self.pixels)
            .ok_or(DecodeError::InvalidDimensions { width, height })
    }

    /// Consume into an image::RgbaImage without copying the pixels.
    pub fn into_rgba_image(self) -> Result<image::RgbaImage, DecodeError> {
        let (width, height) = (self.width, self.height);
        if self.layout != PixelLayout::Rgba {
            return Err(DecodeError::InvalidDimensions { width, height });
        }
        image::RgbaImage::from_raw(width, height, self.pixels)
            .ok_or(DecodeError::InvalidDimensions { width, height })
    }

    /// RGB pixels, with any alpha channel dropped.
    pub fn rgb_pixels(&self) -> Cow<'_, [u8]> {
        match self.layout {
            PixelLayout::Rgb => Cow::Borrowed(&self.pixels),
            PixelLayout::Rgba => Cow::Owned(
                self.pixels
                    .chunks_exact(4)
                    .flat_map(|px| [px[0], px[1], px[2]])
                    .collect(),
            ),
        }
    }
}

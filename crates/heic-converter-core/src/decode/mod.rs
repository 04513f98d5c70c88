//! Raster decoding for converted buffers.
//!
//! This module provides functionality for:
//! - Sniffing the raster format of a converted buffer
//! - Reading displayed dimensions from the header alone
//! - Full decoding with EXIF orientation correction
//! - Width-constrained resizing of decoded surfaces
//!
//! The source container format is never decoded here; that is the codec
//! adapter's job. Everything in this module operates on the codec's output.

mod raster;
mod resize;
mod types;

pub use raster::{decode_image, detect_format, probe_dimensions};
pub use resize::{constrained_dimensions, resize};
pub use types::{DecodeError, DecodedImage, FilterType, Orientation, PixelLayout};

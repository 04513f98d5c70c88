//! Per-batch conversion settings.
//!
//! Settings are read-only for the duration of a batch. They arrive from the UI
//! as a plain object, so every type here round-trips through serde:
//!
//! ```json
//! { "quality": 0.8, "maxWidth": "1920", "format": "jpeg", "filter": "Bilinear" }
//! ```

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::FilterType;

/// Errors raised while building or validating settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    /// Quality outside of (0, 1].
    #[error("Quality must be in (0, 1], got {0}")]
    QualityOutOfRange(f32),

    /// Max width that is zero, negative or not a number.
    #[error("Invalid maximum width: {0}")]
    InvalidMaxWidth(String),
}

/// Encoder quality as a fraction in (0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Quality(pub(crate) f32);

impl Quality {
    /// Quality used when the user has not touched the slider.
    pub const DEFAULT: Quality = Quality(0.8);

    /// Maximum quality.
    pub const MAX: Quality = Quality(1.0);

    pub fn new(value: f32) -> Result<Self, SettingsError> {
        if value.is_finite() && value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(SettingsError::QualityOutOfRange(value))
        }
    }

    /// Build from the UI slider value (1-100). Out-of-range values are clamped.
    pub fn from_percent(percent: u8) -> Self {
        Self(f32::from(percent.clamp(1, 100)) / 100.0)
    }

    /// The fraction in (0, 1].
    pub fn value(self) -> f32 {
        self.0
    }

    /// Map onto the 1-100 scale used by the JPEG encoder.
    pub fn as_percent(self) -> u8 {
        (self.0 * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f32> for Quality {
    type Error = SettingsError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for f32 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// Maximum output width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "MaxWidthRepr", into = "MaxWidthRepr")]
pub enum MaxWidth {
    /// Keep the decoded size.
    #[default]
    Original,
    /// Downscale anything wider than this many pixels.
    Pixels(NonZeroU32),
}

impl MaxWidth {
    /// Widths offered by the settings panel, with their labels.
    pub const PRESETS: [(u32, &'static str); 4] = [
        (3840, "4K"),
        (1920, "Full HD"),
        (1280, "HD"),
        (800, "Web Optimized"),
    ];

    pub fn pixels(width: u32) -> Result<Self, SettingsError> {
        NonZeroU32::new(width)
            .map(Self::Pixels)
            .ok_or_else(|| SettingsError::InvalidMaxWidth(width.to_string()))
    }

    /// The pixel limit, or `None` when unconstrained.
    pub fn limit(self) -> Option<NonZeroU32> {
        match self {
            Self::Original => None,
            Self::Pixels(width) => Some(width),
        }
    }
}

impl fmt::Display for MaxWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => f.write_str("original"),
            Self::Pixels(width) => write!(f, "{}px", width),
        }
    }
}

/// Wire form of [`MaxWidth`]: the select box sends strings, scripts send numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum MaxWidthRepr {
    Number(i64),
    Text(String),
}

impl TryFrom<MaxWidthRepr> for MaxWidth {
    type Error = SettingsError;

    fn try_from(repr: MaxWidthRepr) -> Result<Self, Self::Error> {
        match repr {
            MaxWidthRepr::Number(n) => u32::try_from(n)
                .map_err(|_| SettingsError::InvalidMaxWidth(n.to_string()))
                .and_then(MaxWidth::pixels),
            MaxWidthRepr::Text(text) => {
                let text = text.trim();
                if text.eq_ignore_ascii_case("original") {
                    return Ok(MaxWidth::Original);
                }
                text.parse::<u32>()
                    .map_err(|_| SettingsError::InvalidMaxWidth(text.to_string()))
                    .and_then(MaxWidth::pixels)
            }
        }
    }
}

impl From<MaxWidth> for MaxWidthRepr {
    fn from(width: MaxWidth) -> Self {
        match width {
            MaxWidth::Original => MaxWidthRepr::Text("original".to_string()),
            MaxWidth::Pixels(n) => MaxWidthRepr::Number(i64::from(n.get())),
        }
    }
}

/// Output raster format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    #[default]
    #[serde(alias = "jpg", alias = "image/jpeg")]
    Jpeg,
    #[serde(alias = "image/png")]
    Png,
}

impl TargetFormat {
    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// Settings shared by every item of one batch.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionSettings {
    #[serde(default)]
    pub quality: Quality,
    #[serde(default)]
    pub max_width: MaxWidth,
    #[serde(default)]
    pub format: TargetFormat,
    #[serde(default)]
    pub filter: FilterType,
}

impl ConversionSettings {
    pub fn new(quality: Quality, max_width: MaxWidth) -> Self {
        Self {
            quality,
            max_width,
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: TargetFormat) -> Self {
        self.format = format;
        self
    }

    /// Re-check invariants that a struct literal could have bypassed.
    pub fn validate(&self) -> Result<(), SettingsError> {
        Quality::new(self.quality.value()).map(|_| ())
    }
}

//! Output formats and quality mapping.

use serde::{Deserialize, Serialize};

use super::EncodeError;

/// Container an output raster is encoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    #[default]
    Jpeg,
    Png,
    Webp,
    Bmp,
    /// Single-image icon container with a PNG payload.
    Ico,
}

impl TargetFormat {
    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            TargetFormat::Jpeg => "jpeg",
            TargetFormat::Png => "png",
            TargetFormat::Webp => "webp",
            TargetFormat::Bmp => "bmp",
            TargetFormat::Ico => "ico",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            TargetFormat::Jpeg => "image/jpeg",
            TargetFormat::Png => "image/png",
            TargetFormat::Webp => "image/webp",
            TargetFormat::Bmp => "image/bmp",
            TargetFormat::Ico => "image/x-icon",
        }
    }

    /// True if the encoder honours the quality parameter.
    pub fn is_lossy(self) -> bool {
        matches!(self, TargetFormat::Jpeg)
    }
}

/// Map a 0.0-1.0 quality to the JPEG encoder's 1-100 scale.
///
/// # Errors
///
/// Returns `EncodeError::InvalidQuality` for NaN or values outside (0, 1].
pub fn jpeg_quality(quality: f32) -> Result<u8, EncodeError> {
    if quality.is_nan() || quality <= 0.0 || quality > 1.0 {
        return Err(EncodeError::InvalidQuality(quality));
    }
    Ok((quality * 100.0).round().clamp(1.0, 100.0) as u8)
}

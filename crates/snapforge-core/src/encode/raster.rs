//! Raster encoding for export.
//!
//! Encoders come from the `image` crate. JPEG has no alpha channel, so
//! transparent pixels are composited over black first; PNG, WebP (lossless)
//! and BMP keep RGBA and ignore the quality setting.

use std::io::Cursor;

use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use super::format::jpeg_quality;
use super::{encode_ico, TargetFormat};
use crate::decode::Raster;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Quality outside (0, 1]
    #[error("Invalid quality {0}: must be in (0, 1]")]
    InvalidQuality(f32),

    /// Format not available for the requested operation
    #[error("Format {format:?} is not supported for {context}")]
    UnsupportedFormat {
        format: TargetFormat,
        context: &'static str,
    },

    /// Codec failure
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

fn validate(raster: &Raster) -> Result<(), EncodeError> {
    if raster.width == 0 || raster.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: raster.width,
            height: raster.height,
        });
    }
    let expected = raster.width as usize * raster.height as usize * 4;
    if raster.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: raster.pixels.len(),
        });
    }
    Ok(())
}

/// Encode a raster into `format`.
///
/// `quality` must be in (0, 1]; only JPEG uses it.
///
/// # Example
///
/// ```ignore
/// let jpeg = encode_raster(&raster, TargetFormat::Jpeg, 0.92)?;
/// assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
/// ```
pub fn encode_raster(
    raster: &Raster,
    format: TargetFormat,
    quality: f32,
) -> Result<Vec<u8>, EncodeError> {
    validate(raster)?;
    let jpeg_q = jpeg_quality(quality)?;

    let mut buffer = Cursor::new(Vec::new());
    let (w, h) = (raster.width, raster.height);
    let rgba = ExtendedColorType::Rgba8;

    let result = match format {
        TargetFormat::Jpeg => {
            let rgb = flatten_over_black(&raster.pixels);
            JpegEncoder::new_with_quality(&mut buffer, jpeg_q).write_image(
                &rgb,
                w,
                h,
                ExtendedColorType::Rgb8,
            )
        }
        TargetFormat::Png => PngEncoder::new(&mut buffer).write_image(&raster.pixels, w, h, rgba),
        TargetFormat::Webp => {
            WebPEncoder::new_lossless(&mut buffer).write_image(&raster.pixels, w, h, rgba)
        }
        TargetFormat::Bmp => BmpEncoder::new(&mut buffer).write_image(&raster.pixels, w, h, rgba),
        TargetFormat::Ico => return encode_ico(raster),
    };
    result.map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode as PNG, keeping alpha.
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>, EncodeError> {
    validate(raster)?;
    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(
            &raster.pixels,
            raster.width,
            raster.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Drop alpha by compositing every pixel over opaque black.
fn flatten_over_black(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let a = px[3] as u32;
        for &c in &px[..3] {
            rgb.push(((c as u32 * a + 127) / 255) as u8);
        }
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Raster {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[
                    (x * 255 / width) as u8,
                    (y * 255 / height) as u8,
                    128,
                    255,
                ]);
            }
        }
        Raster::new(width, height, pixels)
    }

    #[test]
    fn test_encode_jpeg_markers() {
        let jpeg = encode_raster(&gradient(100, 100), TargetFormat::Jpeg, 0.9).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        let len = jpeg.len();
        assert_eq!(&jpeg[len - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_png_signature() {
        let png = encode_raster(&gradient(10, 10), TargetFormat::Png, 0.92).unwrap();
        assert_eq!(&png[0..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_encode_webp_and_bmp_signatures() {
        let webp = encode_raster(&gradient(10, 10), TargetFormat::Webp, 0.92).unwrap();
        assert_eq!(&webp[0..4], b"RIFF");
        assert_eq!(&webp[8..12], b"WEBP");

        let bmp = encode_raster(&gradient(10, 10), TargetFormat::Bmp, 0.92).unwrap();
        assert_eq!(&bmp[0..2], b"BM");
    }

    #[test]
    fn test_png_round_trip_is_lossless() {
        let img = gradient(17, 9);
        let png = encode_png(&img).unwrap();
        let decoded = crate::decode::decode_image(&png).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_transparent_pixels_flatten_to_black() {
        assert_eq!(flatten_over_black(&[200, 100, 50, 0]), vec![0, 0, 0]);
        assert_eq!(flatten_over_black(&[200, 100, 50, 255]), vec![200, 100, 50]);
        assert_eq!(flatten_over_black(&[200, 100, 50, 128]), vec![100, 50, 25]);
    }

    #[test]
    fn test_quality_affects_jpeg_size() {
        let img = gradient(64, 64);
        let low = encode_raster(&img, TargetFormat::Jpeg, 0.1).unwrap();
        let high = encode_raster(&img, TargetFormat::Jpeg, 1.0).unwrap();
        assert!(high.len() > low.len());
    }

    #[test]
    fn test_invalid_quality_rejected() {
        let result = encode_raster(&gradient(4, 4), TargetFormat::Png, 1.5);
        assert!(matches!(result, Err(EncodeError::InvalidQuality(_))));
    }

    #[test]
    fn test_invalid_pixel_data() {
        let raster = Raster {
            width: 10,
            height: 10,
            pixels: vec![0; 10],
        };
        let result = encode_raster(&raster, TargetFormat::Jpeg, 0.9);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_zero_dimensions() {
        let raster = Raster {
            width: 0,
            height: 10,
            pixels: vec![],
        };
        let result = encode_raster(&raster, TargetFormat::Png, 0.9);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn format_strategy() -> impl Strategy<Value = TargetFormat> {
        prop::sample::select(vec![
            TargetFormat::Jpeg,
            TargetFormat::Png,
            TargetFormat::Webp,
            TargetFormat::Bmp,
            TargetFormat::Ico,
        ])
    }

    proptest! {
        /// Property: every format encodes any valid raster at any valid quality.
        #[test]
        fn prop_valid_input_encodes(
            (width, height) in (1u32..=40, 1u32..=40),
            format in format_strategy(),
            quality in 0.01f32..=1.0,
            seed in any::<u8>(),
        ) {
            let pixels: Vec<u8> = (0..width * height * 4)
                .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
                .collect();
            let raster = Raster::new(width, height, pixels);
            let bytes = encode_raster(&raster, format, quality).unwrap();
            prop_assert!(!bytes.is_empty());
        }

        /// Property: encoding is deterministic.
        #[test]
        fn prop_deterministic_output(
            (width, height) in (1u32..=20, 1u32..=20),
            format in format_strategy(),
        ) {
            let raster = Raster::filled(width, height, [100, 150, 200, 255]);
            let a = encode_raster(&raster, format, 0.8).unwrap();
            let b = encode_raster(&raster, format, 0.8).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}

//! Resampling shared by the geometry stage, the social card image patch and
//! the live preview.
//!
//! [`resize`] is the single call into `image::imageops`; the geometry stage
//! decides the target size. [`resize_to_fit`] produces the reduced working
//! copy the preview renders adjustments on, so slider changes stay cheap on
//! large photos.

use super::{DecodeError, FilterType, Raster};

/// Resample `image` to exactly `width` x `height`.
///
/// A raster that already has the target size is returned as a copy without
/// resampling.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if either target dimension is zero.
pub fn resize(
    image: &Raster,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<Raster, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }
    if (image.width, image.height) == (width, height) {
        return Ok(image.clone());
    }

    let rgba = image.to_rgba_image().ok_or_else(|| {
        DecodeError::CorruptedFile(format!(
            "{} bytes do not form a {}x{} raster",
            image.pixels.len(),
            image.width,
            image.height
        ))
    })?;
    let out = image::imageops::resize(&rgba, width, height, filter.to_image_filter());
    Ok(Raster::from_rgba_image(out))
}

/// Preview working copy: the longer edge is brought down to `max_edge`,
/// the shorter one follows the aspect ratio (rounded half up, at least 1).
///
/// Rasters whose longer edge is already within `max_edge` are copied as-is.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if `max_edge` is zero.
pub fn resize_to_fit(
    image: &Raster,
    max_edge: u32,
    filter: FilterType,
) -> Result<Raster, DecodeError> {
    if max_edge == 0 {
        return Err(DecodeError::InvalidDimensions {
            width: 0,
            height: 0,
        });
    }

    let long = image.width.max(image.height);
    if long <= max_edge {
        return Ok(image.clone());
    }

    let shrink = |edge: u32| {
        let scaled = (edge as u64 * max_edge as u64 * 2 + long as u64) / (long as u64 * 2);
        (scaled as u32).max(1)
    };
    resize(image, shrink(image.width), shrink(image.height), filter)
}

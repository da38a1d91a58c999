//! Pixel-space cropping.
//!
//! A [`CropRegion`] is produced by an interactive crop tool outside the core
//! and arrives here as a precomputed rectangle in source pixel coordinates.
//! The core never adjusts it: a region that is empty or leaves the source
//! bounds is rejected before any pixels are touched.
//!
//! # Coordinate System
//!
//! - (0, 0) = top-left pixel
//! - `x + width` and `y + height` are exclusive bounds

use serde::{Deserialize, Serialize};

use super::GeometryError;
use crate::decode::Raster;

/// Rectangle in source pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The full bounds of a `width` x `height` source.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Check that the region has positive area.
    ///
    /// This needs no source dimensions, so it can run before decoding.
    pub fn validate_size(&self) -> Result<(), GeometryError> {
        if self.width == 0 || self.height == 0 {
            return Err(GeometryError::EmptyRegion {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Check that the region is non-empty and lies within a source of the
    /// given dimensions.
    pub fn validate_within(&self, src_width: u32, src_height: u32) -> Result<(), GeometryError> {
        self.validate_size()?;
        let right = self.x.checked_add(self.width);
        let bottom = self.y.checked_add(self.height);
        match (right, bottom) {
            (Some(r), Some(b)) if r <= src_width && b <= src_height => Ok(()),
            _ => Err(GeometryError::RegionOutOfBounds {
                region: *self,
                src_width,
                src_height,
            }),
        }
    }

    /// True if the region covers the whole `width` x `height` source.
    pub fn is_full(&self, width: u32, height: u32) -> bool {
        *self == Self::full(width, height)
    }
}

/// Copy the pixels inside `region` into a new raster.
///
/// # Errors
///
/// Returns a `GeometryError` if the region is empty or out of bounds.
///
/// # Example
///
/// ```ignore
/// let cropped = apply_crop(&image, &CropRegion::new(100, 100, 400, 400))?;
/// assert_eq!(cropped.pixel(0, 0), image.pixel(100, 100));
/// ```
pub fn apply_crop(image: &Raster, region: &CropRegion) -> Result<Raster, GeometryError> {
    region.validate_within(image.width, image.height)?;

    if region.is_full(image.width, image.height) {
        return Ok(image.clone());
    }

    let row_bytes = region.width as usize * 4;
    let mut output = Vec::with_capacity(row_bytes * region.height as usize);

    // Copy row slices; each output row is contiguous in the source
    for y in region.y..region.y + region.height {
        let start = image.offset(region.x, y);
        output.extend_from_slice(&image.pixels[start..start + row_bytes]);
    }

    Ok(Raster::new(region.width, region.height, output))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> Raster {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Raster::new(width, height, pixels)
    }

    #[test]
    fn test_full_crop_is_identity() {
        let img = test_image(50, 50);
        let result = apply_crop(&img, &CropRegion::full(50, 50)).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_center_crop() {
        let img = test_image(10, 10);
        let result = apply_crop(&img, &CropRegion::new(2, 2, 6, 6)).unwrap();

        assert_eq!(result.width, 6);
        assert_eq!(result.height, 6);
        // Value at (2, 2) = (2 * 10 + 2) % 256 = 22
        assert_eq!(result.pixel(0, 0), [22, 22, 22, 255]);
        // Value at (7, 7) = 77
        assert_eq!(result.pixel(5, 5), [77, 77, 77, 255]);
    }

    #[test]
    fn test_crop_rectangular() {
        let img = test_image(200, 100);
        let result = apply_crop(&img, &CropRegion::new(0, 0, 50, 100)).unwrap();

        assert_eq!(result.width, 50);
        assert_eq!(result.height, 100);
        assert_eq!(result.pixels.len(), 50 * 100 * 4);
    }

    #[test]
    fn test_crop_touching_far_edge() {
        let img = test_image(10, 10);
        let result = apply_crop(&img, &CropRegion::new(9, 9, 1, 1)).unwrap();
        assert_eq!(result.pixel(0, 0), img.pixel(9, 9));
    }

    #[test]
    fn test_zero_width_rejected() {
        let img = test_image(10, 10);
        let result = apply_crop(&img, &CropRegion::new(0, 0, 0, 5));
        assert!(matches!(result, Err(GeometryError::EmptyRegion { .. })));
    }

    #[test]
    fn test_zero_height_rejected() {
        assert!(CropRegion::new(1, 1, 5, 0).validate_size().is_err());
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let img = test_image(10, 10);
        let result = apply_crop(&img, &CropRegion::new(8, 0, 5, 5));
        assert!(matches!(result, Err(GeometryError::RegionOutOfBounds { .. })));
    }

    #[test]
    fn test_overflowing_region_rejected() {
        let region = CropRegion::new(u32::MAX, 0, 2, 2);
        assert!(region.validate_within(10, 10).is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

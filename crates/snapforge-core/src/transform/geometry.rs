//! Source rectangle and destination size planning.

use serde::{Deserialize, Serialize};

use super::{apply_crop, CropRegion, GeometryError};
use crate::decode::{resize, FilterType, Raster};

/// Requested output size for resize mode.
///
/// A zero dimension is treated the same as an absent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeSpec {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default = "default_maintain_ratio")]
    pub maintain_ratio: bool,
}

fn default_maintain_ratio() -> bool {
    true
}

impl Default for ResizeSpec {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            maintain_ratio: true,
        }
    }
}

impl ResizeSpec {
    pub fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }

    pub fn height(height: u32) -> Self {
        Self {
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn exact(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            maintain_ratio: false,
        }
    }

    fn requested_width(&self) -> Option<u32> {
        self.width.filter(|&w| w > 0)
    }

    fn requested_height(&self) -> Option<u32> {
        self.height.filter(|&h| h > 0)
    }

    /// True if at least one dimension is requested.
    pub fn is_active(&self) -> bool {
        self.requested_width().is_some() || self.requested_height().is_some()
    }

    /// Destination size for a `base_w` x `base_h` input.
    ///
    /// Both dimensions given: used as-is, ratio not preserved. One given
    /// with `maintain_ratio`: the other is derived from the input aspect
    /// ratio and rounded half-up. One given without `maintain_ratio`: the
    /// other keeps the input size.
    pub fn target_for(&self, base_w: u32, base_h: u32) -> (u32, u32) {
        match (self.requested_width(), self.requested_height()) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => {
                let h = if self.maintain_ratio {
                    round_half_up(base_h as f64 * w as f64 / base_w as f64)
                } else {
                    base_h
                };
                (w, h)
            }
            (None, Some(h)) => {
                let w = if self.maintain_ratio {
                    round_half_up(base_w as f64 * h as f64 / base_h as f64)
                } else {
                    base_w
                };
                (w, h)
            }
            (None, None) => (base_w, base_h),
        }
    }
}

/// Rounds half-up and keeps at least one pixel.
fn round_half_up(value: f64) -> u32 {
    ((value + 0.5).floor().min(u32::MAX as f64) as u32).max(1)
}

/// Where to sample from and how large the destination is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryPlan {
    pub source_rect: CropRegion,
    pub dest_width: u32,
    pub dest_height: u32,
}

impl GeometryPlan {
    /// True if rendering this plan would reproduce the source unchanged.
    pub fn is_identity(&self, src_width: u32, src_height: u32) -> bool {
        self.source_rect.is_full(src_width, src_height)
            && self.dest_width == src_width
            && self.dest_height == src_height
    }
}

/// Compute the sampling rectangle and destination size.
///
/// With neither `crop` nor an active `resize` the plan is the identity.
/// A crop sets both the rectangle and the destination size; a resize then
/// rescales relative to that rectangle.
///
/// # Errors
///
/// Returns `GeometryError` if the crop region is empty or out of bounds.
pub fn plan_geometry(
    src_width: u32,
    src_height: u32,
    crop: Option<&CropRegion>,
    resize: Option<&ResizeSpec>,
) -> Result<GeometryPlan, GeometryError> {
    let mut plan = GeometryPlan {
        source_rect: CropRegion::full(src_width, src_height),
        dest_width: src_width,
        dest_height: src_height,
    };

    if let Some(region) = crop {
        region.validate_within(src_width, src_height)?;
        plan.source_rect = *region;
        plan.dest_width = region.width;
        plan.dest_height = region.height;
    }

    if let Some(spec) = resize.filter(|spec| spec.is_active()) {
        let (w, h) = spec.target_for(plan.source_rect.width, plan.source_rect.height);
        plan.dest_width = w;
        plan.dest_height = h;
    }

    Ok(plan)
}

/// Produce the destination raster for a plan.
///
/// Crops are exact pixel copies; resampling only happens when the
/// destination size differs from the source rectangle.
pub fn render_geometry(
    source: &Raster,
    plan: &GeometryPlan,
    filter: FilterType,
) -> Result<Raster, GeometryError> {
    if plan.is_identity(source.width, source.height) {
        return Ok(source.clone());
    }

    let cropped = apply_crop(source, &plan.source_rect)?;
    if cropped.width == plan.dest_width && cropped.height == plan.dest_height {
        return Ok(cropped);
    }

    resize(&cropped, plan.dest_width, plan.dest_height, filter)
        .map_err(|e| GeometryError::Resample(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_plan() {
        let plan = plan_geometry(640, 480, None, None).unwrap();
        assert!(plan.is_identity(640, 480));
        assert_eq!(plan.source_rect, CropRegion::full(640, 480));
    }

    #[test]
    fn test_crop_plan_uses_region_size() {
        let region = CropRegion::new(100, 100, 400, 400);
        let plan = plan_geometry(1000, 1000, Some(&region), None).unwrap();
        assert_eq!(plan.source_rect, region);
        assert_eq!((plan.dest_width, plan.dest_height), (400, 400));
    }

    #[test]
    fn test_crop_plan_rejects_empty_region() {
        let region = CropRegion::new(0, 0, 0, 10);
        assert!(plan_geometry(100, 100, Some(&region), None).is_err());
    }

    #[test]
    fn test_resize_width_only_keeps_ratio() {
        let plan = plan_geometry(4000, 3000, None, Some(&ResizeSpec::width(800))).unwrap();
        assert_eq!((plan.dest_width, plan.dest_height), (800, 600));
        assert_eq!(plan.source_rect, CropRegion::full(4000, 3000));
    }

    #[test]
    fn test_resize_height_only_keeps_ratio() {
        let plan = plan_geometry(4000, 3000, None, Some(&ResizeSpec::height(300))).unwrap();
        assert_eq!((plan.dest_width, plan.dest_height), (400, 300));
    }

    #[test]
    fn test_resize_rounds_half_up() {
        // 3 * 5 / 2 = 7.5 -> 8
        let plan = plan_geometry(2, 3, None, Some(&ResizeSpec::width(5))).unwrap();
        assert_eq!(plan.dest_height, 8);
        // 2 * 5 / 4 = 2.5 -> 3
        let plan = plan_geometry(2, 4, None, Some(&ResizeSpec::height(5))).unwrap();
        assert_eq!(plan.dest_width, 3);
    }

    #[test]
    fn test_resize_both_ignores_ratio() {
        let plan = plan_geometry(4000, 3000, None, Some(&ResizeSpec::exact(100, 100))).unwrap();
        assert_eq!((plan.dest_width, plan.dest_height), (100, 100));
    }

    #[test]
    fn test_resize_without_ratio_keeps_other_dimension() {
        let spec = ResizeSpec {
            width: Some(200),
            height: None,
            maintain_ratio: false,
        };
        let plan = plan_geometry(4000, 3000, None, Some(&spec)).unwrap();
        assert_eq!((plan.dest_width, plan.dest_height), (200, 3000));
    }

    #[test]
    fn test_inactive_resize_is_identity() {
        let spec = ResizeSpec {
            width: Some(0),
            height: None,
            maintain_ratio: true,
        };
        let plan = plan_geometry(50, 40, None, Some(&spec)).unwrap();
        assert!(plan.is_identity(50, 40));
    }

    #[test]
    fn test_resize_relative_to_crop() {
        let region = CropRegion::new(0, 0, 200, 100);
        let plan = plan_geometry(1000, 1000, Some(&region), Some(&ResizeSpec::width(100))).unwrap();
        assert_eq!(plan.source_rect, region);
        assert_eq!((plan.dest_width, plan.dest_height), (100, 50));
    }

    #[test]
    fn test_tiny_derived_dimension_is_at_least_one() {
        let plan = plan_geometry(1000, 1, None, Some(&ResizeSpec::width(10))).unwrap();
        assert_eq!(plan.dest_height, 1);
    }

    #[test]
    fn test_render_crop_is_exact_copy() {
        let source = Raster::new(
            3,
            2,
            (0..24).map(|v| v as u8).collect(),
        );
        let region = CropRegion::new(1, 1, 2, 1);
        let plan = plan_geometry(3, 2, Some(&region), None).unwrap();
        let out = render_geometry(&source, &plan, FilterType::Lanczos3).unwrap();
        assert_eq!((out.width, out.height), (2, 1));
        assert_eq!(out.pixel(0, 0), source.pixel(1, 1));
        assert_eq!(out.pixel(1, 0), source.pixel(2, 1));
    }

    #[test]
    fn test_render_resize_dimensions() {
        let source = Raster::filled(40, 30, [10, 20, 30, 255]);
        let plan = plan_geometry(40, 30, None, Some(&ResizeSpec::width(8))).unwrap();
        let out = render_geometry(&source, &plan, FilterType::Bilinear).unwrap();
        assert_eq!((out.width, out.height), (8, 6));
    }

    #[test]
    fn test_render_identity_clones() {
        let source = Raster::filled(5, 5, [1, 2, 3, 4]);
        let plan = plan_geometry(5, 5, None, None).unwrap();
        assert_eq!(render_geometry(&source, &plan, FilterType::Nearest).unwrap(), source);
    }
}

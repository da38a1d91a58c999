//! Geometric mapping: crop and resize.
//!
//! Every non-social pipeline run passes through [`plan_geometry`], which
//! decides which source rectangle is sampled and how large the destination
//! raster is, followed by [`render_geometry`], which produces that raster.
//!
//! # Order
//!
//! 1. Crop (pixel-space region supplied by the caller)
//! 2. Resize (relative to the cropped rectangle when both are present)
//!
//! # Coordinate System
//!
//! - Crop coordinates are in source pixels
//! - Origin is top-left corner

mod crop;
mod geometry;

pub use crop::{apply_crop, CropRegion};
pub use geometry::{plan_geometry, render_geometry, GeometryPlan, ResizeSpec};

use thiserror::Error;

/// Errors raised while mapping source geometry to the destination raster.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// Crop region has zero width or height.
    #[error("Invalid crop region: {width}x{height} has no area")]
    EmptyRegion { width: u32, height: u32 },

    /// Crop region extends past the source bounds.
    #[error(
        "Invalid crop region: {}x{} at ({}, {}) exceeds source {src_width}x{src_height}",
        .region.width, .region.height, .region.x, .region.y
    )]
    RegionOutOfBounds {
        region: CropRegion,
        src_width: u32,
        src_height: u32,
    },

    /// Resampling the destination raster failed.
    #[error("Resampling failed: {0}")]
    Resample(String),
}

//! Radial vignette.
//!
//! A black radial gradient centred on the raster: fully transparent inside
//! one third of the smaller half-dimension, ramping linearly to
//! `percent / 100` alpha at the corner radius.

use crate::composite::blend_over;
use crate::decode::Raster;

/// Radii of the vignette ramp for a `width` x `height` raster.
///
/// Returns `(inner, outer)` in pixels.
pub fn vignette_radii(width: u32, height: u32) -> (f32, f32) {
    let half_w = width as f32 / 2.0;
    let half_h = height as f32 / 2.0;
    let inner = half_w.min(half_h) / 3.0;
    let outer = (half_w * half_w + half_h * half_h).sqrt();
    (inner, outer)
}

/// Gradient alpha at distance `d` from the centre.
#[inline]
fn ramp(d: f32, inner: f32, outer: f32, max_alpha: f32) -> f32 {
    if d <= inner {
        return 0.0;
    }
    if outer <= inner {
        return max_alpha;
    }
    ((d - inner) / (outer - inner)).clamp(0.0, 1.0) * max_alpha
}

/// Composite the vignette over `raster` and return it.
///
/// `percent` is clamped to 0-100; 0 returns the raster untouched.
pub fn apply_vignette(mut raster: Raster, percent: f32) -> Raster {
    let percent = if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    };
    if percent == 0.0 || raster.is_empty() {
        return raster;
    }

    let max_alpha = percent / 100.0;
    let (inner, outer) = vignette_radii(raster.width, raster.height);
    let cx = raster.width as f32 / 2.0;
    let cy = raster.height as f32 / 2.0;
    let width = raster.width as usize;

    for (idx, chunk) in raster.pixels.chunks_exact_mut(4).enumerate() {
        let px = (idx % width) as f32 + 0.5;
        let py = (idx / width) as f32 + 0.5;
        let d = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
        let alpha = ramp(d, inner, outer, max_alpha);
        blend_over(chunk, [0.0, 0.0, 0.0], alpha);
    }

    raster
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_percent_is_identity() {
        let img = Raster::filled(20, 10, [200, 150, 100, 255]);
        assert_eq!(apply_vignette(img.clone(), 0.0), img);
    }

    #[test]
    fn test_centre_untouched() {
        let img = Raster::filled(101, 101, [200, 200, 200, 255]);
        let out = apply_vignette(img, 100.0);
        assert_eq!(out.pixel(50, 50), [200, 200, 200, 255]);
    }

    #[test]
    fn test_corner_darkened() {
        let img = Raster::filled(100, 100, [200, 200, 200, 255]);
        let out = apply_vignette(img, 100.0);
        let corner = out.pixel(0, 0);
        assert!(corner[0] < 20, "corner should be near black, got {:?}", corner);
        assert_eq!(corner[3], 255);
    }

    #[test]
    fn test_darkening_increases_outward() {
        let img = Raster::filled(200, 200, [255, 255, 255, 255]);
        let out = apply_vignette(img, 60.0);
        let near = out.pixel(140, 100)[0];
        let far = out.pixel(190, 100)[0];
        let corner = out.pixel(199, 199)[0];
        assert!(near >= far && far >= corner);
    }

    #[test]
    fn test_percent_bounds_max_alpha() {
        let img = Raster::filled(100, 100, [200, 200, 200, 255]);
        let out = apply_vignette(img, 50.0);
        // Corner pixel centre is just inside the corner radius
        let corner = out.pixel(0, 0)[0];
        assert!((100..=110).contains(&corner), "got {}", corner);
    }

    #[test]
    fn test_radii() {
        let (inner, outer) = vignette_radii(600, 300);
        assert!((inner - 50.0).abs() < 1e-4);
        assert!((outer - (300.0f32 * 300.0 + 150.0 * 150.0).sqrt()).abs() < 1e-3);
    }

    #[test]
    fn test_ramp_degenerate_radii() {
        assert_eq!(ramp(0.5, 1.0, 1.0, 0.4), 0.0);
        assert_eq!(ramp(2.0, 1.0, 1.0, 0.4), 0.4);
    }
}

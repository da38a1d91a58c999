//! Source-over alpha compositing on RGBA8 pixels.
//!
//! All colours are non-premultiplied. `blend_over` is the one place where
//! two layers meet, so every stage that paints onto a raster (vignette,
//! social card layers, segmentation) agrees on the arithmetic.

use crate::decode::Raster;

/// Composite `src` (RGB in 0.0-1.0, alpha in 0.0-1.0) over one RGBA8 pixel.
#[inline]
pub fn blend_over(dst: &mut [u8], src_rgb: [f32; 3], src_alpha: f32) {
    let sa = src_alpha.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        dst[..4].copy_from_slice(&[0, 0, 0, 0]);
        return;
    }
    for c in 0..3 {
        let dc = dst[c] as f32 / 255.0;
        let v = (src_rgb[c] * sa + dc * da * (1.0 - sa)) / out_a;
        dst[c] = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
    dst[3] = (out_a.clamp(0.0, 1.0) * 255.0).round() as u8;
}

/// Composite an RGBA8 pixel over another, scaling its alpha by `coverage`.
#[inline]
pub fn blend_pixel_over(dst: &mut [u8], src: &[u8], coverage: f32) {
    let alpha = src[3] as f32 / 255.0 * coverage;
    blend_over(
        dst,
        [
            src[0] as f32 / 255.0,
            src[1] as f32 / 255.0,
            src[2] as f32 / 255.0,
        ],
        alpha,
    );
}

/// Composite `layer` over `dst` pixel by pixel. Both must share dimensions.
pub fn composite_layer(dst: &mut Raster, layer: &Raster) {
    debug_assert_eq!((dst.width, dst.height), (layer.width, layer.height));
    for (d, s) in dst
        .pixels
        .chunks_exact_mut(4)
        .zip(layer.pixels.chunks_exact(4))
    {
        if s[3] != 0 {
            blend_pixel_over(d, s, 1.0);
        }
    }
}

/// Split a `0xRRGGBB` literal into channels.
pub const fn rgb_hex(hex: u32) -> [u8; 3] {
    [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparent_source_is_noop() {
        let mut px = [10, 20, 30, 255];
        blend_over(&mut px, [1.0, 1.0, 1.0], 0.0);
        assert_eq!(px, [10, 20, 30, 255]);
    }

    #[test]
    fn test_opaque_source_replaces() {
        let mut px = [10, 20, 30, 40];
        blend_over(&mut px, [1.0, 0.0, 0.0], 1.0);
        assert_eq!(px, [255, 0, 0, 255]);
    }

    #[test]
    fn test_half_black_over_opaque_halves_colour() {
        let mut px = [200, 100, 50, 255];
        blend_over(&mut px, [0.0, 0.0, 0.0], 0.5);
        assert_eq!(px, [100, 50, 25, 255]);
    }

    #[test]
    fn test_over_transparent_keeps_source_colour() {
        let mut px = [0, 0, 0, 0];
        blend_over(&mut px, [0.0, 1.0, 0.0], 0.5);
        assert_eq!(px, [0, 255, 0, 128]);
    }

    #[test]
    fn test_blend_pixel_coverage_scales_alpha() {
        let mut px = [0, 0, 0, 255];
        blend_pixel_over(&mut px, &[255, 255, 255, 255], 0.0);
        assert_eq!(px, [0, 0, 0, 255]);
        blend_pixel_over(&mut px, &[255, 255, 255, 255], 1.0);
        assert_eq!(px, [255, 255, 255, 255]);
    }

    #[test]
    fn test_composite_layer_skips_transparent() {
        let mut dst = Raster::filled(2, 1, [10, 10, 10, 255]);
        let layer = Raster::new(2, 1, vec![0, 0, 0, 0, 250, 0, 0, 255]);
        composite_layer(&mut dst, &layer);
        assert_eq!(dst.pixel(0, 0), [10, 10, 10, 255]);
        assert_eq!(dst.pixel(1, 0), [250, 0, 0, 255]);
    }

    #[test]
    fn test_rgb_hex() {
        assert_eq!(rgb_hex(0x8EC5FC), [0x8E, 0xC5, 0xFC]);
    }
}

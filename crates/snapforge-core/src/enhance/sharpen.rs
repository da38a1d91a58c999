//! 3x3 convolution sharpening.
//!
//! Kernel:
//!
//! ```text
//!  0 -1  0
//! -1  5 -1
//!  0 -1  0
//! ```
//!
//! Only interior pixels are convolved; the one-pixel border is copied
//! unchanged. Alpha is never modified. Every output value is computed from
//! the untouched input buffer, never from already-sharpened neighbours.

use crate::decode::Raster;

const KERNEL: [[i32; 3]; 3] = [[0, -1, 0], [-1, 5, -1], [0, -1, 0]];

/// Sharpen `source` with the given strength (0.0-1.0), returning a new raster.
///
/// Per channel: `out = original * (1 - strength) + convolved * strength`,
/// rounded and clamped to 0-255. A strength of 0 returns an exact copy.
pub fn sharpen(source: &Raster, strength: f32) -> Raster {
    let strength = if strength.is_nan() {
        0.0
    } else {
        strength.clamp(0.0, 1.0)
    };

    let mut output = source.clone();
    if strength == 0.0 || source.width < 3 || source.height < 3 {
        return output;
    }

    let w = source.width as usize;
    let h = source.height as usize;
    let src = &source.pixels;

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let idx = (y * w + x) * 4;
            for c in 0..3 {
                let mut acc = 0i32;
                for (ky, row) in KERNEL.iter().enumerate() {
                    for (kx, &k) in row.iter().enumerate() {
                        if k == 0 {
                            continue;
                        }
                        let sy = y + ky - 1;
                        let sx = x + kx - 1;
                        acc += src[(sy * w + sx) * 4 + c] as i32 * k;
                    }
                }
                let original = src[idx + c] as f32;
                let blended = original * (1.0 - strength) + acc as f32 * strength;
                output.pixels[idx + c] = blended.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    output
}

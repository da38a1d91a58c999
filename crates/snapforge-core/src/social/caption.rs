//! Caption text rendered with the 8x8 bitmap font from `font8x8`.
//!
//! Glyphs are scaled up by an integer factor and smeared one pixel to the
//! right for a bold weight. The caption sits horizontally centred with its
//! bottom edge 50px above the canvas bottom, over a soft black shadow.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};

use crate::composite::{blend_over, blend_pixel_over};
use crate::decode::Raster;
use crate::filter::{gaussian_blur, to_u8};

const GLYPH_SIZE: u32 = 8;
const GLYPH_SCALE: u32 = 7;
const BOLD_SMEAR: u32 = 1;
const BOTTOM_MARGIN: u32 = 50;

const FILL_ALPHA: f32 = 0.8;
const SHADOW_ALPHA: f32 = 0.5;
const SHADOW_SIGMA: f32 = 5.0;

fn glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Binary coverage mask of a rendered caption, positioned on the canvas.
#[derive(Debug)]
struct CaptionMask {
    /// Canvas position of the mask's top-left corner; may be negative.
    left: i64,
    top: i64,
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl CaptionMask {
    fn render(text: &str, canvas_w: u32, canvas_h: u32) -> Self {
        let cell = GLYPH_SIZE * GLYPH_SCALE;
        let count = text.chars().count() as u32;
        let width = count * cell + BOLD_SMEAR;
        let height = cell;
        let mut bits = vec![false; width as usize * height as usize];

        for (i, ch) in text.chars().enumerate() {
            let origin_x = i as u32 * cell;
            for (row, line) in glyph(ch).into_iter().enumerate() {
                for col in 0..GLYPH_SIZE {
                    if (line >> col) & 1 == 0 {
                        continue;
                    }
                    let x0 = origin_x + col * GLYPH_SCALE;
                    let y0 = row as u32 * GLYPH_SCALE;
                    for y in y0..y0 + GLYPH_SCALE {
                        for x in x0..x0 + GLYPH_SCALE + BOLD_SMEAR {
                            bits[(y * width + x) as usize] = true;
                        }
                    }
                }
            }
        }

        Self {
            left: canvas_w as i64 / 2 - width as i64 / 2,
            top: canvas_h as i64 - BOTTOM_MARGIN as i64 - height as i64,
            width,
            height,
            bits,
        }
    }

    /// Canvas coordinates of mask pixel `(x, y)` if it lands on the canvas.
    fn to_canvas(&self, x: i64, y: i64, canvas: &Raster) -> Option<(u32, u32)> {
        let cx = self.left + x;
        let cy = self.top + y;
        let inside = cx >= 0 && cy >= 0 && cx < canvas.width as i64 && cy < canvas.height as i64;
        inside.then_some((cx as u32, cy as u32))
    }
}

/// Draw `text` onto `canvas`. Blank captions are skipped.
pub fn draw_caption(canvas: &mut Raster, text: &str) {
    if text.trim().is_empty() || canvas.is_empty() {
        return;
    }
    let mask = CaptionMask::render(text, canvas.width, canvas.height);

    // Shadow layer: mask plus a blur margin, blurred as a small raster.
    let margin = (SHADOW_SIGMA * 3.0).ceil() as u32;
    let layer_w = mask.width + 2 * margin;
    let layer_h = mask.height + 2 * margin;
    let shadow_px = [0, 0, 0, to_u8(SHADOW_ALPHA)];
    let mut layer = Raster::filled(layer_w, layer_h, [0, 0, 0, 0]);
    for y in 0..mask.height {
        for x in 0..mask.width {
            if mask.bits[(y * mask.width + x) as usize] {
                let i = layer.offset(x + margin, y + margin);
                layer.pixels[i..i + 4].copy_from_slice(&shadow_px);
            }
        }
    }
    let layer = gaussian_blur(layer, SHADOW_SIGMA);

    for y in 0..layer_h {
        for x in 0..layer_w {
            let (lx, ly) = (x as i64 - margin as i64, y as i64 - margin as i64);
            if let Some((cx, cy)) = mask.to_canvas(lx, ly, canvas) {
                let src = layer.offset(x, y);
                let dst = canvas.offset(cx, cy);
                let px = [
                    layer.pixels[src],
                    layer.pixels[src + 1],
                    layer.pixels[src + 2],
                    layer.pixels[src + 3],
                ];
                blend_pixel_over(&mut canvas.pixels[dst..dst + 4], &px, 1.0);
            }
        }
    }

    for y in 0..mask.height {
        for x in 0..mask.width {
            if !mask.bits[(y * mask.width + x) as usize] {
                continue;
            }
            if let Some((cx, cy)) = mask.to_canvas(x as i64, y as i64, canvas) {
                let dst = canvas.offset(cx, cy);
                blend_over(&mut canvas.pixels[dst..dst + 4], [1.0, 1.0, 1.0], FILL_ALPHA);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_caption_is_noop() {
        let mut canvas = Raster::filled(200, 200, [10, 20, 30, 255]);
        let before = canvas.clone();
        draw_caption(&mut canvas, "   ");
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_mask_is_centred_above_bottom_margin() {
        let mask = CaptionMask::render("Hi", 1080, 1080);
        assert_eq!(mask.height, 56);
        assert_eq!(mask.width, 2 * 56 + BOLD_SMEAR);
        assert_eq!(mask.top, 1080 - 50 - 56);
        assert_eq!(mask.left, 540 - mask.width as i64 / 2);
        assert!(mask.bits.iter().any(|&b| b));
    }

    #[test]
    fn test_caption_lightens_dark_canvas() {
        let mut canvas = Raster::filled(600, 300, [0, 0, 0, 255]);
        draw_caption(&mut canvas, "HELLO");

        let brightest = canvas.pixels.chunks_exact(4).map(|p| p[0]).max().unwrap();
        assert_eq!(brightest, 204);
        // Nothing is drawn in the bottom margin.
        for x in 0..600 {
            assert_eq!(canvas.pixel(x, 299), [0, 0, 0, 255]);
        }
    }

    #[test]
    fn test_long_caption_is_clipped_not_panicking() {
        let mut canvas = Raster::filled(100, 120, [50, 50, 50, 255]);
        draw_caption(&mut canvas, "a caption far wider than the canvas");
        assert_eq!(canvas.pixels.len(), 100 * 120 * 4);
    }
}

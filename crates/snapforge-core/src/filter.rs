//! Filter composition and colour operations.
//!
//! A named [`Preset`] expands to a fixed list of [`ColorOp`] primitives. The
//! manual brightness / contrast / saturation sliders of an [`AdjustmentSet`]
//! are appended after the preset, so presets and manual scaling compose.
//!
//! ## Primitive semantics
//! Colour primitives follow the Filter Effects colour matrices (the same ones
//! browsers use for CSS `filter`), operating on non-premultiplied RGB in the
//! 0.0-1.0 range and clamping after every primitive. Alpha is never touched
//! by the colour primitives; `Blur` blurs all four channels.

use serde::{Deserialize, Serialize};

use crate::decode::Raster;
use crate::AdjustmentSet;

/// Named filter recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Identity: expands to no primitives.
    #[default]
    None,
    Grayscale,
    Sepia,
    Invert,
    Blur,
    Vintage,
    Technicolor,
    Polaroid,
    Hdr,
    Cinematic,
    Soft,
}

impl Preset {
    /// Every preset, in display order.
    pub const ALL: [Preset; 11] = [
        Preset::None,
        Preset::Grayscale,
        Preset::Sepia,
        Preset::Invert,
        Preset::Blur,
        Preset::Vintage,
        Preset::Technicolor,
        Preset::Polaroid,
        Preset::Hdr,
        Preset::Cinematic,
        Preset::Soft,
    ];

    /// The primitive operations this preset expands to.
    pub fn operations(self) -> Vec<ColorOp> {
        use ColorOp::*;
        match self {
            Preset::None => vec![],
            Preset::Grayscale => vec![Grayscale(1.0)],
            Preset::Sepia => vec![Sepia(1.0)],
            Preset::Invert => vec![Invert(1.0)],
            Preset::Blur => vec![Blur(3.0)],
            Preset::Vintage => vec![Sepia(0.5), Contrast(1.2), Saturate(0.8)],
            Preset::Technicolor => vec![Saturate(2.0), Contrast(1.2)],
            Preset::Polaroid => vec![Contrast(1.2), Brightness(1.1), Saturate(0.8), Sepia(0.2)],
            Preset::Hdr => vec![Contrast(1.5), Saturate(1.5), Brightness(1.1)],
            Preset::Cinematic => vec![
                Contrast(1.2),
                Brightness(0.9),
                Saturate(1.1),
                HueRotate(-10.0),
            ],
            Preset::Soft => vec![Brightness(1.1), Contrast(0.9), Saturate(0.9), Blur(0.5)],
        }
    }
}

/// A single colour primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "kebab-case")]
pub enum ColorOp {
    /// Amount 0.0 (none) to 1.0 (full grayscale).
    Grayscale(f32),
    /// Amount 0.0 to 1.0.
    Sepia(f32),
    /// Amount 0.0 to 1.0.
    Invert(f32),
    /// Gaussian standard deviation in pixels.
    Blur(f32),
    /// Linear multiplier, 1.0 = unchanged.
    Brightness(f32),
    /// Multiplier around mid-grey, 1.0 = unchanged.
    Contrast(f32),
    /// Saturation multiplier, 1.0 = unchanged.
    Saturate(f32),
    /// Hue rotation in degrees.
    HueRotate(f32),
}

impl ColorOp {
    /// True if applying this primitive cannot change any pixel.
    pub fn is_identity(&self) -> bool {
        match *self {
            ColorOp::Grayscale(a) | ColorOp::Sepia(a) | ColorOp::Invert(a) => a <= 0.0,
            ColorOp::Blur(radius) => radius <= 0.0,
            ColorOp::Brightness(f) | ColorOp::Contrast(f) | ColorOp::Saturate(f) => f == 1.0,
            ColorOp::HueRotate(deg) => deg.rem_euclid(360.0) == 0.0,
        }
    }

    /// Apply a pointwise primitive to one RGB triple. `Blur` is a no-op here.
    #[inline]
    fn apply_rgb(&self, rgb: [f32; 3]) -> [f32; 3] {
        let out = match *self {
            ColorOp::Grayscale(amount) => {
                let s = 1.0 - amount.clamp(0.0, 1.0);
                mul3(
                    [
                        [0.2126 + 0.7874 * s, 0.7152 - 0.7152 * s, 0.0722 - 0.0722 * s],
                        [0.2126 - 0.2126 * s, 0.7152 + 0.2848 * s, 0.0722 - 0.0722 * s],
                        [0.2126 - 0.2126 * s, 0.7152 - 0.7152 * s, 0.0722 + 0.9278 * s],
                    ],
                    rgb,
                )
            }
            ColorOp::Sepia(amount) => {
                let s = 1.0 - amount.clamp(0.0, 1.0);
                mul3(
                    [
                        [0.393 + 0.607 * s, 0.769 - 0.769 * s, 0.189 - 0.189 * s],
                        [0.349 - 0.349 * s, 0.686 + 0.314 * s, 0.168 - 0.168 * s],
                        [0.272 - 0.272 * s, 0.534 - 0.534 * s, 0.131 + 0.869 * s],
                    ],
                    rgb,
                )
            }
            ColorOp::Invert(amount) => {
                let a = amount.clamp(0.0, 1.0);
                rgb.map(|v| a * (1.0 - v) + (1.0 - a) * v)
            }
            ColorOp::Blur(_) => rgb,
            ColorOp::Brightness(f) => rgb.map(|v| v * f.max(0.0)),
            ColorOp::Contrast(f) => rgb.map(|v| (v - 0.5) * f.max(0.0) + 0.5),
            ColorOp::Saturate(f) => {
                let s = f.max(0.0);
                mul3(
                    [
                        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
                        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
                        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
                    ],
                    rgb,
                )
            }
            ColorOp::HueRotate(degrees) => {
                let (sin, cos) = degrees.to_radians().sin_cos();
                mul3(
                    [
                        [
                            0.213 + cos * 0.787 - sin * 0.213,
                            0.715 - cos * 0.715 - sin * 0.715,
                            0.072 - cos * 0.072 + sin * 0.928,
                        ],
                        [
                            0.213 - cos * 0.213 + sin * 0.143,
                            0.715 + cos * 0.285 + sin * 0.140,
                            0.072 - cos * 0.072 - sin * 0.283,
                        ],
                        [
                            0.213 - cos * 0.213 - sin * 0.787,
                            0.715 - cos * 0.715 + sin * 0.715,
                            0.072 + cos * 0.928 + sin * 0.072,
                        ],
                    ],
                    rgb,
                )
            }
        };
        out.map(|v| v.clamp(0.0, 1.0))
    }
}

#[inline]
fn mul3(m: [[f32; 3]; 3], v: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// Build the ordered operation list for a preset plus manual sliders.
///
/// The preset's primitives come first, then brightness, contrast and
/// saturation from `adjustments` (clamped to their ranges). Slider values of
/// 100 produce identity primitives, which [`apply_color_ops`] skips.
pub fn compose_filters(preset: Preset, adjustments: &AdjustmentSet) -> Vec<ColorOp> {
    let adj = adjustments.clamped();
    let mut ops = preset.operations();
    ops.push(ColorOp::Brightness(adj.brightness / 100.0));
    ops.push(ColorOp::Contrast(adj.contrast / 100.0));
    ops.push(ColorOp::Saturate(adj.saturation / 100.0));
    ops
}

/// Apply an operation list to a raster, returning the filtered raster.
///
/// Consecutive pointwise primitives are fused into a single pass; `Blur`
/// primitives run as a separate gaussian pass. Identity primitives are
/// skipped, so an all-identity list returns the input unchanged.
pub fn apply_color_ops(raster: Raster, ops: &[ColorOp]) -> Raster {
    let active: Vec<ColorOp> = ops.iter().copied().filter(|op| !op.is_identity()).collect();
    if active.is_empty() {
        return raster;
    }

    let mut raster = raster;
    let mut pending: Vec<ColorOp> = Vec::new();
    for op in active {
        if let ColorOp::Blur(sigma) = op {
            apply_pointwise(&mut raster.pixels, &pending);
            pending.clear();
            raster = gaussian_blur(raster, sigma);
        } else {
            pending.push(op);
        }
    }
    apply_pointwise(&mut raster.pixels, &pending);
    raster
}

fn apply_pointwise(pixels: &mut [u8], ops: &[ColorOp]) {
    if ops.is_empty() {
        return;
    }
    for chunk in pixels.chunks_exact_mut(4) {
        let mut rgb = [
            chunk[0] as f32 / 255.0,
            chunk[1] as f32 / 255.0,
            chunk[2] as f32 / 255.0,
        ];
        for op in ops {
            rgb = op.apply_rgb(rgb);
        }
        chunk[0] = to_u8(rgb[0]);
        chunk[1] = to_u8(rgb[1]);
        chunk[2] = to_u8(rgb[2]);
    }
}

#[inline]
pub(crate) fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Gaussian blur with standard deviation `sigma` in pixels.
pub(crate) fn gaussian_blur(raster: Raster, sigma: f32) -> Raster {
    if sigma <= 0.0 || raster.is_empty() {
        return raster;
    }
    match raster.to_rgba_image() {
        Some(img) => Raster::from_rgba_image(image::imageops::blur(&img, sigma)),
        None => raster,
    }
}

/// Approximate gaussian blur for large radii.
///
/// Above a sigma of 3 the raster is blurred at reduced resolution and scaled
/// back up, which keeps backdrop and shadow blurs (sigma 15-40) cheap.
pub(crate) fn wide_blur(raster: Raster, sigma: f32) -> Raster {
    if sigma <= 3.0 || raster.is_empty() {
        return gaussian_blur(raster, sigma);
    }
    let factor = (sigma / 3.0).ceil() as u32;
    let (width, height) = (raster.width, raster.height);
    let Some(img) = raster.to_rgba_image() else {
        return raster;
    };

    let small_w = (width / factor).max(1);
    let small_h = (height / factor).max(1);
    let filter = image::imageops::FilterType::Triangle;
    let small = image::imageops::resize(&img, small_w, small_h, filter);
    let blurred = image::imageops::blur(&small, sigma / factor as f32);
    Raster::from_rgba_image(image::imageops::resize(&blurred, width, height, filter))
}

/// Multiply RGB by `factor`, leaving alpha untouched.
pub(crate) fn scale_brightness(raster: &mut Raster, factor: f32) {
    apply_pointwise(&mut raster.pixels, &[ColorOp::Brightness(factor)]);
}

//! Card backgrounds.

use serde::{Deserialize, Serialize};
use tiny_skia::{
    Color, GradientStop, LinearGradient, Paint, PathBuilder, Point, SpreadMode, Transform,
};

use super::canvas::{blank_pixmap, fill_with_patch, from_pixmap, visible_patch};
use super::layout::{place_image, SocialFit};
use super::shape::Rect;
use crate::composite::rgb_hex;
use crate::decode::{FilterType, Raster};
use crate::filter::{scale_brightness, wide_blur};
use crate::transform::GeometryError;

const BACKDROP_SIGMA: f32 = 40.0;
const BACKDROP_BRIGHTNESS: f32 = 0.8;

const GRADIENT_A: &[(f32, u32)] = &[(0.0, 0x8EC5FC), (1.0, 0xE0C3FC)];
const GRADIENT_B: &[(f32, u32)] = &[(0.0, 0xFA8BFF), (0.5, 0x2BD2FF), (1.0, 0x2BFF88)];

/// Fill behind the placed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SocialBackground {
    /// The source itself, cover-fitted, blurred and darkened.
    #[default]
    Blur,
    SolidWhite,
    SolidBlack,
    /// Light blue to lavender.
    GradientA,
    /// Pink, cyan, green.
    GradientB,
}

/// Paint a `width` x `height` background for `source`.
pub fn paint_background(
    source: &Raster,
    width: u32,
    height: u32,
    background: SocialBackground,
    filter: FilterType,
) -> Result<Raster, GeometryError> {
    match background {
        SocialBackground::Blur => blurred_backdrop(source, width, height, filter),
        SocialBackground::SolidWhite => Ok(Raster::filled(width, height, [255, 255, 255, 255])),
        SocialBackground::SolidBlack => Ok(Raster::filled(width, height, [0, 0, 0, 255])),
        SocialBackground::GradientA => diagonal_gradient(width, height, GRADIENT_A),
        SocialBackground::GradientB => diagonal_gradient(width, height, GRADIENT_B),
    }
}

fn blurred_backdrop(
    source: &Raster,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<Raster, GeometryError> {
    let canvas_rect = Rect::new(0.0, 0.0, width as f32, height as f32);
    let placed = place_image(source.width, source.height, &canvas_rect, SocialFit::Cover);
    let Some(patch) = visible_patch(source, &placed, &canvas_rect, filter)? else {
        return Ok(Raster::filled(width, height, [0, 0, 0, 255]));
    };

    let mut pixmap = blank_pixmap(width, height)?;
    let whole = PathBuilder::from_rect(canvas_bounds(width, height)?);
    fill_with_patch(&mut pixmap, &whole, &patch)?;

    let mut backdrop = wide_blur(from_pixmap(&pixmap), BACKDROP_SIGMA);
    scale_brightness(&mut backdrop, BACKDROP_BRIGHTNESS);
    Ok(backdrop)
}

/// Linear gradient from the top-left corner to the bottom-right corner.
fn diagonal_gradient(
    width: u32,
    height: u32,
    stops: &[(f32, u32)],
) -> Result<Raster, GeometryError> {
    let stops = stops
        .iter()
        .map(|&(pos, hex)| {
            let [r, g, b] = rgb_hex(hex);
            GradientStop::new(pos, Color::from_rgba8(r, g, b, 255))
        })
        .collect();
    let shader = LinearGradient::new(
        Point::from_xy(0.0, 0.0),
        Point::from_xy(width as f32, height as f32),
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    )
    .ok_or_else(|| GeometryError::Resample("degenerate gradient".to_string()))?;
    let paint = Paint {
        shader,
        ..Default::default()
    };

    let mut pixmap = blank_pixmap(width, height)?;
    pixmap.fill_rect(canvas_bounds(width, height)?, &paint, Transform::identity(), None);
    Ok(from_pixmap(&pixmap))
}

fn canvas_bounds(width: u32, height: u32) -> Result<tiny_skia::Rect, GeometryError> {
    tiny_skia::Rect::from_xywh(0.0, 0.0, width as f32, height as f32)
        .ok_or_else(|| GeometryError::Resample(format!("empty {width}x{height} canvas")))
}

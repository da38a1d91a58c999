//! Social card compositor.
//!
//! Lays a source image out on a fixed-size template canvas.
//!
//! ## Layer Order
//! 1. Background ([`SocialBackground`])
//! 2. Drop shadow of the clipped image (if `shadow_percent > 0`)
//! 3. Source image, clipped to a rounded rectangle
//! 4. Border stroke (if `border_width > 0`)
//! 5. Caption (if non-blank)
//!
//! Each layer is fully composited before the next one starts. The clip is
//! the placed image rectangle itself, so with [`SocialFit::Cover`] the image
//! may run past the padding up to the canvas edge.
//!
//! Shapes, the image fill and the border are rasterized with tiny-skia on a
//! single canvas pixmap. Only the visible part of the source is ever
//! resampled.

mod background;
mod canvas;
mod caption;
mod layout;
mod shape;

pub use background::{paint_background, SocialBackground};
pub use caption::draw_caption;
pub use layout::{content_area, place_image, SocialFit, SocialTemplate};
pub use shape::{Rect, RoundedRect};

use serde::{Deserialize, Serialize};
use tiny_skia::{FillRule, Paint, Pixmap, PixmapPaint, Stroke, Transform};

use self::canvas::{blank_pixmap, fill_with_patch, from_pixmap, to_pixmap, visible_patch};
use crate::config::PipelineConfig;
use crate::decode::Raster;
use crate::filter::{to_u8, wide_blur};
use crate::transform::GeometryError;

const SHADOW_OFFSET_Y: f32 = 20.0;
/// Half of the 50px shadow blur extent.
const SHADOW_SIGMA: f32 = 25.0;
const MAX_PADDING_PERCENT: f32 = 50.0;

/// Styling knobs for a social card.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialStyle {
    /// Inset of the content area, 0-50 percent of half the shorter side.
    pub padding_percent: f32,
    /// Corner radius of the image clip in pixels.
    pub radius_px: f32,
    /// Drop shadow opacity, 0-100.
    pub shadow_percent: f32,
    /// White border stroke width in pixels.
    pub border_width: f32,
    pub background: SocialBackground,
    pub caption: Option<String>,
}

impl SocialStyle {
    /// Copy with every numeric field clamped to its range (NaN becomes 0).
    pub fn clamped(&self) -> Self {
        let clamp = |v: f32, max: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, max) };
        Self {
            padding_percent: clamp(self.padding_percent, MAX_PADDING_PERCENT),
            radius_px: clamp(self.radius_px, f32::MAX),
            shadow_percent: clamp(self.shadow_percent, 100.0),
            border_width: clamp(self.border_width, f32::MAX),
            background: self.background,
            caption: self.caption.clone(),
        }
    }
}

/// Everything the compositor needs besides the source.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialCard {
    pub template: SocialTemplate,
    pub style: SocialStyle,
    pub fit: SocialFit,
}

/// Compose `source` onto the card's template canvas.
///
/// The result always has exactly the template's dimensions.
///
/// # Errors
///
/// Returns `GeometryError::Resample` if scaling the source fails.
pub fn compose_social_card(
    source: &Raster,
    card: &SocialCard,
    config: &PipelineConfig,
) -> Result<Raster, GeometryError> {
    let (width, height) = card.template.dimensions();
    let style = card.style.clamped();

    let background = paint_background(
        source,
        width,
        height,
        style.background,
        config.background_filter,
    )?;

    let area = content_area(width, height, style.padding_percent);
    let placed = place_image(source.width, source.height, &area, card.fit);
    let canvas_rect = Rect::new(0.0, 0.0, width as f32, height as f32);
    tracing::debug!(
        width,
        height,
        placed_w = placed.width,
        placed_h = placed.height,
        "social card layout"
    );

    let clip = RoundedRect::new(placed, style.radius_px);
    let patch = visible_patch(source, &placed, &canvas_rect, config.resize_filter)?;
    let (Some(patch), Some(path)) = (patch, clip.to_path()) else {
        let mut canvas = background;
        if let Some(text) = &style.caption {
            draw_caption(&mut canvas, text);
        }
        return Ok(canvas);
    };

    let mut canvas = to_pixmap(&background)?;
    if style.shadow_percent > 0.0 {
        draw_shadow(&mut canvas, &clip, style.shadow_percent / 100.0)?;
    }

    fill_with_patch(&mut canvas, &path, &patch)?;

    if style.border_width > 0.0 {
        let mut paint = Paint::default();
        paint.set_color_rgba8(255, 255, 255, 255);
        paint.anti_alias = true;
        let stroke = Stroke {
            width: style.border_width,
            ..Default::default()
        };
        canvas.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    let mut canvas = from_pixmap(&canvas);
    if let Some(text) = &style.caption {
        draw_caption(&mut canvas, text);
    }

    Ok(canvas)
}

fn draw_shadow(
    canvas: &mut Pixmap,
    clip: &RoundedRect,
    alpha: f32,
) -> Result<(), GeometryError> {
    let shape = RoundedRect::new(clip.rect.translate(0.0, SHADOW_OFFSET_Y), clip.radius);
    let Some(path) = shape.to_path() else {
        return Ok(());
    };

    let mut layer = blank_pixmap(canvas.width(), canvas.height())?;
    let mut paint = Paint::default();
    paint.set_color_rgba8(0, 0, 0, to_u8(alpha));
    paint.anti_alias = true;
    layer.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);

    let blurred = to_pixmap(&wide_blur(from_pixmap(&layer), SHADOW_SIGMA))?;
    canvas.draw_pixmap(
        0,
        0,
        blurred.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> Raster {
        let mut pixels = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let v = if (x / 4 + y / 4) % 2 == 0 { 230 } else { 40 };
                pixels.extend_from_slice(&[v, 128, 255 - v, 255]);
            }
        }
        Raster::new(width, height, pixels)
    }

    fn card(template: SocialTemplate, style: SocialStyle, fit: SocialFit) -> SocialCard {
        SocialCard {
            template,
            style,
            fit,
        }
    }

    fn black_style(padding: f32) -> SocialStyle {
        SocialStyle {
            padding_percent: padding,
            background: SocialBackground::SolidBlack,
            ..Default::default()
        }
    }

    #[test]
    fn test_output_matches_template_dimensions() {
        let src = checker(37, 91);
        for template in SocialTemplate::ALL {
            let out = compose_social_card(
                &src,
                &card(template, black_style(5.0), SocialFit::Cover),
                &PipelineConfig::default(),
            )
            .unwrap();
            assert_eq!((out.width, out.height), template.dimensions());
        }
    }

    #[test]
    fn test_story_padding_leaves_black_corners() {
        let src = checker(64, 48);
        let out = compose_social_card(
            &src,
            &card(SocialTemplate::Story, black_style(10.0), SocialFit::Contain),
            &PipelineConfig::default(),
        )
        .unwrap();
        assert_eq!((out.width, out.height), (1080, 1920));
        for (x, y) in [(0, 0), (1079, 0), (0, 1919), (1079, 1919)] {
            assert_eq!(out.pixel(x, y), [0, 0, 0, 255]);
        }
        // Image sits in the vertical middle.
        assert_ne!(out.pixel(540, 960), [0, 0, 0, 255]);
    }

    #[test]
    fn test_contain_without_padding_spans_width() {
        let src = Raster::filled(200, 100, [255, 0, 0, 255]);
        let out = compose_social_card(
            &src,
            &card(SocialTemplate::Square, black_style(0.0), SocialFit::Contain),
            &PipelineConfig::default(),
        )
        .unwrap();
        assert_eq!(out.pixel(0, 540), [255, 0, 0, 255]);
        assert_eq!(out.pixel(1079, 540), [255, 0, 0, 255]);
        assert_eq!(out.pixel(540, 10), [0, 0, 0, 255]);
        assert_eq!(out.pixel(540, 1070), [0, 0, 0, 255]);
    }

    #[test]
    fn test_cover_overflows_padding_to_canvas_edge() {
        let src = Raster::filled(300, 100, [0, 255, 0, 255]);
        let out = compose_social_card(
            &src,
            &card(SocialTemplate::Square, black_style(20.0), SocialFit::Cover),
            &PipelineConfig::default(),
        )
        .unwrap();
        // Inset is 108px; the placed image spans x -756..1836 and y 108..972.
        assert_eq!(out.pixel(20, 540), [0, 255, 0, 255]);
        assert_eq!(out.pixel(1079, 540), [0, 255, 0, 255]);
        assert_eq!(out.pixel(540, 100), [0, 0, 0, 255]);
        assert_eq!(out.pixel(540, 120), [0, 255, 0, 255]);
    }

    #[test]
    fn test_cover_radius_capped_by_placed_image() {
        let src = Raster::filled(300, 100, [0, 255, 0, 255]);
        let style = SocialStyle {
            radius_px: 400.0,
            ..black_style(20.0)
        };
        let out = compose_social_card(
            &src,
            &card(SocialTemplate::Square, style, SocialFit::Cover),
            &PipelineConfig::default(),
        )
        .unwrap();
        // The 432px radius corners lie off-canvas; the visible band stays square.
        assert_eq!(out.pixel(0, 120), [0, 255, 0, 255]);
        assert_eq!(out.pixel(1079, 960), [0, 255, 0, 255]);
    }

    #[test]
    fn test_thin_banner_composes_at_template_size() {
        let src = Raster::filled(4000, 10, [200, 40, 40, 255]);
        for fit in [SocialFit::Contain, SocialFit::Cover] {
            let out = compose_social_card(
                &src,
                &card(SocialTemplate::Story, SocialStyle::default(), fit),
                &PipelineConfig::default(),
            )
            .unwrap();
            assert_eq!((out.width, out.height), (1080, 1920));
            assert_eq!(out.pixel(540, 960), [200, 40, 40, 255]);
        }
    }

    #[test]
    fn test_rounded_corners_show_background() {
        let src = Raster::filled(100, 100, [0, 0, 255, 255]);
        let style = SocialStyle {
            radius_px: 100.0,
            ..black_style(0.0)
        };
        let out = compose_social_card(
            &src,
            &card(SocialTemplate::Square, style, SocialFit::Contain),
            &PipelineConfig::default(),
        )
        .unwrap();
        assert_eq!(out.pixel(2, 2), [0, 0, 0, 255]);
        assert_eq!(out.pixel(540, 540), [0, 0, 255, 255]);
    }

    #[test]
    fn test_border_is_white() {
        let src = Raster::filled(100, 100, [0, 0, 255, 255]);
        let style = SocialStyle {
            border_width: 10.0,
            ..black_style(10.0)
        };
        let out = compose_social_card(
            &src,
            &card(SocialTemplate::Square, style, SocialFit::Contain),
            &PipelineConfig::default(),
        )
        .unwrap();
        // Content area starts at 54px; the stroke is centred on that edge.
        assert_eq!(out.pixel(54, 540), [255, 255, 255, 255]);
        assert_eq!(out.pixel(540, 540), [0, 0, 255, 255]);
    }

    #[test]
    fn test_shadow_darkens_below_image() {
        let src = Raster::filled(100, 50, [255, 255, 255, 255]);
        let plain = compose_social_card(
            &src,
            &card(
                SocialTemplate::Square,
                SocialStyle {
                    background: SocialBackground::SolidWhite,
                    padding_percent: 30.0,
                    ..Default::default()
                },
                SocialFit::Contain,
            ),
            &PipelineConfig::default(),
        )
        .unwrap();
        let shadowed = compose_social_card(
            &src,
            &card(
                SocialTemplate::Square,
                SocialStyle {
                    background: SocialBackground::SolidWhite,
                    padding_percent: 30.0,
                    shadow_percent: 100.0,
                    ..Default::default()
                },
                SocialFit::Contain,
            ),
            &PipelineConfig::default(),
        )
        .unwrap();

        // Placed image spans y 351..729; just below it the shadow shows.
        assert_eq!(plain.pixel(540, 740), [255, 255, 255, 255]);
        assert!(shadowed.pixel(540, 740)[0] < 250);
        // The image itself is drawn over its shadow.
        assert_eq!(shadowed.pixel(540, 540), [255, 255, 255, 255]);
    }

    #[test]
    fn test_style_clamping() {
        let style = SocialStyle {
            padding_percent: 90.0,
            radius_px: -4.0,
            shadow_percent: f32::NAN,
            ..Default::default()
        }
        .clamped();
        assert_eq!(style.padding_percent, 50.0);
        assert_eq!(style.radius_px, 0.0);
        assert_eq!(style.shadow_percent, 0.0);
    }
}

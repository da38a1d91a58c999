//! Canvas templates and image placement.
//!
//! Placement is a pure function of source size, canvas size, padding and
//! fit, so it can be tested without touching pixels.

use serde::{Deserialize, Serialize};

use super::shape::Rect;

/// Named output canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SocialTemplate {
    /// 1080 x 1080
    #[default]
    Square,
    /// 1080 x 1350
    Portrait,
    /// 1080 x 1920
    Story,
    /// 1200 x 627
    LandscapeLinkedin,
    /// 1200 x 675
    LandscapeTwitter,
}

impl SocialTemplate {
    pub const ALL: [SocialTemplate; 5] = [
        SocialTemplate::Square,
        SocialTemplate::Portrait,
        SocialTemplate::Story,
        SocialTemplate::LandscapeLinkedin,
        SocialTemplate::LandscapeTwitter,
    ];

    /// Canvas `(width, height)` in pixels.
    pub const fn dimensions(self) -> (u32, u32) {
        match self {
            SocialTemplate::Square => (1080, 1080),
            SocialTemplate::Portrait => (1080, 1350),
            SocialTemplate::Story => (1080, 1920),
            SocialTemplate::LandscapeLinkedin => (1200, 627),
            SocialTemplate::LandscapeTwitter => (1200, 675),
        }
    }
}

/// How the source image is scaled into the content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialFit {
    /// Whole image visible, letterboxed inside the content area.
    #[default]
    Contain,
    /// Content area filled, overflow cropped.
    Cover,
}

/// Content area left after insetting every edge by
/// `padding_percent / 100 * min(w, h) / 2`.
pub fn content_area(canvas_w: u32, canvas_h: u32, padding_percent: f32) -> Rect {
    let (w, h) = (canvas_w as f32, canvas_h as f32);
    let inset = padding_percent / 100.0 * (w.min(h) / 2.0);
    Rect::new(inset, inset, w - 2.0 * inset, h - 2.0 * inset)
}

/// Scale a `src_w` x `src_h` image into `area` and centre it.
///
/// With [`SocialFit::Cover`] the returned rectangle may extend past `area`;
/// only the canvas bounds clip it.
pub fn place_image(src_w: u32, src_h: u32, area: &Rect, fit: SocialFit) -> Rect {
    let (sw, sh) = (src_w.max(1) as f32, src_h.max(1) as f32);
    let sx = area.width / sw;
    let sy = area.height / sh;
    let scale = match fit {
        SocialFit::Contain => sx.min(sy),
        SocialFit::Cover => sx.max(sy),
    };

    let draw_w = sw * scale;
    let draw_h = sh * scale;
    Rect::new(
        area.x + (area.width - draw_w) / 2.0,
        area.y + (area.height - draw_h) / 2.0,
        draw_w,
        draw_h,
    )
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: contain placement keeps the source aspect ratio and
        /// stays inside the canvas.
        #[test]
        fn prop_contain_is_inscribed(
            src_w in 1u32..5000,
            src_h in 1u32..5000,
            template in prop::sample::select(SocialTemplate::ALL.to_vec()),
        ) {
            let (w, h) = template.dimensions();
            let area = content_area(w, h, 0.0);
            let placed = place_image(src_w, src_h, &area, SocialFit::Contain);

            let src_ratio = src_w as f64 / src_h as f64;
            let placed_ratio = placed.width as f64 / placed.height as f64;
            prop_assert!((placed_ratio / src_ratio - 1.0).abs() < 1e-3);

            prop_assert!(placed.x >= -1e-3 && placed.y >= -1e-3);
            prop_assert!(placed.right() <= w as f32 + 1e-2);
            prop_assert!(placed.bottom() <= h as f32 + 1e-2);
        }

        /// Property: cover placement always fills the content area.
        #[test]
        fn prop_cover_fills_area(
            src_w in 1u32..5000,
            src_h in 1u32..5000,
            padding in 0.0f32..=50.0,
        ) {
            let area = content_area(1080, 1350, padding);
            let placed = place_image(src_w, src_h, &area, SocialFit::Cover);
            prop_assert!(placed.width >= area.width - 1e-2);
            prop_assert!(placed.height >= area.height - 1e-2);
        }
    }
}

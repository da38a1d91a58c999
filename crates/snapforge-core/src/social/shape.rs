//! Rectangles and rounded-rectangle outlines.
//!
//! Layout works in plain `f32` rectangles; drawing goes through
//! [`RoundedRect::to_path`] and tiny-skia.

use tiny_skia::{Path, PathBuilder};

/// Cubic Bezier control distance for a quarter circle of radius 1.
const KAPPA: f32 = 0.552_284_75;

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Overlap of two rectangles; zero-sized if they do not intersect.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect::new(x, y, (right - x).max(0.0), (bottom - y).max(0.0))
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// A rectangle with uniformly rounded corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedRect {
    pub rect: Rect,
    pub radius: f32,
}

impl RoundedRect {
    /// The corner radius is reduced to at most half the shorter side.
    pub fn new(rect: Rect, radius: f32) -> Self {
        let max_radius = (rect.width.min(rect.height) / 2.0).max(0.0);
        Self {
            rect,
            radius: radius.clamp(0.0, max_radius),
        }
    }

    /// Outline as a tiny-skia path: straight edges joined by cubic
    /// quarter-circle corners. `None` for a rectangle without area.
    pub fn to_path(&self) -> Option<Path> {
        let r = self.rect;
        let bounds = tiny_skia::Rect::from_xywh(r.x, r.y, r.width, r.height)?;
        if self.radius <= 0.0 {
            return Some(PathBuilder::from_rect(bounds));
        }

        let (left, top, right, bottom) = (r.x, r.y, r.right(), r.bottom());
        let rad = self.radius;
        let c = rad * (1.0 - KAPPA);

        let mut pb = PathBuilder::new();
        pb.move_to(left + rad, top);
        pb.line_to(right - rad, top);
        pb.cubic_to(right - c, top, right, top + c, right, top + rad);
        pb.line_to(right, bottom - rad);
        pb.cubic_to(right, bottom - c, right - c, bottom, right - rad, bottom);
        pb.line_to(left + rad, bottom);
        pb.cubic_to(left + c, bottom, left, bottom - c, left, bottom - rad);
        pb.line_to(left, top + rad);
        pb.cubic_to(left, top + c, left + c, top, left + rad, top);
        pb.close();
        pb.finish()
    }
}

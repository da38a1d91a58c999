//! Bridging between [`Raster`] and tiny-skia pixmaps.
//!
//! tiny-skia stores premultiplied RGBA; rasters are straight alpha. The
//! conversions here are the only place the two meet.

use tiny_skia::{
    ColorU8, FillRule, FilterQuality, Paint, Path, Pattern, Pixmap, SpreadMode, Transform,
};

use super::shape::Rect;
use crate::decode::{resize, FilterType, Raster};
use crate::transform::{apply_crop, CropRegion, GeometryError};

/// Allocate a transparent pixmap.
pub(crate) fn blank_pixmap(width: u32, height: u32) -> Result<Pixmap, GeometryError> {
    Pixmap::new(width, height).ok_or_else(|| {
        GeometryError::Resample(format!("cannot allocate a {width}x{height} canvas"))
    })
}

pub(crate) fn to_pixmap(raster: &Raster) -> Result<Pixmap, GeometryError> {
    let mut pixmap = blank_pixmap(raster.width, raster.height)?;
    for (dst, src) in pixmap
        .pixels_mut()
        .iter_mut()
        .zip(raster.pixels.chunks_exact(4))
    {
        *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    }
    Ok(pixmap)
}

pub(crate) fn from_pixmap(pixmap: &Pixmap) -> Raster {
    let mut pixels = Vec::with_capacity(pixmap.pixels().len() * 4);
    for p in pixmap.pixels() {
        let c = p.demultiply();
        pixels.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Raster::new(pixmap.width(), pixmap.height(), pixels)
}

/// The part of a source image that lands inside a window, already
/// resampled to roughly its on-canvas size.
#[derive(Debug)]
pub(crate) struct ImagePatch {
    pub raster: Raster,
    /// Where `raster` goes on the canvas.
    pub dest: Rect,
}

/// Cut out and resample only the part of `source` that is visible when the
/// whole source is scaled onto `placed` and viewed through `window`.
///
/// The patch is at most one source pixel (scaled) larger than the visible
/// area on each side, however far `placed` overflows the window.
/// Returns `None` when nothing is visible.
pub(crate) fn visible_patch(
    source: &Raster,
    placed: &Rect,
    window: &Rect,
    filter: FilterType,
) -> Result<Option<ImagePatch>, GeometryError> {
    let visible = placed.intersect(window);
    if source.is_empty() || visible.width <= 0.0 || visible.height <= 0.0 {
        return Ok(None);
    }

    // Source pixels per canvas pixel.
    let kx = source.width as f32 / placed.width;
    let ky = source.height as f32 / placed.height;

    let span = |start: f32, end: f32, k: f32, len: u32| {
        let a = ((start * k).floor().max(0.0) as u32).min(len - 1);
        let b = ((end * k).ceil() as u32).clamp(a + 1, len);
        (a, b)
    };
    let (x0, x1) = span(
        visible.x - placed.x,
        visible.right() - placed.x,
        kx,
        source.width,
    );
    let (y0, y1) = span(
        visible.y - placed.y,
        visible.bottom() - placed.y,
        ky,
        source.height,
    );

    let cropped = apply_crop(source, &CropRegion::new(x0, y0, x1 - x0, y1 - y0))?;
    let dest = Rect::new(
        placed.x + x0 as f32 / kx,
        placed.y + y0 as f32 / ky,
        (x1 - x0) as f32 / kx,
        (y1 - y0) as f32 / ky,
    );
    let width = (dest.width.round() as u32).max(1);
    let height = (dest.height.round() as u32).max(1);
    let raster = resize(&cropped, width, height, filter)
        .map_err(|e| GeometryError::Resample(e.to_string()))?;

    Ok(Some(ImagePatch { raster, dest }))
}

/// Fill `path` on `canvas` with the patch mapped onto its destination.
pub(crate) fn fill_with_patch(
    canvas: &mut Pixmap,
    path: &Path,
    patch: &ImagePatch,
) -> Result<(), GeometryError> {
    let image = to_pixmap(&patch.raster)?;
    let to_canvas = Transform::from_row(
        patch.dest.width / patch.raster.width as f32,
        0.0,
        0.0,
        patch.dest.height / patch.raster.height as f32,
        patch.dest.x,
        patch.dest.y,
    );
    let paint = Paint {
        shader: Pattern::new(
            image.as_ref(),
            SpreadMode::Pad,
            FilterQuality::Nearest,
            1.0,
            to_canvas,
        ),
        anti_alias: true,
        ..Default::default()
    };
    canvas.fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);
    Ok(())
}

//! Layer rasterization at OCR resolution.
//!
//! A [`RasterFrame`] fixes the pixel grid a board space is rendered into and
//! carries the exact inverse used to project OCR boxes back onto the board.

use image::RgbImage;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use silkscan_core::{BoardSpace, Primitive, VectorGraphic, PLOTTER_UNITS_PER_NATIVE};
use tiny_skia::{
    Color, FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke, Transform,
};

/// Rasterization failure for one layer.
#[derive(thiserror::Error, Debug)]
pub enum RasterError {
    #[error("graphic contains non-finite coordinates")]
    NonFiniteGeometry,
    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },
}

/// Pixel grid of one OCR raster, derived from the board space alone.
///
/// All silkscreen layers of a board share the same frame, so their rasters
/// align pixel-for-pixel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RasterFrame {
    space: BoardSpace,
    width: u32,
    height: u32,
    /// Pixels per plotter unit along x.
    scale_x: f64,
    /// Pixels per plotter unit along y.
    scale_y: f64,
}

impl RasterFrame {
    /// Size the larger board dimension to `target_resolution` pixels, with the
    /// scale capped at `max_upscale` pixels per plotter unit.
    pub fn new(space: &BoardSpace, target_resolution: u32, max_upscale: f64) -> Self {
        let target = target_resolution as f64;
        let scale = (target / space.width())
            .min(target / space.height())
            .min(max_upscale);
        // Guard against `target / w * w` landing a hair below the target.
        let width = ((space.width() * scale + 1e-9).floor() as u32).max(1);
        let height = ((space.height() * scale + 1e-9).floor() as u32).max(1);
        // The drawing is stretched to the whole canvas, so the effective
        // per-axis scale follows the rounded canvas size.
        Self {
            space: *space,
            width,
            height,
            scale_x: width as f64 / space.width(),
            scale_y: height as f64 / space.height(),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn space(&self) -> &BoardSpace {
        &self.space
    }

    /// Pixels per plotter unit as `(x, y)`.
    #[inline]
    pub fn scale(&self) -> (f64, f64) {
        (self.scale_x, self.scale_y)
    }

    /// Plotter-unit board point (Y up) to raster pixel coordinates (Y down).
    #[inline]
    pub fn plotter_to_raster(&self, p: Point2<f64>) -> Point2<f64> {
        let flipped_y = self.space.y_translate() - p.y;
        Point2::new(
            (p.x - self.space.min_x()) * self.scale_x,
            (flipped_y - self.space.min_y()) * self.scale_y,
        )
    }

    /// Raster pixel coordinates back to a plotter-unit board point.
    #[inline]
    pub fn raster_to_plotter(&self, p: Point2<f64>) -> Point2<f64> {
        let x = p.x / self.scale_x + self.space.min_x();
        let flipped_y = p.y / self.scale_y + self.space.min_y();
        Point2::new(x, self.space.y_translate() - flipped_y)
    }

    /// Raster pixel coordinates to native board units.
    #[inline]
    pub fn raster_to_board(&self, p: Point2<f64>) -> Point2<f64> {
        let q = self.raster_to_plotter(p);
        Point2::new(q.x / PLOTTER_UNITS_PER_NATIVE, q.y / PLOTTER_UNITS_PER_NATIVE)
    }

    /// Plotter-unit to raster-pixel mapping as a drawing transform.
    pub fn transform(&self) -> Transform {
        let (sx, sy) = (self.scale_x, self.scale_y);
        Transform::from_row(
            sx as f32,
            0.0,
            0.0,
            -sy as f32,
            (-self.space.min_x() * sx) as f32,
            ((self.space.y_translate() - self.space.min_y()) * sy) as f32,
        )
    }
}

fn polyline(points: &[Point2<f64>], close: bool) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in rest {
        pb.line_to(p.x as f32, p.y as f32);
    }
    if close {
        pb.close();
    }
    pb.finish()
}

fn primitive_path(prim: &Primitive) -> Option<Path> {
    match prim {
        Primitive::Polygon { points } if points.len() >= 3 => polyline(points, true),
        Primitive::Polygon { .. } => None,
        Primitive::Stroke { points, .. } => polyline(points, false),
        Primitive::Circle { center, radius } => {
            PathBuilder::from_circle(center.x as f32, center.y as f32, radius.abs() as f32)
        }
    }
}

/// Render `graphic` into `frame` as dark ink on a white background.
///
/// Polygons fill even-odd, strokes get round caps and joins. With
/// `anti_alias` the edges come out grey the way a canvas renderer draws them.
pub fn rasterize(
    graphic: &VectorGraphic,
    frame: &RasterFrame,
    anti_alias: bool,
) -> Result<RgbImage, RasterError> {
    if !graphic.is_finite() {
        return Err(RasterError::NonFiniteGeometry);
    }
    let (width, height) = (frame.width(), frame.height());
    let mut pixmap = Pixmap::new(width, height).ok_or(RasterError::Canvas { width, height })?;
    pixmap.fill(Color::WHITE);

    let mut paint = Paint::default();
    paint.set_color(Color::BLACK);
    paint.anti_alias = anti_alias;
    let transform = frame.transform();

    for prim in &graphic.primitives {
        match prim {
            // A lone point still leaves a round dot.
            Primitive::Stroke { points, width } if points.len() == 1 => {
                let dot = PathBuilder::from_circle(
                    points[0].x as f32,
                    points[0].y as f32,
                    (width.abs() * 0.5) as f32,
                );
                if let Some(path) = dot {
                    pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
                }
            }
            Primitive::Stroke { width, .. } => {
                let Some(path) = primitive_path(prim) else {
                    continue;
                };
                let stroke = Stroke {
                    width: width.abs() as f32,
                    line_cap: LineCap::Round,
                    line_join: LineJoin::Round,
                    ..Stroke::default()
                };
                pixmap.stroke_path(&path, &paint, &stroke, transform, None);
            }
            Primitive::Polygon { .. } | Primitive::Circle { .. } => {
                if let Some(path) = primitive_path(prim) {
                    pixmap.fill_path(&path, &paint, FillRule::EvenOdd, transform, None);
                }
            }
        }
    }

    // Background is opaque, so premultiplied channels are the colour.
    let rgb = pixmap
        .pixels()
        .iter()
        .flat_map(|p| [p.red(), p.green(), p.blue()])
        .collect();
    RgbImage::from_raw(width, height, rgb).ok_or(RasterError::Canvas { width, height })
}

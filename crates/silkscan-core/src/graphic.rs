//! Plotted layer drawing in plotter units (Y up).

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::LocalBox;

/// One drawing primitive emitted by the plotter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    /// Closed region, filled with the even-odd rule.
    Polygon { points: Vec<Point2<f64>> },
    /// Polyline traced with a round aperture of the given diameter.
    Stroke {
        points: Vec<Point2<f64>>,
        width: f64,
    },
    /// Round flash.
    Circle { center: Point2<f64>, radius: f64 },
}

impl Primitive {
    /// Axis-aligned extent including stroke width, as `[min_x, min_y, max_x, max_y]`.
    pub fn extent(&self) -> Option<[f64; 4]> {
        let (points, pad): (&[Point2<f64>], f64) = match self {
            Primitive::Polygon { points } => (points, 0.0),
            Primitive::Stroke { points, width } => (points, width.abs() * 0.5),
            Primitive::Circle { center, radius } => {
                let r = radius.abs();
                return Some([center.x - r, center.y - r, center.x + r, center.y + r]);
            }
        };
        let first = points.first()?;
        let mut ext = [first.x, first.y, first.x, first.y];
        for p in &points[1..] {
            ext[0] = ext[0].min(p.x);
            ext[1] = ext[1].min(p.y);
            ext[2] = ext[2].max(p.x);
            ext[3] = ext[3].max(p.y);
        }
        Some([ext[0] - pad, ext[1] - pad, ext[2] + pad, ext[3] + pad])
    }

    fn is_finite(&self) -> bool {
        match self {
            Primitive::Polygon { points } => {
                points.iter().all(|p| p.x.is_finite() && p.y.is_finite())
            }
            Primitive::Stroke { points, width } => {
                width.is_finite() && points.iter().all(|p| p.x.is_finite() && p.y.is_finite())
            }
            Primitive::Circle { center, radius } => {
                radius.is_finite() && center.x.is_finite() && center.y.is_finite()
            }
        }
    }
}

/// Renderable drawing of one layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorGraphic {
    pub primitives: Vec<Primitive>,
}

impl VectorGraphic {
    pub fn new(primitives: Vec<Primitive>) -> Self {
        Self { primitives }
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    /// Whether every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.primitives.iter().all(Primitive::is_finite)
    }

    /// Tight bounding box of all primitives, or `None` for an empty drawing.
    pub fn bounds(&self) -> Option<LocalBox> {
        let mut acc: Option<[f64; 4]> = None;
        for ext in self.primitives.iter().filter_map(Primitive::extent) {
            acc = Some(match acc {
                None => ext,
                Some(a) => [
                    a[0].min(ext[0]),
                    a[1].min(ext[1]),
                    a[2].max(ext[2]),
                    a[3].max(ext[3]),
                ],
            });
        }
        acc.map(|[x0, y0, x1, y1]| LocalBox::new(x0, y0, x1 - x0, y1 - y0))
    }
}

/// Axis-aligned filled rectangle centred on `center`, in plotter units.
pub fn rect_polygon(center: Point2<f64>, width: f64, height: f64) -> Primitive {
    let hw = width * 0.5;
    let hh = height * 0.5;
    Primitive::Polygon {
        points: vec![
            Point2::new(center.x - hw, center.y - hh),
            Point2::new(center.x + hw, center.y - hh),
            Point2::new(center.x + hw, center.y + hh),
            Point2::new(center.x - hw, center.y + hh),
        ],
    }
}

//! The two recognition passes and the geometry linking their rasters.
//!
//! The rotated pass sees the layer turned 90 degrees clockwise, so vertical
//! silkscreen text reads left-to-right. Boxes it reports live in the rotated
//! canvas and must be brought back before projecting onto the board.

use std::fmt;

use image::GrayImage;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Recognition pass over one layer raster.
///
/// Ordering follows the scan order: the upright pass wins ties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    /// Raster as rendered; captures horizontal text.
    Upright,
    /// Raster rotated 90 degrees clockwise; captures vertical text.
    Rotated90,
}

impl Pass {
    pub const ORDER: [Pass; 2] = [Pass::Upright, Pass::Rotated90];

    /// Raster the recognizer sees for this pass.
    ///
    /// Borrowed for the upright pass; a fresh rotated copy otherwise.
    pub fn prepare<'a>(self, source: &'a GrayImage) -> std::borrow::Cow<'a, GrayImage> {
        match self {
            Pass::Upright => std::borrow::Cow::Borrowed(source),
            Pass::Rotated90 => std::borrow::Cow::Owned(rotate_cw90(source)),
        }
    }

    /// Map a point reported in this pass's raster into the source raster.
    ///
    /// `source_height` is the height of the unrotated raster.
    #[inline]
    pub fn to_source(self, p: Point2<f64>, source_height: u32) -> Point2<f64> {
        match self {
            Pass::Upright => p,
            Pass::Rotated90 => unrotate_cw90(p, source_height),
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Pass::Upright => "0°",
            Pass::Rotated90 => "90°",
        })
    }
}

/// Rotate a raster 90 degrees clockwise. A `w x h` source yields `h x w`.
pub fn rotate_cw90(source: &GrayImage) -> GrayImage {
    image::imageops::rotate90(source)
}

/// Continuous point in the clockwise-rotated canvas to the source canvas.
///
/// Rotating clockwise sends source `(u, v)` to `(H - v, u)`, `H` being the
/// source height; this is the inverse, `(u', v') -> (v', H - u')`.
#[inline]
pub fn unrotate_cw90(p: Point2<f64>, source_height: u32) -> Point2<f64> {
    Point2::new(p.y, source_height as f64 - p.x)
}

/// Source point to the clockwise-rotated canvas; inverse of [`unrotate_cw90`].
#[inline]
pub fn rotate_point_cw90(p: Point2<f64>, source_height: u32) -> Point2<f64> {
    Point2::new(source_height as f64 - p.y, p.x)
}

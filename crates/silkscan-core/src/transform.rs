//! Board (native units, Y up) <-> board pixel (Y down) mapping.
//!
//! Board pixels are the intrinsic on-screen pixels of the board at zoom 1:
//! one pixel is [`PLOTTER_UNITS_PER_PIXEL`] plotter units. The Y axis is
//! flipped about `BoardSpace::y_translate`.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{BoardSpace, PLOTTER_UNITS_PER_NATIVE, PLOTTER_UNITS_PER_PIXEL};

/// Stateless transform parameterised only by the board space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardTransform {
    min_x: f64,
    min_y: f64,
    y_translate: f64,
}

impl BoardTransform {
    pub fn new(space: &BoardSpace) -> Self {
        Self {
            min_x: space.min_x(),
            min_y: space.min_y(),
            y_translate: space.y_translate(),
        }
    }

    /// Native board coordinates to board pixels.
    #[inline]
    pub fn board_to_pixel(&self, p: Point2<f64>) -> Point2<f64> {
        let px = (p.x * PLOTTER_UNITS_PER_NATIVE - self.min_x) / PLOTTER_UNITS_PER_PIXEL;
        let py = (self.y_translate - p.y * PLOTTER_UNITS_PER_NATIVE - self.min_y)
            / PLOTTER_UNITS_PER_PIXEL;
        Point2::new(px, py)
    }

    /// Board pixels back to native board coordinates.
    #[inline]
    pub fn pixel_to_board(&self, p: Point2<f64>) -> Point2<f64> {
        let x = (p.x * PLOTTER_UNITS_PER_PIXEL + self.min_x) / PLOTTER_UNITS_PER_NATIVE;
        let y = (self.y_translate - p.y * PLOTTER_UNITS_PER_PIXEL - self.min_y)
            / PLOTTER_UNITS_PER_NATIVE;
        Point2::new(x, y)
    }
}

impl From<&BoardSpace> for BoardTransform {
    fn from(space: &BoardSpace) -> Self {
        Self::new(space)
    }
}

/// Native board coordinates to board pixels.
pub fn board_to_pixel(p: Point2<f64>, space: &BoardSpace) -> Point2<f64> {
    BoardTransform::new(space).board_to_pixel(p)
}

/// Board pixels to native board coordinates.
pub fn pixel_to_board(p: Point2<f64>, space: &BoardSpace) -> Point2<f64> {
    BoardTransform::new(space).pixel_to_board(p)
}

/// On-screen zoom and pan applied on top of board pixels.
///
/// `screen = board_pixel * scale + offset`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl Viewport {
    /// Derive the viewport from where the board element ended up on screen.
    ///
    /// `rect_*` is the on-screen rectangle of the scaled board element.
    pub fn from_rendered_rect(
        space: &BoardSpace,
        rect_left: f64,
        rect_top: f64,
        rect_width: f64,
        rect_height: f64,
    ) -> Self {
        let (w, h) = space.pixel_size();
        Self {
            scale_x: rect_width / w,
            scale_y: rect_height / h,
            offset_x: rect_left,
            offset_y: rect_top,
        }
    }

    /// Screen position to intrinsic board pixels.
    #[inline]
    pub fn screen_to_pixel(&self, p: Point2<f64>) -> Point2<f64> {
        Point2::new(
            (p.x - self.offset_x) / self.scale_x,
            (p.y - self.offset_y) / self.scale_y,
        )
    }

    /// Intrinsic board pixels to screen position.
    #[inline]
    pub fn pixel_to_screen(&self, p: Point2<f64>) -> Point2<f64> {
        Point2::new(
            p.x * self.scale_x + self.offset_x,
            p.y * self.scale_y + self.offset_y,
        )
    }

    /// Pointer position on screen to native board coordinates.
    pub fn screen_to_board(&self, p: Point2<f64>, space: &BoardSpace) -> Point2<f64> {
        pixel_to_board(self.screen_to_pixel(p), space)
    }

    /// Viewport that centres the native board point `target` inside a view of
    /// `view_width` x `view_height` screen pixels at uniform `zoom`.
    pub fn centered_on(
        target: Point2<f64>,
        space: &BoardSpace,
        view_width: f64,
        view_height: f64,
        zoom: f64,
    ) -> Self {
        let p = board_to_pixel(target, space);
        Self {
            scale_x: zoom,
            scale_y: zoom,
            offset_x: view_width / 2.0 - p.x * zoom,
            offset_y: view_height / 2.0 - p.y * zoom,
        }
    }
}

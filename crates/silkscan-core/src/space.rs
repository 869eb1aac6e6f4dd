//! Plotter-unit rectangles: per-layer local boxes and the shared board space.

use serde::{Deserialize, Serialize};

/// Plotter units per native unit (inch or millimetre).
pub const PLOTTER_UNITS_PER_NATIVE: f64 = 1000.0;

/// Plotter units per on-screen board pixel at zoom 1.
pub const PLOTTER_UNITS_PER_PIXEL: f64 = 10.0;

/// Axis-aligned box in plotter units, as reported by the plotter for one file.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LocalBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Boxes with a non-positive or non-finite extent cannot contribute to
    /// the board space.
    pub fn is_degenerate(&self) -> bool {
        !(self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0)
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }
}

/// Invalid board space parameters.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BoardSpaceError {
    #[error("board space origin must be finite (min_x={min_x}, min_y={min_y})")]
    NonFiniteOrigin { min_x: f64, min_y: f64 },
    #[error("board space extent must be finite and > 0 (width={width}, height={height})")]
    InvalidExtent { width: f64, height: f64 },
}

/// The single rectangle, in plotter units, every layer of a board shares.
///
/// Construction validates the extent, so any `BoardSpace` value is safe to
/// hand to the coordinate transform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LocalBox", into = "LocalBox")]
pub struct BoardSpace {
    min_x: f64,
    min_y: f64,
    width: f64,
    height: f64,
}

impl BoardSpace {
    /// Build a board space from plotter-unit origin and extent.
    pub fn new(min_x: f64, min_y: f64, width: f64, height: f64) -> Result<Self, BoardSpaceError> {
        if !min_x.is_finite() || !min_y.is_finite() {
            return Err(BoardSpaceError::NonFiniteOrigin { min_x, min_y });
        }
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(BoardSpaceError::InvalidExtent { width, height });
        }
        Ok(Self {
            min_x,
            min_y,
            width,
            height,
        })
    }

    /// Build a board space from native-unit origin and extent.
    pub fn from_native(
        min_x: f64,
        min_y: f64,
        width: f64,
        height: f64,
    ) -> Result<Self, BoardSpaceError> {
        Self::new(
            min_x * PLOTTER_UNITS_PER_NATIVE,
            min_y * PLOTTER_UNITS_PER_NATIVE,
            width * PLOTTER_UNITS_PER_NATIVE,
            height * PLOTTER_UNITS_PER_NATIVE,
        )
    }

    #[inline]
    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    #[inline]
    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    /// Width in plotter units.
    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Height in plotter units.
    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Width in native units.
    #[inline]
    pub fn native_width(&self) -> f64 {
        self.width / PLOTTER_UNITS_PER_NATIVE
    }

    /// Height in native units.
    #[inline]
    pub fn native_height(&self) -> f64 {
        self.height / PLOTTER_UNITS_PER_NATIVE
    }

    /// Offset of the Y flip between board space (Y up) and render space (Y down).
    ///
    /// A plotter-unit `y` renders at `y_translate() - y`.
    #[inline]
    pub fn y_translate(&self) -> f64 {
        self.height + 2.0 * self.min_y
    }

    /// Intrinsic on-screen size of the board in pixels at zoom 1.
    pub fn pixel_size(&self) -> (f64, f64) {
        (
            self.width / PLOTTER_UNITS_PER_PIXEL,
            self.height / PLOTTER_UNITS_PER_PIXEL,
        )
    }

    /// The rectangle as a plain plotter-unit box.
    pub fn as_box(&self) -> LocalBox {
        LocalBox::new(self.min_x, self.min_y, self.width, self.height)
    }

    /// Whether `other` lies entirely inside this space.
    pub fn contains_box(&self, other: &LocalBox) -> bool {
        other.x >= self.min_x
            && other.y >= self.min_y
            && other.max_x() <= self.min_x + self.width
            && other.max_y() <= self.min_y + self.height
    }

    /// Whether the native-unit point lies inside the board extent.
    pub fn contains_native(&self, x: f64, y: f64) -> bool {
        let px = x * PLOTTER_UNITS_PER_NATIVE;
        let py = y * PLOTTER_UNITS_PER_NATIVE;
        px >= self.min_x
            && py >= self.min_y
            && px <= self.min_x + self.width
            && py <= self.min_y + self.height
    }
}

impl TryFrom<LocalBox> for BoardSpace {
    type Error = BoardSpaceError;

    fn try_from(b: LocalBox) -> Result<Self, Self::Error> {
        Self::new(b.x, b.y, b.width, b.height)
    }
}

impl From<BoardSpace> for LocalBox {
    fn from(space: BoardSpace) -> Self {
        space.as_box()
    }
}

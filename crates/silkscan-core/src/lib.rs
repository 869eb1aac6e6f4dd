//! Board model for plotted PCB fabrication layers.
//!
//! This crate is purely geometric. It does *not* parse Gerber text or run
//! OCR; it takes per-file plots, reduces them to one [`BoardSpace`], and
//! provides the board <-> pixel transform used by rendering, pointer
//! capture and OCR back-projection.

mod classify;
mod graphic;
mod layer;
mod logger;
mod placement;
mod space;
mod transform;
mod unify;

pub use classify::{classify, is_fabrication_file};
pub use graphic::{rect_polygon, Primitive, VectorGraphic};
pub use layer::{
    Layer, LayerError, LayerType, ParsedLayerGeometry, PlottedLayer, RawLayerInput,
};
pub use placement::{Placement, PlacementBook, PlacementEntry, Rotation, Side, Units};
pub use space::{
    BoardSpace, BoardSpaceError, LocalBox, PLOTTER_UNITS_PER_NATIVE, PLOTTER_UNITS_PER_PIXEL,
};
pub use transform::{board_to_pixel, pixel_to_board, BoardTransform, Viewport};
pub use unify::{load_layers, union_box, unify_layers, LayerPlotter, UnifiedBoard};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_for_verbosity};

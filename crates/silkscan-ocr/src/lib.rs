//! Locate silkscreen reference designators on a unified board.
//!
//! Each silkscreen layer is rasterized against the shared [`BoardSpace`],
//! binarized, and read twice by a [`TextRecognizer`]: once as rendered and
//! once rotated 90 degrees clockwise. Accepted tokens are projected back to
//! native board units and merged in a fixed order, so the result does not
//! depend on which worker finished first.
//!
//! ```no_run
//! use silkscan_core::{load_layers, RawLayerInput};
//! use silkscan_ocr::{DesignatorLocalizer, DesignatorSet, LocalizerParams, RunHooks, TesseractCli};
//!
//! # fn plotter(_: &RawLayerInput) -> Result<silkscan_core::ParsedLayerGeometry, silkscan_core::LayerError> { unimplemented!() }
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let board = load_layers(&[], &plotter);
//! let Some(space) = board.space else { return Ok(()) };
//! let localizer = DesignatorLocalizer::new(LocalizerParams::default())?;
//! let bom = DesignatorSet::from_bom(["R1", "C2", "U1"]);
//! let found = localizer.localize(
//!     &board.layers,
//!     &space,
//!     &bom,
//!     &TesseractCli::default(),
//!     RunHooks::default(),
//! )?;
//! println!("{} designators located", found.len());
//! # Ok(())
//! # }
//! ```
//!
//! [`BoardSpace`]: silkscan_core::BoardSpace

mod designator;
mod localizer;
mod orientation;
mod raster;
mod recognizer;
mod reconcile;
mod tesseract;
mod threshold;

pub use designator::{
    normalize_token, DesignatorMap, DesignatorMatch, DesignatorSet, Rejection,
    DEFAULT_MIN_DESIGNATOR_LEN,
};
pub use localizer::{
    localize_designators, CancelToken, DesignatorLocalizer, EmptyReason, LocalizeError,
    Localization, LocalizerParams, Progress, RunHooks, MAX_TARGET_RESOLUTION,
};
pub use orientation::{rotate_cw90, rotate_point_cw90, unrotate_cw90, Pass};
pub use raster::{rasterize, RasterError, RasterFrame};
pub use recognizer::{PixelBox, RecognizeError, RecognizedWord, TextRecognizer};
pub use reconcile::{reconcile, DesignatorHit, LayerScan};
pub use tesseract::{parse_tsv, TesseractCli};
pub use threshold::{binarize, DEFAULT_THRESHOLD};

//! High-level facade crate for the `silkscan-*` workspace.
//!
//! This crate provides:
//! - re-exports of the board model (`silkscan-core`) and the designator
//!   localizer (`silkscan-ocr`)
//! - a caller-owned [`BoardSession`] holding layers, located designators and
//!   captured placements
//! - JSON config/report helpers and an end-to-end [`run_config`] used by the
//!   `silkscan` binary
//!
//! ## Quickstart
//!
//! ```no_run
//! use silkscan::{scan_board, BoardFile, LocalizerParams, RunHooks, TesseractCli};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let board = BoardFile::load_json("board.json")?;
//! let bom = vec!["R1".to_string(), "C2".to_string()];
//! let outcome = scan_board(
//!     board.layers,
//!     &bom,
//!     LocalizerParams::default(),
//!     &TesseractCli::default(),
//!     RunHooks::default(),
//! )?;
//! for (designator, found) in outcome.session.designators() {
//!     println!("{designator}: ({:.3}, {:.3}) on {}", found.x, found.y, found.layer_type);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `silkscan::core`: board space, layers, classifier, transforms, placements.
//! - `silkscan::ocr`: rasterization, recognition seam, localizer pipeline.

pub use silkscan_core as core;
pub use silkscan_ocr as ocr;

pub use silkscan_core::{
    board_to_pixel, classify, load_layers, pixel_to_board, unify_layers, BoardSpace, Layer,
    LayerType, PlottedLayer, Side, UnifiedBoard, Units, Viewport,
};
pub use silkscan_ocr::{
    CancelToken, DesignatorLocalizer, DesignatorMap, DesignatorMatch, DesignatorSet,
    Localization, LocalizerParams, Progress, RunHooks, TesseractCli, TextRecognizer,
};

mod io;
mod scan;
mod session;

pub use io::{
    read_designator_list, BoardFile, IoError, LayerSummary, ReportedDesignator, ScanConfig,
    ScanReport,
};
pub use scan::{run_config, run_config_with, scan_board, ScanError, ScanOutcome};
pub use session::BoardSession;

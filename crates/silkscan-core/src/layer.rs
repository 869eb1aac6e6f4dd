use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{BoardSpace, LocalBox, VectorGraphic};

/// Fabrication layer role, derived from the file name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LayerType {
    #[serde(rename = "Top Copper")]
    TopCopper,
    #[serde(rename = "Bottom Copper")]
    BottomCopper,
    #[serde(rename = "Top Silkscreen")]
    TopSilkscreen,
    #[serde(rename = "Bottom Silkscreen")]
    BottomSilkscreen,
    #[serde(rename = "Top Solder Mask")]
    TopSolderMask,
    #[serde(rename = "Bottom Solder Mask")]
    BottomSolderMask,
    #[serde(rename = "Top Solder Paste")]
    TopPaste,
    #[serde(rename = "Bottom Solder Paste")]
    BottomPaste,
    Drill,
    Outline,
    Other,
}

impl LayerType {
    pub const ALL: [LayerType; 11] = [
        LayerType::TopCopper,
        LayerType::BottomCopper,
        LayerType::TopSilkscreen,
        LayerType::BottomSilkscreen,
        LayerType::TopSolderMask,
        LayerType::BottomSolderMask,
        LayerType::TopPaste,
        LayerType::BottomPaste,
        LayerType::Drill,
        LayerType::Outline,
        LayerType::Other,
    ];

    /// Human-readable name, as shown in layer lists and reports.
    pub fn label(self) -> &'static str {
        match self {
            LayerType::TopCopper => "Top Copper",
            LayerType::BottomCopper => "Bottom Copper",
            LayerType::TopSilkscreen => "Top Silkscreen",
            LayerType::BottomSilkscreen => "Bottom Silkscreen",
            LayerType::TopSolderMask => "Top Solder Mask",
            LayerType::BottomSolderMask => "Bottom Solder Mask",
            LayerType::TopPaste => "Top Solder Paste",
            LayerType::BottomPaste => "Bottom Solder Paste",
            LayerType::Drill => "Drill",
            LayerType::Outline => "Outline",
            LayerType::Other => "Other",
        }
    }

    #[inline]
    pub fn is_silkscreen(self) -> bool {
        matches!(self, LayerType::TopSilkscreen | LayerType::BottomSilkscreen)
    }

    /// Rank of a silkscreen layer in the designator scan order
    /// (top before bottom). `None` for non-silkscreen layers.
    pub fn silkscreen_rank(self) -> Option<u8> {
        match self {
            LayerType::TopSilkscreen => Some(0),
            LayerType::BottomSilkscreen => Some(1),
            _ => None,
        }
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One fabrication file as read from the upload, before plotting.
#[derive(Clone, Debug)]
pub struct RawLayerInput {
    pub filename: String,
    pub text: String,
    /// Lower-case extension without the dot (empty when absent).
    pub extension: String,
}

impl RawLayerInput {
    pub fn new(filename: impl Into<String>, text: impl Into<String>) -> Self {
        let filename = filename.into();
        let extension = crate::classify::extension_of(&filename).to_ascii_lowercase();
        Self {
            filename,
            text: text.into(),
            extension,
        }
    }
}

/// Output of plotting one file: its own bounding box and drawing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParsedLayerGeometry {
    pub bbox: LocalBox,
    pub graphic: VectorGraphic,
}

/// A successfully plotted file, the unit of input to the unifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlottedLayer {
    pub filename: String,
    pub bbox: LocalBox,
    pub graphic: VectorGraphic,
}

impl PlottedLayer {
    pub fn new(filename: impl Into<String>, geometry: ParsedLayerGeometry) -> Self {
        Self {
            filename: filename.into(),
            bbox: geometry.bbox,
            graphic: geometry.graphic,
        }
    }
}

/// A layer re-expressed against the shared board space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub filename: String,
    pub layer_type: LayerType,
    pub graphic: VectorGraphic,
    /// Frame the graphic is rendered against; always the board space.
    pub frame: BoardSpace,
    pub visible: bool,
}

/// A single file could not be turned into a usable layer.
///
/// These are recoverable: the file is logged and skipped.
#[derive(thiserror::Error, Debug)]
pub enum LayerError {
    #[error("{filename}: plot failed: {reason}")]
    Plot { filename: String, reason: String },
    #[error("{filename}: degenerate bounding box (width={width}, height={height})")]
    DegenerateBox {
        filename: String,
        width: f64,
        height: f64,
    },
    #[error("{filename}: rasterization failed: {reason}")]
    Raster { filename: String, reason: String },
    #[error("{filename}: recognition failed: {reason}")]
    Recognize { filename: String, reason: String },
}

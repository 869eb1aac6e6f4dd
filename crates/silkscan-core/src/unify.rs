//! Reduce per-file boxes to one board space and rebase every layer onto it.
//!
//! Independently plotted files report their own boxes. Rendering each file
//! against its own box would shift copper, silkscreen and paste relative to
//! each other, so every retained layer is re-expressed against the union.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::classify::{classify, is_fabrication_file};
use crate::{
    BoardSpace, Layer, LayerError, LocalBox, ParsedLayerGeometry, PlottedLayer, RawLayerInput,
    PLOTTER_UNITS_PER_NATIVE,
};

/// Result of unifying one upload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UnifiedBoard {
    pub layers: Vec<Layer>,
    /// `None` when no layer survived ("no board").
    pub space: Option<BoardSpace>,
}

impl UnifiedBoard {
    pub fn is_empty(&self) -> bool {
        self.space.is_none()
    }

    /// Board extent in native units as `(width, height)`.
    pub fn native_size(&self) -> Option<(f64, f64)> {
        self.space.map(|s| (s.native_width(), s.native_height()))
    }
}

/// Smallest box enclosing every non-degenerate input box.
///
/// Returns `None` if no box survives.
pub fn union_box<'a>(boxes: impl IntoIterator<Item = &'a LocalBox>) -> Option<BoardSpace> {
    let mut acc: Option<[f64; 4]> = None;
    for b in boxes.into_iter().filter(|b| !b.is_degenerate()) {
        acc = Some(match acc {
            None => [b.x, b.y, b.max_x(), b.max_y()],
            Some([x0, y0, x1, y1]) => [
                x0.min(b.x),
                y0.min(b.y),
                x1.max(b.max_x()),
                y1.max(b.max_y()),
            ],
        });
    }
    let [x0, y0, x1, y1] = acc?;
    BoardSpace::new(x0, y0, x1 - x0, y1 - y0).ok()
}

/// Build the shared board space and the layer list from plotted files.
///
/// Files with a degenerate box are skipped with a warning. If nothing is
/// left, the returned board has no space and no layers.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(plotted), fields(files = plotted.len()))
)]
pub fn unify_layers(plotted: Vec<PlottedLayer>) -> UnifiedBoard {
    let mut kept = Vec::with_capacity(plotted.len());
    for layer in plotted {
        if layer.bbox.is_degenerate() {
            let err = LayerError::DegenerateBox {
                filename: layer.filename.clone(),
                width: layer.bbox.width,
                height: layer.bbox.height,
            };
            warn!("skipping layer: {err}");
            continue;
        }
        kept.push(layer);
    }

    let Some(space) = union_box(kept.iter().map(|l| &l.bbox)) else {
        warn!("no usable layers; board space is empty");
        return UnifiedBoard::default();
    };

    info!(
        "board space: origin=({:.3}, {:.3}) size={:.3}x{:.3} from {} layers",
        space.min_x() / PLOTTER_UNITS_PER_NATIVE,
        space.min_y() / PLOTTER_UNITS_PER_NATIVE,
        space.native_width(),
        space.native_height(),
        kept.len()
    );

    let layers = kept
        .into_iter()
        .map(|l| {
            let layer_type = classify(&l.filename);
            debug!("{} -> {}", l.filename, layer_type);
            Layer {
                filename: l.filename,
                layer_type,
                graphic: l.graphic,
                frame: space,
                visible: true,
            }
        })
        .collect();

    UnifiedBoard {
        layers,
        space: Some(space),
    }
}

/// External Gerber/Excellon parse-and-plot step for one file.
pub trait LayerPlotter {
    fn plot(&self, input: &RawLayerInput) -> Result<ParsedLayerGeometry, LayerError>;
}

impl<F> LayerPlotter for F
where
    F: Fn(&RawLayerInput) -> Result<ParsedLayerGeometry, LayerError>,
{
    fn plot(&self, input: &RawLayerInput) -> Result<ParsedLayerGeometry, LayerError> {
        self(input)
    }
}

/// Plot every fabrication file of an upload and unify the survivors.
///
/// Non-fabrication entries are ignored; plot failures are logged and skipped.
pub fn load_layers<P: LayerPlotter + ?Sized>(
    inputs: &[RawLayerInput],
    plotter: &P,
) -> UnifiedBoard {
    let mut plotted = Vec::new();
    for input in inputs {
        if !is_fabrication_file(&input.filename) {
            debug!("ignoring non-fabrication file {}", input.filename);
            continue;
        }
        match plotter.plot(input) {
            Ok(geometry) => plotted.push(PlottedLayer::new(input.filename.clone(), geometry)),
            Err(err) => warn!("skipping layer: {err}"),
        }
    }
    unify_layers(plotted)
}

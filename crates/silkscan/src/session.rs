//! Caller-owned state of one uploaded board.

use nalgebra::Point2;
use silkscan_core::{BoardSpace, Layer, PlacementBook, Side, UnifiedBoard};
use silkscan_ocr::{normalize_token, DesignatorMap, DesignatorMatch, EmptyReason, Localization};

/// One board and the work done on it: layers, located designators and the
/// placements captured so far.
///
/// A new upload builds a new session; nothing is shared between sessions.
#[derive(Clone, Debug, Default)]
pub struct BoardSession {
    space: Option<BoardSpace>,
    layers: Vec<Layer>,
    designators: DesignatorMap,
    book: PlacementBook,
    current: Option<usize>,
    view_side: Side,
}

impl BoardSession {
    /// Start a session from a unified upload and the BOM designators.
    pub fn from_unified<I, S>(board: UnifiedBoard, bom: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let book = PlacementBook::new(bom);
        let current = book.next_unplaced(None);
        Self {
            space: board.space,
            layers: board.layers,
            designators: DesignatorMap::new(),
            book,
            current,
            view_side: Side::Top,
        }
    }

    pub fn space(&self) -> Option<&BoardSpace> {
        self.space.as_ref()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn designators(&self) -> &DesignatorMap {
        &self.designators
    }

    pub fn book(&self) -> &PlacementBook {
        &self.book
    }

    pub fn book_mut(&mut self) -> &mut PlacementBook {
        &mut self.book
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Side the board is currently viewed from.
    pub fn view_side(&self) -> Side {
        self.view_side
    }

    pub fn flip_view(&mut self) -> Side {
        self.view_side = self.view_side.flipped();
        self.view_side
    }

    /// Flip a layer's visibility; returns the new state.
    pub fn toggle_visibility(&mut self, idx: usize) -> Option<bool> {
        let layer = self.layers.get_mut(idx)?;
        layer.visible = !layer.visible;
        Some(layer.visible)
    }

    /// Install the result of a localization run.
    ///
    /// A completed run replaces the whole mapping and returns its size. An
    /// empty run leaves the previous mapping untouched.
    pub fn apply_localization(&mut self, run: Localization) -> Result<usize, EmptyReason> {
        match run {
            Localization::Done { designators } => {
                self.designators = designators;
                Ok(self.designators.len())
            }
            Localization::Empty { reason } => Err(reason),
        }
    }

    /// Where a BOM designator was read, if it was.
    pub fn located(&self, designator: &str) -> Option<&DesignatorMatch> {
        self.designators.get(&normalize_token(designator))
    }

    /// Select a BOM entry. The view turns to the side its designator was
    /// read on, when it was read at all.
    pub fn select(&mut self, idx: usize) -> Option<&DesignatorMatch> {
        let entry = self.book.entries().get(idx)?;
        self.current = Some(idx);
        let found = self.designators.get(&normalize_token(&entry.designator))?;
        self.view_side = Side::from(found.layer_type);
        Some(found)
    }

    /// Place the selected entry at a native board point on the viewed side,
    /// then move on to the next unplaced entry.
    pub fn place_current(&mut self, point: Point2<f64>) -> Option<usize> {
        let idx = self.current?;
        self.book.place(idx, point, self.view_side)?;
        self.current = self.book.next_unplaced(Some(idx));
        self.current
    }
}

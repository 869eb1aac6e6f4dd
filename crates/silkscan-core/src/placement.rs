//! Placement records handed to the pick-and-place exporter.

use std::fmt;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::LayerType;

/// Component rotation in 90 degree steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }

    /// Next rotation, +90 degrees modulo 360.
    pub fn next(self) -> Self {
        match self {
            Rotation::R0 => Rotation::R90,
            Rotation::R90 => Rotation::R180,
            Rotation::R180 => Rotation::R270,
            Rotation::R270 => Rotation::R0,
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(deg: u16) -> Result<Self, Self::Error> {
        match deg {
            0 => Ok(Rotation::R0),
            90 => Ok(Rotation::R90),
            180 => Ok(Rotation::R180),
            270 => Ok(Rotation::R270),
            other => Err(format!("rotation must be 0, 90, 180 or 270 (got {other})")),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(r: Rotation) -> Self {
        r.degrees()
    }
}

/// Board side a component is mounted on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Top,
    Bottom,
}

impl Side {
    pub fn flipped(self) -> Self {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
        }
    }
}

impl From<LayerType> for Side {
    /// Any bottom-side layer maps to the bottom; everything else is top.
    fn from(layer: LayerType) -> Self {
        match layer {
            LayerType::BottomSilkscreen
            | LayerType::BottomCopper
            | LayerType::BottomSolderMask
            | LayerType::BottomPaste => Side::Bottom,
            _ => Side::Top,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Top => "Top",
            Side::Bottom => "Bottom",
        })
    }
}

/// Final position of one component, in native units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub rotation: Rotation,
    pub side: Side,
}

/// Length unit of board coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Units {
    #[default]
    #[serde(alias = "in")]
    Inch,
    #[serde(alias = "mm")]
    Millimeter,
}

impl Units {
    pub const MM_PER_INCH: f64 = 25.4;

    /// Convert `value` expressed in `self` into `to`.
    pub fn convert(self, value: f64, to: Units) -> f64 {
        match (self, to) {
            (Units::Inch, Units::Millimeter) => value * Self::MM_PER_INCH,
            (Units::Millimeter, Units::Inch) => value / Self::MM_PER_INCH,
            _ => value,
        }
    }
}

/// One BOM line with its (optional) placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementEntry {
    pub designator: String,
    #[serde(default)]
    pub placement: Option<Placement>,
}

/// Ordered BOM designators and the placements captured so far.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementBook {
    entries: Vec<PlacementEntry>,
}

impl PlacementBook {
    pub fn new<I, S>(designators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = designators
            .into_iter()
            .map(|d| PlacementEntry {
                designator: d.as_ref().trim().to_string(),
                placement: None,
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[PlacementEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index_of(&self, designator: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.designator.eq_ignore_ascii_case(designator))
    }

    /// Record a click at `point` on `side`. An existing rotation is kept.
    pub fn place(&mut self, idx: usize, point: Point2<f64>, side: Side) -> Option<&Placement> {
        let entry = self.entries.get_mut(idx)?;
        let rotation = entry.placement.map(|p| p.rotation).unwrap_or_default();
        entry.placement = Some(Placement {
            x: point.x,
            y: point.y,
            rotation,
            side,
        });
        entry.placement.as_ref()
    }

    /// Advance the rotation of a placed component by 90 degrees.
    pub fn rotate(&mut self, idx: usize) -> Option<Rotation> {
        let placement = self.entries.get_mut(idx)?.placement.as_mut()?;
        placement.rotation = placement.rotation.next();
        Some(placement.rotation)
    }

    /// Move a placed component to the other side.
    pub fn toggle_side(&mut self, idx: usize) -> Option<Side> {
        let placement = self.entries.get_mut(idx)?.placement.as_mut()?;
        placement.side = placement.side.flipped();
        Some(placement.side)
    }

    pub fn clear(&mut self, idx: usize) {
        if let Some(entry) = self.entries.get_mut(idx) {
            entry.placement = None;
        }
    }

    /// Next unplaced entry after `current`, wrapping to the first unplaced one.
    pub fn next_unplaced(&self, current: Option<usize>) -> Option<usize> {
        let start = current.map(|c| c + 1).unwrap_or(0);
        self.entries
            .iter()
            .enumerate()
            .skip(start)
            .chain(self.entries.iter().enumerate().take(start))
            .find(|(_, e)| e.placement.is_none())
            .map(|(i, _)| i)
    }

    pub fn placed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.placement.is_some()).count()
    }

    /// Share of placed entries, rounded to a whole percent.
    pub fn progress_percent(&self) -> u32 {
        if self.entries.is_empty() {
            return 0;
        }
        ((self.placed_count() as f64 / self.entries.len() as f64) * 100.0).round() as u32
    }
}

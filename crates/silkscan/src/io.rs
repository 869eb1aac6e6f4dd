//! JSON configuration, board input and report output for a scan.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use silkscan_core::{BoardSpace, LayerType, PlottedLayer, Side, Units};
use silkscan_ocr::{normalize_token, EmptyReason, LocalizerParams, TesseractCli};

use crate::BoardSession;

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn load<T: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> Result<T, IoError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn write<T: Serialize>(value: &T, path: impl AsRef<Path>) -> Result<(), IoError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Plotted layers of one upload, as written by the external plotter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardFile {
    /// Native unit of the fabrication data, when known.
    #[serde(default)]
    pub units: Option<Units>,
    pub layers: Vec<PlottedLayer>,
}

impl BoardFile {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        load(path)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        write(self, path)
    }
}

/// Read BOM designators: one or more per line, separated by commas or
/// whitespace. Text after `#` is ignored.
pub fn read_designator_list(path: impl AsRef<Path>) -> Result<Vec<String>, IoError> {
    let raw = fs::read_to_string(path)?;
    Ok(parse_designator_list(&raw))
}

pub(crate) fn parse_designator_list(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .flat_map(|line| line.split(|c: char| c == ',' || c.is_whitespace()))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration for one `silkscan` run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanConfig {
    pub board_path: String,
    /// BOM designator list; without it every token is accepted.
    #[serde(default)]
    pub designators_path: Option<String>,
    #[serde(default)]
    pub output_path: Option<String>,
    /// Unit for reported coordinates; defaults to the board's native unit.
    #[serde(default)]
    pub display_units: Option<Units>,
    #[serde(default)]
    pub params: Option<LocalizerParams>,
    #[serde(default)]
    pub tesseract: TesseractCli,
}

impl ScanConfig {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        load(path)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        write(self, path)
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("silkscan_report.json"))
    }

    pub fn build_params(&self) -> LocalizerParams {
        self.params.clone().unwrap_or_default()
    }

    /// BOM designators, or an empty list when no file is configured.
    pub fn designators(&self) -> Result<Vec<String>, IoError> {
        match &self.designators_path {
            Some(path) => read_designator_list(path),
            None => Ok(Vec::new()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerSummary {
    pub filename: String,
    pub layer_type: LayerType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportedDesignator {
    pub designator: String,
    pub x: f64,
    pub y: f64,
    pub layer_type: LayerType,
    pub side: Side,
}

/// JSON report of one scan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// `None` when no layer had a usable bounding box.
    pub board: Option<BoardSpace>,
    /// Board `[width, height]` in `units`.
    pub size: Option<[f64; 2]>,
    /// Unit of every coordinate in the report; `None` when unknown.
    pub units: Option<Units>,
    pub layers: Vec<LayerSummary>,
    /// Why no mapping was produced, when that is the case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_reason: Option<EmptyReason>,
    pub designators: Vec<ReportedDesignator>,
    /// BOM designators that were not located.
    pub missing: Vec<String>,
}

impl ScanReport {
    /// Summarize a session. Coordinates are converted from `native` to
    /// `display` when both are known.
    pub fn from_session(
        session: &BoardSession,
        native: Option<Units>,
        display: Option<Units>,
        empty_reason: Option<EmptyReason>,
    ) -> Self {
        let units = native.and(display).or(native);
        let convert = |v: f64| match (native, display) {
            (Some(from), Some(to)) => from.convert(v, to),
            _ => v,
        };

        let designators = session
            .designators()
            .values()
            .map(|m| ReportedDesignator {
                designator: m.designator.clone(),
                x: convert(m.x),
                y: convert(m.y),
                layer_type: m.layer_type,
                side: Side::from(m.layer_type),
            })
            .collect();

        let missing = session
            .book()
            .entries()
            .iter()
            .map(|e| normalize_token(&e.designator))
            .filter(|d| !session.designators().contains_key(d))
            .collect();

        let board = session.space().copied();
        Self {
            board,
            size: board.map(|b| [convert(b.native_width()), convert(b.native_height())]),
            units,
            layers: session
                .layers()
                .iter()
                .map(|l| LayerSummary {
                    filename: l.filename.clone(),
                    layer_type: l.layer_type,
                })
                .collect(),
            empty_reason,
            designators,
            missing,
        }
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        load(path)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        write(self, path)
    }
}

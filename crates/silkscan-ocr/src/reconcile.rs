//! Merge per-layer, per-pass reads into one designator map.
//!
//! The first accepted read of a designator wins and is never replaced. The
//! scan order is fixed: top silkscreen before bottom silkscreen, and within
//! a layer the upright pass before the rotated pass, each in engine order.
//! Completion order of the workers plays no part.

use serde::{Deserialize, Serialize};
use silkscan_core::LayerType;

use crate::{DesignatorMap, DesignatorMatch, Pass};

/// One accepted designator read, already projected to native board units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DesignatorHit {
    pub designator: String,
    pub x: f64,
    pub y: f64,
}

/// Everything one silkscreen layer produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerScan {
    pub filename: String,
    pub layer_type: LayerType,
    pub upright: Vec<DesignatorHit>,
    pub rotated: Vec<DesignatorHit>,
}

impl LayerScan {
    pub fn new(filename: impl Into<String>, layer_type: LayerType) -> Self {
        Self {
            filename: filename.into(),
            layer_type,
            upright: Vec::new(),
            rotated: Vec::new(),
        }
    }

    pub fn hits(&self, pass: Pass) -> &[DesignatorHit] {
        match pass {
            Pass::Upright => &self.upright,
            Pass::Rotated90 => &self.rotated,
        }
    }

    pub fn hits_mut(&mut self, pass: Pass) -> &mut Vec<DesignatorHit> {
        match pass {
            Pass::Upright => &mut self.upright,
            Pass::Rotated90 => &mut self.rotated,
        }
    }

    fn rank(&self) -> u8 {
        self.layer_type.silkscreen_rank().unwrap_or(u8::MAX)
    }
}

/// Apply the first-read-wins policy over `scans`.
///
/// Scans are visited by silkscreen rank (non-silkscreen scans last); scans
/// of equal rank keep their relative order.
pub fn reconcile(scans: &[LayerScan]) -> DesignatorMap {
    let mut ordered: Vec<&LayerScan> = scans.iter().collect();
    ordered.sort_by_key(|s| s.rank());

    let mut out = DesignatorMap::new();
    for scan in ordered {
        for pass in Pass::ORDER {
            for hit in scan.hits(pass) {
                out.entry(hit.designator.clone())
                    .or_insert_with(|| DesignatorMatch {
                        designator: hit.designator.clone(),
                        x: hit.x,
                        y: hit.y,
                        layer_type: scan.layer_type,
                    });
            }
        }
    }
    out
}

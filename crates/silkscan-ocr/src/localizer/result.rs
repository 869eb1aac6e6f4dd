use serde::{Deserialize, Serialize};

use crate::DesignatorMap;

/// Why a run produced no mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// No layer classified as top or bottom silkscreen.
    NoSilkscreen,
    /// The run was cancelled; partial results are discarded.
    Cancelled,
    /// No layer survived unification, so there was no board to scan.
    NoBoard,
}

/// Output of a localization run.
///
/// `Done` with an empty map is a completed run that found nothing; `Empty`
/// means no mapping was produced at all.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Localization {
    Done { designators: DesignatorMap },
    Empty { reason: EmptyReason },
}

impl Localization {
    pub fn is_empty(&self) -> bool {
        match self {
            Localization::Done { designators } => designators.is_empty(),
            Localization::Empty { .. } => true,
        }
    }

    /// Number of located designators.
    pub fn len(&self) -> usize {
        match self {
            Localization::Done { designators } => designators.len(),
            Localization::Empty { .. } => 0,
        }
    }

    pub fn mapping(&self) -> Option<&DesignatorMap> {
        match self {
            Localization::Done { designators } => Some(designators),
            Localization::Empty { .. } => None,
        }
    }

    pub fn into_map(self) -> DesignatorMap {
        match self {
            Localization::Done { designators } => designators,
            Localization::Empty { .. } => DesignatorMap::new(),
        }
    }
}

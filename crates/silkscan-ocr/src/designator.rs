//! Designator normalization, BOM filtering and located matches.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use silkscan_core::LayerType;

/// Shortest recognized token considered a designator.
pub const DEFAULT_MIN_DESIGNATOR_LEN: usize = 2;

/// Uppercase and keep ASCII alphanumerics only: `" r1."` -> `"R1"`.
pub fn normalize_token(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Why a recognized token was not accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    TooShort { token: String },
    NotInBom { token: String },
}

/// Designators listed in the BOM.
///
/// An empty set is permissive: every token long enough is accepted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignatorSet {
    designators: HashSet<String>,
}

impl DesignatorSet {
    /// Build from BOM designator entries (trimmed, uppercased, empties dropped).
    pub fn from_bom<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let designators = entries
            .into_iter()
            .map(|s| s.as_ref().trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self { designators }
    }

    pub fn permissive() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_permissive(&self) -> bool {
        self.designators.is_empty()
    }

    pub fn len(&self) -> usize {
        self.designators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.designators.is_empty()
    }

    pub fn contains(&self, designator: &str) -> bool {
        self.designators.contains(designator)
    }

    /// Sorted designators, for reports.
    pub fn sorted(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.designators.iter().map(String::as_str).collect();
        out.sort_unstable();
        out
    }

    /// Normalize a raw token and decide whether it names a designator.
    pub fn accept(&self, raw: &str, min_len: usize) -> Result<String, Rejection> {
        let token = normalize_token(raw);
        if token.len() < min_len {
            return Err(Rejection::TooShort { token });
        }
        if self.is_permissive() || self.designators.contains(&token) {
            Ok(token)
        } else {
            Err(Rejection::NotInBom { token })
        }
    }
}

/// Where a designator was read, in native board units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DesignatorMatch {
    pub designator: String,
    pub x: f64,
    pub y: f64,
    pub layer_type: LayerType,
}

/// Located designators, keyed by normalized designator.
///
/// A missing key means "not found"; the component is placed by hand.
pub type DesignatorMap = BTreeMap<String, DesignatorMatch>;

use serde::{Deserialize, Serialize};

use super::LocalizeError;
use crate::{DEFAULT_MIN_DESIGNATOR_LEN, DEFAULT_THRESHOLD};

/// Largest accepted `target_resolution`; one RGBA canvas stays under 256 MiB.
pub const MAX_TARGET_RESOLUTION: u32 = 8192;

/// Configuration for the designator localizer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizerParams {
    /// Pixels along the larger board dimension.
    pub target_resolution: u32,
    /// Upper bound on raster pixels per plotter unit.
    ///
    /// Small boards hit this cap before reaching `target_resolution`.
    pub max_upscale: f64,
    /// Channel-average cut between ink and background.
    pub threshold: u8,
    /// Shortest normalized token accepted as a designator.
    pub min_designator_len: usize,
    /// Worker threads for one run; `None` uses all available cores.
    pub worker_threads: Option<usize>,
    /// Antialias stroke and fill edges when rasterizing.
    pub anti_alias: bool,
}

impl Default for LocalizerParams {
    fn default() -> Self {
        Self {
            target_resolution: 2500,
            max_upscale: 5.0,
            threshold: DEFAULT_THRESHOLD,
            min_designator_len: DEFAULT_MIN_DESIGNATOR_LEN,
            worker_threads: None,
            anti_alias: true,
        }
    }
}

impl LocalizerParams {
    pub fn validate(&self) -> Result<(), LocalizeError> {
        if self.target_resolution == 0 {
            return Err(LocalizeError::ZeroResolution);
        }
        if self.target_resolution > MAX_TARGET_RESOLUTION {
            return Err(LocalizeError::ResolutionTooLarge {
                value: self.target_resolution,
                max: MAX_TARGET_RESOLUTION,
            });
        }
        if !self.max_upscale.is_finite() || self.max_upscale <= 0.0 {
            return Err(LocalizeError::InvalidUpscale {
                value: self.max_upscale,
            });
        }
        if self.worker_threads == Some(0) {
            return Err(LocalizeError::ZeroWorkers);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = LocalizerParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.target_resolution, 2500);
        assert_eq!(params.threshold, 128);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let params: LocalizerParams =
            serde_json::from_str(r#"{ "target_resolution": 800 }"#).expect("parse");
        assert_eq!(params.target_resolution, 800);
        assert_eq!(params.max_upscale, 5.0);
        assert_eq!(params.worker_threads, None);
    }

    #[test]
    fn rejects_bad_values() {
        let bad = [
            LocalizerParams {
                target_resolution: 0,
                ..Default::default()
            },
            LocalizerParams {
                max_upscale: f64::NAN,
                ..Default::default()
            },
            LocalizerParams {
                target_resolution: MAX_TARGET_RESOLUTION + 1,
                ..Default::default()
            },
            LocalizerParams {
                worker_threads: Some(0),
                ..Default::default()
            },
        ];
        for params in bad {
            assert!(params.validate().is_err(), "{params:?}");
        }
    }

    #[test]
    fn oversized_resolution_from_json_is_rejected() {
        let params: LocalizerParams =
            serde_json::from_str(r#"{ "target_resolution": 4000000000 }"#).expect("parse");
        assert!(matches!(
            params.validate(),
            Err(LocalizeError::ResolutionTooLarge { max: MAX_TARGET_RESOLUTION, .. })
        ));
        let at_limit = LocalizerParams {
            target_resolution: MAX_TARGET_RESOLUTION,
            ..Default::default()
        };
        assert!(at_limit.validate().is_ok());
    }
}

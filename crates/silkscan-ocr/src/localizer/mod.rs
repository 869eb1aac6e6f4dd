//! Designator localization pipeline.
//!
//! This module wires together rasterization, thresholding, the two
//! recognition passes, token filtering and the ordered merge.

mod error;
mod params;
mod pipeline;
mod progress;
mod result;

pub use error::LocalizeError;
pub use params::{LocalizerParams, MAX_TARGET_RESOLUTION};
pub use pipeline::{localize_designators, DesignatorLocalizer};
pub use progress::{CancelToken, Progress, RunHooks};
pub use result::{EmptyReason, Localization};

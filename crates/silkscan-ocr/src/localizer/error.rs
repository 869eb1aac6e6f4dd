/// Errors returned by the designator localizer.
///
/// Per-layer failures are not errors; they are logged and the layer
/// contributes nothing.
#[derive(thiserror::Error, Debug)]
pub enum LocalizeError {
    #[error("target resolution must be positive")]
    ZeroResolution,
    #[error("max upscale must be finite and positive (got {value})")]
    InvalidUpscale { value: f64 },
    #[error("target resolution {value} exceeds the {max} px limit")]
    ResolutionTooLarge { value: u32, max: u32 },
    #[error("worker thread count must be positive when set")]
    ZeroWorkers,
    #[error(transparent)]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use silkscan_core::LayerType;

use crate::Pass;

/// Advisory progress of one localization run.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Progress {
    Started {
        layers: usize,
    },
    LayerStarted {
        filename: String,
        layer_type: LayerType,
    },
    PassFinished {
        filename: String,
        pass: Pass,
        accepted: usize,
    },
    LayerFinished {
        filename: String,
        found: usize,
    },
    Finished {
        found: usize,
    },
}

/// Cooperative cancellation flag shared between a caller and a run.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Optional caller hooks for one run.
#[derive(Clone, Copy, Default)]
pub struct RunHooks<'a> {
    /// Called from worker threads; must return quickly.
    pub on_progress: Option<&'a (dyn Fn(&Progress) + Sync)>,
    pub cancel: Option<&'a CancelToken>,
}

impl<'a> RunHooks<'a> {
    pub fn with_progress(mut self, on_progress: &'a (dyn Fn(&Progress) + Sync)) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    pub fn with_cancel(mut self, cancel: &'a CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub(crate) fn emit(&self, event: Progress) {
        if let Some(cb) = self.on_progress {
            cb(&event);
        }
    }

    #[inline]
    pub(crate) fn cancelled(&self) -> bool {
        self.cancel.is_some_and(CancelToken::is_cancelled)
    }
}

impl std::fmt::Debug for RunHooks<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunHooks")
            .field("on_progress", &self.on_progress.is_some())
            .field("cancel", &self.cancel)
            .finish()
    }
}

use log::{info, warn};
use silkscan_core::{unify_layers, PlottedLayer};
use silkscan_ocr::{
    DesignatorLocalizer, DesignatorSet, EmptyReason, LocalizeError, LocalizerParams, Progress,
    RunHooks, TextRecognizer,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{BoardFile, BoardSession, IoError, ScanConfig, ScanReport};

/// Errors produced by the end-to-end helpers.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Localize(#[from] LocalizeError),
}

/// A session after one localization run.
#[derive(Clone, Debug)]
pub struct ScanOutcome {
    pub session: BoardSession,
    /// Set when the run produced no mapping.
    pub empty_reason: Option<EmptyReason>,
}

/// Unify plotted layers and locate the BOM designators on them.
///
/// An empty `bom` runs the localizer in permissive mode. A board with no
/// usable layer comes back with [`EmptyReason::NoBoard`] and no mapping.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip_all, fields(layers = plotted.len(), bom = bom.len()))
)]
pub fn scan_board<R: TextRecognizer + ?Sized>(
    plotted: Vec<PlottedLayer>,
    bom: &[String],
    params: LocalizerParams,
    recognizer: &R,
    hooks: RunHooks<'_>,
) -> Result<ScanOutcome, ScanError> {
    let localizer = DesignatorLocalizer::new(params)?;
    let mut session = BoardSession::from_unified(unify_layers(plotted), bom);
    let Some(space) = session.space().copied() else {
        warn!("no usable layers on the board");
        return Ok(ScanOutcome {
            session,
            empty_reason: Some(EmptyReason::NoBoard),
        });
    };

    let valid = DesignatorSet::from_bom(bom);
    let run = localizer.localize(session.layers(), &space, &valid, recognizer, hooks)?;
    let empty_reason = session.apply_localization(run).err();
    if let Some(reason) = empty_reason {
        warn!("no designator mapping: {reason:?}");
    }
    Ok(ScanOutcome {
        session,
        empty_reason,
    })
}

/// Run a whole scan from a config and write its report.
pub fn run_config(cfg: &ScanConfig) -> Result<ScanReport, ScanError> {
    run_config_with(cfg, &cfg.tesseract)
}

/// [`run_config`] with a caller-supplied recognizer.
pub fn run_config_with<R: TextRecognizer + ?Sized>(
    cfg: &ScanConfig,
    recognizer: &R,
) -> Result<ScanReport, ScanError> {
    let board = BoardFile::load_json(&cfg.board_path)?;
    let bom = cfg.designators()?;
    info!(
        "{}: {} plotted layers, {} BOM designators",
        cfg.board_path,
        board.layers.len(),
        bom.len()
    );

    let log_progress = |p: &Progress| match p {
        Progress::LayerStarted {
            filename,
            layer_type,
        } => info!("scanning {filename} ({layer_type})"),
        Progress::LayerFinished { filename, found } => info!("{filename}: {found} reads"),
        _ => {}
    };
    let hooks = RunHooks::default().with_progress(&log_progress);

    let outcome = scan_board(board.layers, &bom, cfg.build_params(), recognizer, hooks)?;
    let report = ScanReport::from_session(
        &outcome.session,
        board.units,
        cfg.display_units,
        outcome.empty_reason,
    );

    let out = cfg.output_path();
    report.write_json(&out)?;
    info!(
        "located {} designators ({} missing), report written to {}",
        report.designators.len(),
        report.missing.len(),
        out.display()
    );
    Ok(report)
}
